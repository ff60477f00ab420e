//! Control command set - owner-operated bot management

use std::time::Duration;

/// Delay before a reload acknowledgment is deleted from the chat
pub const RELOAD_ACK_TTL: Duration = Duration::from_secs(7);

/// Built-in management commands, resolved ahead of the plugin registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Re-discover and reload every plugin
    Reload,
    /// Log out and stop the bot
    Exit,
    /// Placeholder; produces no reply
    Help,
}

impl ControlCommand {
    /// Resolve a command name or alias, case-insensitively
    pub fn resolve(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "reload" | "refresh" | "r" => Some(Self::Reload),
            "exit" | "logout" | "disconnect" => Some(Self::Exit),
            "help" | "h" => Some(Self::Help),
            _ => None,
        }
    }

    /// Whether the command is restricted to the bot owner
    pub fn requires_owner(self) -> bool {
        !matches!(self, Self::Help)
    }

    /// Control names and aliases are reserved words plugins cannot claim
    pub fn is_reserved(name: &str) -> bool {
        Self::resolve(name).is_some()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Reload => "reload",
            Self::Exit => "exit",
            Self::Help => "help",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_names_and_aliases() {
        assert_eq!(ControlCommand::resolve("reload"), Some(ControlCommand::Reload));
        assert_eq!(ControlCommand::resolve("refresh"), Some(ControlCommand::Reload));
        assert_eq!(ControlCommand::resolve("r"), Some(ControlCommand::Reload));
        assert_eq!(ControlCommand::resolve("exit"), Some(ControlCommand::Exit));
        assert_eq!(ControlCommand::resolve("logout"), Some(ControlCommand::Exit));
        assert_eq!(ControlCommand::resolve("disconnect"), Some(ControlCommand::Exit));
        assert_eq!(ControlCommand::resolve("help"), Some(ControlCommand::Help));
        assert_eq!(ControlCommand::resolve("ping"), None);
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        assert_eq!(ControlCommand::resolve("RELOAD"), Some(ControlCommand::Reload));
        assert_eq!(ControlCommand::resolve("LogOut"), Some(ControlCommand::Exit));
    }

    #[test]
    fn test_only_help_is_ungated() {
        assert!(ControlCommand::Reload.requires_owner());
        assert!(ControlCommand::Exit.requires_owner());
        assert!(!ControlCommand::Help.requires_owner());
    }

    #[test]
    fn test_reserved_names() {
        assert!(ControlCommand::is_reserved("r"));
        assert!(ControlCommand::is_reserved("disconnect"));
        assert!(!ControlCommand::is_reserved("quote"));
    }
}
