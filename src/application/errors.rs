//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Connection closed")]
    Closed,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BotError {
    pub fn is_auth(&self) -> bool {
        matches!(self, BotError::Auth(_))
    }
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Command not found: {0}")]
    NotFound(String),

    #[error("Command already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Permission denied: restricted to the bot owner")]
    PermissionDenied,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Failed to read config file: {0}")]
    Read(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),
}

/// Plugin discovery and lifecycle errors
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Plugins directory not found: {0}")]
    RootNotFound(String),

    #[error("Failed to scan plugins directory: {0}")]
    Scan(String),

    #[error("Failed to read manifest for '{name}': {reason}")]
    Manifest { name: String, reason: String },

    #[error("Unknown plugin kind '{kind}' requested by '{name}'")]
    UnknownKind { name: String, kind: String },

    #[error("Invalid options for plugin '{name}': {reason}")]
    InvalidOptions { name: String, reason: String },

    #[error("Plugin kind already registered: {0}")]
    DuplicateKind(String),

    #[error("Plugin already loaded: {0}")]
    AlreadyLoaded(String),

    #[error("Plugin not loaded: {0}")]
    NotLoaded(String),

    #[error("Plugin '{name}' lifecycle hook failed: {reason}")]
    Lifecycle { name: String, reason: String },

    #[error("Command conflict in plugin '{name}': {source}")]
    CommandConflict {
        name: String,
        #[source]
        source: CommandError,
    },

    #[error("{} plugin(s) failed to load: {}", .0.len(), format_failures(.0))]
    LoadFailures(Vec<(String, String)>),
}

fn format_failures(failures: &[(String, String)]) -> String {
    failures
        .iter()
        .map(|(name, cause)| format!("{name} ({cause})"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Temp-folder cleanup errors
#[derive(Error, Debug)]
pub enum CleanupError {
    #[error("Cleanup target folder does not exist: {0}")]
    FolderNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_failures_display_names_every_offender() {
        let err = PluginError::LoadFailures(vec![
            ("cat.broken".into(), "bad manifest".into()),
            ("util.echo".into(), "unknown kind".into()),
        ]);
        let text = err.to_string();
        assert!(text.starts_with("2 plugin(s) failed to load"));
        assert!(text.contains("cat.broken (bad manifest)"));
        assert!(text.contains("util.echo (unknown kind)"));
    }

    #[test]
    fn test_cleanup_error_names_folder() {
        let err = CleanupError::FolderNotFound("tmp".into());
        assert!(err.to_string().contains("tmp"));
    }
}
