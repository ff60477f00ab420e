use std::collections::HashMap;

use super::{Message, Reply};
use crate::application::errors::CommandError;

/// Command handler function type
pub type CommandHandler =
    Box<dyn Fn(&Message) -> Result<Reply, CommandError> + Send + Sync>;

/// A named bot command with aliases and an optional handler
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub aliases: Vec<String>,
    pub usage: Option<String>,
    pub owner_only: bool,
    pub handler: Option<CommandHandler>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            aliases: Vec::new(),
            usage: None,
            owner_only: false,
            handler: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn owner_only(mut self) -> Self {
        self.owner_only = true;
        self
    }

    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Message) -> Result<Reply, CommandError> + Send + Sync + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Matches name or any alias, case-insensitively
    pub fn matches(&self, input: &str) -> bool {
        let input_lower = input.to_lowercase();
        self.name.to_lowercase() == input_lower
            || self.aliases.iter().any(|a| a.to_lowercase() == input_lower)
    }

    /// The command name plus every alias, lowercased
    pub fn all_names(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(self.name.to_lowercase())
            .chain(self.aliases.iter().map(|a| a.to_lowercase()))
    }
}

/// Command registry keyed by lowercased name
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command; fails when its name or an alias is already taken
    pub fn register(&mut self, command: Command) -> Result<(), CommandError> {
        for candidate in command.all_names() {
            if self.find(&candidate).is_some() {
                return Err(CommandError::AlreadyRegistered(candidate));
            }
        }
        self.commands.insert(command.name.to_lowercase(), command);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(&name.to_lowercase())
    }

    pub fn find(&self, input: &str) -> Option<&Command> {
        self.commands.values().find(|c| c.matches(input))
    }

    /// Removes by primary name; aliases are not removal keys
    pub fn remove(&mut self, name: &str) -> Option<Command> {
        self.commands.remove(&name.to_lowercase())
    }

    pub fn all(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_aliases_case_insensitive() {
        let cmd = Command::new("reload").with_aliases(vec!["refresh".into(), "r".into()]);
        assert!(cmd.matches("RELOAD"));
        assert!(cmd.matches("Refresh"));
        assert!(cmd.matches("r"));
        assert!(!cmd.matches("re"));
    }

    #[test]
    fn test_register_rejects_duplicate_name() {
        let mut registry = CommandRegistry::new();
        registry.register(Command::new("ping")).unwrap();
        let err = registry.register(Command::new("PING")).unwrap_err();
        assert!(matches!(err, CommandError::AlreadyRegistered(_)));
    }

    #[test]
    fn test_register_rejects_alias_collision() {
        let mut registry = CommandRegistry::new();
        registry
            .register(Command::new("echo").with_aliases(vec!["say".into()]))
            .unwrap();
        let err = registry.register(Command::new("say")).unwrap_err();
        assert!(matches!(err, CommandError::AlreadyRegistered(_)));
    }

    #[test]
    fn test_find_and_remove() {
        let mut registry = CommandRegistry::new();
        registry
            .register(Command::new("quote").with_aliases(vec!["q".into()]))
            .unwrap();
        assert!(registry.get("quote").is_some());
        assert!(registry.get("q").is_none());
        assert!(registry.find("Q").is_some());
        assert_eq!(registry.all().count(), 1);
        assert!(registry.remove("QUOTE").is_some());
        assert!(registry.find("q").is_none());
        assert!(registry.is_empty());
    }
}
