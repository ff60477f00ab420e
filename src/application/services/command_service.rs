//! Command service - registry plus the owner gate in front of it

use crate::application::control::ControlCommand;
use crate::application::errors::CommandError;
use crate::application::messaging::{Gate, OwnerGate};
use crate::domain::entities::{Command, CommandRegistry, Content, Message, Reply};

/// Service for managing and executing registered commands
pub struct CommandService {
    registry: CommandRegistry,
    prefix: String,
    gate: OwnerGate,
}

impl CommandService {
    pub fn new(prefix: impl Into<String>, gate: OwnerGate) -> Self {
        Self {
            registry: CommandRegistry::new(),
            prefix: prefix.into(),
            gate,
        }
    }

    /// Registers one command. Control command names are reserved.
    pub fn register(&mut self, command: Command) -> Result<(), CommandError> {
        for name in command.all_names() {
            if ControlCommand::is_reserved(&name) {
                return Err(CommandError::AlreadyRegistered(name));
            }
        }
        self.registry.register(command)
    }

    /// Installs a command set all-or-nothing and returns the installed
    /// primary names. On any collision nothing is installed.
    pub fn install(&mut self, commands: Vec<Command>) -> Result<Vec<String>, CommandError> {
        let mut seen: Vec<String> = Vec::new();
        for command in &commands {
            for name in command.all_names() {
                if ControlCommand::is_reserved(&name)
                    || self.registry.find(&name).is_some()
                    || seen.contains(&name)
                {
                    return Err(CommandError::AlreadyRegistered(name));
                }
                seen.push(name);
            }
        }
        let mut installed = Vec::with_capacity(commands.len());
        for command in commands {
            installed.push(command.name.clone());
            self.registry.register(command)?;
        }
        Ok(installed)
    }

    /// Removes a command by primary name
    pub fn remove(&mut self, name: &str) -> Option<Command> {
        self.registry.remove(name)
    }

    /// Dispatches a parsed message. Non-command content yields `None`;
    /// owner-only commands consult the gate before the handler runs.
    pub fn handle(&self, message: &Message) -> Result<Option<Reply>, CommandError> {
        let Content::Command { name, .. } = &message.content else {
            return Ok(None);
        };

        let cmd = self
            .registry
            .find(name)
            .ok_or_else(|| CommandError::NotFound(name.clone()))?;

        if cmd.owner_only {
            self.gate.check(message.sender.as_ref())?;
        }

        match &cmd.handler {
            Some(handler) => handler(message).map(Some),
            None => Ok(None),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry.find(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::User;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn service_with_owner(owner: &str) -> CommandService {
        CommandService::new(";", OwnerGate::new(Some(owner.to_string())))
    }

    #[test]
    fn test_handle_runs_registered_handler() {
        let mut service = service_with_owner("1");
        assert_eq!(service.prefix(), ";");
        service
            .register(Command::new("ping").with_handler(|_| Ok(Reply::text("pong"))))
            .unwrap();
        let msg = Message::from_command("chat", "ping", vec![]);
        let reply = service.handle(&msg).unwrap().unwrap();
        assert_eq!(reply.text, "pong");
    }

    #[test]
    fn test_handle_ignores_plain_text() {
        let service = service_with_owner("1");
        let msg = Message::from_text("chat", "hello");
        assert!(service.handle(&msg).unwrap().is_none());
    }

    #[test]
    fn test_handle_unknown_command() {
        let service = service_with_owner("1");
        let msg = Message::from_command("chat", "nope", vec![]);
        let err = service.handle(&msg).unwrap_err();
        assert!(matches!(err, CommandError::NotFound(name) if name == "nope"));
    }

    #[test]
    fn test_handler_failure_surfaces_as_error() {
        let mut service = service_with_owner("1");
        service
            .register(Command::new("boom").with_handler(|_| {
                Err(CommandError::ExecutionFailed("kaput".to_string()))
            }))
            .unwrap();
        let msg = Message::from_command("chat", "boom", vec![]);
        let err = service.handle(&msg).unwrap_err();
        assert_eq!(err.to_string(), "Execution failed: kaput");
    }

    #[test]
    fn test_owner_only_refuses_stranger_without_side_effect() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let mut service = service_with_owner("100");
        service
            .register(Command::new("wipe").owner_only().with_handler(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(Reply::text("wiped"))
            }))
            .unwrap();

        let msg =
            Message::from_command("chat", "wipe", vec![]).with_sender(User::new("200"));
        let err = service.handle(&msg).unwrap_err();
        assert!(matches!(err, CommandError::PermissionDenied));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let msg =
            Message::from_command("chat", "wipe", vec![]).with_sender(User::new("100"));
        assert!(service.handle(&msg).unwrap().is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_register_rejects_reserved_control_names() {
        let mut service = service_with_owner("1");
        let err = service.register(Command::new("reload")).unwrap_err();
        assert!(matches!(err, CommandError::AlreadyRegistered(_)));
        let err = service
            .register(Command::new("mycmd").with_aliases(vec!["r".into()]))
            .unwrap_err();
        assert!(matches!(err, CommandError::AlreadyRegistered(_)));
    }

    #[test]
    fn test_install_is_all_or_nothing() {
        let mut service = service_with_owner("1");
        service.register(Command::new("taken")).unwrap();

        let err = service
            .install(vec![Command::new("fresh"), Command::new("taken")])
            .unwrap_err();
        assert!(matches!(err, CommandError::AlreadyRegistered(_)));
        assert!(!service.contains("fresh"));

        let installed = service
            .install(vec![Command::new("one"), Command::new("two")])
            .unwrap();
        assert_eq!(installed.len(), 2);
        assert!(service.contains("one") && service.contains("two"));
    }

    #[test]
    fn test_install_rejects_internal_duplicates() {
        let mut service = service_with_owner("1");
        let err = service
            .install(vec![Command::new("dup"), Command::new("DUP")])
            .unwrap_err();
        assert!(matches!(err, CommandError::AlreadyRegistered(_)));
        assert!(service.is_empty());
    }
}
