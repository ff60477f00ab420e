//! Authorization guard - single owner check shared by all privileged commands

use crate::application::errors::CommandError;
use crate::domain::entities::User;

/// Authorization policy consulted before privileged handlers run
pub trait Gate: Send + Sync {
    fn check(&self, sender: Option<&User>) -> Result<(), CommandError>;
}

/// Grants access to the configured owner account only.
/// With no owner configured, every request is refused.
#[derive(Debug, Clone, Default)]
pub struct OwnerGate {
    owner_id: Option<String>,
}

impl OwnerGate {
    pub fn new(owner_id: Option<String>) -> Self {
        Self { owner_id }
    }

    pub fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref()
    }
}

impl Gate for OwnerGate {
    fn check(&self, sender: Option<&User>) -> Result<(), CommandError> {
        let owner = self.owner_id.as_deref().ok_or(CommandError::PermissionDenied)?;
        let sender = sender.ok_or(CommandError::PermissionDenied)?;
        if sender.id == owner {
            Ok(())
        } else {
            Err(CommandError::PermissionDenied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_passes() {
        let gate = OwnerGate::new(Some("100".into()));
        assert_eq!(gate.owner_id(), Some("100"));
        assert!(gate.check(Some(&User::new("100"))).is_ok());
    }

    #[test]
    fn test_stranger_refused() {
        let gate = OwnerGate::new(Some("100".into()));
        let err = gate.check(Some(&User::new("200"))).unwrap_err();
        assert!(matches!(err, CommandError::PermissionDenied));
    }

    #[test]
    fn test_missing_sender_refused() {
        let gate = OwnerGate::new(Some("100".into()));
        assert!(gate.check(None).is_err());
    }

    #[test]
    fn test_no_owner_configured_refuses_everyone() {
        let gate = OwnerGate::new(None);
        assert!(gate.check(Some(&User::new("100"))).is_err());
    }
}
