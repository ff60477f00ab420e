use std::time::Duration;

/// Outbound reply produced by a command handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// When set, the sent message is deleted after this delay
    pub delete_after: Option<Duration>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            delete_after: None,
        }
    }

    pub fn delete_after(mut self, delay: Duration) -> Self {
        self.delete_after = Some(delay);
        self
    }

    pub fn is_transient(&self) -> bool {
        self.delete_after.is_some()
    }
}
