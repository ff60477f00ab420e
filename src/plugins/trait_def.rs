//! Plugin trait definitions

use crate::application::errors::PluginError;
use crate::domain::entities::Command;

/// Core plugin trait that all plugin kinds implement.
/// A plugin contributes commands and reacts to load/unload.
pub trait Plugin: Send + Sync {
    /// Instance name, the dotted `<category>.<name>` ref
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str;

    /// Commands contributed by this plugin, rebuilt on every call
    fn commands(&self) -> Vec<Command>;

    /// Called after construction, before commands are installed
    fn on_load(&mut self) -> Result<(), PluginError> {
        Ok(())
    }

    /// Called after the plugin's commands are removed
    fn on_unload(&mut self) -> Result<(), PluginError> {
        Ok(())
    }
}
