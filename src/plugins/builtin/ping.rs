//! Ping plugin - liveness check

use crate::application::errors::PluginError;
use crate::domain::entities::{Command, Reply};
use crate::plugins::manifest::PluginManifest;
use crate::plugins::trait_def::Plugin;

pub struct PingPlugin {
    name: String,
}

pub fn construct(
    name: &str,
    _manifest: &PluginManifest,
) -> Result<Box<dyn Plugin>, PluginError> {
    Ok(Box::new(PingPlugin {
        name: name.to_string(),
    }))
}

impl Plugin for PingPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Replies pong"
    }

    fn commands(&self) -> Vec<Command> {
        vec![Command::new("ping")
            .with_description("Check that the bot is alive")
            .with_handler(|_| Ok(Reply::text("pong")))]
    }
}
