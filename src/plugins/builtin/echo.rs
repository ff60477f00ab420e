//! Echo plugin - repeats the invocation arguments

use serde::Deserialize;

use crate::application::errors::PluginError;
use crate::domain::entities::{Command, Content, Reply};
use crate::plugins::manifest::PluginManifest;
use crate::plugins::trait_def::Plugin;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EchoOptions {
    #[serde(default = "default_reply_prefix")]
    pub reply_prefix: String,
}

impl Default for EchoOptions {
    fn default() -> Self {
        Self {
            reply_prefix: default_reply_prefix(),
        }
    }
}

fn default_reply_prefix() -> String {
    "Echo:".to_string()
}

pub struct EchoPlugin {
    name: String,
    options: EchoOptions,
}

pub fn construct(
    name: &str,
    manifest: &PluginManifest,
) -> Result<Box<dyn Plugin>, PluginError> {
    let options: EchoOptions = manifest.parse_options(name)?;
    Ok(Box::new(EchoPlugin {
        name: name.to_string(),
        options,
    }))
}

impl Plugin for EchoPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Repeats what it is told"
    }

    fn commands(&self) -> Vec<Command> {
        let prefix = self.options.reply_prefix.clone();
        vec![Command::new("echo")
            .with_description("Repeat the given text")
            .with_usage("echo <text>")
            .with_handler(move |msg| {
                let Content::Command { args, .. } = &msg.content else {
                    return Ok(Reply::text("Usage: echo <text>"));
                };
                if args.is_empty() {
                    return Ok(Reply::text("Usage: echo <text>"));
                }
                Ok(Reply::text(format!("{} {}", prefix, args.join(" "))))
            })]
    }
}
