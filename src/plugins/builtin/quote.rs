//! Quote plugin - serves a line from a configured list

use serde::Deserialize;

use crate::application::errors::PluginError;
use crate::domain::entities::{Command, Reply};
use crate::plugins::manifest::PluginManifest;
use crate::plugins::trait_def::Plugin;

const DEFAULT_QUOTES: [&str; 4] = [
    "Simplicity is prerequisite for reliability.",
    "Programs must be written for people to read.",
    "Make it work, make it right, make it fast.",
    "The best error message is the one that never shows up.",
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct QuoteOptions {
    /// Absent means the built-in list; present but empty is an error
    #[serde(default)]
    pub quotes: Option<Vec<String>>,
}

pub struct QuotePlugin {
    name: String,
    quotes: Vec<String>,
}

pub fn construct(
    name: &str,
    manifest: &PluginManifest,
) -> Result<Box<dyn Plugin>, PluginError> {
    let options: QuoteOptions = manifest.parse_options(name)?;
    let quotes = match options.quotes {
        Some(list) if list.is_empty() => {
            return Err(PluginError::InvalidOptions {
                name: name.to_string(),
                reason: "quotes list is empty".to_string(),
            })
        }
        Some(list) => list,
        None => DEFAULT_QUOTES.iter().map(|q| q.to_string()).collect(),
    };
    Ok(Box::new(QuotePlugin {
        name: name.to_string(),
        quotes,
    }))
}

impl Plugin for QuotePlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Serves a quote"
    }

    fn commands(&self) -> Vec<Command> {
        let quotes = self.quotes.clone();
        vec![Command::new("quote")
            .with_description("Post a quote")
            .with_handler(move |_| {
                let nanos = chrono::Utc::now().timestamp_subsec_nanos() as usize;
                Ok(Reply::text(quotes[nanos % quotes.len()].clone()))
            })]
    }
}
