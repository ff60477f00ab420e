//! Configuration management

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::application::errors::ConfigError;

/// Bot configuration, read once at startup from
/// `<workspace>/config/config.json` and passed through constructors
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub connection: ConnectionConfig,
    pub owner: OwnerConfig,
    pub plugins: PluginsConfig,
    pub cleanup: CleanupConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ConnectionConfig {
    pub token: String,
    pub poll_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OwnerConfig {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PluginsConfig {
    pub root: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CleanupConfig {
    pub folders: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig::default(),
            connection: ConnectionConfig::default(),
            owner: OwnerConfig::default(),
            plugins: PluginsConfig::default(),
            cleanup: CleanupConfig::default(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "warden-bot".to_string(),
            prefix: ";".to_string(),
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            poll_timeout_secs: 30,
        }
    }
}

impl Default for OwnerConfig {
    fn default() -> Self {
        // The console development mode runs as this account
        Self {
            id: Some("console".to_string()),
        }
    }
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            root: "plugins".to_string(),
        }
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            folders: vec!["tmp".to_string()],
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.display().to_string())
            } else {
                ConfigError::Read(e.to_string())
            }
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Loads the config, reporting problems instead of failing: a
    /// missing or malformed file is logged as an error and the default
    /// config with environment overrides takes its place. Without a
    /// token the process fails later, at connect time.
    pub fn load_or_report(path: impl Into<PathBuf>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e @ ConfigError::NotFound(_)) => {
                error!("{}; run 'warden-bot init-config' to generate one", e);
                Self::load_env()
            }
            Err(e) => {
                error!("{}; falling back to defaults", e);
                Self::load_env()
            }
        }
    }

    /// Default config overlaid with environment variables
    pub fn load_env() -> Self {
        let mut config = Config::default();

        if let Ok(token) = std::env::var("BOT_TOKEN") {
            config.connection.token = token;
        }
        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            config.bot.prefix = prefix;
        }
        if let Ok(owner) = std::env::var("BOT_OWNER_ID") {
            config.owner.id = Some(owner);
        }

        config
    }

    /// The connection token, when one is actually configured
    pub fn token(&self) -> Option<&str> {
        let token = self.connection.token.trim();
        (!token.is_empty()).then_some(token)
    }

    /// The owner account id, when one is actually configured
    pub fn owner_id(&self) -> Option<String> {
        self.owner
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }
}
