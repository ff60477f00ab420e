//! Plugin manifest parsing

use std::path::Path;

use serde::Deserialize;

use crate::application::errors::PluginError;

/// On-disk plugin declaration, one YAML file per plugin:
/// `<plugins root>/<category>/<name>.yaml`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PluginManifest {
    /// Which registered constructor builds the instance
    pub kind: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Kind-specific options, handed to the constructor
    #[serde(default)]
    pub options: serde_yaml::Value,
}

impl PluginManifest {
    /// Load a manifest from disk. `name` is the dotted plugin ref,
    /// used for error context only.
    pub fn from_file(name: &str, path: &Path) -> Result<Self, PluginError> {
        let content = std::fs::read_to_string(path).map_err(|e| PluginError::Manifest {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        serde_yaml::from_str(&content).map_err(|e| PluginError::Manifest {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }

    /// Deserialize the options block into a kind-specific struct.
    /// Absent options produce the struct's defaults.
    pub fn parse_options<T>(&self, name: &str) -> Result<T, PluginError>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        if self.options.is_null() {
            return Ok(T::default());
        }
        serde_yaml::from_value(self.options.clone()).map_err(|e| PluginError::InvalidOptions {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    struct DemoOptions {
        #[serde(default)]
        reply_prefix: Option<String>,
    }

    #[test]
    fn test_parse_manifest_yaml() {
        let manifest: PluginManifest = serde_yaml::from_str(
            "kind: echo\ndescription: repeats things\noptions:\n  reply-prefix: 'You said:'\n",
        )
        .unwrap();
        assert_eq!(manifest.kind, "echo");
        assert_eq!(manifest.description.as_deref(), Some("repeats things"));
        let options: DemoOptions = manifest.parse_options("util.echo").unwrap();
        assert_eq!(options.reply_prefix.as_deref(), Some("You said:"));
    }

    #[test]
    fn test_kind_is_required() {
        let result: Result<PluginManifest, _> = serde_yaml::from_str("description: nothing\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_absent_options_default() {
        let manifest: PluginManifest = serde_yaml::from_str("kind: ping\n").unwrap();
        let options: DemoOptions = manifest.parse_options("core.ping").unwrap();
        assert_eq!(options, DemoOptions::default());
    }

    #[test]
    fn test_malformed_options_rejected() {
        let manifest: PluginManifest =
            serde_yaml::from_str("kind: echo\noptions:\n  reply-prefix: [1, 2]\n").unwrap();
        let err = manifest.parse_options::<DemoOptions>("util.echo").unwrap_err();
        assert!(matches!(err, PluginError::InvalidOptions { .. }));
    }
}
