//! Constructor registry - maps manifest kinds to plugin factories

use std::collections::HashMap;

use crate::application::errors::PluginError;
use crate::plugins::builtin;
use crate::plugins::manifest::PluginManifest;
use crate::plugins::trait_def::Plugin;

/// Factory building a plugin instance from its manifest.
/// The first argument is the dotted instance name.
pub type PluginCtor =
    Box<dyn Fn(&str, &PluginManifest) -> Result<Box<dyn Plugin>, PluginError> + Send + Sync>;

/// Registry of plugin constructors, keyed by manifest `kind`
#[derive(Default)]
pub struct ConstructorRegistry {
    constructors: HashMap<String, PluginCtor>,
}

impl ConstructorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in kinds
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register("ping", builtin::ping::construct)
            .and_then(|_| registry.register("echo", builtin::echo::construct))
            .and_then(|_| registry.register("quote", builtin::quote::construct))
            .expect("builtin kinds are distinct");
        registry
    }

    /// Registers a constructor for a kind; duplicate kinds are rejected
    pub fn register<F>(&mut self, kind: impl Into<String>, ctor: F) -> Result<(), PluginError>
    where
        F: Fn(&str, &PluginManifest) -> Result<Box<dyn Plugin>, PluginError>
            + Send
            + Sync
            + 'static,
    {
        let kind = kind.into();
        if self.constructors.contains_key(&kind) {
            return Err(PluginError::DuplicateKind(kind));
        }
        self.constructors.insert(kind, Box::new(ctor));
        Ok(())
    }

    /// Builds a plugin instance for a manifest
    pub fn construct(
        &self,
        name: &str,
        manifest: &PluginManifest,
    ) -> Result<Box<dyn Plugin>, PluginError> {
        let ctor = self
            .constructors
            .get(&manifest.kind)
            .ok_or_else(|| PluginError::UnknownKind {
                name: name.to_string(),
                kind: manifest.kind.clone(),
            })?;
        ctor(name, manifest)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.constructors.contains_key(kind)
    }

    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(kind: &str) -> PluginManifest {
        serde_yaml::from_str(&format!("kind: {kind}\n")).unwrap()
    }

    #[test]
    fn test_builtins_present() {
        let registry = ConstructorRegistry::with_builtins();
        assert_eq!(registry.kinds(), vec!["echo", "ping", "quote"]);
        assert!(registry.contains("ping"));
        assert!(!registry.contains("mystery"));
    }

    #[test]
    fn test_construct_unknown_kind() {
        let registry = ConstructorRegistry::new();
        let err = registry.construct("cat.p", &manifest("mystery")).unwrap_err();
        assert!(matches!(err, PluginError::UnknownKind { kind, .. } if kind == "mystery"));
    }

    #[test]
    fn test_duplicate_kind_rejected() {
        let mut registry = ConstructorRegistry::with_builtins();
        let err = registry
            .register("ping", builtin::ping::construct)
            .unwrap_err();
        assert!(matches!(err, PluginError::DuplicateKind(kind) if kind == "ping"));
    }

    #[test]
    fn test_construct_builds_instance() {
        let registry = ConstructorRegistry::with_builtins();
        let plugin = registry.construct("core.ping", &manifest("ping")).unwrap();
        assert_eq!(plugin.name(), "core.ping");
        assert_eq!(plugin.commands().len(), 1);
    }
}
