//! Plugin manager - handles plugin discovery and lifecycle

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::application::errors::PluginError;
use crate::application::services::CommandService;
use crate::plugins::manifest::PluginManifest;
use crate::plugins::registry::ConstructorRegistry;
use crate::plugins::trait_def::Plugin;

/// File suffix a manifest must carry to be discovered
pub const MANIFEST_SUFFIX: &str = ".yaml";

/// Dotted address of a plugin manifest: `<category>.<name>`
/// for the file `<root>/<category>/<name>.yaml`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PluginRef {
    pub category: String,
    pub name: String,
}

impl PluginRef {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
        }
    }

    pub fn dotted(&self) -> String {
        format!("{}.{}", self.category, self.name)
    }

    pub fn manifest_path(&self, root: &Path) -> PathBuf {
        root.join(&self.category)
            .join(format!("{}{}", self.name, MANIFEST_SUFFIX))
    }
}

impl fmt::Display for PluginRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.category, self.name)
    }
}

struct LoadedPlugin {
    plugin: Box<dyn Plugin>,
    /// Primary names of the commands this plugin installed
    commands: Vec<String>,
}

/// Manages all plugins for the bot
pub struct PluginManager {
    root: PathBuf,
    constructors: ConstructorRegistry,
    loaded: HashMap<String, LoadedPlugin>,
}

impl PluginManager {
    pub fn new(root: impl Into<PathBuf>, constructors: ConstructorRegistry) -> Self {
        Self {
            root: root.into(),
            constructors,
            loaded: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan the manifest tree: category directories under the root,
    /// manifest files inside each category. Anything else is ignored.
    /// A fresh scan runs on every call; nothing is cached.
    pub fn discover(&self) -> Result<Vec<PluginRef>, PluginError> {
        if !self.root.is_dir() {
            return Err(PluginError::RootNotFound(self.root.display().to_string()));
        }
        let mut refs = Vec::new();
        for entry in read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            let Some(category) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if category.starts_with('.') {
                continue;
            }
            for file in read_dir(&path)? {
                let file_path = file?.path();
                if !file_path.is_file() {
                    continue;
                }
                let Some(file_name) = file_path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                let Some(stem) = file_name.strip_suffix(MANIFEST_SUFFIX) else {
                    continue;
                };
                if !stem.is_empty() {
                    refs.push(PluginRef::new(category, stem));
                }
            }
        }
        refs.sort();
        Ok(refs)
    }

    /// Load every discovered plugin, collecting failures instead of
    /// stopping. Plugins that load stay loaded; afterwards a single
    /// aggregate error reports every plugin that did not.
    pub fn load_all(&mut self, commands: &mut CommandService) -> Result<usize, PluginError> {
        let refs = self.discover()?;
        let mut loaded = 0usize;
        let mut failures: Vec<(String, String)> = Vec::new();
        for plugin_ref in &refs {
            match self.load_one(plugin_ref, commands) {
                Ok(()) => loaded += 1,
                Err(e) => {
                    warn!("Failed to load plugin {}: {}", plugin_ref, e);
                    failures.push((plugin_ref.dotted(), e.to_string()));
                }
            }
        }
        if failures.is_empty() {
            Ok(loaded)
        } else {
            Err(PluginError::LoadFailures(failures))
        }
    }

    /// Re-discover and reload every plugin in sorted ref order: loaded
    /// plugins are unloaded and loaded fresh, unknown ones loaded for
    /// the first time. The first error aborts the remaining sequence.
    pub fn reload_all(&mut self, commands: &mut CommandService) -> Result<usize, PluginError> {
        let refs = self.discover()?;
        let mut count = 0usize;
        for plugin_ref in &refs {
            let name = plugin_ref.dotted();
            if self.loaded.contains_key(&name) {
                self.unload_one(&name, commands)?;
            }
            self.load_one(plugin_ref, commands)?;
            count += 1;
        }
        Ok(count)
    }

    fn load_one(
        &mut self,
        plugin_ref: &PluginRef,
        commands: &mut CommandService,
    ) -> Result<(), PluginError> {
        let name = plugin_ref.dotted();
        if self.loaded.contains_key(&name) {
            return Err(PluginError::AlreadyLoaded(name));
        }
        let manifest = PluginManifest::from_file(&name, &plugin_ref.manifest_path(&self.root))?;
        let mut plugin = self.constructors.construct(&name, &manifest)?;
        plugin.on_load()?;
        let installed = commands
            .install(plugin.commands())
            .map_err(|e| PluginError::CommandConflict {
                name: name.clone(),
                source: e,
            })?;
        debug!("Loaded plugin {} with {} command(s)", name, installed.len());
        self.loaded.insert(
            name,
            LoadedPlugin {
                plugin,
                commands: installed,
            },
        );
        Ok(())
    }

    fn unload_one(
        &mut self,
        name: &str,
        commands: &mut CommandService,
    ) -> Result<(), PluginError> {
        let mut entry = self
            .loaded
            .remove(name)
            .ok_or_else(|| PluginError::NotLoaded(name.to_string()))?;
        for command in &entry.commands {
            commands.remove(command);
        }
        entry.plugin.on_unload()?;
        debug!("Unloaded plugin {}", name);
        Ok(())
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains_key(name)
    }

    pub fn loaded_refs(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loaded.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

fn read_dir(path: &Path) -> Result<impl Iterator<Item = Result<std::fs::DirEntry, PluginError>>, PluginError> {
    let entries = std::fs::read_dir(path).map_err(|e| PluginError::Scan(e.to_string()))?;
    Ok(entries.map(|entry| entry.map_err(|e| PluginError::Scan(e.to_string()))))
}
