//! Workspace - base directory, fixed locations and temp-file cleanup

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::application::errors::CleanupError;

/// File suffixes swept from cleanup folders
pub const SCRUB_SUFFIXES: [&str; 3] = [".log", ".cache", ".png"];

/// Base directory that every fixed relative path resolves against
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory containing the running executable, falling back
    /// to the current working directory
    pub fn from_exe() -> Self {
        let root = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join path segments onto the base directory
    pub fn resolve<I, S>(&self, parts: I) -> PathBuf
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        let mut path = self.root.clone();
        for part in parts {
            path.push(part);
        }
        path
    }

    pub fn config_file(&self) -> PathBuf {
        self.resolve(["config", "config.json"])
    }

    pub fn plugins_root(&self, name: &str) -> PathBuf {
        self.resolve([name])
    }

    pub fn tmp_dir(&self) -> PathBuf {
        self.resolve(["tmp"])
    }

    pub fn ensure_tmp(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.tmp_dir())
    }

    /// Delete generated files from the given folders: exactly the
    /// plain files whose name ends in one of `SCRUB_SUFFIXES`.
    /// A missing folder fails the pass with an error naming it.
    /// Returns how many files were removed.
    pub fn cleanup<S: AsRef<str>>(&self, folders: &[S]) -> Result<usize, CleanupError> {
        let mut removed = 0usize;
        for folder in folders {
            let folder = folder.as_ref();
            let dir = self.resolve([folder]);
            if !dir.is_dir() {
                return Err(CleanupError::FolderNotFound(folder.to_string()));
            }
            for entry in std::fs::read_dir(&dir)? {
                let path = entry?.path();
                if !path.is_file() {
                    continue;
                }
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                if SCRUB_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
                    std::fs::remove_file(&path)?;
                    debug!("Removed {}", path.display());
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }
}
