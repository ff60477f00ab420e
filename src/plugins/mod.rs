//! Plugin system for warden-bot
//!
//! Manifests on disk select constructors from a typed registry;
//! the manager drives discovery and the load/unload lifecycle.

pub mod builtin;
pub mod manager;
pub mod manifest;
pub mod registry;
pub mod trait_def;

pub use manager::{PluginManager, PluginRef};
pub use manifest::PluginManifest;
pub use registry::ConstructorRegistry;
pub use trait_def::Plugin;
