//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Workspace: Base directory, fixed paths and temp cleanup
//! - Adapters: Platform integrations (Telegram, console)

pub mod adapters;
pub mod config;
pub mod workspace;
