//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: Command dispatch and the session event loop
//! - Control: Owner-operated management commands
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing and authorization

pub mod control;
pub mod errors;
pub mod messaging;
pub mod services;
