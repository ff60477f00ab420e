//! Application services - Business logic orchestration

pub mod command_service;
pub mod session;

pub use command_service::CommandService;
pub use session::{BotSession, SessionState};
