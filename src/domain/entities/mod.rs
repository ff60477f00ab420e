//! Domain entities - Core business objects with no external dependencies

pub mod command;
pub mod message;
pub mod reply;
pub mod user;

pub use command::{Command, CommandRegistry};
pub use message::{Content, Message};
pub use reply::Reply;
pub use user::User;
