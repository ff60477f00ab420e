//! Message handling - parsing and authorization

pub mod guard;
pub mod parser;

pub use guard::{Gate, OwnerGate};
pub use parser::MessageParser;
