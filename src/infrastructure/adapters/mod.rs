//! Platform adapters implementing the Gateway trait

pub mod console;
pub mod telegram;

pub use console::ConsoleAdapter;
pub use telegram::TelegramAdapter;
