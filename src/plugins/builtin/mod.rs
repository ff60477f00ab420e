//! Built-in plugin kinds available to every manifest

pub mod echo;
pub mod ping;
pub mod quote;
