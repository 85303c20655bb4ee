//! IRC wire format: tokenizing, inbound classification, outbound commands.

pub mod command;
pub mod message;
pub mod token;

pub use command::Command;
pub use message::{Message, Prefix};
