//! Protocol module containing the wire message types.

pub mod messages;

pub use messages::{Command, ProtocolError, Response};
