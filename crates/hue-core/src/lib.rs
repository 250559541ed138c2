//! # hue-core
//!
//! Shared library for the Hue MCP command server containing the wire
//! protocol types and the light-state domain rules.
//!
//! This crate has zero dependencies on sockets, HTTP, or async runtimes.
//! It can be exercised entirely from plain unit tests.
//!
//! # Architecture overview
//!
//! The Hue MCP server is a thin LAN-facing command channel in front of a
//! Philips Hue Bridge.  Clients open a TCP connection and send one JSON
//! document per write (`{"command":"turn_on","light_id":"1"}`); the server
//! answers with one JSON document (`{"status":"success","result":[…]}`).
//!
//! This crate defines:
//!
//! - **`protocol`** – What travels over the wire.  An incoming document is
//!   parsed into a typed [`Command`]; the reply is built as a [`Response`]
//!   and serialized back to JSON.  Parse failures map to the fixed error
//!   messages of the protocol, never to serde's own diagnostics.
//!
//! - **`light`** – Pure rules about Hue light state: which attributes exist
//!   (`on`, `bri`, `hue`, `sat`), their numeric ranges, and the
//!   [`validate_state`] check that rejects out-of-range values instead of
//!   clamping them.

pub mod light;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `hue_core::Command` instead of `hue_core::protocol::messages::Command`.
pub use light::{validate_state, StateError, BRIGHTNESS_MAX, HUE_MAX, SATURATION_MAX};
pub use protocol::messages::{Command, ProtocolError, Response};
