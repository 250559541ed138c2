//! Typed wire messages for the MCP command channel.
//!
//! # Message flow
//!
//! ```text
//! Client → Server:  JSON text  →  Command::parse  →  Command
//! Server → Client:  Response   →  serde_json      →  JSON text
//! ```
//!
//! # JSON shape
//!
//! Every request is a JSON object with a `"command"` field that selects the
//! operation.  The remaining fields depend on the command:
//!
//! ```json
//! {"command":"get_lights"}
//! {"command":"set_light_state","light_id":"1","state":{"on":true,"bri":200}}
//! {"command":"turn_on","light_id":"1"}
//! {"command":"turn_off","light_id":"1"}
//! ```
//!
//! Every reply is a JSON object with a `"status"` field:
//!
//! ```json
//! {"status":"success","lights":{"1":{"name":"Desk"}}}
//! {"status":"success","result":[{"success":{"/lights/1/state/on":true}}]}
//! {"status":"error","message":"no light id given"}
//! ```
//!
//! # Why a hand-rolled parse instead of `#[serde(tag = "command")]`?
//!
//! The protocol fixes the exact error text a client sees for each malformed
//! request (`"unknown command: …"`, `"no light id given"`, …).  A tagged
//! serde enum would surface serde's own diagnostics for those cases, which
//! are unstable across serde versions and leak Rust type names.  Parsing the
//! document as a generic [`Value`] first keeps the error strings part of the
//! protocol contract.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

// ── Errors ────────────────────────────────────────────────────────────────────

/// All the ways an incoming message can violate the protocol.
///
/// The `Display` text of each variant is the exact `message` string the
/// client receives in the error [`Response`] — these are part of the wire
/// contract, not internal diagnostics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The raw text was not parseable as JSON at all.
    #[error("invalid JSON format")]
    InvalidJson,

    /// The text was valid JSON but not an object (e.g. `42` or `"x"`).
    #[error("invalid command: expected a JSON object")]
    NotAnObject,

    /// The object has no `"command"` field, or it is not a string.
    #[error("no command given")]
    MissingCommand,

    /// The `"command"` value is not one of the supported operations.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A light-addressing command arrived without a usable `"light_id"`.
    ///
    /// An empty string counts as missing.
    #[error("no light id given")]
    MissingLightId,

    /// The `"state"` field is present but not a JSON object.
    #[error("light state must be a JSON object")]
    InvalidState,
}

// ── Requests ──────────────────────────────────────────────────────────────────

/// One decoded client request.
///
/// A `Command` exists only for the duration of a single message exchange —
/// it is produced by [`Command::parse`], dispatched once, and dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Fetch the full light collection from the Bridge.
    GetLights,

    /// Apply a state mapping (`on`/`bri`/`hue`/`sat`) to one light.
    SetLightState {
        /// Bridge-side identifier of the light (`"1"`, `"2"`, …).
        light_id: String,
        /// Attribute name → value mapping; defaults to empty when the
        /// request omits `"state"`.
        state: Map<String, Value>,
    },

    /// Switch one light on (`set_light_state` with `{"on": true}`).
    TurnOn { light_id: String },

    /// Switch one light off (`set_light_state` with `{"on": false}`).
    TurnOff { light_id: String },
}

impl Command {
    /// Parses one raw wire message into a `Command`.
    ///
    /// # Errors
    ///
    /// Returns the [`ProtocolError`] whose `Display` text must be sent back
    /// to the client verbatim.  Never panics on any input.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(raw).map_err(|_| ProtocolError::InvalidJson)?;

        let Value::Object(fields) = value else {
            return Err(ProtocolError::NotAnObject);
        };

        let Some(command) = fields.get("command").and_then(Value::as_str) else {
            return Err(ProtocolError::MissingCommand);
        };

        match command {
            "get_lights" => Ok(Self::GetLights),

            "set_light_state" => {
                let light_id = require_light_id(&fields)?;
                // A request without "state" means "change nothing"; the
                // Bridge answers with an empty acknowledgment list.
                let state = match fields.get("state") {
                    None => Map::new(),
                    Some(Value::Object(state)) => state.clone(),
                    Some(_) => return Err(ProtocolError::InvalidState),
                };
                Ok(Self::SetLightState { light_id, state })
            }

            "turn_on" => Ok(Self::TurnOn {
                light_id: require_light_id(&fields)?,
            }),

            "turn_off" => Ok(Self::TurnOff {
                light_id: require_light_id(&fields)?,
            }),

            other => Err(ProtocolError::UnknownCommand(other.to_string())),
        }
    }
}

/// Extracts a non-empty `"light_id"` string from the request object.
fn require_light_id(fields: &Map<String, Value>) -> Result<String, ProtocolError> {
    match fields.get("light_id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(ProtocolError::MissingLightId),
    }
}

// ── Replies ───────────────────────────────────────────────────────────────────

/// One reply to the client.
///
/// Serde's `tag = "status"` attribute emits the variant as a `"status"`
/// field, so `Response::Error { .. }` serializes to
/// `{"status":"error","message":…}` — exactly the wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Response {
    /// The command succeeded; exactly one of the payload fields is set.
    Success {
        /// Full light collection — present only for `get_lights`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lights: Option<Value>,
        /// Bridge acknowledgment records — present for the state-changing
        /// commands.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<Value>,
    },
    /// The command failed; `message` is human-readable.
    Error { message: String },
}

impl Response {
    /// Builds a `get_lights` success reply.
    pub fn lights(lights: Value) -> Self {
        Self::Success {
            lights: Some(lights),
            result: None,
        }
    }

    /// Builds a state-change success reply.
    pub fn result(result: Value) -> Self {
        Self::Success {
            lights: None,
            result: Some(result),
        }
    }

    /// Builds an error reply.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// `true` for the `Error` variant.  Handy in log statements and tests.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
