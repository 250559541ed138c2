//! The lighting-controller port.
//!
//! [`LightingController`] is the narrow interface the dispatcher calls; the
//! real implementation ([`crate::infrastructure::hue::HueController`]) talks
//! HTTP to the Bridge, and tests substitute
//! [`crate::application::mock::MockLightingController`].  Putting the trait
//! at this seam keeps every line of dispatch logic testable without a Bridge
//! on the network.
//!
//! The handle is shared across all sessions as `Arc<dyn LightingController>`
//! and is immutable after construction, so implementations take `&self` and
//! must be safe to call concurrently (`Send + Sync`).

use async_trait::async_trait;
use hue_core::StateError;
use serde_json::{Map, Value};
use thiserror::Error;

/// Failure of a lighting-controller call.
///
/// The `Display` text becomes the `message` field of the error response a
/// client sees, so each variant reads as a sentence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// The Bridge could not be reached, or the transport failed mid-call.
    #[error("bridge request failed: {0}")]
    Connection(String),

    /// The Bridge answered with a non-2xx HTTP status.
    #[error("bridge returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// A state attribute failed range validation before any HTTP call.
    #[error(transparent)]
    Validation(#[from] StateError),
}

/// Read/write operations against the Hue light collection.
///
/// `turn_on` and `turn_off` are provided methods that delegate to
/// [`set_light_state`](Self::set_light_state), so every implementation gets
/// the same on/off semantics for free and the two forms are equivalent by
/// construction.
#[async_trait]
pub trait LightingController: Send + Sync {
    /// Returns the full light collection as a mapping of light id to info.
    ///
    /// # Errors
    ///
    /// Fails with a connection or HTTP-status error when the Bridge is
    /// unreachable or rejects the request.
    async fn get_lights(&self) -> Result<Value, ControllerError>;

    /// Applies `state` to one light and returns the Bridge's acknowledgment
    /// records.
    ///
    /// # Errors
    ///
    /// Fails with a validation error when `state` carries an out-of-range
    /// `bri`/`hue`/`sat`, and with a connection or HTTP-status error
    /// otherwise.
    async fn set_light_state(
        &self,
        light_id: &str,
        state: Map<String, Value>,
    ) -> Result<Value, ControllerError>;

    /// Switches one light on.
    async fn turn_on(&self, light_id: &str) -> Result<Value, ControllerError> {
        self.set_light_state(light_id, on_state(true)).await
    }

    /// Switches one light off.
    async fn turn_off(&self, light_id: &str) -> Result<Value, ControllerError> {
        self.set_light_state(light_id, on_state(false)).await
    }
}

/// Builds the single-attribute state mapping `{"on": value}`.
fn on_state(value: bool) -> Map<String, Value> {
    let mut state = Map::new();
    state.insert("on".to_string(), Value::Bool(value));
    state
}

// ── Tests ─────────────────────────────────────────────────────────────────────
