//! Mock lighting controller for unit and integration testing.
//!
//! Lets tests run the dispatcher and the TCP server against scripted Bridge
//! behaviour without a Bridge (or any HTTP) on the network.  The mock
//! records every invocation so tests can assert on exactly what the
//! dispatcher asked for — or that it asked for nothing at all.
//!
//! Like the real controller, the mock validates state ranges before
//! "succeeding", so out-of-range tests behave the same against both.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use hue_core::validate_state;

use super::controller::{ControllerError, LightingController};

/// One recorded controller call.
///
/// `turn_on`/`turn_off` are provided trait methods that delegate to
/// `set_light_state`, so they show up here as `SetLightState` invocations
/// with an `{"on": …}` mapping — which is precisely what the equivalence
/// tests assert on.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    GetLights,
    SetLightState {
        light_id: String,
        state: Map<String, Value>,
    },
}

/// A mock implementation of [`LightingController`] with scripted replies.
pub struct MockLightingController {
    lights: Value,
    result: Value,
    failure: Mutex<Option<String>>,
    invocations: Mutex<Vec<Invocation>>,
}

impl MockLightingController {
    /// Creates a mock that answers `get_lights` with an empty collection and
    /// state changes with an empty acknowledgment list.
    pub fn new() -> Self {
        Self {
            lights: json!({}),
            result: json!([]),
            failure: Mutex::new(None),
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// Sets the light collection returned by `get_lights`.
    pub fn with_lights(mut self, lights: Value) -> Self {
        self.lights = lights;
        self
    }

    /// Sets the acknowledgment value returned by `set_light_state`.
    pub fn with_result(mut self, result: Value) -> Self {
        self.result = result;
        self
    }

    /// Makes every subsequent call fail with a connection-style error
    /// carrying `message`, as if the Bridge dropped off the network.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().expect("lock poisoned") = Some(message.into());
    }

    /// Clears a failure installed with [`fail_with`](Self::fail_with).
    pub fn recover(&self) {
        *self.failure.lock().expect("lock poisoned") = None;
    }

    /// Returns a copy of every call recorded so far, in order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().expect("lock poisoned").clone()
    }

    fn record(&self, invocation: Invocation) {
        self.invocations
            .lock()
            .expect("lock poisoned")
            .push(invocation);
    }

    fn scripted_failure(&self) -> Option<ControllerError> {
        self.failure
            .lock()
            .expect("lock poisoned")
            .as_ref()
            .map(|message| ControllerError::Connection(message.clone()))
    }
}

impl Default for MockLightingController {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LightingController for MockLightingController {
    async fn get_lights(&self) -> Result<Value, ControllerError> {
        self.record(Invocation::GetLights);
        if let Some(err) = self.scripted_failure() {
            return Err(err);
        }
        Ok(self.lights.clone())
    }

    async fn set_light_state(
        &self,
        light_id: &str,
        state: Map<String, Value>,
    ) -> Result<Value, ControllerError> {
        self.record(Invocation::SetLightState {
            light_id: light_id.to_string(),
            state: state.clone(),
        });
        if let Some(err) = self.scripted_failure() {
            return Err(err);
        }
        validate_state(&state)?;
        Ok(self.result.clone())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_get_lights_invocation() {
        // Arrange
        let mock = MockLightingController::new();

        // Act
        mock.get_lights().await.unwrap();

        // Assert
        assert_eq!(mock.invocations(), vec![Invocation::GetLights]);
    }

    #[tokio::test]
    async fn test_mock_returns_scripted_lights() {
        let mock = MockLightingController::new().with_lights(json!({"1": {"name": "Desk"}}));
        let lights = mock.get_lights().await.unwrap();
        assert_eq!(lights["1"]["name"], "Desk");
    }

    #[tokio::test]
    async fn test_mock_turn_on_records_on_true_state() {
        // turn_on is the trait's provided method; it must arrive at the mock
        // as a set_light_state invocation with {"on": true}.
        let mock = MockLightingController::new();

        mock.turn_on("4").await.unwrap();

        match &mock.invocations()[..] {
            [Invocation::SetLightState { light_id, state }] => {
                assert_eq!(light_id, "4");
                assert_eq!(state.get("on"), Some(&json!(true)));
            }
            other => panic!("expected one SetLightState, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_mock_rejects_out_of_range_state() {
        let mock = MockLightingController::new();
        let mut state = Map::new();
        state.insert("bri".to_string(), json!(300));

        let err = mock.set_light_state("1", state).await.unwrap_err();

        assert!(matches!(err, ControllerError::Validation(_)));
    }

    #[tokio::test]
    async fn test_mock_failure_then_recovery() {
        let mock = MockLightingController::new();

        mock.fail_with("bridge offline");
        assert!(mock.get_lights().await.is_err());

        mock.recover();
        assert!(mock.get_lights().await.is_ok());
    }
}
