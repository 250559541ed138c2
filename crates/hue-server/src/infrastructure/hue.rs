//! HTTP client for the Hue Bridge's local REST API.
//!
//! The Bridge exposes everything under `http://<bridge_ip>/api/<api_key>`:
//!
//! - `GET  …/lights`                → mapping of light id to light info
//! - `PUT  …/lights/<id>/state`     → list of per-attribute acknowledgments
//!
//! [`HueController::connect`] probes the API root before returning, so a
//! misconfigured address or credential fails at startup instead of on the
//! first client command.
//!
//! State mappings are range-validated *before* any HTTP call; the Bridge
//! would reject out-of-range values too, but its per-field error records
//! are cryptic and this keeps the no-silent-clamp guarantee local.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, info};

use hue_core::validate_state;

use crate::application::controller::{ControllerError, LightingController};

/// Client for one Hue Bridge, holding its address and API credential.
///
/// Cheap to share: wrap it in an `Arc<dyn LightingController>` and hand a
/// clone of the handle to every session.  `reqwest::Client` is internally
/// reference-counted and safe for concurrent calls.
pub struct HueController {
    http: reqwest::Client,
    api_url: String,
}

impl HueController {
    /// Builds a controller without probing the Bridge.
    fn new(bridge_ip: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: format!("http://{bridge_ip}/api/{api_key}"),
        }
    }

    /// Connects to the Bridge at `bridge_ip` using `api_key`.
    ///
    /// # Errors
    ///
    /// Fails with a connection error when the reachability probe (a GET of
    /// the API root) does not succeed — wrong address, Bridge offline, or a
    /// non-2xx answer (e.g. a revoked credential).
    pub async fn connect(bridge_ip: &str, api_key: &str) -> Result<Self, ControllerError> {
        let controller = Self::new(bridge_ip, api_key);
        controller.probe().await?;
        info!("connected to Hue Bridge at {bridge_ip}");
        Ok(controller)
    }

    /// Reachability probe: GET the API root and require a 2xx answer.
    async fn probe(&self) -> Result<(), ControllerError> {
        let url = self.api_url.clone();
        self.request_json(self.http.get(url)).await.map(|_| ())
    }

    /// Sends a prepared request and decodes the body as JSON.
    async fn request_json(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, ControllerError> {
        let response = request.send().await.map_err(connection_error)?;

        if response.status().is_success() {
            response.json().await.map_err(connection_error)
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Err(ControllerError::Status { status, body })
        }
    }

    /// Sets only the brightness of one light.
    ///
    /// Convenience wrapper for embedders; the command channel reaches
    /// brightness through `set_light_state` directly.
    ///
    /// # Errors
    ///
    /// Fails with a validation error when `brightness` exceeds 254, and
    /// with the usual connection/status errors otherwise.
    pub async fn set_brightness(
        &self,
        light_id: &str,
        brightness: u16,
    ) -> Result<Value, ControllerError> {
        let mut state = Map::new();
        state.insert("bri".to_string(), Value::from(brightness));
        self.set_light_state(light_id, state).await
    }

    /// Sets the color (hue + saturation) of one light.
    ///
    /// # Errors
    ///
    /// Fails with a validation error when `hue` exceeds 65535 or `sat`
    /// exceeds 254, and with the usual connection/status errors otherwise.
    pub async fn set_color(
        &self,
        light_id: &str,
        hue: u32,
        sat: u16,
    ) -> Result<Value, ControllerError> {
        let mut state = Map::new();
        state.insert("hue".to_string(), Value::from(hue));
        state.insert("sat".to_string(), Value::from(sat));
        self.set_light_state(light_id, state).await
    }
}

#[async_trait]
impl LightingController for HueController {
    async fn get_lights(&self) -> Result<Value, ControllerError> {
        let url = format!("{}/lights", self.api_url);
        debug!("GET {url}");
        self.request_json(self.http.get(url)).await
    }

    async fn set_light_state(
        &self,
        light_id: &str,
        state: Map<String, Value>,
    ) -> Result<Value, ControllerError> {
        validate_state(&state)?;

        let url = format!("{}/lights/{light_id}/state", self.api_url);
        debug!("PUT {url} body={:?}", state);
        self.request_json(self.http.put(url).json(&state)).await
    }
}

fn connection_error(err: reqwest::Error) -> ControllerError {
    ControllerError::Connection(err.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
//
// Network paths are exercised by the integration suite through the mock
// controller; these tests cover the URL scheme and the validate-before-HTTP
// behaviour, which need no Bridge.
