//! Message dispatcher: one raw wire message in, one [`Response`] out.
//!
//! The dispatcher is the only place where protocol errors and controller
//! errors are converted into wire responses.  It is deliberately total:
//! whatever bytes arrive and whatever the controller does, the caller gets a
//! `Response` back — never a panic, never a propagated error.  That is what
//! lets the session loop treat every message uniformly and keep the
//! connection open after a bad one.
//!
//! Routing table:
//!
//! | command           | controller call                  | success payload |
//! |-------------------|----------------------------------|-----------------|
//! | `get_lights`      | `get_lights()`                   | `lights`        |
//! | `set_light_state` | `set_light_state(id, state)`     | `result`        |
//! | `turn_on`         | `turn_on(id)`                    | `result`        |
//! | `turn_off`        | `turn_off(id)`                   | `result`        |
//!
//! The dispatcher holds no state of its own; it may run concurrently from
//! any number of sessions against the one shared controller handle.

use hue_core::{Command, Response};

use super::controller::LightingController;

/// Translates one raw text message into the response to send back.
///
/// Parse failures yield an error response with the protocol's fixed message
/// strings; controller failures yield an error response carrying the
/// controller error's own description.
pub async fn dispatch(raw: &str, controller: &dyn LightingController) -> Response {
    let command = match Command::parse(raw) {
        Ok(command) => command,
        Err(err) => return Response::error(err.to_string()),
    };

    let outcome = match command {
        Command::GetLights => controller.get_lights().await.map(Response::lights),
        Command::SetLightState { light_id, state } => controller
            .set_light_state(&light_id, state)
            .await
            .map(Response::result),
        Command::TurnOn { light_id } => controller.turn_on(&light_id).await.map(Response::result),
        Command::TurnOff { light_id } => controller.turn_off(&light_id).await.map(Response::result),
    };

    outcome.unwrap_or_else(|err| Response::error(err.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
