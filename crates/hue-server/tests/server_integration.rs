//! Integration tests for the TCP command channel.
//!
//! # Purpose
//!
//! These tests drive `serve` over real sockets, with the recorded mock
//! controller standing in for the Hue Bridge.  They verify:
//!
//! - The happy path: a `get_lights` request is answered with the
//!   controller's light collection in the documented wire shape.
//! - The error paths: malformed JSON, missing `light_id`, and out-of-range
//!   state values all come back as `{"status":"error",…}` replies.
//! - Fault isolation: an error on message *n* does not close the
//!   connection, one broken session does not disturb a concurrent one, and
//!   a closed session leaves the listener accepting.
//! - Graceful shutdown: clearing the running flag stops new connections.
//!
//! # Protocol shape
//!
//! One client write is one message; one server write is one reply:
//!
//! ```text
//! Client                              Server
//! ──────                              ──────
//! {"command":"get_lights"}
//!                                     {"status":"success","lights":{…}}
//! {"command":"turn_off"}
//!                                     {"status":"error","message":"no light id given"}
//! (close write side)
//!                                     (closes connection)
//! ```

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use hue_server::application::mock::{Invocation, MockLightingController};
use hue_server::application::LightingController;
use hue_server::infrastructure::serve;

/// Binds an ephemeral port, spawns the accept loop over it, and returns the
/// address to connect to plus the shutdown flag.
async fn start_server(mock: Arc<MockLightingController>) -> (SocketAddr, Arc<AtomicBool>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    let running = Arc::new(AtomicBool::new(true));
    let controller: Arc<dyn LightingController> = mock;
    tokio::spawn(serve(listener, controller, Arc::clone(&running)));

    (addr, running)
}

/// Sends one message and reads one reply, decoded as JSON.
async fn exchange(stream: &mut TcpStream, message: &str) -> Value {
    stream
        .write_all(message.as_bytes())
        .await
        .expect("write message");
    stream.flush().await.expect("flush message");

    let mut buf = vec![0u8; 4096];
    let n = stream.read(&mut buf).await.expect("read reply");
    assert!(n > 0, "server closed the connection unexpectedly");
    serde_json::from_slice(&buf[..n]).expect("reply is valid JSON")
}

// ── Happy path ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_lights_round_trip() {
    // Arrange
    let mock = Arc::new(
        MockLightingController::new().with_lights(json!({"1": {"name": "Desk", "state": {"on": true}}})),
    );
    let (addr, _running) = start_server(Arc::clone(&mock)).await;
    let mut client = TcpStream::connect(addr).await.expect("connect");

    // Act
    let reply = exchange(&mut client, r#"{"command":"get_lights"}"#).await;

    // Assert: the wire shape mirrors the controller's collection.
    assert_eq!(reply["status"], "success");
    assert_eq!(reply["lights"]["1"]["name"], "Desk");
    assert_eq!(mock.invocations(), vec![Invocation::GetLights]);
}

#[tokio::test]
async fn test_turn_on_round_trip_reaches_controller() {
    let mock = Arc::new(
        MockLightingController::new()
            .with_result(json!([{"success": {"/lights/1/state/on": true}}])),
    );
    let (addr, _running) = start_server(Arc::clone(&mock)).await;
    let mut client = TcpStream::connect(addr).await.expect("connect");

    let reply = exchange(&mut client, r#"{"command":"turn_on","light_id":"1"}"#).await;

    assert_eq!(reply["status"], "success");
    assert!(reply["result"].is_array());
    match &mock.invocations()[..] {
        [Invocation::SetLightState { light_id, state }] => {
            assert_eq!(light_id, "1");
            assert_eq!(state.get("on"), Some(&json!(true)));
        }
        other => panic!("expected one SetLightState, got {:?}", other),
    }
}

// ── Error replies ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_malformed_json_gets_error_reply() {
    let mock = Arc::new(MockLightingController::new());
    let (addr, _running) = start_server(mock).await;
    let mut client = TcpStream::connect(addr).await.expect("connect");

    let reply = exchange(&mut client, "not-json").await;

    assert_eq!(reply["status"], "error");
    assert_eq!(reply["message"], "invalid JSON format");
}

#[tokio::test]
async fn test_missing_light_id_gets_error_reply() {
    let mock = Arc::new(MockLightingController::new());
    let (addr, _running) = start_server(Arc::clone(&mock)).await;
    let mut client = TcpStream::connect(addr).await.expect("connect");

    let reply = exchange(&mut client, r#"{"command":"turn_off"}"#).await;

    assert_eq!(reply["status"], "error");
    assert_eq!(reply["message"], "no light id given");
    assert!(mock.invocations().is_empty(), "controller must not be called");
}

#[tokio::test]
async fn test_out_of_range_brightness_gets_error_reply() {
    let mock = Arc::new(MockLightingController::new());
    let (addr, _running) = start_server(mock).await;
    let mut client = TcpStream::connect(addr).await.expect("connect");

    let reply = exchange(
        &mut client,
        r#"{"command":"set_light_state","light_id":"1","state":{"bri":300}}"#,
    )
    .await;

    // Reported, never clamped.
    assert_eq!(reply["status"], "error");
    assert_eq!(reply["message"], "brightness must be between 0 and 254");
}

#[tokio::test]
async fn test_bridge_failure_surfaces_in_reply() {
    let mock = Arc::new(MockLightingController::new());
    mock.fail_with("connection refused");
    let (addr, _running) = start_server(Arc::clone(&mock)).await;
    let mut client = TcpStream::connect(addr).await.expect("connect");

    let reply = exchange(&mut client, r#"{"command":"get_lights"}"#).await;

    assert_eq!(reply["status"], "error");
    assert_eq!(reply["message"], "bridge request failed: connection refused");
}

// ── Fault isolation ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_on_message_n_keeps_connection_usable_for_n_plus_1() {
    // Arrange
    let mock = Arc::new(MockLightingController::new());
    let (addr, _running) = start_server(mock).await;
    let mut client = TcpStream::connect(addr).await.expect("connect");

    // Act: a bad message, then a good one, on the same connection.
    let first = exchange(&mut client, r#"{"command":"disco_mode"}"#).await;
    let second = exchange(&mut client, r#"{"command":"get_lights"}"#).await;

    // Assert
    assert_eq!(first["status"], "error");
    assert_eq!(first["message"], "unknown command: disco_mode");
    assert_eq!(second["status"], "success");
}

#[tokio::test]
async fn test_failing_session_does_not_disturb_concurrent_session() {
    let mock = Arc::new(MockLightingController::new());
    let (addr, _running) = start_server(mock).await;

    let mut broken = TcpStream::connect(addr).await.expect("connect broken");
    let mut healthy = TcpStream::connect(addr).await.expect("connect healthy");

    // The broken session produces errors and then hangs up mid-protocol.
    let reply = exchange(&mut broken, "garbage").await;
    assert_eq!(reply["status"], "error");
    drop(broken);

    // The healthy session keeps working throughout.
    let reply = exchange(&mut healthy, r#"{"command":"get_lights"}"#).await;
    assert_eq!(reply["status"], "success");
}

#[tokio::test]
async fn test_listener_survives_session_close() {
    let mock = Arc::new(MockLightingController::new());
    let (addr, _running) = start_server(mock).await;

    // Open and immediately close a connection (zero-byte read on the
    // server side), then connect again.
    let first = TcpStream::connect(addr).await.expect("first connect");
    drop(first);

    let mut second = TcpStream::connect(addr).await.expect("second connect");
    let reply = exchange(&mut second, r#"{"command":"get_lights"}"#).await;
    assert_eq!(reply["status"], "success");
}

#[tokio::test]
async fn test_sessions_share_one_controller_handle() {
    // Two sessions dispatch against the same controller; both invocations
    // land on the single shared mock.
    let mock = Arc::new(MockLightingController::new());
    let (addr, _running) = start_server(Arc::clone(&mock)).await;

    let mut a = TcpStream::connect(addr).await.expect("connect a");
    let mut b = TcpStream::connect(addr).await.expect("connect b");

    exchange(&mut a, r#"{"command":"get_lights"}"#).await;
    exchange(&mut b, r#"{"command":"get_lights"}"#).await;

    assert_eq!(
        mock.invocations(),
        vec![Invocation::GetLights, Invocation::GetLights]
    );
}

// ── Shutdown ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_clearing_running_flag_stops_new_connections() {
    let mock = Arc::new(MockLightingController::new());
    let (addr, running) = start_server(mock).await;

    // Sanity: the server is accepting.
    let mut client = TcpStream::connect(addr).await.expect("connect");
    let reply = exchange(&mut client, r#"{"command":"get_lights"}"#).await;
    assert_eq!(reply["status"], "success");

    // Act: clear the flag and give the accept loop time to notice
    // (it re-checks every 200 ms).
    running.store(false, Ordering::Relaxed);
    tokio::time::sleep(Duration::from_millis(400)).await;

    // Assert: the listener is gone; a fresh connection must fail…
    let refused = TcpStream::connect(addr).await;
    assert!(refused.is_err(), "listener should be closed after shutdown");

    // …while the in-flight session keeps working until it hangs up itself.
    let reply = exchange(&mut client, r#"{"command":"get_lights"}"#).await;
    assert_eq!(reply["status"], "success");
}
