//! TCP server: accept loop and per-session command handling.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Accepting incoming connections from LAN clients.
//! 3. Running one session task per connection: read a message, dispatch it,
//!    write the response, repeat until the peer hangs up.
//! 4. Gracefully shutting down when the `running` flag is cleared: the
//!    listener stops accepting, but in-flight sessions run to completion.
//!
//! # Framing
//!
//! The protocol has no length prefix or delimiter: one socket write on the
//! client side is one message, answered by one socket write from the server.
//! A client must therefore send each JSON document in a single write of at
//! most [`READ_BUFFER_SIZE`] bytes and must not pipeline several documents
//! back to back.  TCP does not guarantee write boundaries in general, but
//! for single small documents on a LAN they hold in practice, and keeping
//! the framing this way keeps the wire format compatible with existing
//! clients.
//!
//! # Fault isolation
//!
//! Each session runs in its own Tokio task; a malformed message, a Bridge
//! failure, or a dead peer affects only that task.  Dispatch-level failures
//! (bad JSON, unknown command, Bridge errors) become error responses and the
//! session continues; only session I/O failures end the session, after one
//! best-effort error reply.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use hue_core::Response;

use crate::application::controller::LightingController;
use crate::application::dispatcher::dispatch;
use crate::domain::config::ServerConfig;

/// Size of the per-session read buffer.
///
/// Also the maximum size of one client message; the largest legal command
/// (a full `set_light_state` document) is well under 200 bytes, so 4 KiB
/// leaves generous headroom.
pub const READ_BUFFER_SIZE: usize = 4096;

// ── Public API ────────────────────────────────────────────────────────────────

/// Binds the configured address and serves until `running` is cleared.
///
/// Blocks the calling task for the lifetime of the server.  Clearing
/// `running` closes the listener (no new connections) without interrupting
/// sessions already in progress.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot be bound (port already in
/// use, insufficient privilege, invalid address).  Nothing is left
/// listening on failure.
pub async fn run_server(
    config: &ServerConfig,
    controller: Arc<dyn LightingController>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind MCP listener on {}", config.bind_addr()))?;

    info!(
        "MCP server listening on {}",
        listener.local_addr().context("listener has no local addr")?
    );

    serve(listener, controller, running).await;
    Ok(())
}

/// Accept loop over an already-bound listener.
///
/// Split out from [`run_server`] so tests can bind port 0, learn the real
/// port from the listener, and then hand it over.
pub async fn serve(
    listener: TcpListener,
    controller: Arc<dyn LightingController>,
    running: Arc<AtomicBool>,
) {
    loop {
        // Check the shutdown flag before each accept attempt.
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping accept loop");
            break;
        }

        // A short timeout on accept() lets the loop re-check the running
        // flag even when no clients are connecting.
        let accepted = timeout(Duration::from_millis(200), listener.accept()).await;

        match accepted {
            Ok(Ok((stream, peer_addr))) => {
                info!("connection from {peer_addr}");
                let controller = Arc::clone(&controller);

                // One independent task per session; the accept loop is never
                // delayed by a slow client.
                tokio::spawn(async move {
                    handle_session(stream, peer_addr, controller).await;
                });
            }
            Ok(Err(e)) => {
                // Transient accept error (e.g. out of file descriptors).
                // Log and keep accepting rather than taking the server down.
                error!("accept error: {e}");
            }
            Err(_) => {
                // Timeout — no new connection in the last 200 ms.
            }
        }
    }
}

// ── Per-session handler ───────────────────────────────────────────────────────

/// Top-level handler for one client session.
///
/// Wraps [`run_session`] and logs the outcome.  On a session I/O failure it
/// attempts one final error reply before the connection closes — the peer
/// gets a reason when the stream still works, and nothing worse than a
/// closed socket when it does not.
async fn handle_session(
    mut stream: TcpStream,
    peer_addr: SocketAddr,
    controller: Arc<dyn LightingController>,
) {
    if let Err(e) = run_session(&mut stream, peer_addr, controller.as_ref()).await {
        warn!("session {peer_addr} failed: {e:#}");
        send_error_best_effort(&mut stream, &format!("{e:#}")).await;
    }
    info!("connection to {peer_addr} closed");
}

/// The session read/dispatch/write loop.
///
/// Messages are processed strictly in order: the response to message *n* is
/// fully written and flushed before message *n+1* is read.
///
/// # Errors
///
/// Returns an error only for session-level I/O faults (read/write/flush
/// failure, non-UTF-8 bytes).  Dispatch outcomes — including error
/// responses — are part of normal operation and keep the loop running.
async fn run_session(
    stream: &mut TcpStream,
    peer_addr: SocketAddr,
    controller: &dyn LightingController,
) -> anyhow::Result<()> {
    let mut buf = vec![0u8; READ_BUFFER_SIZE];

    loop {
        let n = stream
            .read(&mut buf)
            .await
            .with_context(|| format!("read from {peer_addr} failed"))?;

        // Zero bytes means the peer closed its write side — a normal end.
        if n == 0 {
            return Ok(());
        }

        let message = std::str::from_utf8(&buf[..n])
            .with_context(|| format!("message from {peer_addr} is not valid UTF-8"))?;
        debug!("received from {peer_addr}: {message}");

        let response = dispatch(message, controller).await;
        if response.is_error() {
            debug!("error response to {peer_addr}: {response:?}");
        }

        let encoded = serde_json::to_string(&response)
            .with_context(|| format!("failed to encode response for {peer_addr}"))?;

        stream
            .write_all(encoded.as_bytes())
            .await
            .with_context(|| format!("write to {peer_addr} failed"))?;
        stream
            .flush()
            .await
            .with_context(|| format!("flush to {peer_addr} failed"))?;
    }
}

/// Writes `{"status":"error","message":…}` to the stream, ignoring failures.
async fn send_error_best_effort(stream: &mut TcpStream, message: &str) {
    if let Ok(encoded) = serde_json::to_string(&Response::error(message)) {
        let _ = stream.write_all(encoded.as_bytes()).await;
        let _ = stream.flush().await;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
//
// Full session behaviour (fault isolation, concurrent sessions, the
// end-to-end command scenarios) lives in tests/server_integration.rs, which
// drives `serve` over real sockets.
