//! Hue MCP server — entry point.
//!
//! This binary exposes a LAN TCP command channel for Philips Hue lights.
//! Clients send one JSON document per write and receive one JSON reply:
//!
//! ```text
//! → {"command":"turn_on","light_id":"1"}
//! ← {"status":"success","result":[{"success":{"/lights/1/state/on":true}}]}
//! ```
//!
//! The server holds the Bridge address and API credential; clients never
//! speak the Bridge's HTTP API directly.
//!
//! # Usage
//!
//! ```text
//! hue-server [OPTIONS]
//!
//! Options:
//!   --config <PATH>   JSON configuration file [default: config.json]
//!   --port   <PORT>   Override the listener port from the config file
//!   --bind   <ADDR>   Override the bind address from the config file
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable       | Default       | Description            |
//! |----------------|---------------|------------------------|
//! | `HUE_CONFIG`   | `config.json` | Config file path       |
//! | `HUE_MCP_PORT` | from config   | Listener port          |
//! | `HUE_BIND`     | from config   | Listener bind address  |
//!
//! # Startup sequence
//!
//! 1. `tracing_subscriber` is initialised; the log level comes from
//!    `RUST_LOG` (default `info`).
//! 2. The config file is loaded — missing file is fatal.
//! 3. The Bridge is probed via [`HueController::connect`] — unreachable
//!    Bridge is fatal, so a misconfiguration surfaces immediately instead
//!    of on the first client command.
//! 4. A Ctrl+C handler clears a shared running flag for graceful shutdown.
//! 5. [`run_server`] binds the listener (bind failure is fatal) and accepts
//!    connections until the flag is cleared.

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hue_server::application::LightingController;
use hue_server::domain::ServerConfig;
use hue_server::infrastructure::{load_config, run_server, HueController};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Hue MCP server.
///
/// LAN TCP command channel in front of a Philips Hue Bridge.
#[derive(Debug, Parser)]
#[command(
    name = "hue-server",
    about = "LAN TCP command channel for Philips Hue lights",
    version
)]
struct Cli {
    /// Path to the JSON configuration file.
    ///
    /// Must supply `bridge_ip` and `api_key`; `mcp_port` (default 8000) and
    /// `bind_address` (default 0.0.0.0) are optional.
    #[arg(long, default_value = "config.json", env = "HUE_CONFIG")]
    config: PathBuf,

    /// TCP port for the command channel, overriding the config file.
    #[arg(long, env = "HUE_MCP_PORT")]
    port: Option<u16>,

    /// IP address to bind the listener to, overriding the config file.
    ///
    /// Use `0.0.0.0` to accept connections from any interface, or
    /// `127.0.0.1` to accept only local clients.
    #[arg(long, env = "HUE_BIND")]
    bind: Option<String>,
}

impl Cli {
    /// Applies the CLI overrides on top of the file-loaded configuration.
    fn apply_overrides(&self, mut config: ServerConfig) -> ServerConfig {
        if let Some(port) = self.port {
            config.mcp_port = port;
        }
        if let Some(bind) = &self.bind {
            config.bind_address = bind.clone();
        }
        config
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `RUST_LOG` controls the level; absent or invalid falls back to info.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    let config = cli.apply_overrides(config);

    info!(
        "Hue MCP server starting — bridge={}, listen={}",
        config.bridge_ip,
        config.bind_addr()
    );

    // Fail-fast Bridge probe: a wrong address or credential stops the
    // process here, before any client can connect.
    let controller = HueController::connect(&config.bridge_ip, &config.api_key)
        .await
        .context("failed to connect to the Hue Bridge")?;
    let controller: Arc<dyn LightingController> = Arc::new(controller);

    // Graceful shutdown: Ctrl+C clears the flag, the accept loop notices
    // within 200 ms and stops taking new connections; in-flight sessions
    // finish on their own.
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C — initiating graceful shutdown");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    run_server(&config, controller, running).await?;

    info!("Hue MCP server stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
