//! Server configuration types.
//!
//! [`ServerConfig`] is the single source of truth for all runtime settings.
//! The infrastructure layer populates it from a JSON config file
//! (`config.json` by default) and CLI/environment overrides; keeping the
//! struct itself plain (no file reads, no global state) makes the server
//! easy to embed in tests.

use serde::{Deserialize, Serialize};

/// All runtime configuration for the Hue MCP server.
///
/// `bridge_ip` and `api_key` have no sensible defaults — the config source
/// must supply them, and a missing config file is fatal at startup.  The
/// `#[serde(default = …)]` fields fall back to working values when absent
/// from the file.
///
/// # Example
///
/// ```json
/// {
///   "bridge_ip": "192.168.1.42",
///   "api_key": "EaXx…",
///   "mcp_port": 8000
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// IP address (or hostname) of the Hue Bridge on the LAN.
    pub bridge_ip: String,

    /// API credential registered with the Bridge (the "username" the Bridge
    /// hands out when its link button is pressed).
    pub api_key: String,

    /// TCP port the command channel listens on.
    #[serde(default = "default_mcp_port")]
    pub mcp_port: u16,

    /// IP address to bind the listener to.  `"0.0.0.0"` accepts connections
    /// from any interface; `"127.0.0.1"` restricts to local clients.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

fn default_mcp_port() -> u16 {
    8000
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

impl ServerConfig {
    /// The `address:port` string the TCP listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.mcp_port)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
