//! JSON config-file loading.
//!
//! The server reads a single JSON file (`config.json` next to the binary by
//! default, overridable with `--config` / `HUE_CONFIG`).  A missing file is
//! a distinct, fatal error: without `bridge_ip` and `api_key` there is
//! nothing useful the server could do, so startup stops before any socket
//! is bound.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::config::ServerConfig;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No file exists at the given path.
    #[error("config file not found at {path}")]
    NotFound { path: PathBuf },

    /// A file system I/O error occurred.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The JSON content could not be parsed into a [`ServerConfig`].
    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Loads and parses the config file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] when the file does not exist (so the
/// caller can distinguish "never configured" from "configured wrongly"),
/// [`ConfigError::Io`] on read failures, and [`ConfigError::Parse`] when
/// the JSON is malformed or misses a mandatory field.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(serde_json::from_str(&text)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
