//! Infrastructure layer: TCP server, Bridge HTTP client, config loading.

pub mod config_file;
pub mod hue;
pub mod tcp_server;

pub use config_file::{load_config, ConfigError};
pub use hue::HueController;
pub use tcp_server::{run_server, serve};
