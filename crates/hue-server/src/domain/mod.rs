//! Domain module containing pure configuration types.

pub mod config;

pub use config::ServerConfig;
