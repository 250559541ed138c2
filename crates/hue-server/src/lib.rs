//! hue-server library crate.
//!
//! This crate provides a LAN-facing TCP command channel for controlling
//! Philips Hue lights without speaking the Bridge's HTTP API directly.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Client (JSON over TCP)
//!         ↕
//! [hue-server]
//!   ├── domain/           Pure types: ServerConfig
//!   ├── application/      Dispatch: wire Command → LightingController call
//!   └── infrastructure/
//!         ├── tcp_server/  TCP accept loop + per-connection sessions
//!         ├── hue/         reqwest client for the Bridge's REST API
//!         └── config_file/ JSON config-file loading
//!         ↕
//! Hue Bridge (HTTP, http://<bridge_ip>/api/<api_key>)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no external dependencies (no I/O, no async, no frameworks).
//! - `application` depends on `domain` and `hue-core` only; the
//!   [`application::LightingController`] trait is the seam between the
//!   dispatch logic and the real Bridge client, which is what makes the
//!   dispatcher testable without a Bridge on the network.
//! - `infrastructure` depends on all other layers plus `tokio` and `reqwest`.

/// Domain layer: pure configuration types (no I/O).
pub mod domain;

/// Application layer: command dispatch and the controller port.
pub mod application;

/// Infrastructure layer: TCP server, Bridge HTTP client, config loading.
pub mod infrastructure;
