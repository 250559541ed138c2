//! Application layer: the controller port and the message dispatcher.

pub mod controller;
pub mod dispatcher;
pub mod mock;

pub use controller::{ControllerError, LightingController};
pub use dispatcher::dispatch;
pub use mock::MockLightingController;
