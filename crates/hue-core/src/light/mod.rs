//! Light-state domain rules.
//!
//! A Hue light's settable state is a small attribute mapping:
//!
//! | attribute | type | range |
//! |-----------|------|-------|
//! | `on`      | bool | –     |
//! | `bri`     | int  | 0–254 |
//! | `hue`     | int  | 0–65535 |
//! | `sat`     | int  | 0–254 |
//!
//! The Bridge rejects out-of-range values with a cryptic per-field error
//! record; validating here gives the client a clear message and keeps the
//! guarantee that a bad value is *reported*, never silently clamped.

use serde_json::{Map, Value};
use thiserror::Error;

/// Maximum brightness (`bri`) value accepted by the Bridge.
pub const BRIGHTNESS_MAX: u16 = 254;
/// Maximum hue (`hue`) value accepted by the Bridge.
pub const HUE_MAX: u16 = 65535;
/// Maximum saturation (`sat`) value accepted by the Bridge.
pub const SATURATION_MAX: u16 = 254;

/// Validation failure for one state attribute.
///
/// The `Display` text is surfaced to clients in the error `Response`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    /// A ranged attribute carries an integer outside its range.
    #[error("{attribute} must be between 0 and {max}")]
    OutOfRange {
        /// Human name of the attribute (`"brightness"`, not `"bri"`).
        attribute: &'static str,
        max: u16,
    },

    /// A ranged attribute carries a non-integer value (float, string, …).
    #[error("{attribute} must be an integer")]
    NotAnInteger { attribute: &'static str },
}

/// Wire key, human name, and inclusive maximum for each ranged attribute.
const RANGED_ATTRIBUTES: [(&str, &str, u16); 3] = [
    ("bri", "brightness", BRIGHTNESS_MAX),
    ("hue", "hue", HUE_MAX),
    ("sat", "saturation", SATURATION_MAX),
];

/// Checks every ranged attribute present in `state` against its bounds.
///
/// Attributes that are absent are fine (a state mapping changes only what
/// it names); unknown attribute names pass through untouched so the Bridge
/// stays the authority on anything beyond `on`/`bri`/`hue`/`sat`.
///
/// # Errors
///
/// Returns the first [`StateError`] encountered, checking in `bri`, `hue`,
/// `sat` order.
pub fn validate_state(state: &Map<String, Value>) -> Result<(), StateError> {
    for (key, attribute, max) in RANGED_ATTRIBUTES {
        let Some(value) = state.get(key) else {
            continue;
        };
        match value.as_i64() {
            Some(n) if (0..=i64::from(max)).contains(&n) => {}
            Some(_) => return Err(StateError::OutOfRange { attribute, max }),
            None => return Err(StateError::NotAnInteger { attribute }),
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
