//! # Controller Module
//!
//! Live controller adapters and the per-axis calibration model.
//!
//! This module handles:
//! - Naming a controller slot by wrapper kind and device index
//! - One adapter type per wrapper kind behind [`ControllerAdapter`]
//! - Per-axis calibration arrays (dead zones and reference points)
//! - Analog response curves
//!
//! Device polling itself lives outside this crate. The host feeds each adapter
//! a [`RawSample`] per frame and the adapter fires press/release callbacks.

pub mod adapter;
pub mod buttons;
pub mod calibration;
pub mod curve;
pub mod keyboard_mouse;
pub mod sdl;
pub mod xinput;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use adapter::{ButtonCallback, ControllerAdapter, DeviceState, RawSample};
pub use buttons::ButtonMask;
pub use calibration::AxisCalibration;
pub use curve::CurveType;

use keyboard_mouse::KeyboardMouseController;
use sdl::SdlController;
use xinput::XInputController;

/// Device backend family a controller belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputWrapper {
    /// XInput-style gamepad.
    #[serde(rename = "xinput")]
    XInput,
    /// Generic joystick exposed through SDL.
    #[serde(rename = "sdl")]
    Sdl,
    /// Keyboard and mouse.
    #[serde(rename = "keyboard_mouse")]
    KeyboardMouse,
}

impl fmt::Display for InputWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputWrapper::XInput => write!(f, "XInput"),
            InputWrapper::Sdl => write!(f, "SDL"),
            InputWrapper::KeyboardMouse => write!(f, "Keyboard/Mouse"),
        }
    }
}

/// Unique key of a controller slot: wrapper kind plus device index.
///
/// # Examples
///
/// ```
/// use flybywire::controller::{ControllerIdentity, InputWrapper};
///
/// let id = ControllerIdentity::new(InputWrapper::XInput, 0);
/// assert_eq!(id.to_string(), "XInput #0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControllerIdentity {
    pub wrapper: InputWrapper,
    pub index: usize,
}

impl ControllerIdentity {
    #[must_use]
    pub fn new(wrapper: InputWrapper, index: usize) -> Self {
        Self { wrapper, index }
    }
}

impl fmt::Display for ControllerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.wrapper, self.index)
    }
}

/// Allocates the adapter appropriate to the identity's wrapper kind.
///
/// The adapter starts with default calibration, the default curve and no
/// callbacks registered.
#[must_use]
pub fn create_adapter(identity: ControllerIdentity) -> Box<dyn ControllerAdapter> {
    match identity.wrapper {
        InputWrapper::XInput => Box::new(XInputController::new(identity.index)),
        InputWrapper::Sdl => Box::new(SdlController::new(identity.index)),
        InputWrapper::KeyboardMouse => Box::new(KeyboardMouseController::new(identity.index)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_equality() {
        let a = ControllerIdentity::new(InputWrapper::XInput, 0);
        let b = ControllerIdentity::new(InputWrapper::XInput, 0);
        let c = ControllerIdentity::new(InputWrapper::XInput, 1);
        let d = ControllerIdentity::new(InputWrapper::Sdl, 0);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn test_identity_display() {
        let id = ControllerIdentity::new(InputWrapper::KeyboardMouse, 3);
        assert_eq!(id.to_string(), "Keyboard/Mouse #3");
    }

    #[test]
    fn test_create_adapter_matches_wrapper() {
        for wrapper in [InputWrapper::XInput, InputWrapper::Sdl, InputWrapper::KeyboardMouse] {
            let identity = ControllerIdentity::new(wrapper, 1);
            let adapter = create_adapter(identity);
            assert_eq!(adapter.identity(), identity);
            assert!(adapter.axis_count() > 0);
            assert_eq!(adapter.calibration().axis_count(), adapter.axis_count());
        }
    }

    #[test]
    fn test_create_adapter_returns_fresh_instances() {
        let identity = ControllerIdentity::new(InputWrapper::XInput, 0);
        let first = create_adapter(identity);
        let second = create_adapter(identity);

        let first_ptr = first.as_ref() as *const dyn ControllerAdapter;
        let second_ptr = second.as_ref() as *const dyn ControllerAdapter;
        assert!(!std::ptr::addr_eq(first_ptr, second_ptr));
    }
}
