//! # XInput Gamepad Adapter
//!
//! Fixed XInput layout: two sticks and two analog triggers.
//!
//! | Axis | Name | Range |
//! |------|------|-------|
//! | 0 | Left Stick X | -1.0..1.0 |
//! | 1 | Left Stick Y | -1.0..1.0 |
//! | 2 | Right Stick X | -1.0..1.0 |
//! | 3 | Right Stick Y | -1.0..1.0 |
//! | 4 | Left Trigger | 0.0..1.0 |
//! | 5 | Right Trigger | 0.0..1.0 |

use super::adapter::{ControllerAdapter, DeviceState};
use super::calibration::AxisKind;
use super::{ControllerIdentity, InputWrapper};

/// Axis layout of an XInput gamepad.
pub const AXES: [AxisKind; 6] = [
    AxisKind::Stick,
    AxisKind::Stick,
    AxisKind::Stick,
    AxisKind::Stick,
    AxisKind::Trigger,
    AxisKind::Trigger,
];

const AXIS_NAMES: [&str; 6] = [
    "Left Stick X",
    "Left Stick Y",
    "Right Stick X",
    "Right Stick Y",
    "Left Trigger",
    "Right Trigger",
];

const BUTTON_NAMES: [&str; 14] = [
    "A",
    "B",
    "X",
    "Y",
    "Left Shoulder",
    "Right Shoulder",
    "Back",
    "Start",
    "Left Thumb",
    "Right Thumb",
    "DPad Up",
    "DPad Down",
    "DPad Left",
    "DPad Right",
];

/// XInput gamepad in slot `index` (0-3 on Windows).
#[derive(Debug)]
pub struct XInputController {
    state: DeviceState,
}

impl XInputController {
    #[must_use]
    pub fn new(index: usize) -> Self {
        let identity = ControllerIdentity::new(InputWrapper::XInput, index);
        Self {
            state: DeviceState::new(identity, &AXES, BUTTON_NAMES.len()),
        }
    }
}

impl ControllerAdapter for XInputController {
    fn state(&self) -> &DeviceState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut DeviceState {
        &mut self.state
    }

    fn controller_name(&self) -> String {
        format!("XInput Gamepad #{}", self.identity().index)
    }

    fn axis_name(&self, axis: usize) -> String {
        AXIS_NAMES
            .get(axis)
            .map_or_else(|| format!("Axis {}", axis), |name| (*name).to_string())
    }

    fn button_name(&self, button: usize) -> String {
        BUTTON_NAMES
            .get(button)
            .map_or_else(|| format!("Button {}", button), |name| (*name).to_string())
    }
}
