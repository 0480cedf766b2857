//! # Keyboard and Mouse Adapter
//!
//! Mouse motion and wheel are exposed as three centered axes. Keys are
//! exposed as 64 bindable slots; the host decides which physical key feeds
//! which slot.

use super::adapter::{ControllerAdapter, DeviceState};
use super::buttons::MAX_BUTTONS;
use super::calibration::AxisKind;
use super::{ControllerIdentity, InputWrapper};

const AXIS_NAMES: [&str; 3] = ["Mouse X", "Mouse Y", "Mouse Wheel"];

#[derive(Debug)]
pub struct KeyboardMouseController {
    state: DeviceState,
}

impl KeyboardMouseController {
    /// There is only one keyboard/mouse; `index` is kept for the identity.
    #[must_use]
    pub fn new(index: usize) -> Self {
        let identity = ControllerIdentity::new(InputWrapper::KeyboardMouse, index);
        Self {
            state: DeviceState::new(identity, &[AxisKind::Stick; 3], MAX_BUTTONS),
        }
    }
}

impl ControllerAdapter for KeyboardMouseController {
    fn state(&self) -> &DeviceState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut DeviceState {
        &mut self.state
    }

    fn controller_name(&self) -> String {
        "Keyboard/Mouse".to_string()
    }

    fn axis_name(&self, axis: usize) -> String {
        AXIS_NAMES
            .get(axis)
            .map_or_else(|| format!("Axis {}", axis), |name| (*name).to_string())
    }

    fn button_name(&self, button: usize) -> String {
        format!("Key {}", button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let kbm = KeyboardMouseController::new(0);
        assert_eq!(kbm.axis_count(), 3);
        assert_eq!(kbm.button_count(), MAX_BUTTONS);
        assert_eq!(kbm.controller_name(), "Keyboard/Mouse");
    }

    #[test]
    fn test_names() {
        let kbm = KeyboardMouseController::new(0);
        assert_eq!(kbm.axis_name(2), "Mouse Wheel");
        assert_eq!(kbm.button_name(12), "Key 12");
    }
}
