//! # SDL Joystick Adapter
//!
//! Generic joystick reported through SDL. The adapter exposes a common
//! HOTAS-style layout of six centered axes and 32 buttons; a device with
//! fewer inputs simply never reports the extra ones.

use super::adapter::{ControllerAdapter, DeviceState};
use super::calibration::AxisKind;
use super::{ControllerIdentity, InputWrapper};

/// Default number of axes for an SDL joystick.
pub const DEFAULT_AXIS_COUNT: usize = 6;

/// Default number of buttons for an SDL joystick.
pub const DEFAULT_BUTTON_COUNT: usize = 32;

/// SDL joystick at device `index`.
#[derive(Debug)]
pub struct SdlController {
    state: DeviceState,
}

impl SdlController {
    #[must_use]
    pub fn new(index: usize) -> Self {
        let identity = ControllerIdentity::new(InputWrapper::Sdl, index);
        Self {
            state: DeviceState::new(identity, &[AxisKind::Stick; DEFAULT_AXIS_COUNT], DEFAULT_BUTTON_COUNT),
        }
    }
}

impl ControllerAdapter for SdlController {
    fn state(&self) -> &DeviceState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut DeviceState {
        &mut self.state
    }

    fn controller_name(&self) -> String {
        format!("SDL Joystick #{}", self.identity().index)
    }
}
