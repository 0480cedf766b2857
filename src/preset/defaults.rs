//! # Default Presets
//!
//! Presets seeded for a freshly activated controller. The result depends only
//! on the adapter's axis and button counts.
//!
//! | Preset | When | Axes | Buttons |
//! |--------|------|------|---------|
//! | Flight | always | roll, pitch, yaw, throttle | common discrete actions |
//! | Docking | 4+ axes | translate X/Y/Z, throttle | common discrete actions |

use super::{ContinuousAction, ControllerPreset, DiscreteAction};
use crate::controller::{ButtonMask, ControllerAdapter};

/// Axis bindings of the flight preset, by axis index.
const FLIGHT_AXES: [ContinuousAction; 4] = [
    ContinuousAction::Roll,
    ContinuousAction::Pitch,
    ContinuousAction::Yaw,
    ContinuousAction::Throttle,
];

/// Axis bindings of the docking preset, by axis index.
const DOCKING_AXES: [ContinuousAction; 4] = [
    ContinuousAction::TranslateX,
    ContinuousAction::TranslateY,
    ContinuousAction::TranslateZ,
    ContinuousAction::Throttle,
];

/// Button bindings shared by all default presets, by button index.
const BUTTON_ACTIONS: [DiscreteAction; 8] = [
    DiscreteAction::Stage,
    DiscreteAction::ToggleGear,
    DiscreteAction::ToggleBrakes,
    DiscreteAction::ToggleLights,
    DiscreteAction::IncrementThrottle,
    DiscreteAction::DecrementThrottle,
    DiscreteAction::PreviousPreset,
    DiscreteAction::NextPreset,
];

/// Minimum axis count for the docking preset.
const DOCKING_MIN_AXES: usize = 4;

/// Default presets for a live adapter.
#[must_use]
pub fn default_presets(adapter: &dyn ControllerAdapter) -> Vec<ControllerPreset> {
    default_presets_for(adapter.axis_count(), adapter.button_count())
}

/// Default presets for a device with the given capabilities. Never empty.
#[must_use]
pub fn default_presets_for(axis_count: usize, button_count: usize) -> Vec<ControllerPreset> {
    let mut presets = vec![build_preset("Flight", &FLIGHT_AXES, axis_count, button_count)];

    if axis_count >= DOCKING_MIN_AXES {
        presets.push(build_preset("Docking", &DOCKING_AXES, axis_count, button_count));
    }

    presets
}

fn build_preset(
    name: &str,
    axes: &[ContinuousAction],
    axis_count: usize,
    button_count: usize,
) -> ControllerPreset {
    let mut preset = ControllerPreset::new(name);

    for (axis, &action) in axes.iter().enumerate().take(axis_count) {
        preset.set_continuous_binding(axis, action);
    }

    for (button, &action) in BUTTON_ACTIONS.iter().enumerate().take(button_count) {
        preset.set_discrete_binding(ButtonMask::single(button), action);
    }

    preset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::xinput::XInputController;

    #[test]
    fn test_gamepad_gets_flight_and_docking() {
        let pad = XInputController::new(0);
        let presets = default_presets(&pad);

        assert_eq!(presets.len(), 2);
        assert_eq!(presets[0].name, "Flight");
        assert_eq!(presets[1].name, "Docking");
        assert_eq!(presets[0].continuous_action(3), Some(ContinuousAction::Throttle));
        assert_eq!(presets[1].continuous_action(0), Some(ContinuousAction::TranslateX));
        assert_eq!(presets[0].discrete_action(ButtonMask::single(0)), Some(DiscreteAction::Stage));
    }

    #[test]
    fn test_small_device_gets_flight_only() {
        let presets = default_presets_for(3, 2);

        assert_eq!(presets.len(), 1);
        assert_eq!(presets[0].continuous_bindings().len(), 3);
        assert_eq!(presets[0].continuous_action(3), None);
        assert_eq!(presets[0].discrete_bindings().len(), 2);
    }

    #[test]
    fn test_no_inputs_still_yields_preset() {
        let presets = default_presets_for(0, 0);
        assert_eq!(presets.len(), 1);
        assert!(presets[0].continuous_bindings().is_empty());
        assert!(presets[0].discrete_bindings().is_empty());
    }

    #[test]
    fn test_pure_function_of_capabilities() {
        assert_eq!(default_presets_for(6, 14), default_presets_for(6, 14));
    }
}
