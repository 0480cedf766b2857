//! # Controller Adapter
//!
//! The capability interface every device kind implements. An adapter owns:
//! - the latest raw axis positions and pressed buttons fed by the host
//! - the five per-axis calibration arrays
//! - the analog evaluator selected from a [`CurveType`]
//! - press/release callbacks, invoked synchronously from [`ControllerAdapter::update`]
//!
//! Kind-specific types only supply naming and their [`DeviceState`]; everything
//! else is provided by the trait.

use std::fmt;

use tracing::debug;

use super::buttons::{ButtonMask, MAX_BUTTONS};
use super::calibration::{AxisCalibration, AxisKind};
use super::curve::{CurveEvaluator, CurveType};
use super::ControllerIdentity;

/// Callback invoked with the controller identity and button index.
pub type ButtonCallback = Box<dyn FnMut(ControllerIdentity, usize)>;

/// One polled frame from a device backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSample {
    /// Raw axis positions, indexed by axis. Missing trailing axes keep their last value.
    pub axes: Vec<f32>,
    /// Buttons held in this frame.
    pub buttons: ButtonMask,
}

/// Live state shared by all adapter kinds.
pub struct DeviceState {
    identity: ControllerIdentity,
    raw_axes: Vec<f32>,
    buttons: ButtonMask,
    button_count: usize,
    calibration: AxisCalibration,
    curve: CurveType,
    evaluator: CurveEvaluator,
    pressed_callback: Option<ButtonCallback>,
    released_callback: Option<ButtonCallback>,
}

impl fmt::Debug for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceState")
            .field("identity", &self.identity)
            .field("raw_axes", &self.raw_axes)
            .field("buttons", &self.buttons)
            .field("button_count", &self.button_count)
            .field("calibration", &self.calibration)
            .field("curve", &self.curve)
            .field("pressed_callback", &self.pressed_callback.is_some())
            .field("released_callback", &self.released_callback.is_some())
            .finish()
    }
}

impl DeviceState {
    /// Creates resting state for a device with the given axis layout.
    ///
    /// `button_count` is capped at [`MAX_BUTTONS`].
    #[must_use]
    pub fn new(identity: ControllerIdentity, axes: &[AxisKind], button_count: usize) -> Self {
        let curve = CurveType::default();
        Self {
            identity,
            raw_axes: vec![0.0; axes.len()],
            buttons: ButtonMask::EMPTY,
            button_count: button_count.min(MAX_BUTTONS),
            calibration: AxisCalibration::for_axes(axes),
            curve,
            evaluator: curve.evaluator(),
            pressed_callback: None,
            released_callback: None,
        }
    }

    fn apply_sample(&mut self, sample: &RawSample) {
        for (slot, &value) in self.raw_axes.iter_mut().zip(sample.axes.iter()) {
            *slot = value;
        }

        let mut next = ButtonMask::EMPTY;
        for button in sample.buttons.buttons().take_while(|&b| b < self.button_count) {
            next = next.with(button);
        }

        let changed = self.buttons.changed(next);
        self.buttons = next;

        for button in changed.buttons() {
            if next.is_set(button) {
                debug!("{}: button {} pressed", self.identity, button);
                if let Some(callback) = self.pressed_callback.as_mut() {
                    callback(self.identity, button);
                }
            } else {
                debug!("{}: button {} released", self.identity, button);
                if let Some(callback) = self.released_callback.as_mut() {
                    callback(self.identity, button);
                }
            }
        }
    }
}

/// Capability interface for a live controller.
pub trait ControllerAdapter: fmt::Debug {
    /// Shared live state.
    fn state(&self) -> &DeviceState;

    /// Shared live state, mutably.
    fn state_mut(&mut self) -> &mut DeviceState;

    /// Human-readable name used in notifications.
    fn controller_name(&self) -> String;

    fn axis_name(&self, axis: usize) -> String {
        format!("Axis {}", axis)
    }

    fn button_name(&self, button: usize) -> String {
        format!("Button {}", button)
    }

    fn identity(&self) -> ControllerIdentity {
        self.state().identity
    }

    fn axis_count(&self) -> usize {
        self.state().raw_axes.len()
    }

    fn button_count(&self) -> usize {
        self.state().button_count
    }

    /// Last raw position of an axis, or 0.0 for an unknown axis.
    fn raw_axis_state(&self, axis: usize) -> f32 {
        self.state().raw_axes.get(axis).copied().unwrap_or(0.0)
    }

    /// Axis position after calibration and the analog curve.
    fn axis_state(&self, axis: usize) -> f32 {
        let state = self.state();
        let calibrated = state.calibration.apply(axis, self.raw_axis_state(axis));
        (state.evaluator)(calibrated)
    }

    fn calibration(&self) -> &AxisCalibration {
        &self.state().calibration
    }

    fn calibration_mut(&mut self) -> &mut AxisCalibration {
        &mut self.state_mut().calibration
    }

    fn analog_evaluation_curve(&self) -> CurveType {
        self.state().curve
    }

    /// Replaces the analog evaluator. Takes effect on the next [`ControllerAdapter::axis_state`].
    fn set_analog_evaluation_curve(&mut self, curve: CurveType) {
        let state = self.state_mut();
        state.curve = curve;
        state.evaluator = curve.evaluator();
    }

    fn set_button_pressed_callback(&mut self, callback: ButtonCallback) {
        self.state_mut().pressed_callback = Some(callback);
    }

    fn set_button_released_callback(&mut self, callback: ButtonCallback) {
        self.state_mut().released_callback = Some(callback);
    }

    fn has_callbacks(&self) -> bool {
        let state = self.state();
        state.pressed_callback.is_some() && state.released_callback.is_some()
    }

    fn pressed_buttons(&self) -> ButtonMask {
        self.state().buttons
    }

    fn is_button_pressed(&self, button: usize) -> bool {
        self.state().buttons.is_set(button)
    }

    /// Ingests one polled frame and fires callbacks for every button that
    /// changed state, in ascending button order.
    fn update(&mut self, sample: &RawSample) {
        self.state_mut().apply_sample(sample);
    }
}
