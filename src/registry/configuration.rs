//! # Controller Configuration
//!
//! Binds one controller identity to its live adapter, its presets, its curve
//! selection and its tuning values.
//!
//! ## Calibration Snapshot
//!
//! The live calibration arrays belong to the adapter, which is never
//! persisted. While the registry is written out, [`ControllerConfiguration::on_pre_serialize`]
//! copies them into a snapshot on the configuration. After the registry is
//! read back, [`ControllerConfiguration::on_post_deserialize`] creates a new
//! adapter and copies the snapshot into it axis by axis. Outside those two
//! calls the snapshot is always `None`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::controller::{
    create_adapter, AxisCalibration, ButtonMask, ControllerAdapter, ControllerIdentity, CurveType,
    InputWrapper,
};
use crate::error::{FlyByWireError, Result};
use crate::preset::{default_presets, ContinuousAction, ControllerPreset, DiscreteAction};

/// Default size of a discrete axis nudge.
pub const DEFAULT_DISCRETE_ACTION_STEP: f64 = 0.15;

/// Default throttle change per increment/decrement action.
pub const DEFAULT_INCREMENTAL_THROTTLE_SENSITIVITY: f64 = 0.05;

fn default_discrete_action_step() -> f64 { DEFAULT_DISCRETE_ACTION_STEP }
fn default_incremental_throttle_sensitivity() -> f64 { DEFAULT_INCREMENTAL_THROTTLE_SENSITIVITY }

/// Configuration of one active controller.
#[derive(Debug, Serialize, Deserialize)]
pub struct ControllerConfiguration {
    wrapper: InputWrapper,
    controller_index: usize,

    #[serde(default)]
    current_preset: usize,

    #[serde(default)]
    analog_input_curve: CurveType,

    #[serde(default = "default_discrete_action_step")]
    discrete_action_step: f64,

    #[serde(default = "default_incremental_throttle_sensitivity")]
    incremental_throttle_sensitivity: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    calibration: Option<AxisCalibration>,

    #[serde(default)]
    presets: Vec<ControllerPreset>,

    #[serde(skip)]
    adapter: Option<Box<dyn ControllerAdapter>>,

    #[serde(skip)]
    evaluated_discrete_action_masks: HashSet<ButtonMask>,
}

impl ControllerConfiguration {
    /// Creates an unbound configuration with default settings and no presets.
    pub(crate) fn new(identity: ControllerIdentity) -> Self {
        Self {
            wrapper: identity.wrapper,
            controller_index: identity.index,
            current_preset: 0,
            analog_input_curve: CurveType::default(),
            discrete_action_step: DEFAULT_DISCRETE_ACTION_STEP,
            incremental_throttle_sensitivity: DEFAULT_INCREMENTAL_THROTTLE_SENSITIVITY,
            calibration: None,
            presets: Vec::new(),
            adapter: None,
            evaluated_discrete_action_masks: HashSet::new(),
        }
    }

    /// Creates a configuration around a freshly allocated adapter: wires the
    /// adapter's evaluator from the default curve and seeds the default
    /// presets for the adapter's capabilities.
    pub(crate) fn with_adapter(mut adapter: Box<dyn ControllerAdapter>) -> Self {
        let mut config = Self::new(adapter.identity());
        adapter.set_analog_evaluation_curve(config.analog_input_curve);
        config.presets = default_presets(adapter.as_ref());
        config.current_preset = 0;
        config.adapter = Some(adapter);
        config
    }

    #[must_use]
    pub fn identity(&self) -> ControllerIdentity {
        ControllerIdentity::new(self.wrapper, self.controller_index)
    }

    #[must_use]
    pub fn wrapper(&self) -> InputWrapper {
        self.wrapper
    }

    #[must_use]
    pub fn controller_index(&self) -> usize {
        self.controller_index
    }

    // ==================== Adapter ====================

    #[must_use]
    pub fn adapter(&self) -> Option<&dyn ControllerAdapter> {
        self.adapter.as_deref()
    }

    pub fn adapter_mut(&mut self) -> Option<&mut dyn ControllerAdapter> {
        match &mut self.adapter {
            Some(adapter) => Some(&mut **adapter),
            None => None,
        }
    }

    /// Releases the adapter. Used when the configuration is deactivated.
    pub(crate) fn take_adapter(&mut self) -> Option<Box<dyn ControllerAdapter>> {
        self.adapter.take()
    }

    // ==================== Presets ====================

    #[must_use]
    pub fn presets(&self) -> &[ControllerPreset] {
        &self.presets
    }

    #[must_use]
    pub fn current_preset_index(&self) -> usize {
        self.current_preset
    }

    /// Returns the selected preset.
    ///
    /// Never fails: an out-of-range index is reset to 0, and an empty preset
    /// list gets one default preset appended first. Both repairs are logged.
    pub fn current_preset(&mut self) -> &ControllerPreset {
        let index = self.heal_preset_selection();
        &self.presets[index]
    }

    /// Mutable access to the selected preset, with the same repairs as
    /// [`ControllerConfiguration::current_preset`].
    pub fn current_preset_mut(&mut self) -> &mut ControllerPreset {
        let index = self.heal_preset_selection();
        &mut self.presets[index]
    }

    fn heal_preset_selection(&mut self) -> usize {
        if self.current_preset >= self.presets.len() {
            warn!(
                "{}: preset index {} out of range ({} presets), resetting to 0",
                self.identity(),
                self.current_preset,
                self.presets.len()
            );
            self.current_preset = 0;
            if self.presets.is_empty() {
                warn!("{}: no presets, adding a default preset", self.identity());
                self.presets.push(ControllerPreset::default());
            }
        }
        self.current_preset
    }

    /// Selects a preset by index. Returns false and keeps the selection if
    /// the index is out of range.
    ///
    /// Edge tracking carries over, so buttons still held from the previous
    /// preset do not fire in the new one until released.
    pub fn select_preset(&mut self, index: usize) -> bool {
        if index >= self.presets.len() {
            return false;
        }
        self.current_preset = index;
        true
    }

    /// Selects the next preset, wrapping around.
    pub fn next_preset(&mut self) {
        let count = self.presets.len().max(1);
        let next = (self.heal_preset_selection() + 1) % count;
        self.select_preset(next);
    }

    /// Selects the previous preset, wrapping around.
    pub fn previous_preset(&mut self) {
        let count = self.presets.len().max(1);
        let previous = (self.heal_preset_selection() + count - 1) % count;
        self.select_preset(previous);
    }

    /// Appends a preset and returns its index.
    pub fn add_preset(&mut self, preset: ControllerPreset) -> usize {
        self.presets.push(preset);
        self.presets.len() - 1
    }

    /// Removes a preset, keeping the selection on the same preset where possible.
    pub fn remove_preset(&mut self, index: usize) -> Option<ControllerPreset> {
        if index >= self.presets.len() {
            return None;
        }
        let removed = self.presets.remove(index);
        if self.current_preset > index {
            self.current_preset -= 1;
        }
        Some(removed)
    }

    // ==================== Curve and Tuning ====================

    #[must_use]
    pub fn analog_input_curve(&self) -> CurveType {
        self.analog_input_curve
    }

    /// Records the curve selection and, if an adapter is bound, switches the
    /// adapter's evaluator immediately.
    pub fn set_analog_input_curve(&mut self, curve: CurveType) {
        self.analog_input_curve = curve;
        if let Some(adapter) = self.adapter.as_mut() {
            adapter.set_analog_evaluation_curve(curve);
        }
    }

    #[must_use]
    pub fn discrete_action_step(&self) -> f64 {
        self.discrete_action_step
    }

    /// Ignores non-finite values.
    pub fn set_discrete_action_step(&mut self, step: f64) {
        if step.is_finite() {
            self.discrete_action_step = step;
        } else {
            warn!("{}: ignoring non-finite discrete action step {}", self.identity(), step);
        }
    }

    #[must_use]
    pub fn incremental_throttle_sensitivity(&self) -> f64 {
        self.incremental_throttle_sensitivity
    }

    /// Ignores non-finite values.
    pub fn set_incremental_throttle_sensitivity(&mut self, sensitivity: f64) {
        if sensitivity.is_finite() {
            self.incremental_throttle_sensitivity = sensitivity;
        } else {
            warn!(
                "{}: ignoring non-finite throttle sensitivity {}",
                self.identity(),
                sensitivity
            );
        }
    }

    // ==================== Evaluation ====================

    #[must_use]
    pub fn evaluated_discrete_action_masks(&self) -> &HashSet<ButtonMask> {
        &self.evaluated_discrete_action_masks
    }

    /// Returns the discrete actions that fire for this input sample.
    ///
    /// A binding fires once when all of its buttons become held and does not
    /// fire again until at least one of them is released.
    pub fn evaluate_discrete_actions(&mut self, pressed: ButtonMask) -> Vec<DiscreteAction> {
        let bindings = self.current_preset().discrete_bindings();

        self.evaluated_discrete_action_masks
            .retain(|mask| pressed.contains(*mask));

        let mut fired = Vec::new();
        for binding in bindings {
            if pressed.contains(binding.buttons)
                && self.evaluated_discrete_action_masks.insert(binding.buttons)
            {
                debug!("{}: {:?} fired by {}", self.identity(), binding.action, binding.buttons);
                fired.push(binding.action);
            }
        }
        fired
    }

    /// Reads every bound axis of the current preset through the adapter.
    ///
    /// Returns nothing if no adapter is bound.
    pub fn evaluate_continuous_actions(&mut self) -> Vec<(ContinuousAction, f32)> {
        let bindings = self.current_preset().continuous_bindings();
        let Some(adapter) = self.adapter.as_deref() else {
            return Vec::new();
        };

        bindings
            .into_iter()
            .map(|binding| (binding.action, adapter.axis_state(binding.axis)))
            .collect()
    }

    /// Applies a discrete throttle action to a throttle value in 0.0..1.0.
    ///
    /// Actions that do not touch the throttle return it unchanged.
    #[must_use]
    pub fn apply_throttle_action(&self, throttle: f32, action: DiscreteAction) -> f32 {
        let step = self.incremental_throttle_sensitivity as f32;
        let next = match action {
            DiscreteAction::IncrementThrottle => throttle + step,
            DiscreteAction::DecrementThrottle => throttle - step,
            DiscreteAction::CutThrottle => 0.0,
            DiscreteAction::FullThrottle => 1.0,
            _ => throttle,
        };
        next.clamp(0.0, 1.0)
    }

    /// Axis and signed offset of a discrete nudge, scaled by the step size.
    #[must_use]
    pub fn nudge(&self, action: DiscreteAction) -> Option<(ContinuousAction, f32)> {
        action
            .axis_nudge()
            .map(|(axis, direction)| (axis, direction * self.discrete_action_step as f32))
    }

    /// Resolves the actions this configuration handles itself: preset
    /// cycling and throttle steps. Returns the resulting throttle; other
    /// actions leave it unchanged and are left to the host.
    pub fn apply_discrete_action(&mut self, action: DiscreteAction, throttle: f32) -> f32 {
        match action {
            DiscreteAction::NextPreset => {
                self.next_preset();
                throttle
            }
            DiscreteAction::PreviousPreset => {
                self.previous_preset();
                throttle
            }
            _ => self.apply_throttle_action(throttle, action),
        }
    }

    // ==================== Persistence ====================

    /// True while the calibration snapshot is populated.
    #[must_use]
    pub fn has_persisted_calibration(&self) -> bool {
        self.calibration.is_some()
    }

    /// Flattens presets and copies the adapter's calibration arrays into the
    /// snapshot, preserving axis order.
    ///
    /// # Errors
    ///
    /// - `AdapterMissing` if no adapter is bound
    /// - `AxisCountMismatch` if a live array does not have one entry per axis
    pub(crate) fn on_pre_serialize(&mut self) -> Result<()> {
        for preset in &mut self.presets {
            preset.on_pre_serialize();
        }

        let identity = self.identity();
        let adapter = self
            .adapter
            .as_deref()
            .ok_or(FlyByWireError::AdapterMissing(identity))?;
        let live = adapter.calibration();
        let axis_count = adapter.axis_count();
        check_lengths(identity, live, axis_count)?;

        let mut snapshot = AxisCalibration::default();
        for axis in 0..axis_count {
            snapshot.positive_dead_zones.push(live.positive_dead_zones[axis]);
            snapshot.negative_dead_zones.push(live.negative_dead_zones[axis]);
            snapshot.left.push(live.left[axis]);
            snapshot.identity.push(live.identity[axis]);
            snapshot.right.push(live.right[axis]);
        }

        debug!("{}: captured calibration for {} axes", identity, axis_count);
        self.calibration = Some(snapshot);
        Ok(())
    }

    /// Creates a new adapter for this identity, resets edge tracking, rebuilds
    /// presets and restores the calibration snapshot into the adapter. The
    /// snapshot is cleared whether or not the restore succeeds.
    ///
    /// # Errors
    ///
    /// Returns `AxisCountMismatch` if a persisted array does not have one
    /// entry per adapter axis.
    pub(crate) fn on_post_deserialize(&mut self) -> Result<()> {
        let identity = self.identity();
        let mut adapter = create_adapter(identity);
        adapter.set_analog_evaluation_curve(self.analog_input_curve);

        self.evaluated_discrete_action_masks = HashSet::new();

        for preset in &mut self.presets {
            preset.on_post_deserialize();
        }

        match self.calibration.take() {
            Some(snapshot) => {
                let axis_count = adapter.axis_count();
                check_lengths(identity, &snapshot, axis_count)?;

                let live = adapter.calibration_mut();
                for axis in 0..axis_count {
                    live.positive_dead_zones[axis] = snapshot.positive_dead_zones[axis];
                    live.negative_dead_zones[axis] = snapshot.negative_dead_zones[axis];
                    live.left[axis] = snapshot.left[axis];
                    live.identity[axis] = snapshot.identity[axis];
                    live.right[axis] = snapshot.right[axis];
                }
                debug!("{}: restored calibration for {} axes", identity, axis_count);
            }
            None => {
                warn!("{}: no persisted calibration, using adapter defaults", identity);
            }
        }

        self.adapter = Some(adapter);
        Ok(())
    }

    /// Drops the calibration snapshot and preset binding lists.
    pub(crate) fn release_persisted(&mut self) {
        self.calibration = None;
        for preset in &mut self.presets {
            preset.release_persisted();
        }
    }
}

fn check_lengths(
    identity: ControllerIdentity,
    calibration: &AxisCalibration,
    axis_count: usize,
) -> Result<()> {
    for (array, values) in calibration.arrays() {
        if values.len() != axis_count {
            return Err(FlyByWireError::AxisCountMismatch {
                identity,
                array,
                expected: axis_count,
                found: values.len(),
            });
        }
    }
    Ok(())
}
