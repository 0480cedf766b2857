//! # Preset Module
//!
//! A [`ControllerPreset`] is a named mapping from physical inputs to logical
//! actions for one controller:
//! - button masks to [`DiscreteAction`]s
//! - axis indices to [`ContinuousAction`]s
//!
//! The lookup maps are keyed by masks, which TOML cannot express as table
//! keys. [`ControllerPreset::on_pre_serialize`] flattens them into sorted
//! binding lists and [`ControllerPreset::on_post_deserialize`] rebuilds the
//! maps and empties the lists again.

pub mod action;
pub mod defaults;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::controller::ButtonMask;

pub use action::{ContinuousAction, DiscreteAction};
pub use defaults::{default_presets, default_presets_for};

/// Name given to presets created without one.
pub const DEFAULT_PRESET_NAME: &str = "New Preset";

/// Persisted form of one discrete binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscreteBinding {
    pub buttons: ButtonMask,
    pub action: DiscreteAction,
}

/// Persisted form of one continuous binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuousBinding {
    pub axis: usize,
    pub action: ContinuousAction,
}

/// Named set of input bindings.
///
/// # Examples
///
/// ```
/// use flybywire::controller::ButtonMask;
/// use flybywire::preset::{ControllerPreset, ContinuousAction, DiscreteAction};
///
/// let mut preset = ControllerPreset::new("Rover");
/// preset.set_discrete_binding(ButtonMask::single(0), DiscreteAction::ToggleBrakes);
/// preset.set_continuous_binding(0, ContinuousAction::WheelSteer);
///
/// assert_eq!(preset.discrete_action(ButtonMask::single(0)), Some(DiscreteAction::ToggleBrakes));
/// assert_eq!(preset.continuous_action(0), Some(ContinuousAction::WheelSteer));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerPreset {
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    discrete_bindings: Vec<DiscreteBinding>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    continuous_bindings: Vec<ContinuousBinding>,

    #[serde(skip)]
    discrete_actions: HashMap<ButtonMask, DiscreteAction>,

    #[serde(skip)]
    continuous_actions: HashMap<usize, ContinuousAction>,
}

impl Default for ControllerPreset {
    fn default() -> Self {
        Self::new(DEFAULT_PRESET_NAME)
    }
}

impl ControllerPreset {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            discrete_bindings: Vec::new(),
            continuous_bindings: Vec::new(),
            discrete_actions: HashMap::new(),
            continuous_actions: HashMap::new(),
        }
    }

    /// Binds a button mask to a discrete action, replacing any previous binding
    /// of that mask. Empty masks are ignored.
    pub fn set_discrete_binding(&mut self, buttons: ButtonMask, action: DiscreteAction) {
        if buttons.is_empty() {
            warn!("Ignoring discrete binding with no buttons for {:?}", action);
            return;
        }
        self.discrete_actions.insert(buttons, action);
    }

    pub fn unset_discrete_binding(&mut self, buttons: ButtonMask) -> Option<DiscreteAction> {
        self.discrete_actions.remove(&buttons)
    }

    #[must_use]
    pub fn discrete_action(&self, buttons: ButtonMask) -> Option<DiscreteAction> {
        self.discrete_actions.get(&buttons).copied()
    }

    /// All discrete bindings, ordered by mask.
    #[must_use]
    pub fn discrete_bindings(&self) -> Vec<DiscreteBinding> {
        let mut bindings: Vec<DiscreteBinding> = self
            .discrete_actions
            .iter()
            .map(|(&buttons, &action)| DiscreteBinding { buttons, action })
            .collect();
        bindings.sort_by_key(|b| b.buttons);
        bindings
    }

    pub fn set_continuous_binding(&mut self, axis: usize, action: ContinuousAction) {
        self.continuous_actions.insert(axis, action);
    }

    pub fn unset_continuous_binding(&mut self, axis: usize) -> Option<ContinuousAction> {
        self.continuous_actions.remove(&axis)
    }

    #[must_use]
    pub fn continuous_action(&self, axis: usize) -> Option<ContinuousAction> {
        self.continuous_actions.get(&axis).copied()
    }

    /// All continuous bindings, ordered by axis.
    #[must_use]
    pub fn continuous_bindings(&self) -> Vec<ContinuousBinding> {
        let mut bindings: Vec<ContinuousBinding> = self
            .continuous_actions
            .iter()
            .map(|(&axis, &action)| ContinuousBinding { axis, action })
            .collect();
        bindings.sort_by_key(|b| b.axis);
        bindings
    }

    /// Flattens the lookup maps into the persisted binding lists.
    pub fn on_pre_serialize(&mut self) {
        self.discrete_bindings = self.discrete_bindings();
        self.continuous_bindings = self.continuous_bindings();
    }

    /// Rebuilds the lookup maps from the persisted binding lists, then
    /// empties the lists.
    pub fn on_post_deserialize(&mut self) {
        self.discrete_actions.clear();
        for binding in self.discrete_bindings.drain(..) {
            if binding.buttons.is_empty() {
                warn!("Preset '{}': dropping discrete binding with no buttons", self.name);
                continue;
            }
            if let Some(previous) = self.discrete_actions.insert(binding.buttons, binding.action) {
                warn!(
                    "Preset '{}': buttons {} bound twice, {:?} replaces {:?}",
                    self.name, binding.buttons, binding.action, previous
                );
            }
        }

        self.continuous_actions.clear();
        for binding in self.continuous_bindings.drain(..) {
            if let Some(previous) = self.continuous_actions.insert(binding.axis, binding.action) {
                warn!(
                    "Preset '{}': axis {} bound twice, {:?} replaces {:?}",
                    self.name, binding.axis, binding.action, previous
                );
            }
        }
    }

    /// Drops the persisted binding lists after a save.
    pub fn release_persisted(&mut self) {
        self.discrete_bindings = Vec::new();
        self.continuous_bindings = Vec::new();
    }

    /// True while the persisted binding lists hold data.
    #[must_use]
    pub fn has_persisted_bindings(&self) -> bool {
        !self.discrete_bindings.is_empty() || !self.continuous_bindings.is_empty()
    }
}
