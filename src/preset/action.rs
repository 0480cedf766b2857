//! # Logical Actions
//!
//! The actions a preset can bind physical inputs to.

use serde::{Deserialize, Serialize};

/// One-shot action fired on a button-mask press edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscreteAction {
    Stage,
    Abort,
    ToggleGear,
    ToggleLights,
    ToggleBrakes,
    ToggleStabilityAssist,
    IncrementThrottle,
    DecrementThrottle,
    CutThrottle,
    FullThrottle,
    YawLeft,
    YawRight,
    PitchUp,
    PitchDown,
    RollLeft,
    RollRight,
    NextPreset,
    PreviousPreset,
}

impl DiscreteAction {
    /// Axis and direction of a discrete nudge action.
    ///
    /// The magnitude of a nudge is the configuration's discrete step size.
    #[must_use]
    pub fn axis_nudge(self) -> Option<(ContinuousAction, f32)> {
        match self {
            DiscreteAction::YawLeft => Some((ContinuousAction::Yaw, -1.0)),
            DiscreteAction::YawRight => Some((ContinuousAction::Yaw, 1.0)),
            DiscreteAction::PitchUp => Some((ContinuousAction::Pitch, 1.0)),
            DiscreteAction::PitchDown => Some((ContinuousAction::Pitch, -1.0)),
            DiscreteAction::RollLeft => Some((ContinuousAction::Roll, -1.0)),
            DiscreteAction::RollRight => Some((ContinuousAction::Roll, 1.0)),
            _ => None,
        }
    }
}

/// Action driven every frame by an analog axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContinuousAction {
    Roll,
    Pitch,
    Yaw,
    Throttle,
    TranslateX,
    TranslateY,
    TranslateZ,
    CameraX,
    CameraY,
    WheelSteer,
    WheelThrottle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_nudges() {
        assert_eq!(DiscreteAction::YawLeft.axis_nudge(), Some((ContinuousAction::Yaw, -1.0)));
        assert_eq!(DiscreteAction::PitchUp.axis_nudge(), Some((ContinuousAction::Pitch, 1.0)));
        assert_eq!(DiscreteAction::Stage.axis_nudge(), None);
        assert_eq!(DiscreteAction::IncrementThrottle.axis_nudge(), None);
    }
}
