//! # Calibration Module
//!
//! Per-axis calibration data owned by every live adapter, and the math that
//! turns a raw axis position into a normalized one.
//!
//! ## Reference Points
//!
//! Each axis records three raw positions: `left` (full negative deflection),
//! `identity` (rest) and `right` (full positive deflection). A raw value is
//! mapped linearly onto -1.0..0.0 between `left` and `identity` and onto
//! 0.0..1.0 between `identity` and `right`. A trigger is an axis whose `left`
//! equals its `identity`; it never produces negative output.
//!
//! ## Dead Zones
//!
//! Positive and negative deflection have separate dead zones. Values within
//! the dead zone map to 0.0 and the remaining range is rescaled so full
//! deflection still reaches 1.0.
//!
//! ## Usage
//!
//! ```
//! use flybywire::controller::calibration::AxisCalibration;
//!
//! let mut cal = AxisCalibration::sticks(2);
//! cal.set_dead_zones(0, 0.1, 0.1);
//!
//! // Within dead zone
//! assert_eq!(cal.apply(0, 0.05), 0.0);
//!
//! // Full deflection preserved
//! assert!((cal.apply(0, 1.0) - 1.0).abs() < 0.001);
//! ```

use serde::{Deserialize, Serialize};

/// Largest dead zone honoured when applying calibration.
pub const MAX_DEAD_ZONE: f32 = 0.99;

/// Smallest reference span treated as a usable half-axis.
const MIN_SPAN: f32 = 1e-6;

/// Shape of an axis, used to pick default reference points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    /// Centered axis, -1.0..1.0.
    Stick,
    /// One-sided axis, 0.0..1.0.
    Trigger,
}

/// The five per-axis calibration arrays.
///
/// All arrays have one entry per axis, indexed by axis number. The same type
/// is used for the adapter's live storage and for the persisted snapshot a
/// configuration carries while it is being saved or loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisCalibration {
    pub positive_dead_zones: Vec<f32>,
    pub negative_dead_zones: Vec<f32>,
    pub left: Vec<f32>,
    pub identity: Vec<f32>,
    pub right: Vec<f32>,
}

impl AxisCalibration {
    /// Creates default calibration for the given axis layout.
    #[must_use]
    pub fn for_axes(kinds: &[AxisKind]) -> Self {
        let mut cal = Self::default();
        for kind in kinds {
            let left = match kind {
                AxisKind::Stick => -1.0,
                AxisKind::Trigger => 0.0,
            };
            cal.positive_dead_zones.push(0.0);
            cal.negative_dead_zones.push(0.0);
            cal.left.push(left);
            cal.identity.push(0.0);
            cal.right.push(1.0);
        }
        cal
    }

    /// Creates default calibration for `count` centered axes.
    #[must_use]
    pub fn sticks(count: usize) -> Self {
        Self::for_axes(&vec![AxisKind::Stick; count])
    }

    /// Number of axes, taken from the positive dead zone array.
    #[must_use]
    pub fn axis_count(&self) -> usize {
        self.positive_dead_zones.len()
    }

    /// Named view over the five arrays, in persisted order.
    #[must_use]
    pub fn arrays(&self) -> [(&'static str, &Vec<f32>); 5] {
        [
            ("axis_positive_dead_zones", &self.positive_dead_zones),
            ("axis_negative_dead_zones", &self.negative_dead_zones),
            ("axis_left", &self.left),
            ("axis_identity", &self.identity),
            ("axis_right", &self.right),
        ]
    }

    /// Sets the dead zones of one axis. Out-of-range axes are ignored.
    pub fn set_dead_zones(&mut self, axis: usize, negative: f32, positive: f32) {
        if axis < self.axis_count() {
            self.negative_dead_zones[axis] = negative;
            self.positive_dead_zones[axis] = positive;
        }
    }

    /// Sets the reference points of one axis. Out-of-range axes are ignored.
    pub fn set_reference_points(&mut self, axis: usize, left: f32, identity: f32, right: f32) {
        if axis < self.axis_count() {
            self.left[axis] = left;
            self.identity[axis] = identity;
            self.right[axis] = right;
        }
    }

    /// Applies reference points and dead zone to a raw axis position.
    ///
    /// Returns 0.0 for an axis index this calibration does not cover.
    #[must_use]
    pub fn apply(&self, axis: usize, raw: f32) -> f32 {
        if axis >= self.axis_count() {
            return 0.0;
        }

        let normalized = normalize_axis(raw, self.left[axis], self.identity[axis], self.right[axis]);
        let dead_zone = if normalized >= 0.0 {
            self.positive_dead_zones[axis]
        } else {
            self.negative_dead_zones[axis]
        };

        normalized.signum() * apply_dead_zone(normalized.abs(), dead_zone)
    }
}

/// Maps a raw position onto -1.0..1.0 using the axis reference points.
///
/// # Examples
///
/// ```
/// use flybywire::controller::calibration::normalize_axis;
///
/// // Stick resting slightly off center
/// assert!((normalize_axis(0.1, -1.0, 0.1, 1.0)).abs() < 1e-6);
/// assert!((normalize_axis(1.0, -1.0, 0.1, 1.0) - 1.0).abs() < 1e-6);
/// assert!((normalize_axis(-1.0, -1.0, 0.1, 1.0) + 1.0).abs() < 1e-6);
/// ```
#[must_use]
pub fn normalize_axis(raw: f32, left: f32, identity: f32, right: f32) -> f32 {
    if raw >= identity {
        let span = right - identity;
        if span.abs() < MIN_SPAN {
            return 0.0;
        }
        ((raw - identity) / span).clamp(0.0, 1.0)
    } else {
        let span = identity - left;
        if span.abs() < MIN_SPAN {
            return 0.0;
        }
        -((identity - raw) / span).clamp(0.0, 1.0)
    }
}

/// Applies a dead zone to an absolute value in range 0..1.
///
/// Maps values within the dead zone to 0, and scales the remaining range to 0..1.
#[inline]
#[must_use]
pub fn apply_dead_zone(abs_input: f32, dead_zone: f32) -> f32 {
    let dead_zone = dead_zone.clamp(0.0, MAX_DEAD_ZONE);
    if abs_input <= dead_zone {
        0.0
    } else {
        (abs_input - dead_zone) / (1.0 - dead_zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Construction Tests ====================

    #[test]
    fn test_sticks_defaults() {
        let cal = AxisCalibration::sticks(4);
        assert_eq!(cal.axis_count(), 4);
        for (_, array) in cal.arrays() {
            assert_eq!(array.len(), 4);
        }
        assert_eq!(cal.left, vec![-1.0; 4]);
        assert_eq!(cal.identity, vec![0.0; 4]);
        assert_eq!(cal.right, vec![1.0; 4]);
        assert_eq!(cal.positive_dead_zones, vec![0.0; 4]);
    }

    #[test]
    fn test_trigger_defaults() {
        let cal = AxisCalibration::for_axes(&[AxisKind::Stick, AxisKind::Trigger]);
        assert_eq!(cal.left, vec![-1.0, 0.0]);
        assert_eq!(cal.identity, vec![0.0, 0.0]);
    }

    #[test]
    fn test_arrays_order() {
        let cal = AxisCalibration::sticks(1);
        let names: Vec<&str> = cal.arrays().iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec![
                "axis_positive_dead_zones",
                "axis_negative_dead_zones",
                "axis_left",
                "axis_identity",
                "axis_right"
            ]
        );
    }

    #[test]
    fn test_setters_ignore_out_of_range() {
        let mut cal = AxisCalibration::sticks(2);
        let before = cal.clone();
        cal.set_dead_zones(5, 0.2, 0.2);
        cal.set_reference_points(2, -0.5, 0.0, 0.5);
        assert_eq!(cal, before);
    }

    // ==================== Normalization Tests ====================

    #[test]
    fn test_normalize_centered() {
        assert_eq!(normalize_axis(0.0, -1.0, 0.0, 1.0), 0.0);
        assert!((normalize_axis(0.5, -1.0, 0.0, 1.0) - 0.5).abs() < 1e-6);
        assert!((normalize_axis(-0.5, -1.0, 0.0, 1.0) + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_asymmetric_reference_points() {
        // Worn stick: rests at 0.2, only reaches 0.8 on the right
        assert!((normalize_axis(0.5, -1.0, 0.2, 0.8) - 0.5).abs() < 1e-6);
        assert!((normalize_axis(0.8, -1.0, 0.2, 0.8) - 1.0).abs() < 1e-6);
        assert!((normalize_axis(-0.4, -1.0, 0.2, 0.8) + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_clamps() {
        assert_eq!(normalize_axis(2.0, -1.0, 0.0, 1.0), 1.0);
        assert_eq!(normalize_axis(-2.0, -1.0, 0.0, 1.0), -1.0);
    }

    #[test]
    fn test_normalize_trigger_never_negative() {
        // left == identity: negative half has no span
        assert_eq!(normalize_axis(-0.3, 0.0, 0.0, 1.0), 0.0);
        assert!((normalize_axis(0.3, 0.0, 0.0, 1.0) - 0.3).abs() < 1e-6);
    }

    // ==================== Dead Zone Tests ====================

    #[test]
    fn test_dead_zone_within_zone() {
        assert_eq!(apply_dead_zone(0.05, 0.1), 0.0);
        assert_eq!(apply_dead_zone(0.1, 0.1), 0.0);
    }

    #[test]
    fn test_dead_zone_scaling() {
        assert!((apply_dead_zone(0.55, 0.1) - 0.5).abs() < 0.001);
        assert!((apply_dead_zone(1.0, 0.1) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_dead_zone_clamped() {
        // Dead zone of 1.0 would divide by zero
        assert_eq!(apply_dead_zone(0.5, 1.0), 0.0);
        assert!(apply_dead_zone(1.0, 1.0).is_finite());
        // Negative dead zones act as none
        assert!((apply_dead_zone(0.5, -0.3) - 0.5).abs() < 1e-6);
    }

    // ==================== Combined Tests ====================

    #[test]
    fn test_apply_uses_directional_dead_zones() {
        let mut cal = AxisCalibration::sticks(1);
        cal.set_dead_zones(0, 0.3, 0.1);

        // Positive side: 0.2 is outside the 0.1 dead zone
        assert!(cal.apply(0, 0.2) > 0.0);
        // Negative side: -0.2 is inside the 0.3 dead zone
        assert_eq!(cal.apply(0, -0.2), 0.0);
        // Both sides reach full deflection
        assert!((cal.apply(0, 1.0) - 1.0).abs() < 0.001);
        assert!((cal.apply(0, -1.0) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_apply_unknown_axis() {
        let cal = AxisCalibration::sticks(2);
        assert_eq!(cal.apply(2, 0.7), 0.0);
    }
}
