//! # Analog Response Curves
//!
//! Maps a calibrated axis position to an output value. Every curve is
//! stateless, keeps the sign of its input and fixes the points -1, 0 and 1, so
//! the same evaluator serves both stick axes (-1.0..1.0) and trigger axes
//! (0.0..1.0).
//!
//! | Curve | Formula (for `x >= 0`) | Feel |
//! |-------|------------------------|------|
//! | Identity | `x` | Linear |
//! | XSquared | `x²` | Fine control near center |
//! | XCubed | `x³` | Very fine control near center |
//! | SqrtX | `√x` | Fast response near center |
//! | Logarithmic | `ln(1 + (e-1)x)` | Mildly fast near center |
//! | Exponential | `(eˣ - 1) / (e - 1)` | Mildly fine near center |
//!
//! ```
//! use flybywire::controller::CurveType;
//!
//! let curve = CurveType::XSquared.evaluator();
//! assert!((curve(0.5) - 0.25).abs() < 1e-6);
//! assert!((curve(-0.5) + 0.25).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};
use std::f32::consts::E;

/// Stateless evaluator produced from a [`CurveType`].
pub type CurveEvaluator = fn(f32) -> f32;

/// Closed set of analog response curve families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveType {
    Identity,
    #[default]
    XSquared,
    XCubed,
    SqrtX,
    Logarithmic,
    Exponential,
}

impl CurveType {
    /// All curve families, in menu order.
    pub const ALL: [CurveType; 6] = [
        CurveType::Identity,
        CurveType::XSquared,
        CurveType::XCubed,
        CurveType::SqrtX,
        CurveType::Logarithmic,
        CurveType::Exponential,
    ];

    /// Returns the evaluator function for this curve family.
    #[must_use]
    pub fn evaluator(self) -> CurveEvaluator {
        match self {
            CurveType::Identity => identity,
            CurveType::XSquared => x_squared,
            CurveType::XCubed => x_cubed,
            CurveType::SqrtX => sqrt_x,
            CurveType::Logarithmic => logarithmic,
            CurveType::Exponential => exponential,
        }
    }

    /// Evaluates the curve once. Prefer [`CurveType::evaluator`] in loops.
    #[must_use]
    pub fn evaluate(self, x: f32) -> f32 {
        (self.evaluator())(x)
    }
}

fn identity(x: f32) -> f32 {
    x
}

fn x_squared(x: f32) -> f32 {
    x * x.abs()
}

fn x_cubed(x: f32) -> f32 {
    x * x * x
}

fn sqrt_x(x: f32) -> f32 {
    x.signum() * x.abs().sqrt()
}

fn logarithmic(x: f32) -> f32 {
    x.signum() * (1.0 + (E - 1.0) * x.abs()).ln()
}

fn exponential(x: f32) -> f32 {
    x.signum() * (x.abs().exp() - 1.0) / (E - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_default_is_x_squared() {
        assert_eq!(CurveType::default(), CurveType::XSquared);
    }

    #[test]
    fn test_identity() {
        let f = CurveType::Identity.evaluator();
        for x in [-1.0, -0.3, 0.0, 0.42, 1.0] {
            assert_eq!(f(x), x);
        }
    }

    #[test]
    fn test_x_squared_preserves_sign() {
        let f = CurveType::XSquared.evaluator();
        assert!((f(0.5) - 0.25).abs() < EPS);
        assert!((f(-0.5) + 0.25).abs() < EPS);
    }

    #[test]
    fn test_x_cubed() {
        assert!((CurveType::XCubed.evaluate(0.5) - 0.125).abs() < EPS);
        assert!((CurveType::XCubed.evaluate(-0.5) + 0.125).abs() < EPS);
    }

    #[test]
    fn test_sqrt_x() {
        assert!((CurveType::SqrtX.evaluate(0.25) - 0.5).abs() < EPS);
        assert!((CurveType::SqrtX.evaluate(-0.25) + 0.5).abs() < EPS);
    }

    #[test]
    fn test_all_curves_fix_endpoints_and_center() {
        for curve in CurveType::ALL {
            let f = curve.evaluator();
            assert!(f(0.0).abs() < EPS, "{:?} should map 0 to 0", curve);
            assert!((f(1.0) - 1.0).abs() < EPS, "{:?} should map 1 to 1", curve);
            assert!((f(-1.0) + 1.0).abs() < EPS, "{:?} should map -1 to -1", curve);
        }
    }

    #[test]
    fn test_all_curves_monotonic() {
        for curve in CurveType::ALL {
            let f = curve.evaluator();
            let mut previous = f(-1.0);
            for step in 1..=40 {
                let x = -1.0 + step as f32 * 0.05;
                let y = f(x);
                assert!(y >= previous - EPS, "{:?} not monotonic at {}", curve, x);
                previous = y;
            }
        }
    }

    #[test]
    fn test_curves_symmetric() {
        for curve in CurveType::ALL {
            let f = curve.evaluator();
            for x in [0.1, 0.37, 0.8] {
                assert!((f(x) + f(-x)).abs() < EPS, "{:?} not odd at {}", curve, x);
            }
        }
    }

    #[test]
    fn test_fine_and_fast_families() {
        // Squared/cubed/exponential stay under identity inside (0, 1)
        for curve in [CurveType::XSquared, CurveType::XCubed, CurveType::Exponential] {
            assert!(curve.evaluate(0.5) < 0.5);
        }
        for curve in [CurveType::SqrtX, CurveType::Logarithmic] {
            assert!(curve.evaluate(0.5) > 0.5);
        }
    }
}
