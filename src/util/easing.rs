//! Easing curves for camera path segments.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Easing curve applied to a normalized segment progress.
#[derive(
    Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant speed.
    #[default]
    Linear,
    /// Slow start, fast end.
    QuadraticIn,
    /// Fast start, slow end.
    QuadraticOut,
    /// Slow at both ends (smoothstep).
    SmoothStep,
    /// Cubic Bezier-style ease with configurable inner control values:
    /// `c1·3t(1-t)² + c2·3(1-t)t² + t³`.
    CubicHermite {
        /// First control value.
        c1: f32,
        /// Second control value.
        c2: f32,
    },
}

impl Easing {
    /// Evaluate the curve at `t`. Input is clamped to `[0, 1]` and the
    /// endpoints map to themselves.
    #[inline]
    #[must_use]
    pub fn evaluate(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadraticIn => t * t,
            Self::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
            Self::CubicHermite { c1, c2 } => {
                let omt = 1.0 - t;
                c1 * 3.0 * t * omt * omt + c2 * 3.0 * omt * t * t + t * t * t
            }
        }
    }
}
