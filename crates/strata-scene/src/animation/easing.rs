//! Easing functions for animation timing.
//!
//! An easing function maps a linear progress fraction in [0, 1] to an eased
//! output fraction, controlling the rate of change over time. The standard
//! eases are cubic bezier curves with fixed control points; custom control
//! points are available through [`EasingFunction::cubic_bezier`].

use serde::{Deserialize, Serialize};

/// Easing function for animation timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,

    /// Slow start, fast middle, slow end.
    /// Equivalent to `cubic_bezier(0.25, 0.1, 0.25, 1.0)`.
    Ease,

    /// Slow start, accelerating.
    /// Equivalent to `cubic_bezier(0.42, 0.0, 1.0, 1.0)`.
    EaseIn,

    /// Fast start, decelerating.
    /// Equivalent to `cubic_bezier(0.0, 0.0, 0.58, 1.0)`.
    EaseOut,

    /// Slow start and end, fast middle.
    /// Equivalent to `cubic_bezier(0.42, 0.0, 0.58, 1.0)`.
    EaseInOut,

    /// Custom cubic bezier curve through control points (x1, y1) and (x2, y2).
    /// x values must be in [0, 1].
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl Default for EasingFunction {
    fn default() -> Self {
        Self::Ease
    }
}

impl EasingFunction {
    /// Evaluate the easing function at the given progress fraction.
    ///
    /// Input is clamped to [0, 1]; every ease maps 0 to 0 and 1 to 1 and the
    /// standard eases are monotonic in between.
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Ease => bezier_progress(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => bezier_progress(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => bezier_progress(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => bezier_progress(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => bezier_progress(*x1, *y1, *x2, *y2, t),
        }
    }

    /// Create a custom cubic bezier easing function.
    ///
    /// # Panics
    /// Panics if x1 or x2 are outside [0, 1].
    pub fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2),
            "Bezier x values must be in [0, 1]"
        );
        Self::CubicBezier { x1, y1, x2, y2 }
    }

    /// Resolve an easing by name, accepting both `ease-in` and `ease_in`
    /// spellings. Returns `None` for unrecognized names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.replace('_', "-").as_str() {
            "linear" => Some(Self::Linear),
            "ease" => Some(Self::Ease),
            "ease-in" => Some(Self::EaseIn),
            "ease-out" => Some(Self::EaseOut),
            "ease-in-out" => Some(Self::EaseInOut),
            _ => None,
        }
    }
}

/// Evaluate the eased progress of a cubic bezier timing curve at progress t.
fn bezier_progress(x1: f64, y1: f64, x2: f64, y2: f64, t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let s = solve_curve_x(x1, x2, t);
    sample(y1, y2, s)
}

/// Sample one bezier axis at parameter s.
/// B(s) = 3(1-s)²s·c1 + 3(1-s)s²·c2 + s³
fn sample(c1: f64, c2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * c1 + 3.0 * inv * s * s * c2 + s * s * s
}

/// Derivative of one bezier axis with respect to s.
fn sample_derivative(c1: f64, c2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * c1 + 6.0 * inv * s * (c2 - c1) + 3.0 * s * s * (1.0 - c2)
}

/// Find the curve parameter s whose x coordinate equals `target_x`.
///
/// Newton–Raphson from the linear guess; falls back to bisection when the
/// derivative flattens out.
fn solve_curve_x(x1: f64, x2: f64, target_x: f64) -> f64 {
    let mut s = target_x;

    for _ in 0..8 {
        let error = sample(x1, x2, s) - target_x;
        if error.abs() < 1e-7 {
            return s;
        }
        let slope = sample_derivative(x1, x2, s);
        if slope.abs() < 1e-6 {
            break;
        }
        s = (s - error / slope).clamp(0.0, 1.0);
    }

    // Bisection fallback; x(s) is monotonic for x1, x2 in [0, 1].
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    while hi - lo > 1e-7 {
        let mid = (lo + hi) / 2.0;
        if sample(x1, x2, mid) < target_x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo + hi) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 0.001;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_linear() {
        let ease = EasingFunction::Linear;
        for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert!(approx_eq(ease.evaluate(t), t));
        }
    }

    #[test]
    fn test_all_eases_hit_boundaries() {
        let eases = [
            EasingFunction::Linear,
            EasingFunction::Ease,
            EasingFunction::EaseIn,
            EasingFunction::EaseOut,
            EasingFunction::EaseInOut,
            EasingFunction::cubic_bezier(0.4, 0.0, 0.2, 1.0),
        ];
        for ease in eases {
            assert!(approx_eq(ease.evaluate(0.0), 0.0));
            assert!(approx_eq(ease.evaluate(1.0), 1.0));
        }
    }

    #[test]
    fn test_ease_in_starts_slow() {
        let ease = EasingFunction::EaseIn;
        assert!(ease.evaluate(0.25) < 0.25);
        assert!(ease.evaluate(0.5) < 0.5);
    }

    #[test]
    fn test_ease_out_starts_fast() {
        let ease = EasingFunction::EaseOut;
        assert!(ease.evaluate(0.25) > 0.25);
        assert!(ease.evaluate(0.5) > 0.5);
    }

    #[test]
    fn test_ease_in_out_is_symmetric() {
        let ease = EasingFunction::EaseInOut;
        assert!(approx_eq(ease.evaluate(0.5), 0.5));
        assert!(approx_eq(ease.evaluate(0.25) + ease.evaluate(0.75), 1.0));
    }

    #[test]
    fn test_standard_eases_are_monotonic() {
        let eases = [
            EasingFunction::Ease,
            EasingFunction::EaseIn,
            EasingFunction::EaseOut,
            EasingFunction::EaseInOut,
        ];
        for ease in eases {
            let mut previous = 0.0;
            for step in 1..=100 {
                let value = ease.evaluate(step as f64 / 100.0);
                assert!(
                    value >= previous,
                    "{:?} not monotonic at step {}",
                    ease,
                    step
                );
                previous = value;
            }
        }
    }

    #[test]
    fn test_input_clamping() {
        let ease = EasingFunction::Ease;
        assert!(approx_eq(ease.evaluate(-0.5), 0.0));
        assert!(approx_eq(ease.evaluate(1.5), 1.0));
    }

    #[test]
    fn test_linear_equivalent_bezier() {
        let bezier = EasingFunction::CubicBezier {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0,
        };
        assert!(approx_eq(bezier.evaluate(0.5), 0.5));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(EasingFunction::from_name("linear"), Some(EasingFunction::Linear));
        assert_eq!(EasingFunction::from_name("ease-in"), Some(EasingFunction::EaseIn));
        assert_eq!(EasingFunction::from_name("ease_in_out"), Some(EasingFunction::EaseInOut));
        assert_eq!(EasingFunction::from_name("bounce"), None);
    }

    #[test]
    #[should_panic(expected = "Bezier x values must be in [0, 1]")]
    fn test_invalid_bezier_x() {
        EasingFunction::cubic_bezier(-0.1, 0.0, 0.5, 1.0);
    }
}
