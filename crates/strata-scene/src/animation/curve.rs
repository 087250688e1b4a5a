//! Timing curves: a duration paired with an easing function.

use serde::{Deserialize, Serialize};

use super::easing::EasingFunction;

/// A timing curve.
///
/// `evaluate` maps elapsed seconds to an eased progress fraction: 0.0 at or
/// before the start, 1.0 at or beyond the duration, eased in between.
/// Durations must be positive; `Layer::animate` rejects curves that are not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    duration: f64,
    easing: EasingFunction,
}

impl Curve {
    /// Create a curve from a duration in seconds and an easing function.
    pub fn new(duration: f64, easing: EasingFunction) -> Self {
        Self { duration, easing }
    }

    /// Linear curve over the given duration.
    pub fn linear(duration: f64) -> Self {
        Self::new(duration, EasingFunction::Linear)
    }

    /// Standard ease curve over the given duration.
    pub fn ease(duration: f64) -> Self {
        Self::new(duration, EasingFunction::Ease)
    }

    /// Ease-in curve over the given duration.
    pub fn ease_in(duration: f64) -> Self {
        Self::new(duration, EasingFunction::EaseIn)
    }

    /// Ease-out curve over the given duration.
    pub fn ease_out(duration: f64) -> Self {
        Self::new(duration, EasingFunction::EaseOut)
    }

    /// Ease-in-out curve over the given duration.
    pub fn ease_in_out(duration: f64) -> Self {
        Self::new(duration, EasingFunction::EaseInOut)
    }

    /// Custom cubic bezier curve over the given duration.
    ///
    /// # Panics
    /// Panics if x1 or x2 are outside [0, 1].
    pub fn cubic_bezier(duration: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(duration, EasingFunction::cubic_bezier(x1, y1, x2, y2))
    }

    /// Build the configured default curve.
    ///
    /// Unrecognized easing names fall back to the standard ease.
    pub fn from_config(config: &strata_config::AnimationConfig) -> Self {
        let easing = config
            .default_easing
            .as_deref()
            .and_then(EasingFunction::from_name)
            .unwrap_or_default();
        Self::new(config.default_duration, easing)
    }

    /// The curve's duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// The curve's easing function.
    pub fn easing(&self) -> EasingFunction {
        self.easing
    }

    /// Map elapsed seconds to eased progress.
    pub fn evaluate(&self, elapsed: f64) -> f64 {
        if elapsed <= 0.0 {
            return 0.0;
        }
        if elapsed >= self.duration {
            return 1.0;
        }
        self.easing.evaluate(elapsed / self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 0.001;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_linear_progress() {
        let curve = Curve::linear(2.0);
        assert!(approx_eq(curve.evaluate(0.0), 0.0));
        assert!(approx_eq(curve.evaluate(0.5), 0.25));
        assert!(approx_eq(curve.evaluate(1.0), 0.5));
        assert!(approx_eq(curve.evaluate(2.0), 1.0));
    }

    #[test]
    fn test_clamps_outside_duration() {
        let curve = Curve::ease(0.1);
        assert_eq!(curve.evaluate(-1.0), 0.0);
        assert_eq!(curve.evaluate(0.0), 0.0);
        assert_eq!(curve.evaluate(0.1), 1.0);
        assert_eq!(curve.evaluate(5.0), 1.0);
    }

    #[test]
    fn test_eased_progress_goes_through_easing() {
        let curve = Curve::ease_in(1.0);
        assert!(curve.evaluate(0.25) < 0.25);
    }

    #[test]
    fn test_constructors_carry_easing() {
        assert_eq!(Curve::linear(1.0).easing(), EasingFunction::Linear);
        assert_eq!(Curve::ease_out(1.0).easing(), EasingFunction::EaseOut);
        assert_eq!(Curve::ease_in_out(1.0).duration(), 1.0);
    }

    #[test]
    fn test_from_config() {
        let config = strata_config::AnimationConfig {
            default_duration: 0.5,
            default_easing: Some("linear".to_string()),
            max_frame_delta: None,
        };
        let curve = Curve::from_config(&config);
        assert_eq!(curve.duration(), 0.5);
        assert_eq!(curve.easing(), EasingFunction::Linear);

        let config = strata_config::AnimationConfig {
            default_easing: Some("wobble".to_string()),
            ..config
        };
        assert_eq!(Curve::from_config(&config).easing(), EasingFunction::Ease);
    }
}
