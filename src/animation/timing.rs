//! Timing functions (easing curves) for animations.
//!
//! Timing functions control the rate of change during an animation, allowing
//! for natural-feeling motion rather than linear interpolation.
//!
//! ## Built-in Easing Functions
//!
//! - [`TimingFunction::Linear`] - Constant speed (no easing)
//! - [`TimingFunction::EaseIn`] - Starts slow, ends fast (acceleration)
//! - [`TimingFunction::EaseOut`] - Starts fast, ends slow (deceleration)
//! - [`TimingFunction::EaseInOut`] - Slow start and end, fast middle
//! - [`TimingFunction::Power`] - Polynomial curves (`power1` .. `power4`)
//! - [`TimingFunction::Back`] - Overshoots slightly before settling
//!
//! ## Advanced Options
//!
//! - [`TimingFunction::CubicBezier`] - CSS-style cubic bezier curve
//! - [`TimingFunction::Custom`] - User-defined function
//!
//! ## Parsing
//!
//! Timing functions parse from the names commonly used in web animation
//! code, so configuration can be written as strings:
//!
//! ```ignore
//! let ease: TimingFunction = "power2.out".parse()?;
//! let char_ease: TimingFunction = "back.out(1.7)".parse()?;
//! ```

use std::str::FromStr;
use std::sync::Arc;

use crate::error::ParseError;

/// Which end of the curve the easing applies to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ease {
    In,
    Out,
    InOut,
}

/// Timing function that controls the animation curve
#[derive(Clone)]
pub enum TimingFunction {
    /// Linear interpolation (constant speed)
    Linear,
    /// Starts slow, ends fast
    EaseIn,
    /// Starts fast, ends slow
    EaseOut,
    /// Starts slow, speeds up, then slows down
    EaseInOut,
    /// Polynomial easing; `Power(2, Ease::Out)` is a cubic deceleration
    Power(u8, Ease),
    /// Overshooting easing with the given overshoot amount (1.70158 is the usual default)
    Back(f32, Ease),
    /// CSS cubic-bezier curve (x1, y1, x2, y2)
    CubicBezier(f32, f32, f32, f32),
    /// Custom timing function
    Custom(Arc<dyn Fn(f32) -> f32 + Send + Sync>),
}

/// Overshoot used by `back.*` when no parameter is given
pub const DEFAULT_BACK_OVERSHOOT: f32 = 1.70158;

impl TimingFunction {
    /// Evaluate the timing function at time t (0.0 to 1.0)
    /// Returns the interpolation factor (can exceed [0, 1] for overshoot)
    ///
    /// The endpoints are exact: 0.0 maps to 0.0 and 1.0 maps to 1.0 for
    /// every built-in curve.
    pub fn evaluate(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            TimingFunction::Linear => t,
            TimingFunction::EaseIn => ease_in(t),
            TimingFunction::EaseOut => ease_out(t),
            TimingFunction::EaseInOut => ease_in_out(t),
            TimingFunction::Power(power, ease) => {
                apply_ease(t, *ease, |t| t.powi(i32::from(*power) + 1))
            }
            TimingFunction::Back(overshoot, ease) => {
                let s = *overshoot;
                apply_ease(t, *ease, |t| (s + 1.0) * t * t * t - s * t * t)
            }
            TimingFunction::CubicBezier(x1, y1, x2, y2) => cubic_bezier(t, *x1, *y1, *x2, *y2),
            TimingFunction::Custom(f) => f(t),
        }
    }

    /// Create a custom timing function from a closure
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f32) -> f32 + Send + Sync + 'static,
    {
        TimingFunction::Custom(Arc::new(f))
    }

    /// Decelerating curve used by hover micro-interactions
    pub fn decelerate() -> Self {
        TimingFunction::Power(2, Ease::Out)
    }
}

impl Default for TimingFunction {
    fn default() -> Self {
        TimingFunction::Power(1, Ease::Out)
    }
}

impl std::fmt::Debug for TimingFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimingFunction::Linear => write!(f, "Linear"),
            TimingFunction::EaseIn => write!(f, "EaseIn"),
            TimingFunction::EaseOut => write!(f, "EaseOut"),
            TimingFunction::EaseInOut => write!(f, "EaseInOut"),
            TimingFunction::Power(power, ease) => write!(f, "Power({}, {:?})", power, ease),
            TimingFunction::Back(overshoot, ease) => write!(f, "Back({}, {:?})", overshoot, ease),
            TimingFunction::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "CubicBezier({}, {}, {}, {})", x1, y1, x2, y2)
            }
            TimingFunction::Custom(_) => write!(f, "Custom"),
        }
    }
}

impl FromStr for TimingFunction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || ParseError::Easing(trimmed.to_string());

        // Split off an optional "(param)" suffix
        let (head, param) = match trimmed.find('(') {
            Some(open) => {
                let close = trimmed.rfind(')').ok_or_else(invalid)?;
                if close < open {
                    return Err(invalid());
                }
                let param = trimmed[open + 1..close]
                    .trim()
                    .parse::<f32>()
                    .map_err(|_| invalid())?;
                (&trimmed[..open], Some(param))
            }
            None => (trimmed, None),
        };

        let lower = head.to_ascii_lowercase();
        let (name, variant) = match lower.split_once('.') {
            Some((name, variant)) => (name, Some(variant)),
            None => (lower.as_str(), None),
        };

        let ease = match variant {
            None | Some("out") => Ease::Out,
            Some("in") => Ease::In,
            Some("inout") => Ease::InOut,
            Some(_) => return Err(invalid()),
        };

        let timing = match name {
            "none" | "linear" => TimingFunction::Linear,
            "ease-in" => TimingFunction::EaseIn,
            "ease-out" => TimingFunction::EaseOut,
            "ease-in-out" | "ease" => TimingFunction::EaseInOut,
            "back" => TimingFunction::Back(param.unwrap_or(DEFAULT_BACK_OVERSHOOT), ease),
            "power1" | "quad" => TimingFunction::Power(1, ease),
            "power2" | "cubic" => TimingFunction::Power(2, ease),
            "power3" | "quart" => TimingFunction::Power(3, ease),
            "power4" | "quint" => TimingFunction::Power(4, ease),
            _ => return Err(invalid()),
        };
        Ok(timing)
    }
}

// Easing functions

fn ease_in(t: f32) -> f32 {
    t * t
}

fn ease_out(t: f32) -> f32 {
    t * (2.0 - t)
}

fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

/// Build in/out/in-out variants from an ease-in curve
fn apply_ease(t: f32, ease: Ease, ease_in: impl Fn(f32) -> f32) -> f32 {
    match ease {
        Ease::In => ease_in(t),
        Ease::Out => 1.0 - ease_in(1.0 - t),
        Ease::InOut => {
            if t < 0.5 {
                ease_in(t * 2.0) / 2.0
            } else {
                1.0 - ease_in((1.0 - t) * 2.0) / 2.0
            }
        }
    }
}

/// Cubic bezier curve evaluation
/// Simplified implementation assuming x1, x2 are in [0, 1]
fn cubic_bezier(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    // Use Newton-Raphson to solve for t given x
    let mut current_t = t;
    for _ in 0..8 {
        let current_x = cubic_bezier_x(current_t, x1, x2);
        let current_slope = cubic_bezier_slope(current_t, x1, x2);
        if current_slope.abs() < 1e-6 {
            break;
        }
        current_t -= (current_x - t) / current_slope;
    }
    cubic_bezier_y(current_t, y1, y2)
}

fn cubic_bezier_x(t: f32, x1: f32, x2: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    3.0 * mt2 * t * x1 + 3.0 * mt * t2 * x2 + t3
}

fn cubic_bezier_y(t: f32, y1: f32, y2: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    3.0 * mt2 * t * y1 + 3.0 * mt * t2 * y2 + t3
}

fn cubic_bezier_slope(t: f32, x1: f32, x2: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * x1 + 6.0 * mt * t * (x2 - x1) + 3.0 * t * t * (1.0 - x2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear() {
        assert_eq!(TimingFunction::Linear.evaluate(0.0), 0.0);
        assert_eq!(TimingFunction::Linear.evaluate(0.5), 0.5);
        assert_eq!(TimingFunction::Linear.evaluate(1.0), 1.0);
    }

    #[test]
    fn test_ease_in() {
        let result = TimingFunction::EaseIn.evaluate(0.5);
        assert!(result < 0.5); // Should be slower at start
    }

    #[test]
    fn test_ease_out() {
        let result = TimingFunction::EaseOut.evaluate(0.5);
        assert!(result > 0.5); // Should be faster at start
    }

    #[test]
    fn test_power_out_decelerates() {
        let power2 = TimingFunction::Power(2, Ease::Out);
        // 1 - (1 - 0.5)^3
        assert!((power2.evaluate(0.5) - 0.875).abs() < 1e-6);
        assert!(power2.evaluate(0.5) > TimingFunction::Power(1, Ease::Out).evaluate(0.5));
    }

    #[test]
    fn test_back_out_overshoots() {
        let back = TimingFunction::Back(1.7, Ease::Out);
        let peak = (1..100)
            .map(|i| back.evaluate(i as f32 / 100.0))
            .fold(0.0f32, f32::max);
        assert!(peak > 1.0, "back.out should overshoot, peak was {}", peak);
        assert_eq!(back.evaluate(1.0), 1.0);
    }

    #[test]
    fn test_endpoints_exact_for_all_curves() {
        let curves = [
            TimingFunction::EaseInOut,
            TimingFunction::Power(3, Ease::InOut),
            TimingFunction::Back(2.0, Ease::In),
            TimingFunction::CubicBezier(0.25, 0.1, 0.25, 1.0),
        ];
        for curve in &curves {
            assert_eq!(curve.evaluate(0.0), 0.0, "{:?}", curve);
            assert_eq!(curve.evaluate(1.0), 1.0, "{:?}", curve);
        }
    }

    #[test]
    fn test_parse_names() {
        assert!(matches!(
            "power2.out".parse::<TimingFunction>(),
            Ok(TimingFunction::Power(2, Ease::Out))
        ));
        assert!(matches!(
            "power3.inOut".parse::<TimingFunction>(),
            Ok(TimingFunction::Power(3, Ease::InOut))
        ));
        assert!(matches!(
            "none".parse::<TimingFunction>(),
            Ok(TimingFunction::Linear)
        ));
        match "back.out(1.7)".parse::<TimingFunction>() {
            Ok(TimingFunction::Back(s, Ease::Out)) => assert!((s - 1.7).abs() < 1e-6),
            other => panic!("unexpected parse result: {:?}", other),
        }
        match "back".parse::<TimingFunction>() {
            Ok(TimingFunction::Back(s, Ease::Out)) => assert_eq!(s, DEFAULT_BACK_OVERSHOOT),
            other => panic!("unexpected parse result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("bounce.out".parse::<TimingFunction>().is_err());
        assert!("power2.sideways".parse::<TimingFunction>().is_err());
        assert!("back.out(abc)".parse::<TimingFunction>().is_err());
    }
}
