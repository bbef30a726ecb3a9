//! Easing functions for animations

use serde::{Deserialize, Serialize};

/// Easing function type
///
/// Named curves use the same control points as their CSS keywords, so a
/// page tuned in a browser keeps its feel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// The reveal curve used across the page: fast start, long soft landing
    pub const SMOOTH_OUT: Easing = Easing::CubicBezier(0.16, 1.0, 0.3, 1.0);

    fn control_points(&self) -> Option<(f32, f32, f32, f32)> {
        match *self {
            Easing::Linear => None,
            Easing::EaseIn => Some((0.42, 0.0, 1.0, 1.0)),
            Easing::EaseOut => Some((0.0, 0.0, 0.58, 1.0)),
            Easing::EaseInOut => Some((0.42, 0.0, 0.58, 1.0)),
            Easing::CubicBezier(x1, y1, x2, y2) => Some((x1, y1, x2, y2)),
        }
    }

    /// Apply the easing function to a progress value (0.0 to 1.0)
    ///
    /// Input outside [0, 1] is clamped; the endpoints map to themselves.
    pub fn apply(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self.control_points() {
            None => t,
            Some((x1, y1, x2, y2)) => cubic_bezier_ease(t, x1, y1, x2, y2),
        }
    }
}

/// Cubic bezier easing (browser-compatible).
///
/// Solves `x(p) = t` with Newton-Raphson, falling back to bisection when the
/// curve is too flat, then evaluates `y(p)`. Works in f64 to keep frame-to-frame
/// output stable.
fn cubic_bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let target = t as f64;
    let (x1, y1, x2, y2) = (x1 as f64, y1 as f64, x2 as f64, y2 as f64);

    let mut p = target;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - target;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2) as f32;
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    p = target;
    for _ in 0..24 {
        let x = bezier_sample(p, x1, x2);
        if (x - target).abs() < 1e-7 {
            break;
        }
        if x < target {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2) as f32
}

/// B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³, in Horner form
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

/// B'(t)
#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}
