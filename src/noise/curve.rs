//! Height-response curves: normalized height in, noise multiplier out.

use serde::{Deserialize, Serialize};

/// Maps a normalized height in `[0, 1]` to a noise multiplier.
pub trait HeightResponse {
    fn response(&self, t: f32) -> f32;
}

impl<F> HeightResponse for F
where
    F: Fn(f32) -> f32,
{
    fn response(&self, t: f32) -> f32 {
        self(t)
    }
}

/// Serializable response curve for configuration files and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseCurve {
    /// Same multiplier everywhere.
    Constant { value: f32 },
    /// Identity mapping.
    Linear,
    /// Hermite smoothstep.
    SmoothStep,
    /// Piecewise-linear through `(t, value)` keys sorted by `t`. Outside the
    /// key range the nearest key's value is held.
    Keyframes { keys: Vec<[f32; 2]> },
}

impl Default for ResponseCurve {
    fn default() -> Self {
        Self::Keyframes {
            keys: vec![[0.0, 0.35], [0.5, 1.0], [1.0, 0.8]],
        }
    }
}

impl ResponseCurve {
    fn evaluate_keys(keys: &[[f32; 2]], t: f32) -> f32 {
        let (Some(first), Some(last)) = (keys.first(), keys.last()) else {
            return 1.0;
        };
        if t <= first[0] {
            return first[1];
        }
        if t >= last[0] {
            return last[1];
        }
        for pair in keys.windows(2) {
            let ([t0, v0], [t1, v1]) = (pair[0], pair[1]);
            if t <= t1 {
                let span = t1 - t0;
                if span <= f32::EPSILON {
                    return v1;
                }
                return v0 + (v1 - v0) * (t - t0) / span;
            }
        }
        last[1]
    }
}

impl HeightResponse for ResponseCurve {
    fn response(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Constant { value } => *value,
            Self::Linear => t,
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
            Self::Keyframes { keys } => Self::evaluate_keys(keys, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_closure_curve() {
        let curve = |t: f32| 2.0 * t;
        assert_eq!(curve.response(0.25), 0.5);
    }

    #[test]
    fn test_builtin_curves() {
        assert_eq!(ResponseCurve::Linear.response(0.3), 0.3);
        assert_eq!(ResponseCurve::Constant { value: 0.7 }.response(0.9), 0.7);
        assert_relative_eq!(ResponseCurve::SmoothStep.response(0.5), 0.5);
        assert_eq!(ResponseCurve::SmoothStep.response(2.0), 1.0);
    }

    #[test]
    fn test_keyframes_interpolate_and_clamp() {
        let curve = ResponseCurve::Keyframes {
            keys: vec![[0.2, 0.0], [0.6, 1.0], [1.0, 0.5]],
        };
        assert_eq!(curve.response(0.0), 0.0);
        assert_relative_eq!(curve.response(0.4), 0.5);
        assert_relative_eq!(curve.response(0.8), 0.75);
        assert_eq!(curve.response(1.0), 0.5);

        let empty = ResponseCurve::Keyframes { keys: vec![] };
        assert_eq!(empty.response(0.5), 1.0);
    }

    #[test]
    fn test_curve_from_json() {
        let curve: ResponseCurve = serde_json::from_str(r#"{"kind":"smooth_step"}"#).unwrap();
        assert_eq!(curve, ResponseCurve::SmoothStep);

        let keys: ResponseCurve =
            serde_json::from_str(r#"{"kind":"keyframes","keys":[[0.0,1.0],[1.0,2.0]]}"#).unwrap();
        assert_relative_eq!(keys.response(0.5), 1.5);
    }
}
