//! Warped value ranges for numeric controls.

use serde::{Deserialize, Serialize};

/// The curve family used to map a normalized `[0, 1]` handle position onto the actual
/// `[min, max]` value range. The serialized names match the configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Warp {
    /// The values are uniformly distributed between `min` and `max`.
    #[serde(rename = "lin")]
    Linear,
    /// The values are distributed along `exp(ln min + (ln max - ln min) * x)`, allocating most
    /// of the handle travel to the lower decades. Only defined for ranges with `min > 0`,
    /// which is enforced at configuration time rather than on every call.
    #[serde(rename = "exp")]
    Exponential,
    /// Quadratically eased variant with extra resolution at the start of the range.
    #[serde(rename = "quadIn")]
    QuadIn,
    /// Quadratically eased variant with extra resolution at the end of the range.
    #[serde(rename = "quadOut")]
    QuadOut,
}

impl Warp {
    /// Parse one of the warp keys recognized in configurations.
    pub fn from_key(key: &str) -> Option<Warp> {
        match key {
            "lin" => Some(Warp::Linear),
            "exp" => Some(Warp::Exponential),
            "quadIn" => Some(Warp::QuadIn),
            "quadOut" => Some(Warp::QuadOut),
            _ => None,
        }
    }

    /// The configuration key for this warp, the inverse of [`from_key()`][Self::from_key()].
    pub fn key(&self) -> &'static str {
        match self {
            Warp::Linear => "lin",
            Warp::Exponential => "exp",
            Warp::QuadIn => "quadIn",
            Warp::QuadOut => "quadOut",
        }
    }
}

/// A control's value distribution. Both endpoints are inclusive, and `min <= max` always
/// holds. The bounds are plain fields because controls rewrite them at runtime; every mapping
/// function reads the current values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f32,
    pub max: f32,
    pub warp: Warp,
}

impl Range {
    /// Map a normalized `[0, 1]` position to a plain value in `[min, max]`. Positions at or
    /// beyond the boundaries return the exact bound rather than a computed approximation.
    pub fn unnormalize(&self, normalized: f32) -> f32 {
        let Range { min, max, .. } = *self;
        if normalized <= 0.0 {
            return min;
        }
        if normalized >= 1.0 {
            return max;
        }

        match self.warp {
            Warp::Linear => normalized * (max - min) + min,
            Warp::Exponential => (min.ln() + (max.ln() - min.ln()) * normalized).exp(),
            Warp::QuadIn => (max - min) * normalized * normalized + min,
            Warp::QuadOut => {
                let inverted = 1.0 - normalized;
                (max - min) * (1.0 - inverted * inverted) + min
            }
        }
    }

    /// Map a plain value back to its normalized `[0, 1]` position, the exact analytic inverse
    /// of [`unnormalize()`][Self::unnormalize()]. Values at or beyond the bounds return exactly
    /// 0 or 1.
    pub fn normalize(&self, plain: f32) -> f32 {
        let Range { min, max, .. } = *self;
        if plain <= min {
            return 0.0;
        }
        if plain >= max {
            return 1.0;
        }

        match self.warp {
            Warp::Linear => (plain - min) / (max - min),
            Warp::Exponential => (plain.ln() - min.ln()) / (max.ln() - min.ln()),
            Warp::QuadIn => ((plain - min) / (max - min)).sqrt(),
            Warp::QuadOut => 1.0 - ((max - plain) / (max - min)).sqrt(),
        }
    }

    /// Snap a value to a step size, clamping to the minimum and maximum value of the range.
    pub fn snap_to_step(&self, value: f32, step_size: f32) -> f32 {
        ((value / step_size).round() * step_size).clamp(self.min, self.max)
    }

    /// Clamp a value to the bounds of the range.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Emits debug assertions to make sure the invariants hold: ordered bounds, and a strictly
    /// positive minimum for exponential warps.
    pub(crate) fn assert_validity(&self) {
        ctl_debug_assert!(
            self.min <= self.max,
            "The range minimum ({}) needs to be less than or equal to the range maximum ({})",
            self.min,
            self.max
        );
        if self.warp == Warp::Exponential {
            ctl_debug_assert!(
                self.min > 0.0,
                "Exponential ranges need a strictly positive minimum, got {}",
                self.min
            );
        }
    }
}
