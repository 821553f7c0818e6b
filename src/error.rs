//! Error types for control configuration and input validation.

use thiserror::Error;

/// Errors signalled by [`Ctl`][crate::control::Ctl] construction and its validated setters.
///
/// Clamping and quantization are deliberately not errors: out-of-range values, inverted bounds,
/// and zero steps are silently corrected. Only genuine caller mistakes are reported, and a
/// failed setter always leaves the control's state untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CtlError {
    /// A setter received a NaN or infinite number.
    #[error("invalid {what}")]
    NotANumber { what: &'static str },
    /// A string input could not be parsed as a number.
    #[error("could not parse {0:?} as a number")]
    UnparseableValue(String),
    /// The configured warp is not one of `lin`, `exp`, `quadIn`, or `quadOut`.
    #[error("{0:?} is not a valid warp value")]
    UnknownWarp(String),
    /// The configured preset name does not exist in the spec table.
    #[error("{0:?} is not a known control spec")]
    UnknownSpec(String),
    /// Exponential warps are only defined for strictly positive ranges.
    #[error("cannot use exponential warp with a minimum <= 0 (got {min})")]
    ExponentialMinimum { min: f32 },
}
