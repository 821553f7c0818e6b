//! General conversion functions and utilities.

/// Calculate how many decimals a step size implies when displaying a value quantized to it,
/// i.e. the smallest precision that still renders the step exactly. We'll perform some rounding
/// to ignore spurious extra precision caused by the floating point quantization.
pub fn decimals_from_step_size(step_size: f32) -> usize {
    const SCALE: f32 = 1_000_000.0; // 10.0f32.powi(f32::DIGITS as i32)
    let step_size = (step_size * SCALE).round() / SCALE;

    for decimals in 0..f32::DIGITS as i32 {
        let scaled = step_size * 10.0f32.powi(decimals);
        if scaled >= 1.0 && (scaled - scaled.round()).abs() < 1e-6 {
            return decimals as usize;
        }
    }

    f32::DIGITS as usize
}

/// The smallest step that still distinguishes values at `precision` decimals. Substituted for a
/// zero step so quantization never divides by zero.
#[inline]
pub fn step_for_precision(precision: usize) -> f32 {
    10.0f32.powi(-(precision as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_steps_have_no_decimals() {
        assert_eq!(decimals_from_step_size(1.0), 0);
        assert_eq!(decimals_from_step_size(5.0), 0);
    }

    #[test]
    fn fractional_steps() {
        assert_eq!(decimals_from_step_size(0.1), 1);
        assert_eq!(decimals_from_step_size(0.25), 2);
        assert_eq!(decimals_from_step_size(0.05), 2);
        assert_eq!(decimals_from_step_size(0.001), 3);
    }

    #[test]
    fn steps_from_precision() {
        assert_eq!(step_for_precision(0), 1.0);
        assert_eq!(step_for_precision(3), 0.001);
    }
}
