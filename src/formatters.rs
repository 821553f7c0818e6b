//! Convenience functions for formatting and parsing control values in common formats.

use std::sync::Arc;

/// Fixed-width space glyph (U+2002, en space) used for padding when the consumer asked for
/// non-collapsing whitespace, e.g. vertical layouts where regular spaces would collapse.
pub const FIXED_WIDTH_SPACE: char = '\u{2002}';

/// The smallest workable display width. Narrower configurations are widened to this.
const MIN_CHARACTERS: usize = 3;
/// Display width used when the configured width is zero.
const DEFAULT_CHARACTERS: usize = 8;

/// Format a value as a right-aligned string of exactly `num_characters` characters, using up to
/// `max_precision` fractional digits. The precision is reduced, never increased, as the integer
/// part grows wider, so the total width stays put. When `show_sign` is set one leading
/// character is reserved for the sign so positive and negative values line up; configure it
/// whenever the control's range allows negative values.
///
/// The width guarantee holds for every value whose integer part fits the character budget,
/// which is always the case for widths auto-sized from a control's range. Wider values are
/// returned unpadded rather than truncated.
pub fn fixed_width(
    num_characters: usize,
    max_precision: usize,
    show_sign: bool,
    non_collapsing: bool,
) -> Arc<dyn Fn(f32) -> String + Send + Sync> {
    let pad = if non_collapsing {
        FIXED_WIDTH_SPACE
    } else {
        ' '
    };
    let num_characters = if num_characters == 0 {
        DEFAULT_CHARACTERS
    } else {
        num_characters.max(MIN_CHARACTERS)
    };
    // One column is reserved for the sign so the digits always line up
    let digit_budget = if show_sign {
        num_characters - 1
    } else {
        num_characters
    };

    Arc::new(move |value| {
        let magnitude = value.abs();

        // Drop decimals until the digits fit the budget. Rounding happens at the final
        // precision, so a 9.97 that rounds up to 10 is measured at its rounded width.
        let mut precision = max_precision;
        let mut digits = format!("{magnitude:.precision$}");
        while precision > 0 && digits.len() > digit_budget {
            precision -= 1;
            digits = format!("{magnitude:.precision$}");
        }
        if digits.len() > digit_budget {
            ctl_debug_assert_failure!(
                "{} does not fit in {} characters",
                value,
                num_characters
            );
        }

        let mut out = String::with_capacity(num_characters + 4);
        if show_sign {
            out.push(if value < 0.0 { '-' } else { pad });
        }
        for _ in digits.len()..digit_budget {
            out.push(pad);
        }
        out.push_str(&digits);
        out
    })
}

/// Parse a string produced by [`fixed_width()`] (or any plain numeric input) back into a value.
/// Ignores regular and fixed-width padding anywhere in the input, since the sign column places
/// padding between the sign and the digits. Returns a `None` for input that does not parse, in
/// which case the control update should be canceled.
pub fn from_fixed_width() -> Arc<dyn Fn(&str) -> Option<f32> + Send + Sync> {
    Arc::new(|string| {
        let digits: String = string
            .chars()
            .filter(|c| *c != ' ' && *c != FIXED_WIDTH_SPACE)
            .collect();
        digits.parse().ok()
    })
}
