//! # Numeric Coercion
//!
//! The one place where raw form text becomes a number.
//!
//! Form fields arrive as text. A field that is empty, absent or not a
//! number counts as `0`: it contributes nothing to weights or costs. This
//! is coercion, not validation. Whether a field is *required* is decided
//! in [`crate::validation`] before submission; the live costing preview
//! runs on whatever the user has typed so far.
//!
//! ## Coercion Table
//! ```text
//! "54"        → 54.0
//! " 12.5kg "  → 12.5     (leading numeric prefix)
//! ".5"        → 0.5
//! "1e3"       → 1000.0
//! ""          → 0.0
//! "abc"       → 0.0
//! "Infinity"  → 0.0      (non-finite never escapes)
//! ```

/// Coerces form text to a number, defaulting to `0.0`.
///
/// Reads the longest leading decimal literal (optional sign, digits,
/// fraction, exponent) after leading whitespace and ignores the rest.
///
/// ## Example
/// ```rust
/// use costing_core::numeric::to_number;
///
/// assert_eq!(to_number("120"), 120.0);
/// assert_eq!(to_number("45.75 rs"), 45.75);
/// assert_eq!(to_number(""), 0.0);
/// assert_eq!(to_number("n/a"), 0.0);
/// ```
pub fn to_number(raw: &str) -> f64 {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return 0.0;
    }

    // Exponent only counts when at least one digit follows it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    match text[..end].parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Rounds to a fixed number of decimal places. Non-finite input becomes `0.0`.
///
/// ## Example
/// ```rust
/// use costing_core::numeric::round_to;
///
/// assert_eq!(round_to(3.214_285_714, 3), 3.214);
/// assert_eq!(round_to(2.5, 0), 3.0);
/// ```
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Rounds a weight in kg to the 3 decimals used for display and storage.
#[inline]
pub fn round_weight(kg: f64) -> f64 {
    round_to(kg, crate::WEIGHT_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(to_number("54"), 54.0);
        assert_eq!(to_number("1.45"), 1.45);
        assert_eq!(to_number("-2"), -2.0);
        assert_eq!(to_number("+7"), 7.0);
    }

    #[test]
    fn test_leading_prefix_only() {
        assert_eq!(to_number("  12.5kg"), 12.5);
        assert_eq!(to_number("40s"), 40.0);
        assert_eq!(to_number("5."), 5.0);
        assert_eq!(to_number(".5"), 0.5);
        assert_eq!(to_number("1.2.3"), 1.2);
    }

    #[test]
    fn test_exponent() {
        assert_eq!(to_number("1e3"), 1000.0);
        assert_eq!(to_number("2.5E-1"), 0.25);
        // Dangling exponent marker is ignored
        assert_eq!(to_number("3e"), 3.0);
        assert_eq!(to_number("3e+"), 3.0);
    }

    #[test]
    fn test_garbage_is_zero() {
        assert_eq!(to_number(""), 0.0);
        assert_eq!(to_number("   "), 0.0);
        assert_eq!(to_number("abc"), 0.0);
        assert_eq!(to_number("-"), 0.0);
        assert_eq!(to_number("."), 0.0);
        assert_eq!(to_number("NaN"), 0.0);
        assert_eq!(to_number("Infinity"), 0.0);
    }

    #[test]
    fn test_overflowing_literal_is_zero() {
        assert_eq!(to_number("1e999"), 0.0);
    }


    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2.571_428_571_428_571_6, 3), 2.571);
        assert_eq!(round_to(5.592_857_142_857_143, 3), 5.593);
        assert_eq!(round_to(f64::NAN, 2), 0.0);
        assert_eq!(round_weight(3.214_285_714_285_714_4), 3.214);
    }
}
