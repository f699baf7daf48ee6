//! Common utility functions for cost calculations.
//!
//! This module provides shared functionality used by every domain cost
//! function: input parsing, rounding and fixed two-decimal formatting.

use rust_decimal::{Decimal, RoundingStrategy};

use super::ValidationError;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use estimate_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats a value fixed to two decimal places, without digit grouping.
///
/// ```
/// use rust_decimal_macros::dec;
/// use estimate_core::calculations::common::format_fixed2;
///
/// assert_eq!(format_fixed2(dec!(5400)), "5400.00");
/// assert_eq!(format_fixed2(dec!(0.005)), "0.01");
/// ```
pub fn format_fixed2(value: Decimal) -> String {
    let mut rounded = round_half_up(value);
    rounded.rescale(2);
    rounded.to_string()
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a required numeric form field.
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`).
/// Empty input is reported as [`ValidationError::Required`].
pub fn parse_decimal(
    field: &'static str,
    s: &str,
) -> Result<Decimal, ValidationError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Err(ValidationError::Required(field));
    }
    normalized.parse().map_err(|e| {
        tracing::debug!(field, input = %s, "invalid decimal: {}", e);
        ValidationError::NotANumber {
            field,
            input: s.to_string(),
        }
    })
}

/// Parses a numeric field that must be strictly greater than zero.
pub fn parse_positive(
    field: &'static str,
    s: &str,
) -> Result<Decimal, ValidationError> {
    let value = parse_decimal(field, s)?;
    if value <= Decimal::ZERO {
        return Err(ValidationError::NotPositive { field, value });
    }
    Ok(value)
}

/// Parses a non-negative whole count. Empty input counts as zero.
pub fn parse_count(
    field: &'static str,
    s: &str,
) -> Result<u32, ValidationError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    let not_a_number = || ValidationError::NotANumber {
        field,
        input: s.to_string(),
    };
    match trimmed.parse::<i64>() {
        Ok(n) if n < 0 => Err(ValidationError::Negative {
            field,
            value: Decimal::from(n),
        }),
        Ok(n) => u32::try_from(n).map_err(|_| not_a_number()),
        Err(_) => Err(not_a_number()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        let result = round_half_up(dec!(123.454));

        assert_eq!(result, dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        let result = round_half_up(dec!(123.455));

        assert_eq!(result, dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_large_values() {
        let result = round_half_up(dec!(999999.999));

        assert_eq!(result, dec!(1000000.00));
    }

    // =========================================================================
    // format_fixed2 tests
    // =========================================================================

    #[test]
    fn format_fixed2_pads_whole_numbers() {
        assert_eq!(format_fixed2(dec!(0)), "0.00");
        assert_eq!(format_fixed2(dec!(35000)), "35000.00");
    }

    #[test]
    fn format_fixed2_rounds_extra_places() {
        assert_eq!(format_fixed2(dec!(1.2345)), "1.23");
        assert_eq!(format_fixed2(dec!(1.235)), "1.24");
    }

    #[test]
    fn format_fixed2_has_no_grouping() {
        assert_eq!(format_fixed2(dec!(1234567.8)), "1234567.80");
    }

    // =========================================================================
    // parsing tests
    // =========================================================================

    #[test]
    fn parse_decimal_accepts_comma_thousands_separator() {
        assert_eq!(parse_decimal("area", "1,234.56").unwrap(), dec!(1234.56));
    }

    #[test]
    fn parse_decimal_trims_whitespace() {
        assert_eq!(parse_decimal("area", "  123.45  ").unwrap(), dec!(123.45));
    }

    #[test]
    fn parse_decimal_empty_is_required_error() {
        assert_eq!(
            parse_decimal("area", "   "),
            Err(ValidationError::Required("area"))
        );
    }

    #[test]
    fn parse_decimal_invalid_returns_error() {
        assert_eq!(
            parse_decimal("area", "abc"),
            Err(ValidationError::NotANumber {
                field: "area",
                input: "abc".to_string(),
            })
        );
    }

    #[test]
    fn parse_positive_rejects_zero_and_negative() {
        assert_eq!(
            parse_positive("area", "0"),
            Err(ValidationError::NotPositive {
                field: "area",
                value: dec!(0),
            })
        );
        assert_eq!(
            parse_positive("area", "-5"),
            Err(ValidationError::NotPositive {
                field: "area",
                value: dec!(-5),
            })
        );
    }

    #[test]
    fn parse_count_handles_empty_negative_and_garbage() {
        assert_eq!(parse_count("count", ""), Ok(0));
        assert_eq!(parse_count("count", " 4 "), Ok(4));
        assert_eq!(
            parse_count("count", "-2"),
            Err(ValidationError::Negative {
                field: "count",
                value: dec!(-2),
            })
        );
        assert!(matches!(
            parse_count("count", "2.5"),
            Err(ValidationError::NotANumber { .. })
        ));
    }
}
