use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when raw income text cannot be used for a calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IncomeParseError {
    /// The field was empty or whitespace-only.
    #[error("income is required")]
    Empty,

    /// The text is not a finite number.
    #[error("invalid income '{input}': {reason}")]
    Invalid { input: String, reason: String },

    /// A finite number that a `Decimal` cannot hold: magnitude at or above
    /// about 7.9e28, or more than 28 fractional digits.
    #[error("income '{input}' is outside the supported range")]
    OutOfRange { input: String },
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_income_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses raw income text into a [`Decimal`].
///
/// Accepts plain decimals (`"50000"`, `"1234.56"`), comma thousands
/// separators (`"1,234.56"`) and scientific notation (`"5e4"`).
/// Empty input is rejected rather than coerced to zero.
pub fn parse_income(s: &str) -> Result<Decimal, IncomeParseError> {
    let normalized = normalize_income_input(s);
    if normalized.is_empty() {
        return Err(IncomeParseError::Empty);
    }

    let parsed = if normalized.contains(['e', 'E']) {
        Decimal::from_scientific(&normalized)
    } else {
        normalized.parse::<Decimal>()
    };

    parsed.map_err(|e| {
        tracing::debug!(input = %s, "invalid income: {}", e);
        if normalized.parse::<f64>().is_ok_and(f64::is_finite) {
            return IncomeParseError::OutOfRange {
                input: s.to_string(),
            };
        }
        IncomeParseError::Invalid {
            input: s.to_string(),
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_income_whole_number() {
        assert_eq!(parse_income("50000"), Ok(dec!(50000)));
    }

    #[test]
    fn parse_income_accepts_comma_thousands_separator() {
        assert_eq!(parse_income("1,234.56"), Ok(dec!(1234.56)));
        assert_eq!(parse_income("1,234,567.89"), Ok(dec!(1234567.89)));
    }

    #[test]
    fn parse_income_trims_whitespace() {
        assert_eq!(parse_income("  123.45  "), Ok(dec!(123.45)));
    }

    #[test]
    fn parse_income_accepts_scientific_notation() {
        assert_eq!(parse_income("5e4"), Ok(dec!(50000)));
    }

    #[test]
    fn parse_income_zero() {
        assert_eq!(parse_income("0"), Ok(Decimal::ZERO));
    }

    #[test]
    fn parse_income_empty_is_rejected() {
        assert_eq!(parse_income(""), Err(IncomeParseError::Empty));
        assert_eq!(parse_income("   "), Err(IncomeParseError::Empty));
    }

    #[test]
    fn parse_income_invalid_keeps_raw_input() {
        let result = parse_income("abc");

        assert!(matches!(
            result,
            Err(IncomeParseError::Invalid { ref input, .. }) if input == "abc"
        ));
    }

    #[test]
    fn parse_income_rejects_nan_and_infinity() {
        assert!(matches!(parse_income("NaN"), Err(IncomeParseError::Invalid { .. })));
        assert!(matches!(parse_income("Infinity"), Err(IncomeParseError::Invalid { .. })));
    }

    #[test]
    fn parse_income_reports_numbers_beyond_decimal_range() {
        for input in ["1e29", "1e40", "-1e40"] {
            assert_eq!(
                parse_income(input),
                Err(IncomeParseError::OutOfRange {
                    input: input.to_string()
                }),
                "input: {input}"
            );
        }
    }
}
