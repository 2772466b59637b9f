//! Numeric parsing for spreadsheet cells.

use thiserror::Error;

/// Why a cell could not be read as a number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseNumberError {
    #[error("empty cell")]
    Empty,
    #[error("'{0}' is not a number")]
    Invalid(String),
    #[error("'{0}' is not a finite number")]
    NonFinite(String),
}

/// Parses a weight or result cell into an `f64`.
///
/// Whitespace around the value is ignored. A lone `,` is accepted as the
/// decimal separator when the value contains no `.`, so `1,5` reads as `1.5`.
///
/// # Errors
///
/// Returns an error for empty input, text that is not a number, and
/// `NaN`/infinite values.
pub fn parse_numeric(raw: &str) -> Result<f64, ParseNumberError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseNumberError::Empty);
    }

    let normalized = if !trimmed.contains('.') && trimmed.matches(',').count() == 1 {
        trimmed.replace(',', ".")
    } else {
        trimmed.to_string()
    };

    let value: f64 = normalized
        .parse()
        .map_err(|_| ParseNumberError::Invalid(raw.to_string()))?;

    if !value.is_finite() {
        return Err(ParseNumberError::NonFinite(raw.to_string()));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_numeric("2"), Ok(2.0));
        assert_eq!(parse_numeric("0.5"), Ok(0.5));
        assert_eq!(parse_numeric("-1.25"), Ok(-1.25));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_numeric("  3 "), Ok(3.0));
    }

    #[test]
    fn test_parse_decimal_comma() {
        assert_eq!(parse_numeric("1,5"), Ok(1.5));
    }

    #[test]
    fn test_parse_rejects_ambiguous_separators() {
        assert!(parse_numeric("1,000.5").is_err());
        assert!(parse_numeric("1,2,3").is_err());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse_numeric(""), Err(ParseNumberError::Empty));
        assert_eq!(parse_numeric("   "), Err(ParseNumberError::Empty));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(
            parse_numeric("x"),
            Err(ParseNumberError::Invalid("x".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        assert!(matches!(parse_numeric("NaN"), Err(ParseNumberError::NonFinite(_))));
        assert!(matches!(parse_numeric("inf"), Err(ParseNumberError::NonFinite(_))));
    }
}
