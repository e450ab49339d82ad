//! Field-level validators shared across services.

use std::sync::LazyLock;

use common::Money;
use regex::Regex;

use crate::DomainError;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s\-()]+$").expect("phone regex"));

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(https?://)?([0-9a-z.-]+)\.([a-z.]{2,6})[/\w .-]*/?$").expect("url regex")
});

/// Rejects empty or whitespace-only strings.
pub fn non_blank(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidArgument(format!(
            "{field} must not be blank"
        )));
    }
    Ok(())
}

/// Rejects prices that are not strictly positive.
pub fn positive_price(field: &'static str, price: Money) -> Result<(), DomainError> {
    if !price.is_positive() {
        return Err(DomainError::InvalidArgument(format!(
            "{field} must be greater than 0"
        )));
    }
    Ok(())
}

/// Validates a signed quantity as non-negative and narrows it to `u32`.
///
/// Quantities arrive signed from the wire; a negative delta is an
/// `InvalidArgument`, never a silent wrap.
pub fn quantity(field: &'static str, value: i64) -> Result<u32, DomainError> {
    if value < 0 {
        return Err(DomainError::InvalidArgument(format!(
            "{field} must not be negative"
        )));
    }
    u32::try_from(value)
        .map_err(|_| DomainError::InvalidArgument(format!("{field} is out of range")))
}

/// Validates a phone number: digits with optional separators, at least
/// seven digits overall.
pub fn phone_number(number: &str) -> Result<(), DomainError> {
    let digits = number.chars().filter(char::is_ascii_digit).count();
    if !PHONE_RE.is_match(number.trim()) || digits < 7 {
        return Err(DomainError::InvalidArgument(format!(
            "invalid phone number format: {number}"
        )));
    }
    Ok(())
}

/// Validates a URL: optional scheme, a dotted host, optional path.
pub fn url(value: &str) -> Result<(), DomainError> {
    if !URL_RE.is_match(value.trim()) {
        return Err(DomainError::InvalidArgument(format!("invalid url: {value}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_blank_rejects_whitespace() {
        assert!(non_blank("name", "Ana").is_ok());
        assert!(non_blank("name", "").is_err());
        assert!(non_blank("name", "   ").is_err());
    }

    #[test]
    fn positive_price_rejects_zero_and_negative() {
        assert!(positive_price("price", Money::from_cents(1)).is_ok());
        assert!(positive_price("price", Money::zero()).is_err());
        assert!(positive_price("price", Money::from_cents(-5)).is_err());
    }

    #[test]
    fn quantity_narrows_and_rejects_negative() {
        assert_eq!(quantity("stock", 7).unwrap(), 7);
        assert_eq!(quantity("stock", 0).unwrap(), 0);
        let err = quantity("stock", -1).unwrap_err();
        assert_eq!(err.kind(), "invalid_argument");
    }

    #[test]
    fn phone_formats() {
        assert!(phone_number("+54 11 1234-5678").is_ok());
        assert!(phone_number("(011) 4321-8765").is_ok());
        assert!(phone_number("1234-5678").is_ok());
        assert!(phone_number("123").is_err());
        assert!(phone_number("call me maybe").is_err());
        assert!(phone_number("").is_err());
    }

    #[test]
    fn url_formats() {
        assert!(url("https://example.com/profile").is_ok());
        assert!(url("example.com").is_ok());
        assert!(url("not a url").is_err());
        assert!(url("").is_err());
    }
}
