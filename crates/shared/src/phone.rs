//! Phone number normalization to E.164.
//!
//! The SMS provider addresses subscribers by E.164 number, so every phone
//! number is normalized once at the system boundary and stored in that form.

use thiserror::Error;

/// US country code prepended to bare 10-digit numbers.
const COUNTRY_CODE: &str = "1";

/// Error returned when a phone number cannot be normalized.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhoneError {
    #[error("Phone number must contain exactly 10 digits, got {0}")]
    InvalidLength(usize),
}

/// Normalizes a free-form US phone number to E.164 (`+1XXXXXXXXXX`).
///
/// Strips every non-digit character, accepts exactly 10 digits or 11 digits
/// with a leading `1`, and prefixes the country code. Numbers that already
/// carry the leading `1` are not double-prefixed.
pub fn normalize_phone(raw: &str) -> Result<String, PhoneError> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    let national = match digits.len() {
        10 => digits.as_str(),
        11 if digits.starts_with(COUNTRY_CODE) => &digits[1..],
        _ => return Err(PhoneError::InvalidLength(digits.len())),
    };

    Ok(format!("+{}{}", COUNTRY_CODE, national))
}

/// Returns true if the string is already a normalized E.164 US number.
pub fn is_normalized(phone: &str) -> bool {
    phone.len() == 12
        && phone.starts_with("+1")
        && phone[1..].chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bare_digits() {
        assert_eq!(normalize_phone("5551234567").unwrap(), "+15551234567");
    }

    #[test]
    fn test_normalize_formatted_number() {
        assert_eq!(normalize_phone("(555) 123-4567").unwrap(), "+15551234567");
        assert_eq!(normalize_phone("555.123.4567").unwrap(), "+15551234567");
        assert_eq!(normalize_phone("555 123 4567").unwrap(), "+15551234567");
    }

    #[test]
    fn test_normalize_with_country_code() {
        // Leading "1" must not be double-prefixed
        assert_eq!(normalize_phone("15551234567").unwrap(), "+15551234567");
        assert_eq!(normalize_phone("+1 555 123 4567").unwrap(), "+15551234567");
    }

    #[test]
    fn test_normalize_too_short() {
        assert_eq!(
            normalize_phone("555123"),
            Err(PhoneError::InvalidLength(6))
        );
    }

    #[test]
    fn test_normalize_too_long() {
        assert_eq!(
            normalize_phone("555123456789"),
            Err(PhoneError::InvalidLength(12))
        );
    }

    #[test]
    fn test_normalize_eleven_digits_without_leading_one() {
        assert_eq!(
            normalize_phone("25551234567"),
            Err(PhoneError::InvalidLength(11))
        );
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_phone(""), Err(PhoneError::InvalidLength(0)));
        assert_eq!(normalize_phone("abc"), Err(PhoneError::InvalidLength(0)));
    }

    #[test]
    fn test_is_normalized() {
        assert!(is_normalized("+15551234567"));
        assert!(!is_normalized("5551234567"));
        assert!(!is_normalized("+25551234567x"));
        assert!(!is_normalized("+1555123456"));
    }
}
