//! Common validation utilities.

use validator::ValidationError;

use crate::phone::normalize_phone;

/// Maximum nickname length accepted on invitations.
const MAX_NICKNAME_LENGTH: usize = 50;

/// Validates that a phone number can be normalized to E.164.
pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    match normalize_phone(phone) {
        Ok(_) => Ok(()),
        Err(_) => {
            let mut err = ValidationError::new("phone_format");
            err.message = Some("Phone number must contain 10 digits".into());
            Err(err)
        }
    }
}

/// Validates an optional nickname (non-empty after trimming, bounded length).
pub fn validate_nickname(nickname: &str) -> Result<(), ValidationError> {
    let trimmed = nickname.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("nickname_empty");
        err.message = Some("Nickname cannot be blank".into());
        return Err(err);
    }
    if trimmed.len() > MAX_NICKNAME_LENGTH {
        let mut err = ValidationError::new("nickname_length");
        err.message = Some("Nickname must be 50 characters or fewer".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone_number() {
        assert!(validate_phone_number("5551234567").is_ok());
        assert!(validate_phone_number("(555) 123-4567").is_ok());
        assert!(validate_phone_number("+15551234567").is_ok());
        assert!(validate_phone_number("12345").is_err());
        assert!(validate_phone_number("").is_err());
    }

    #[test]
    fn test_validate_phone_number_error_message() {
        let err = validate_phone_number("123").unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Phone number must contain 10 digits"
        );
    }

    #[test]
    fn test_validate_nickname() {
        assert!(validate_nickname("Alex").is_ok());
        assert!(validate_nickname("  Alex  ").is_ok());
        assert!(validate_nickname("   ").is_err());
        assert!(validate_nickname(&"x".repeat(51)).is_err());
        assert!(validate_nickname(&"x".repeat(50)).is_ok());
    }
}
