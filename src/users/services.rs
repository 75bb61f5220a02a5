use lazy_static::lazy_static;
use regex::Regex;

use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_USERNAME_LEN: usize = 50;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    email.len() <= 100 && EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn validate_username(username: &str) -> Result<(), AppError> {
    if username.is_empty() {
        return Err(AppError::bad_request("Username is required"));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(AppError::bad_request("Username too long"));
    }
    Ok(())
}

pub(crate) fn validate_email(email: &str) -> Result<(), AppError> {
    if !is_valid_email(email) {
        return Err(AppError::bad_request("Invalid email"));
    }
    Ok(())
}

pub(crate) fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request("Password too short"));
    }
    Ok(())
}

/// Column widths of the optional profile fields.
pub const MAX_NAME_LEN: usize = 50;
pub const MAX_PHONE_LEN: usize = 15;

pub(crate) fn validate_optional_len(field: &str, value: Option<&str>, max: usize) -> Result<(), AppError> {
    match value {
        Some(v) if v.chars().count() > max => {
            Err(AppError::bad_request(format!("{field} too long")))
        }
        _ => Ok(()),
    }
}

/// Blank optional profile fields are stored as NULL.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@x.com"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("no at sign.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn username_rules() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username(&"x".repeat(MAX_USERNAME_LEN + 1)).is_err());
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("secret123").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn optional_field_lengths() {
        assert!(validate_optional_len("phone_number", None, MAX_PHONE_LEN).is_ok());
        assert!(validate_optional_len("phone_number", Some("555-0100"), MAX_PHONE_LEN).is_ok());
        let err = validate_optional_len("phone_number", Some("1234567890123456"), MAX_PHONE_LEN)
            .unwrap_err();
        assert_eq!(err.to_string(), "phone_number too long");
    }

    #[test]
    fn blank_fields_become_none() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" Ada ".into())), Some("Ada".into()));
        assert_eq!(non_blank(None), None);
    }
}
