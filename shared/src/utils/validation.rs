//! Identifier format validation for OTP delivery targets

use once_cell::sync::Lazy;
use regex::Regex;

/// Longest email address accepted, in characters
pub const MAX_EMAIL_LENGTH: usize = 255;

// <local>@<domain>.<tld>, no whitespace and a single '@' per part
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

// Optional '+', then 10-15 digits with a non-zero leading digit
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[1-9]\d{9,14}$").expect("phone pattern is valid")
});

/// Check if an email address is acceptable as an OTP target
pub fn is_valid_email(email: &str) -> bool {
    email.chars().count() <= MAX_EMAIL_LENGTH && EMAIL_REGEX.is_match(email)
}

/// Check if a phone number is acceptable as an OTP target (E.164-like)
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.co.in"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("user @example.com"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_email_length_limit() {
        let local = "a".repeat(MAX_EMAIL_LENGTH - "@example.com".len());
        let at_limit = format!("{}@example.com", local);
        assert_eq!(at_limit.len(), MAX_EMAIL_LENGTH);
        assert!(is_valid_email(&at_limit));

        let over_limit = format!("a{}", at_limit);
        assert!(!is_valid_email(&over_limit));
    }

    #[test]
    fn test_valid_phones() {
        assert!(is_valid_phone("+919876543210"));
        assert!(is_valid_phone("9876543210"));
        assert!(is_valid_phone("+123456789012345"));
    }

    #[test]
    fn test_invalid_phones() {
        assert!(!is_valid_phone("123"));
        assert!(!is_valid_phone("+0123456789"));
        assert!(!is_valid_phone("987654321")); // 9 digits
        assert!(!is_valid_phone("+1234567890123456")); // 16 digits
        assert!(!is_valid_phone("+91 98765 43210"));
        assert!(!is_valid_phone("++919876543210"));
    }
}
