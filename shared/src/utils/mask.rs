//! Masking of identifiers before they reach logs

/// Keep a short prefix of an email or phone number and hide the rest,
/// e.g. `use***` for `user@example.com`.
pub fn mask_identifier(identifier: &str) -> String {
    let prefix: String = identifier.chars().take(3).collect();
    if identifier.chars().count() <= 3 {
        return "***".to_string();
    }
    format!("{}***", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_identifier() {
        assert_eq!(mask_identifier("user@example.com"), "use***");
        assert_eq!(mask_identifier("+919876543210"), "+91***");
        assert_eq!(mask_identifier("ab"), "***");
        assert_eq!(mask_identifier(""), "***");
    }

    #[test]
    fn test_mask_handles_multibyte() {
        assert_eq!(mask_identifier("ñandú@example.com"), "ñan***");
    }
}
