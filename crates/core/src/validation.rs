//! Input validation for record creation.
//!
//! Validation runs before any readiness check or store access, so a
//! request with bad fields is rejected even while the store is still
//! starting up.

use validator::ValidateEmail;

use crate::error::CoreError;

/// Validate the fields of a new record.
///
/// Rules:
/// - `name` must be non-empty after trimming whitespace
/// - `email` must be non-empty after trimming whitespace
/// - `email` must be a syntactically valid email address
pub fn validate_new_record(name: &str, email: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("name must not be empty".into()));
    }

    let email = email.trim();
    if email.is_empty() {
        return Err(CoreError::Validation("email must not be empty".into()));
    }
    if !email.validate_email() {
        return Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_fields() {
        assert!(validate_new_record("Ada", "ada@x.io").is_ok());
    }

    #[test]
    fn rejects_empty_name() {
        let err = validate_new_record("", "ada@x.io").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn rejects_whitespace_only_name() {
        assert!(validate_new_record("   ", "ada@x.io").is_err());
    }

    #[test]
    fn rejects_empty_email() {
        assert!(validate_new_record("Ada", "").is_err());
        assert!(validate_new_record("Ada", "  ").is_err());
    }

    #[test]
    fn rejects_malformed_email() {
        assert!(validate_new_record("Ada", "not-an-email").is_err());
        assert!(validate_new_record("Ada", "@x.io").is_err());
    }

    #[test]
    fn trims_surrounding_whitespace_before_email_check() {
        assert!(validate_new_record("Ada", "  ada@x.io  ").is_ok());
    }
}
