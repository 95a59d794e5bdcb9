//! Shared validation utilities
//!
//! Common validation functions for input data across commands and queries.
//! Slugs are never validated here: they are generated, not accepted as
//! input (see the entries feature's slug module).

use thiserror::Error;

/// Errors that can occur during name validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameValidationError {
    #[error("Name is required and cannot be empty")]
    Required,

    #[error("Name must be between 1 and {max_length} characters")]
    TooLong { max_length: usize },
}

/// Errors that can occur during URL validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("{field_name} URL is invalid: must start with http:// or https://")]
    InvalidFormat { field_name: String },
}

/// Validate a name field
///
/// # Rules
/// - Must not be empty (after trimming whitespace)
/// - Must not exceed max_length characters
pub fn validate_name(name: &str, max_length: usize) -> Result<(), NameValidationError> {
    if name.trim().is_empty() {
        return Err(NameValidationError::Required);
    }

    if name.len() > max_length {
        return Err(NameValidationError::TooLong { max_length });
    }

    Ok(())
}

/// Validate a URL field
///
/// Empty strings are considered valid; use `Option<String>` and check
/// for `Some` when the field is required.
pub fn validate_url(url: &str, field_name: &str) -> Result<(), UrlValidationError> {
    if url.is_empty() {
        return Ok(());
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(UrlValidationError::InvalidFormat {
            field_name: field_name.to_string(),
        });
    }

    Ok(())
}

/// Validate an optional URL field
pub fn validate_optional_url(
    url: Option<&str>,
    field_name: &str,
) -> Result<(), UrlValidationError> {
    if let Some(url) = url {
        validate_url(url, field_name)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_valid() {
        assert!(validate_name("Chartered Surveyor", 256).is_ok());
        assert!(validate_name("a", 256).is_ok());
    }

    #[test]
    fn test_validate_name_empty() {
        assert_eq!(validate_name("", 256), Err(NameValidationError::Required));
        assert_eq!(validate_name("   ", 256), Err(NameValidationError::Required));
    }

    #[test]
    fn test_validate_name_too_long() {
        let long_name = "a".repeat(257);
        assert_eq!(
            validate_name(&long_name, 256),
            Err(NameValidationError::TooLong { max_length: 256 })
        );
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com", "legislation").is_ok());
        assert!(validate_url("http://example.com/path", "legislation").is_ok());
        assert!(validate_url("", "legislation").is_ok());
        assert!(validate_url("ftp://example.com", "legislation").is_err());
        assert!(validate_url("example.com", "legislation").is_err());
    }

    #[test]
    fn test_validate_optional_url() {
        assert!(validate_optional_url(None, "registration").is_ok());
        assert!(validate_optional_url(Some("https://example.com"), "registration").is_ok());
        assert!(validate_optional_url(Some("invalid"), "registration").is_err());
    }
}
