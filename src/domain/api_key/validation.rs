//! API Key validation utilities

use thiserror::Error;

/// Errors that can occur during API key validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiKeyValidationError {
    #[error("API key ID cannot be empty")]
    EmptyId,

    #[error("API key name cannot be empty")]
    EmptyName,

    #[error("API key name exceeds maximum length of {0} characters")]
    NameTooLong(usize),
}

impl From<ApiKeyValidationError> for crate::domain::DomainError {
    fn from(err: ApiKeyValidationError) -> Self {
        Self::validation(err.to_string())
    }
}

const MAX_API_KEY_NAME_LENGTH: usize = 100;

/// Validate an API key ID
///
/// Ids are opaque strings assigned by the key service; the only rule is that an id
/// is not empty. Anything else is percent-encoded when it becomes a path segment.
pub fn validate_api_key_id(id: &str) -> Result<(), ApiKeyValidationError> {
    if id.is_empty() {
        return Err(ApiKeyValidationError::EmptyId);
    }

    Ok(())
}

/// Validate and normalize a display name for a rename
///
/// Returns the trimmed name.
pub fn validate_key_name(name: &str) -> Result<&str, ApiKeyValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ApiKeyValidationError::EmptyName);
    }

    if trimmed.chars().count() > MAX_API_KEY_NAME_LENGTH {
        return Err(ApiKeyValidationError::NameTooLong(MAX_API_KEY_NAME_LENGTH));
    }

    Ok(trimmed)
}
