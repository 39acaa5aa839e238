use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("API limit reached. You can only have {max_keys} active keys.")]
    QuotaExceeded { max_keys: u32 },

    #[error("{message}")]
    RemoteRequestFailed { message: String },

    #[error("Error loading data from server")]
    LoadFailed { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl DomainError {
    pub fn quota_exceeded(max_keys: u32) -> Self {
        Self::QuotaExceeded { max_keys }
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Self::RemoteRequestFailed {
            message: message.into(),
        }
    }

    /// Non-2xx response without a usable `error` field in the body
    pub fn http_status(status: u16) -> Self {
        Self::remote(format!("HTTP error! status: {}", status))
    }

    pub fn load_failed(message: impl Into<String>) -> Self {
        Self::LoadFailed {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_exceeded_error() {
        let error = DomainError::quota_exceeded(2);
        assert_eq!(
            error.to_string(),
            "API limit reached. You can only have 2 active keys."
        );
    }

    #[test]
    fn test_remote_error_uses_server_message() {
        let error = DomainError::remote("API Key not found or already inactive");
        assert_eq!(error.to_string(), "API Key not found or already inactive");
    }

    #[test]
    fn test_http_status_error() {
        let error = DomainError::http_status(500);
        assert_eq!(error.to_string(), "HTTP error! status: 500");
    }

    #[test]
    fn test_load_failed_keeps_cause() {
        let error = DomainError::load_failed("connection refused");
        assert_eq!(error.to_string(), "Error loading data from server");

        match error {
            DomainError::LoadFailed { message } => assert_eq!(message, "connection refused"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Key name cannot be empty");
        assert_eq!(error.to_string(), "Validation error: Key name cannot be empty");
    }
}
