//! API Key entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_api_key_id, ApiKeyValidationError};

/// Name shown for keys the service returned without a label
pub const DEFAULT_DISPLAY_NAME: &str = "API Key";

/// API Key identifier, assigned by the key service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiKeyId(String);

impl ApiKeyId {
    /// Create a new ApiKeyId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, ApiKeyValidationError> {
        let id = id.into();
        validate_api_key_id(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading segment of the id (before the first hyphen), used for compact display
    pub fn short(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }
}

impl TryFrom<String> for ApiKeyId {
    type Error = ApiKeyValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ApiKeyId> for String {
    fn from(id: ApiKeyId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ApiKeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// API Key record as issued by the key service
///
/// Only `name` ever changes, and only through a confirmed rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    /// Unique identifier for the key
    id: ApiKeyId,
    /// The key material itself
    #[serde(rename = "key")]
    secret: String,
    /// Expiration instant in milliseconds since the Unix epoch
    #[serde(rename = "expirationDate")]
    expires_at: i64,
    /// Optional display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl ApiKey {
    /// Create a new API key record
    pub fn new(id: ApiKeyId, secret: impl Into<String>, expires_at: i64) -> Self {
        Self {
            id,
            secret: secret.into(),
            expires_at,
            name: None,
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn id(&self) -> &ApiKeyId {
        &self.id
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name to render, falling back to a generic label
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or(DEFAULT_DISPLAY_NAME)
    }

    /// Expiration as a UTC timestamp, if representable
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.expires_at)
    }
}
