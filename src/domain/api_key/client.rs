//! Remote key service contract

use async_trait::async_trait;
use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

use super::entity::{ApiKey, ApiKeyId};
use crate::domain::quota::QuotaConfig;
use crate::domain::DomainError;

/// Client for the remote service that issues, stores and expires keys
///
/// Every failure (non-2xx response, transport error, malformed body) is reported
/// as [`DomainError::RemoteRequestFailed`].
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KeyServiceClient: Send + Sync + Debug {
    /// List all live keys
    async fn list_keys(&self) -> Result<Vec<ApiKey>, DomainError>;

    /// Create a new key, optionally labelled
    async fn create_key(&self, name: Option<String>) -> Result<ApiKey, DomainError>;

    /// Rename a key, returning the server-confirmed record
    async fn update_key(&self, id: &ApiKeyId, name: &str) -> Result<ApiKey, DomainError>;

    /// Delete (revoke) a key
    async fn delete_key(&self, id: &ApiKeyId) -> Result<(), DomainError>;

    /// Fetch the quota configuration
    async fn get_config(&self) -> Result<QuotaConfig, DomainError>;
}
