//! Keydash - API key dashboard
//!
//! A client for a remote API key service with support for:
//! - Listing, generating, renaming, copying and revoking keys
//! - Client-side quota enforcement ahead of the service's own checks
//! - Per-key expiration countdowns that revoke keys when they run out

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::DomainError;
use infrastructure::api_key::{HttpKeyServiceClient, KeyListController};

/// Build the HTTP-backed controller described by `config`
pub fn create_controller(
    config: &AppConfig,
) -> Result<KeyListController<HttpKeyServiceClient>, DomainError> {
    let client = match config.service.timeout() {
        Some(timeout) => HttpKeyServiceClient::with_timeout(&config.service.base_url, timeout)?,
        None => HttpKeyServiceClient::new(&config.service.base_url),
    };

    Ok(KeyListController::new(Arc::new(client))
        .with_tick_interval(config.dashboard.tick_interval()))
}
