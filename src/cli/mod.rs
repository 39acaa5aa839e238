//! CLI module for Keydash
//!
//! Provides subcommands for working with the key service:
//! - `dashboard`: live dashboard with countdowns (default)
//! - `list`, `generate`, `rename`, `revoke`, `copy`, `config`: one-shot operations

pub mod clipboard;
pub mod dashboard;
pub mod keys;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::domain::{ApiKeyId, DomainError};
use crate::infrastructure::api_key::KeyView;
use crate::infrastructure::logging;

/// Keydash - manage expiring API keys
#[derive(Parser)]
#[command(name = "keydash")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Key service base URL (overrides config)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the live dashboard (default)
    Dashboard,

    /// List active keys
    List(keys::ListArgs),

    /// Generate a new key
    Generate(keys::GenerateArgs),

    /// Rename a key
    Rename(keys::RenameArgs),

    /// Revoke a key
    Revoke(KeyArgs),

    /// Copy a key's secret to the clipboard
    Copy(KeyArgs),

    /// Show the key quota
    Config,
}

/// A key selected by full id or unique id prefix
#[derive(Args, Clone)]
pub struct KeyArgs {
    /// Key id, or a unique prefix of it
    pub id: String,
}

/// Load configuration and install logging
pub fn bootstrap(base_url: Option<&str>) -> AppConfig {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load().unwrap_or_default();
    if let Some(base_url) = base_url {
        config.service.base_url = base_url.to_string();
    }

    logging::init_logging(&config.logging);

    config
}

/// Resolve user input to a key id
///
/// An exact id wins, then a prefix matching exactly one live key. Anything else is
/// passed through as-is so the key service gets the final word.
pub fn resolve_key_id(input: &str, keys: &[KeyView]) -> Result<ApiKeyId, DomainError> {
    let input = input.trim();

    if let Some(view) = keys.iter().find(|view| view.key.id().as_str() == input) {
        return Ok(view.key.id().clone());
    }

    let mut matches = keys
        .iter()
        .filter(|view| !input.is_empty() && view.key.id().as_str().starts_with(input));

    match (matches.next(), matches.next()) {
        (Some(view), None) => Ok(view.key.id().clone()),
        (Some(_), Some(_)) => Err(DomainError::validation(format!(
            "Key id prefix '{}' matches more than one key",
            input
        ))),
        (None, _) => Ok(ApiKeyId::new(input)?),
    }
}
