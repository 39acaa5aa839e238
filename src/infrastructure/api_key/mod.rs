//! API Key infrastructure implementations
//!
//! This module provides the HTTP client for the remote key service and the
//! controller that keeps the local key collection in sync with it.

mod controller;
mod http_client;

pub use controller::{KeyListController, KeyView};
pub use http_client::HttpKeyServiceClient;
