//! API Key domain
//!
//! Key records as issued by the remote key service, the client contract used to
//! reach that service, and the validation applied before any request is made.

mod client;
mod entity;
mod validation;

pub use client::KeyServiceClient;
#[cfg(test)]
pub use client::MockKeyServiceClient;
pub use entity::{ApiKey, ApiKeyId, DEFAULT_DISPLAY_NAME};
pub use validation::{validate_api_key_id, validate_key_name, ApiKeyValidationError};
