//! Domain layer - Core types and contracts

pub mod api_key;
pub mod countdown;
pub mod error;
pub mod notification;
pub mod quota;

pub use api_key::{
    validate_api_key_id, validate_key_name, ApiKey, ApiKeyId, ApiKeyValidationError,
    KeyServiceClient,
};
pub use countdown::{
    format_remaining, Clock, Countdown, CountdownState, ManualClock, SystemClock, EXPIRED_LABEL,
};
pub use error::DomainError;
pub use notification::{Notification, NotificationKind, NOTIFICATION_LIFETIME};
pub use quota::QuotaConfig;
