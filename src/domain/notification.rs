//! Transient user-facing notifications

use std::time::Duration;

use serde::Serialize;

use super::DomainError;

/// How long a notification stays visible
pub const NOTIFICATION_LIFETIME: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// A single message shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub text: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NotificationKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NotificationKind::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }

    pub fn key_generated() -> Self {
        Self::success("New API Key generated successfully!")
    }

    pub fn key_revoked() -> Self {
        Self::success("API Key revoked.")
    }

    pub fn key_expired() -> Self {
        Self::success("API Key expired and was revoked.")
    }

    pub fn key_updated() -> Self {
        Self::success("API Key updated successfully!")
    }

    pub fn key_copied() -> Self {
        Self::success("API Key copied to clipboard!")
    }
}

impl From<&DomainError> for Notification {
    fn from(err: &DomainError) -> Self {
        Self::error(err.to_string())
    }
}
