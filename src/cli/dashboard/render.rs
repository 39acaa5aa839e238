//! Plain-text rendering of the dashboard

use crate::domain::{ApiKey, Notification, NotificationKind, QuotaConfig};
use crate::infrastructure::api_key::KeyView;

/// Urgency of a key's countdown, for highlighting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Normal,
    ExpiringSoon,
    Expired,
}

pub fn urgency(view: &KeyView, expiring_soon_ms: i64) -> Urgency {
    if view.expired {
        Urgency::Expired
    } else if view.remaining_ms < expiring_soon_ms {
        Urgency::ExpiringSoon
    } else {
        Urgency::Normal
    }
}

pub fn render_notification(notification: &Notification) -> String {
    let marker = match notification.kind {
        NotificationKind::Success => "✔",
        NotificationKind::Error => "✖",
    };
    format!("{} {}", marker, notification.text)
}

/// One card per key
pub fn render_key(view: &KeyView, expiring_soon_ms: i64) -> String {
    let marker = match urgency(view, expiring_soon_ms) {
        Urgency::Normal => "",
        Urgency::ExpiringSoon => "  [expiring soon]",
        Urgency::Expired => "  [expired]",
    };

    format!(
        "┌ {}  (ID: {})\n│ {}\n└ Expires in: {}{}\n",
        view.key.display_name(),
        view.key.id().short(),
        view.key.secret(),
        view.remaining,
        marker
    )
}

pub fn render_quota(live: usize, quota: &QuotaConfig) -> String {
    format!("Active Keys ({}/{})", live, quota.max_keys)
}

pub fn render_dashboard(
    keys: &[KeyView],
    quota: &QuotaConfig,
    notification: Option<&Notification>,
    expiring_soon_ms: i64,
) -> String {
    let mut out = String::new();

    if let Some(notification) = notification {
        out.push_str(&render_notification(notification));
        out.push_str("\n\n");
    }

    out.push_str("Your Secure API Keys\n");
    out.push_str(&format!(
        "Each key is valid for {} days. You can have up to {} active keys at a time.\n",
        quota.expiration_days, quota.max_keys
    ));
    if !quota.allows_another(keys.len()) {
        out.push_str("Key limit reached: revoke a key to generate a new one.\n");
    }
    out.push_str(&format!("\n{}\n\n", render_quota(keys.len(), quota)));

    if keys.is_empty() {
        out.push_str("No Active API Keys\nRun `generate` to get started.\n");
    } else {
        for view in keys {
            out.push_str(&render_key(view, expiring_soon_ms));
            out.push('\n');
        }
    }

    out
}

/// Calendar expiration of a key, for the one-shot listing
pub fn render_expiry_date(key: &ApiKey) -> String {
    match key.expires_at_utc() {
        Some(at) => format!("Expires on: {}", at.format("%Y-%m-%d %H:%M UTC")),
        None => "Expires on: unknown".to_string(),
    }
}
