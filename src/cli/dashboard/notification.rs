//! Single-slot notification display

use std::time::Duration;

use tokio::time::Instant;

use crate::domain::{Notification, NOTIFICATION_LIFETIME};

/// Holds at most one notification; a new one replaces the current one at once
#[derive(Debug)]
pub struct NotificationBoard {
    lifetime: Duration,
    current: Option<(Notification, Instant)>,
}

impl Default for NotificationBoard {
    fn default() -> Self {
        Self::new(NOTIFICATION_LIFETIME)
    }
}

impl NotificationBoard {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            current: None,
        }
    }

    pub fn show(&mut self, notification: Notification) {
        self.current = Some((notification, Instant::now()));
    }

    /// The visible notification, if its lifetime has not run out
    pub fn current(&mut self) -> Option<&Notification> {
        if let Some((_, shown_at)) = &self.current {
            if shown_at.elapsed() >= self.lifetime {
                self.current = None;
            }
        }

        self.current.as_ref().map(|(notification, _)| notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_notification_hides_after_lifetime() {
        let mut board = NotificationBoard::default();
        board.show(Notification::key_revoked());

        tokio::time::advance(Duration::from_millis(2_999)).await;
        assert_eq!(board.current(), Some(&Notification::key_revoked()));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(board.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_notification_replaces_current() {
        let mut board = NotificationBoard::default();
        board.show(Notification::key_generated());

        tokio::time::advance(Duration::from_millis(2_000)).await;
        board.show(Notification::error("HTTP error! status: 500"));

        assert_eq!(
            board.current().map(|n| n.text.as_str()),
            Some("HTTP error! status: 500")
        );

        // Lifetime restarts with the replacement
        tokio::time::advance(Duration::from_millis(2_000)).await;
        assert!(board.current().is_some());

        tokio::time::advance(Duration::from_millis(1_000)).await;
        assert!(board.current().is_none());
    }

    #[test]
    fn test_empty_board() {
        let mut board = NotificationBoard::new(Duration::from_secs(3));
        assert!(board.current().is_none());
    }
}
