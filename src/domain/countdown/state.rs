//! One-shot countdown state machine and remaining-time formatting

const MILLIS_PER_DAY: i64 = 86_400_000;
const MILLIS_PER_HOUR: i64 = 3_600_000;
const MILLIS_PER_MINUTE: i64 = 60_000;
const MILLIS_PER_SECOND: i64 = 1_000;

/// Terminal display value
pub const EXPIRED_LABEL: &str = "Expired";

const PENDING_LABEL: &str = "--";

/// Observable state of a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    /// Created but not observed yet
    Pending,
    /// Time is still left
    Running { remaining_ms: i64 },
    /// Terminal; never left once entered
    Expired,
}

impl CountdownState {
    /// Milliseconds left, `None` before the first observation
    pub fn remaining_millis(&self) -> Option<i64> {
        match self {
            Self::Pending => None,
            Self::Running { remaining_ms } => Some(*remaining_ms),
            Self::Expired => Some(0),
        }
    }

    /// Human-readable remaining time
    pub fn display(&self) -> String {
        match self {
            Self::Pending => PENDING_LABEL.to_string(),
            Self::Running { remaining_ms } => format_remaining(*remaining_ms),
            Self::Expired => EXPIRED_LABEL.to_string(),
        }
    }
}

/// Countdown towards a fixed expiration instant
///
/// [`Countdown::observe`] reports the crossing of the expiration instant exactly
/// once. After that the countdown is terminal and ignores the clock entirely, so a
/// clock that moves backwards cannot revive it.
#[derive(Debug, Clone)]
pub struct Countdown {
    expires_at: i64,
    state: CountdownState,
}

impl Countdown {
    pub fn new(expires_at: i64) -> Self {
        Self {
            expires_at,
            state: CountdownState::Pending,
        }
    }

    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn is_expired(&self) -> bool {
        self.state == CountdownState::Expired
    }

    /// Recompute the remaining time at `now_millis`
    ///
    /// Returns `true` only for the observation that moves the countdown into the
    /// expired state.
    pub fn observe(&mut self, now_millis: i64) -> bool {
        if self.is_expired() {
            return false;
        }

        let remaining_ms = self.expires_at.saturating_sub(now_millis);
        if remaining_ms <= 0 {
            self.state = CountdownState::Expired;
            true
        } else {
            self.state = CountdownState::Running { remaining_ms };
            false
        }
    }

    /// Milliseconds left as of the last observation
    pub fn remaining_millis(&self) -> Option<i64> {
        self.state.remaining_millis()
    }

    /// Human-readable remaining time as of the last observation
    pub fn display(&self) -> String {
        self.state.display()
    }
}

/// Format a remaining duration
///
/// `"{d}d {hh}h {mm}m"` while at least one whole day is left, otherwise
/// `"{hh}h {mm}m {ss}s"`; zero or negative durations are `"Expired"`.
pub fn format_remaining(remaining_ms: i64) -> String {
    if remaining_ms <= 0 {
        return EXPIRED_LABEL.to_string();
    }

    let days = remaining_ms / MILLIS_PER_DAY;
    let hours = (remaining_ms % MILLIS_PER_DAY) / MILLIS_PER_HOUR;
    let minutes = (remaining_ms % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE;
    let seconds = (remaining_ms % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND;

    if days > 0 {
        format!("{}d {:02}h {:02}m", days, hours, minutes)
    } else {
        format!("{:02}h {:02}m {:02}s", hours, minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_with_days_drops_seconds() {
        let ms = 15 * MILLIS_PER_DAY;
        assert_eq!(format_remaining(ms), "15d 00h 00m");

        let ms = 2 * MILLIS_PER_DAY + 3 * MILLIS_PER_HOUR + 4 * MILLIS_PER_MINUTE + 59_999;
        assert_eq!(format_remaining(ms), "2d 03h 04m");
    }

    #[test]
    fn test_format_below_one_day() {
        let ms = 23 * MILLIS_PER_HOUR + 59 * MILLIS_PER_MINUTE + 59 * MILLIS_PER_SECOND + 999;
        assert_eq!(format_remaining(ms), "23h 59m 59s");

        assert_eq!(format_remaining(61_000), "00h 01m 01s");
    }

    #[test]
    fn test_format_sub_second_floors_to_zero() {
        assert_eq!(format_remaining(999), "00h 00m 00s");
    }

    #[test]
    fn test_format_non_positive_is_expired() {
        assert_eq!(format_remaining(0), EXPIRED_LABEL);
        assert_eq!(format_remaining(-5_000), EXPIRED_LABEL);
    }

    #[test]
    fn test_observe_past_instant_fires_once() {
        let mut countdown = Countdown::new(1_000);

        assert!(countdown.observe(5_000));
        assert!(countdown.is_expired());
        assert_eq!(countdown.display(), EXPIRED_LABEL);

        assert!(!countdown.observe(6_000));
        assert!(!countdown.observe(7_000));
    }

    #[test]
    fn test_observe_crossing_fires_once() {
        let mut countdown = Countdown::new(3_000);

        assert!(!countdown.observe(0));
        assert_eq!(
            countdown.state(),
            CountdownState::Running { remaining_ms: 3_000 }
        );
        assert_eq!(countdown.display(), "00h 00m 03s");

        assert!(!countdown.observe(2_000));
        assert!(countdown.observe(3_000));
        assert!(!countdown.observe(4_000));
        assert_eq!(countdown.remaining_millis(), Some(0));
    }

    #[test]
    fn test_expired_is_terminal_even_if_clock_goes_back() {
        let mut countdown = Countdown::new(3_000);

        assert!(countdown.observe(3_500));
        assert!(!countdown.observe(0));
        assert!(countdown.is_expired());
        assert_eq!(countdown.display(), EXPIRED_LABEL);
    }

    #[test]
    fn test_pending_has_no_remaining() {
        let countdown = Countdown::new(3_000);
        assert_eq!(countdown.state(), CountdownState::Pending);
        assert_eq!(countdown.remaining_millis(), None);
        assert_eq!(countdown.display(), "--");
    }
}
