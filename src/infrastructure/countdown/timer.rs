//! Recurring countdown timer with a one-shot expiration callback

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, trace};

use crate::domain::{Clock, Countdown, CountdownState};

/// Recomputation period used by the dashboard
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Shortest accepted recomputation period; shorter ticks are raised to it
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Live countdown towards a key's expiration
///
/// Owns one tokio task that recomputes the remaining time every tick. The
/// expiration callback runs at most once per activation: synchronously inside
/// [`CountdownTimer::start`] when the instant has already passed, otherwise on the
/// first tick at or after it, after which the task ends. Dropping the timer aborts
/// the task, so a removed key never gets its callback invoked.
///
/// Must be started from within a tokio runtime.
pub struct CountdownTimer {
    expires_at: i64,
    clock: Arc<dyn Clock>,
    tick: Duration,
    state: watch::Receiver<CountdownState>,
    task: Option<JoinHandle<()>>,
}

impl CountdownTimer {
    /// Activate a countdown towards `expires_at` (epoch milliseconds)
    pub fn start<F>(expires_at: i64, clock: Arc<dyn Clock>, tick: Duration, on_expire: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let tick = tick.max(MIN_TICK_INTERVAL);
        let mut countdown = Countdown::new(expires_at);

        if countdown.observe(clock.now_millis()) {
            debug!("Countdown already expired at activation: expires_at={}", expires_at);
            let (_tx, state) = watch::channel(countdown.state());
            on_expire();

            return Self {
                expires_at,
                clock,
                tick,
                state,
                task: None,
            };
        }

        let (tx, state) = watch::channel(countdown.state());
        let task = tokio::spawn(run_countdown(
            countdown,
            Arc::clone(&clock),
            tick,
            tx,
            on_expire,
        ));

        Self {
            expires_at,
            clock,
            tick,
            state,
            task: Some(task),
        }
    }

    /// Re-arm the timer for a new instant with a fresh callback
    pub fn restart<F>(&mut self, expires_at: i64, on_expire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.stop();
        *self = Self::start(expires_at, Arc::clone(&self.clock), self.tick, on_expire);
    }

    /// Release the underlying task; the display freezes at its last value
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    pub fn state(&self) -> CountdownState {
        *self.state.borrow()
    }

    /// Remaining time formatted for display, `"Expired"` once terminal
    pub fn display(&self) -> String {
        self.state().display()
    }

    pub fn remaining_millis(&self) -> i64 {
        self.state().remaining_millis().unwrap_or(0)
    }

    pub fn is_expired(&self) -> bool {
        self.state() == CountdownState::Expired
    }

    /// Whether the recurring task is still scheduled
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for CountdownTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountdownTimer")
            .field("expires_at", &self.expires_at)
            .field("tick", &self.tick)
            .field("state", &self.state())
            .field("running", &self.is_running())
            .finish()
    }
}

async fn run_countdown<F>(
    mut countdown: Countdown,
    clock: Arc<dyn Clock>,
    tick: Duration,
    state: watch::Sender<CountdownState>,
    on_expire: F,
) where
    F: FnOnce() + Send + 'static,
{
    let mut interval = interval_at(Instant::now() + tick, tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        let crossed = countdown.observe(clock.now_millis());
        state.send_replace(countdown.state());
        trace!("Countdown tick: {}", countdown.display());

        if crossed {
            debug!("Countdown reached expiration: expires_at={}", countdown.expires_at());
            on_expire();
            return;
        }
    }
}
