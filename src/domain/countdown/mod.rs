//! Countdown domain
//!
//! Pure pieces of the per-key expiration countdown: the clock abstraction, the
//! one-shot state machine and the remaining-time formatter. Scheduling lives in
//! `infrastructure::countdown`.

mod clock;
mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use state::{format_remaining, Countdown, CountdownState, EXPIRED_LABEL};
