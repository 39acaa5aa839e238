//! Countdown timer infrastructure
//!
//! Drives [`crate::domain::Countdown`] on a tokio interval, one task per live key.

mod timer;

pub use timer::{CountdownTimer, DEFAULT_TICK_INTERVAL, MIN_TICK_INTERVAL};
