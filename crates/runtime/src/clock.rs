//! Time source for the store and the driver.
//!
//! Core operations take `now` explicitly; the runtime reads it from a
//! [`Clock`]. [`TokioClock`] follows tokio's clock, so a paused test runtime
//! (`#[tokio::test(start_paused = true)]`) drives cooldowns in virtual time.
use std::time::Instant;

pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}
