use std::thread;
use std::time::{Duration, Instant};

/// Enforces a minimum interval between the starts of consecutive backend calls.
#[derive(Debug)]
pub struct Pacer {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl Pacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: None,
        }
    }

    /// Block until the next call may start, then record it. The first call
    /// never waits.
    pub fn wait_turn(&mut self) -> Duration {
        let mut waited = Duration::ZERO;
        if let Some(last) = self.last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                waited = self.min_interval - elapsed;
                thread::sleep(waited);
            }
        }
        self.last_call = Some(Instant::now());
        waited
    }
}
