// src/hal/std_clock.rs

use crate::common::Clock;
use std::time::{Duration, Instant};

/// Wall clock backed by `std::time::Instant` and `std::thread::sleep`.
#[derive(Debug, Default, Copy, Clone)]
pub struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
