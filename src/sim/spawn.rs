//! Fixed-interval enemy spawn timer

use serde::{Deserialize, Serialize};

/// Elapsed-time accumulator that fires once per full interval
///
/// The remainder is kept after each firing so long runs do not drift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnTimer {
    pub accumulator_ms: f32,
}

impl SpawnTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate `dt` and return how many spawns are due
    pub fn advance(&mut self, dt: f32, interval: f32) -> u32 {
        self.accumulator_ms += dt;
        let mut due = 0;
        while self.accumulator_ms >= interval {
            self.accumulator_ms -= interval;
            due += 1;
        }
        due
    }

    pub fn reset(&mut self) {
        self.accumulator_ms = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_interval() {
        let mut timer = SpawnTimer::new();
        let fired: u32 = (0..100).map(|_| timer.advance(16.0, 800.0)).sum();
        // 1600 ms elapsed
        assert_eq!(fired, 2);
        assert_eq!(timer.accumulator_ms, 0.0);
    }

    #[test]
    fn keeps_remainder_instead_of_zeroing() {
        let mut timer = SpawnTimer::new();
        assert_eq!(timer.advance(900.0, 800.0), 1);
        assert_eq!(timer.accumulator_ms, 100.0);
        assert_eq!(timer.advance(700.0, 800.0), 1);
        assert_eq!(timer.accumulator_ms, 0.0);
    }

    #[test]
    fn large_step_spawns_every_elapsed_interval() {
        let mut timer = SpawnTimer::new();
        assert_eq!(timer.advance(250.0, 100.0), 2);
        timer.reset();
        assert_eq!(timer.accumulator_ms, 0.0);
    }
}
