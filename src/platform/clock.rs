//! Frame clock
//!
//! Turns the host's monotonic frame timestamps (milliseconds, as passed to
//! `requestAnimationFrame` callbacks) into per-frame deltas.

/// Delta source for the simulation
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous timestamp; the next tick reports a zero delta
    pub fn start(&mut self) {
        self.last_ms = None;
    }

    /// Milliseconds since the previous tick, never negative
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        match self.last_ms {
            None => {
                self.last_ms = Some(now_ms);
                0.0
            }
            Some(last) if now_ms >= last => {
                self.last_ms = Some(now_ms);
                (now_ms - last) as f32
            }
            // Timestamp went backwards; hold the newest one we have seen
            Some(_) => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_after_start_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(1000.0), 0.0);
        assert_eq!(clock.tick(1016.0), 16.0);
    }

    #[test]
    fn restart_discards_the_gap() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        clock.tick(16.0);
        clock.start();
        assert_eq!(clock.tick(90_000.0), 0.0);
        assert_eq!(clock.tick(90_020.0), 20.0);
    }

    #[test]
    fn backwards_timestamp_yields_zero() {
        let mut clock = FrameClock::new();
        clock.tick(500.0);
        assert_eq!(clock.tick(400.0), 0.0);
        assert_eq!(clock.tick(510.0), 10.0);
    }
}
