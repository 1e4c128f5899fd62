//! Time-driven sprite frame animation

use serde::{Deserialize, Serialize};

/// Frame index into a sprite strip plus the time spent on the current frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameAnimation {
    pub frame: u32,
    pub elapsed_ms: f32,
}

impl FrameAnimation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance a cycling animation; `frame` stays in `[0, frame_count)`
    pub fn advance_looping(&mut self, dt: f32, frame_duration: f32, frame_count: u32) {
        self.elapsed_ms += dt;
        while self.elapsed_ms >= frame_duration {
            self.elapsed_ms -= frame_duration;
            self.frame = (self.frame + 1) % frame_count;
        }
    }

    /// Advance a one-shot animation; `frame` saturates at `frame_count`, which marks it finished
    pub fn advance_once(&mut self, dt: f32, frame_duration: f32, frame_count: u32) {
        if self.frame >= frame_count {
            return;
        }
        self.elapsed_ms += dt;
        while self.elapsed_ms >= frame_duration && self.frame < frame_count {
            self.elapsed_ms -= frame_duration;
            self.frame += 1;
        }
    }

    pub fn is_finished(&self, frame_count: u32) -> bool {
        self.frame >= frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looping_wraps_modulo_frame_count() {
        let mut anim = FrameAnimation::new();
        for _ in 0..6 {
            anim.advance_looping(100.0, 100.0, 5);
        }
        assert_eq!(anim.frame, 1);
        assert_eq!(anim.elapsed_ms, 0.0);
    }

    #[test]
    fn partial_frame_time_is_carried() {
        let mut anim = FrameAnimation::new();
        anim.advance_looping(60.0, 100.0, 5);
        assert_eq!(anim.frame, 0);
        anim.advance_looping(60.0, 100.0, 5);
        assert_eq!(anim.frame, 1);
        assert!((anim.elapsed_ms - 20.0).abs() < 1e-4);
    }

    #[test]
    fn one_shot_stops_at_frame_count() {
        let mut anim = FrameAnimation::new();
        anim.advance_once(250.0, 100.0, 3);
        assert_eq!(anim.frame, 2);
        assert!(!anim.is_finished(3));
        anim.advance_once(1000.0, 100.0, 3);
        assert_eq!(anim.frame, 3);
        assert!(anim.is_finished(3));
        anim.advance_once(1000.0, 100.0, 3);
        assert_eq!(anim.frame, 3);
    }
}
