//! Platform abstraction layer
//!
//! Browser/native-neutral pieces the frame driver feeds into the session:
//! - Time: timestamps to per-frame deltas
//! - Input: key events to held logical actions

pub mod clock;
pub mod input;

pub use clock::FrameClock;
pub use input::{Action, InputState};
