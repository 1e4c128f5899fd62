//! Downfall - a vertical arcade shooter core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, animation, collisions, scoring)
//! - `session`: Menu / playing / game-over orchestration and frame-loop control
//! - `platform`: Frame clock and logical input state
//! - `tuning`: Data-driven game balance

pub mod platform;
pub mod session;
pub mod sim;
pub mod tuning;

pub use session::{FrameControl, GameSession, SessionPhase};
pub use sim::{Simulation, Snapshot, TickInput};
pub use tuning::{Arena, Tuning, TuningError};

/// Host frame-driver constants
pub mod consts {
    /// Nominal frame length for headless runs (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Seed used when the host does not supply one
    pub const DEFAULT_SEED: u64 = 0x5EED_CAFE;
}
