//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Delta-scaled movement, deltas clamped before use
//! - Seeded RNG only
//! - Stable iteration order (creation order)
//! - No rendering or platform dependencies

pub mod animation;
pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use animation::FrameAnimation;
pub use collision::Aabb;
pub use spawn::SpawnTimer;
pub use state::{
    Bullet, Enemy, EntityStore, Explosion, Facing, GameEvent, Player, Simulation, Snapshot,
};
pub use tick::{TickInput, clamp_delta};
