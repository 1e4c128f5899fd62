//! Game state and core simulation types
//!
//! Everything the renderer reads and everything a restart resets lives here.
//! Collections are kept in creation order, which is also draw order.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::animation::FrameAnimation;
use super::collision::Aabb;
use super::spawn::SpawnTimer;
use crate::tuning::{Arena, Tuning, TuningError};

/// Which way the ship is banking this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Idle,
    Right,
}

impl Facing {
    /// Column in the player sprite strip (left, idle, right)
    pub fn sprite_frame(self) -> u32 {
        match self {
            Facing::Left => 0,
            Facing::Idle => 1,
            Facing::Right => 2,
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per millisecond
    pub speed: f32,
    pub facing: Facing,
    /// Firing is allowed only when this reaches zero
    pub fire_cooldown_ms: f32,
    pub lives: u8,
    /// Remaining grace period; hits are ignored while positive
    pub invincible_ms: f32,
}

impl Player {
    /// Canonical start: horizontally centred, one margin above the floor
    pub fn new(tuning: &Tuning, arena: Arena) -> Self {
        let size = Vec2::new(tuning.player_width, tuning.player_height);
        Self {
            pos: Vec2::new(
                (arena.width - size.x) / 2.0,
                arena.height - size.y - tuning.player_bottom_margin,
            ),
            size,
            speed: tuning.player_speed,
            facing: Facing::Idle,
            fire_cooldown_ms: 0.0,
            lives: tuning.starting_lives,
            invincible_ms: 0.0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ms > 0.0
    }

    pub fn can_fire(&self) -> bool {
        self.fire_cooldown_ms <= 0.0
    }

    /// Where a new bullet of `bullet_size` starts: centred, at the ship's top edge
    pub fn muzzle(&self, bullet_size: Vec2) -> Vec2 {
        Vec2::new(
            self.pos.x + self.size.x / 2.0 - bullet_size.x / 2.0,
            self.pos.y,
        )
    }
}

/// A player projectile; always travels up the screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Bullet {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A descending enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Downward pixels per millisecond
    pub speed: f32,
    pub anim: FrameAnimation,
}

impl Enemy {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Cosmetic burst left where an enemy died
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub anim: FrameAnimation,
}

/// Live entities, owned by a single [`Simulation`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStore {
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub explosions: Vec<Explosion>,
    next_id: u32,
}

impl EntityStore {
    pub fn new(tuning: &Tuning, arena: Arena) -> Self {
        Self {
            player: Player::new(tuning, arena),
            bullets: Vec::new(),
            enemies: Vec::new(),
            explosions: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn_bullet(&mut self, pos: Vec2, size: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.bullets.push(Bullet { id, pos, size });
        id
    }

    pub fn spawn_enemy(&mut self, pos: Vec2, size: Vec2, speed: f32) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy {
            id,
            pos,
            size,
            speed,
            anim: FrameAnimation::new(),
        });
        id
    }

    pub fn spawn_explosion(&mut self, pos: Vec2, size: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.explosions.push(Explosion {
            id,
            pos,
            size,
            anim: FrameAnimation::new(),
        });
        id
    }
}

/// Gameplay events produced by the most recent step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemyDestroyed { id: u32, points: u32 },
    EnemyEscaped { id: u32 },
    PlayerHit { lives_left: u8 },
    GameOver { score: u32 },
}

/// Read-only view handed to the renderer and HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub store: EntityStore,
    pub score: u32,
    pub lives: u8,
    pub game_over: bool,
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct Simulation {
    pub tuning: Tuning,
    pub arena: Arena,
    /// Run seed; restarts reseed from it
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub store: EntityStore,
    pub spawner: SpawnTimer,
    pub score: u32,
    pub game_over: bool,
    /// Mutating steps taken since the last reset
    pub time_ticks: u64,
    pub events: Vec<GameEvent>,
}

impl Simulation {
    /// Create a fresh simulation; fails only on unusable tuning or arena
    pub fn new(tuning: Tuning, arena: Arena, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        tuning.validate_arena(arena)?;
        Ok(Self {
            store: EntityStore::new(&tuning, arena),
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            arena,
            seed,
            spawner: SpawnTimer::new(),
            score: 0,
            game_over: false,
            time_ticks: 0,
            events: Vec::new(),
        })
    }

    /// Return to the exact state `new` produced
    pub fn reset(&mut self) {
        self.store = EntityStore::new(&self.tuning, self.arena);
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.spawner.reset();
        self.score = 0;
        self.game_over = false;
        self.time_ticks = 0;
        self.events.clear();
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            store: self.store.clone(),
            score: self.score,
            lives: self.store.player.lives,
            game_over: self.game_over,
        }
    }

    /// Speed for the next spawn: random base plus the score ramp, capped
    fn roll_enemy_speed(&mut self) -> f32 {
        let base = self
            .rng
            .random_range(self.tuning.enemy_speed_min..=self.tuning.enemy_speed_max);
        let steps = (self.score / self.tuning.ramp_score_step) as f32;
        (base + steps * self.tuning.enemy_speed_ramp).min(self.tuning.enemy_speed_cap)
    }

    /// Spawn one enemy just above the arena at a uniformly random column
    pub fn spawn_enemy_at_random_x(&mut self) -> u32 {
        let size = Vec2::new(self.tuning.enemy_width, self.tuning.enemy_height);
        let max_x = self.arena.width - size.x;
        let x = self.rng.random_range(0.0..=max_x);
        let speed = self.roll_enemy_speed();
        let id = self.store.spawn_enemy(Vec2::new(x, -size.y), size, speed);
        log::trace!("Spawned enemy {} at x={:.1} speed={:.3}", id, x, speed);
        id
    }
}
