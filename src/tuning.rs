//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. Time is in milliseconds and
//! speeds are pixels per millisecond. A JSON document only needs to name the
//! constants it overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Visible play area in pixels (the canvas size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    /// Gap between the player's bottom edge and the arena floor
    pub player_bottom_margin: f32,
    pub player_speed: f32,
    pub fire_cooldown_ms: f32,
    pub starting_lives: u8,
    /// Grace period after losing a life
    pub invincibility_ms: f32,

    // === Bullets ===
    pub bullet_width: f32,
    pub bullet_height: f32,
    pub bullet_speed: f32,

    // === Enemies ===
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub enemy_speed_min: f32,
    pub enemy_speed_max: f32,
    /// Extra speed granted per `ramp_score_step` points of score
    pub enemy_speed_ramp: f32,
    pub ramp_score_step: u32,
    /// Hard ceiling for ramped enemy speed
    pub enemy_speed_cap: f32,
    pub enemy_frames: u32,
    pub spawn_interval_ms: f32,

    // === Explosions ===
    pub explosion_frames: u32,

    // === Shared ===
    pub frame_duration_ms: f32,
    pub kill_score: u32,
    /// Deltas above this are clamped (backgrounded tab, debugger pause)
    pub max_delta_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_width: 64.0,
            player_height: 64.0,
            player_bottom_margin: 56.0,
            player_speed: 0.36,
            fire_cooldown_ms: 250.0,
            starting_lives: 3,
            invincibility_ms: 2000.0,

            bullet_width: 6.0,
            bullet_height: 12.0,
            bullet_speed: 0.6,

            enemy_width: 64.0,
            enemy_height: 64.0,
            enemy_speed_min: 0.12,
            enemy_speed_max: 0.24,
            enemy_speed_ramp: 0.01,
            ramp_score_step: 100,
            enemy_speed_cap: 0.48,
            enemy_frames: 5,
            spawn_interval_ms: 800.0,

            explosion_frames: 3,

            frame_duration_ms: 100.0,
            kill_score: 10,
            max_delta_ms: 100.0,
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: "must be a positive number",
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: "must be zero or positive",
        })
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON document over the defaults and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check every constant is usable
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("player_width", self.player_width)?;
        positive("player_height", self.player_height)?;
        non_negative("player_bottom_margin", self.player_bottom_margin)?;
        positive("player_speed", self.player_speed)?;
        non_negative("fire_cooldown_ms", self.fire_cooldown_ms)?;
        non_negative("invincibility_ms", self.invincibility_ms)?;
        positive("bullet_width", self.bullet_width)?;
        positive("bullet_height", self.bullet_height)?;
        positive("bullet_speed", self.bullet_speed)?;
        positive("enemy_width", self.enemy_width)?;
        positive("enemy_height", self.enemy_height)?;
        positive("enemy_speed_min", self.enemy_speed_min)?;
        positive("enemy_speed_max", self.enemy_speed_max)?;
        non_negative("enemy_speed_ramp", self.enemy_speed_ramp)?;
        positive("enemy_speed_cap", self.enemy_speed_cap)?;
        positive("spawn_interval_ms", self.spawn_interval_ms)?;
        positive("frame_duration_ms", self.frame_duration_ms)?;
        positive("max_delta_ms", self.max_delta_ms)?;

        if self.enemy_speed_min > self.enemy_speed_max {
            return Err(TuningError::Invalid {
                field: "enemy_speed_min",
                reason: "must not exceed enemy_speed_max",
            });
        }
        if self.enemy_speed_cap < self.enemy_speed_max {
            return Err(TuningError::Invalid {
                field: "enemy_speed_cap",
                reason: "must be at least enemy_speed_max",
            });
        }
        if self.starting_lives == 0 {
            return Err(TuningError::Invalid {
                field: "starting_lives",
                reason: "must be at least 1",
            });
        }
        if self.ramp_score_step == 0 {
            return Err(TuningError::Invalid {
                field: "ramp_score_step",
                reason: "must be at least 1",
            });
        }
        if self.enemy_frames == 0 {
            return Err(TuningError::Invalid {
                field: "enemy_frames",
                reason: "must be at least 1",
            });
        }
        if self.explosion_frames == 0 {
            return Err(TuningError::Invalid {
                field: "explosion_frames",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Check the arena can hold the player and a spawned enemy side by side with the walls
    pub fn validate_arena(&self, arena: Arena) -> Result<(), TuningError> {
        positive("arena.width", arena.width)?;
        positive("arena.height", arena.height)?;
        if arena.width < self.player_width {
            return Err(TuningError::Invalid {
                field: "arena.width",
                reason: "narrower than the player",
            });
        }
        if arena.width < self.enemy_width {
            return Err(TuningError::Invalid {
                field: "arena.width",
                reason: "narrower than an enemy",
            });
        }
        if arena.height < self.player_height + self.player_bottom_margin {
            return Err(TuningError::Invalid {
                field: "arena.height",
                reason: "shorter than the player row",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert!(tuning.validate_arena(Arena::default()).is_ok());
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let tuning = Tuning::from_json(r#"{ "kill_score": 25, "starting_lives": 1 }"#).unwrap();
        assert_eq!(tuning.kill_score, 25);
        assert_eq!(tuning.starting_lives, 1);
        assert_eq!(tuning.player_speed, Tuning::default().player_speed);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Tuning::from_json("{ kill_score: }").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn rejects_inverted_speed_range() {
        let err = Tuning::from_json(r#"{ "enemy_speed_min": 0.5, "enemy_speed_max": 0.2 }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "enemy_speed_min",
                ..
            }
        ));
    }

    #[test]
    fn rejects_zero_frames_and_lives() {
        let tuning = Tuning {
            enemy_frames: 0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());

        let tuning = Tuning {
            starting_lives: 0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn rejects_non_finite_speed() {
        let tuning = Tuning {
            bullet_speed: f32::NAN,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn rejects_arena_narrower_than_player() {
        let tuning = Tuning::default();
        let err = tuning.validate_arena(Arena::new(32.0, 600.0)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid tuning value `arena.width`: narrower than the player"
        );
    }
}
