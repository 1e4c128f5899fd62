//! Per-frame simulation step
//!
//! Advances every entity by one delta in a fixed order: player, bullets,
//! enemies, spawning, bullet hits, player hits, explosions. Removals are
//! collected during each pass and compacted after it, never mid-iteration.

use glam::Vec2;

use super::state::{Facing, GameEvent, Simulation};

/// Logical inputs held during a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub fire: bool,
    /// Consumed by the session, ignored by the step itself
    pub restart: bool,
}

/// Sanitize a frame delta: NaN and negatives become zero, stalls are capped
#[inline]
pub fn clamp_delta(delta_ms: f32, max_delta_ms: f32) -> f32 {
    if delta_ms.is_nan() {
        0.0
    } else {
        delta_ms.clamp(0.0, max_delta_ms)
    }
}

impl Simulation {
    /// Advance the simulation by `delta_ms`
    ///
    /// A no-op once the game is over; only [`Simulation::reset`] resumes it.
    pub fn step(&mut self, delta_ms: f32, input: &TickInput) {
        if self.game_over {
            return;
        }
        let dt = clamp_delta(delta_ms, self.tuning.max_delta_ms);

        self.events.clear();
        self.time_ticks += 1;

        self.update_player(dt, input);
        self.update_bullets(dt);
        self.update_enemies(dt);
        // An escape can end the game; nothing after that point runs
        if self.game_over {
            return;
        }
        self.spawn_due_enemies(dt);
        self.resolve_bullet_hits();
        self.resolve_player_hits();
        if self.game_over {
            return;
        }
        self.update_explosions(dt);
    }

    fn update_player(&mut self, dt: f32, input: &TickInput) {
        let bullet_size = Vec2::new(self.tuning.bullet_width, self.tuning.bullet_height);
        let max_x = self.arena.width - self.store.player.size.x;

        let player = &mut self.store.player;
        player.facing = match (input.move_left, input.move_right) {
            (true, false) => Facing::Left,
            (false, true) => Facing::Right,
            _ => Facing::Idle,
        };
        let vx = match player.facing {
            Facing::Left => -player.speed,
            Facing::Right => player.speed,
            Facing::Idle => 0.0,
        };
        player.pos.x = (player.pos.x + vx * dt).clamp(0.0, max_x);

        player.fire_cooldown_ms = (player.fire_cooldown_ms - dt).max(0.0);
        player.invincible_ms = (player.invincible_ms - dt).max(0.0);

        if input.fire && player.can_fire() {
            player.fire_cooldown_ms = self.tuning.fire_cooldown_ms;
            let origin = player.muzzle(bullet_size);
            self.store.spawn_bullet(origin, bullet_size);
        }
    }

    fn update_bullets(&mut self, dt: f32) {
        let dy = self.tuning.bullet_speed * dt;
        for bullet in &mut self.store.bullets {
            bullet.pos.y -= dy;
        }
        // Gone once fully above the top edge
        self.store.bullets.retain(|b| b.pos.y + b.size.y > 0.0);
    }

    fn update_enemies(&mut self, dt: f32) {
        let frame_duration = self.tuning.frame_duration_ms;
        let frame_count = self.tuning.enemy_frames;
        for enemy in &mut self.store.enemies {
            enemy.pos.y += enemy.speed * dt;
            enemy.anim.advance_looping(dt, frame_duration, frame_count);
        }

        let floor = self.arena.height;
        let mut escaped = Vec::new();
        self.store.enemies.retain(|e| {
            if e.pos.y > floor {
                escaped.push(e.id);
                false
            } else {
                true
            }
        });

        for id in escaped {
            if self.game_over {
                break;
            }
            log::debug!("Enemy {} escaped past the player", id);
            self.events.push(GameEvent::EnemyEscaped { id });
            self.damage_player();
        }
    }

    fn spawn_due_enemies(&mut self, dt: f32) {
        let due = self.spawner.advance(dt, self.tuning.spawn_interval_ms);
        for _ in 0..due {
            self.spawn_enemy_at_random_x();
        }
    }

    /// First overlapping enemy (creation order) wins; each bullet and enemy is consumed at most once
    fn resolve_bullet_hits(&mut self) {
        let mut spent_bullets: Vec<u32> = Vec::new();
        let mut killed: Vec<(u32, Vec2, Vec2)> = Vec::new();

        for bullet in &self.store.bullets {
            let bullet_box = bullet.bounds();
            let target = self.store.enemies.iter().find(|e| {
                !killed.iter().any(|(id, _, _)| *id == e.id) && bullet_box.overlaps(&e.bounds())
            });
            if let Some(enemy) = target {
                spent_bullets.push(bullet.id);
                killed.push((enemy.id, enemy.pos, enemy.size));
            }
        }

        if killed.is_empty() {
            return;
        }

        self.store.bullets.retain(|b| !spent_bullets.contains(&b.id));
        self.store
            .enemies
            .retain(|e| !killed.iter().any(|(id, _, _)| *id == e.id));

        let points = self.tuning.kill_score;
        for (id, pos, size) in killed {
            self.store.spawn_explosion(pos, size);
            self.score += points;
            self.events.push(GameEvent::EnemyDestroyed { id, points });
            log::debug!("Enemy {} destroyed, score {}", id, self.score);
        }
    }

    fn resolve_player_hits(&mut self) {
        if self.store.player.is_invincible() {
            return;
        }
        let player_box = self.store.player.bounds();
        let touching: Vec<(u32, Vec2, Vec2)> = self
            .store
            .enemies
            .iter()
            .filter(|e| player_box.overlaps(&e.bounds()))
            .map(|e| (e.id, e.pos, e.size))
            .collect();

        let mut rammed: Vec<u32> = Vec::new();
        for (id, pos, size) in touching {
            // A hit grants invincibility, which shields the rest of this pass
            if self.game_over || self.store.player.is_invincible() {
                break;
            }
            rammed.push(id);
            self.store.spawn_explosion(pos, size);
            log::debug!("Enemy {} rammed the player", id);
            self.damage_player();
        }

        if !rammed.is_empty() {
            self.store.enemies.retain(|e| !rammed.contains(&e.id));
        }
    }

    /// Cost the player a life unless shielded; the last life ends the game
    fn damage_player(&mut self) {
        let player = &mut self.store.player;
        if self.game_over || player.is_invincible() {
            return;
        }

        player.lives = player.lives.saturating_sub(1);
        let lives_left = player.lives;
        self.events.push(GameEvent::PlayerHit { lives_left });

        if lives_left == 0 {
            self.game_over = true;
            self.events.push(GameEvent::GameOver { score: self.score });
            log::info!("Game over with score {}", self.score);
        } else {
            player.invincible_ms = self.tuning.invincibility_ms;
            log::debug!("Player hit, {} lives left", lives_left);
        }
    }

    fn update_explosions(&mut self, dt: f32) {
        let frame_duration = self.tuning.frame_duration_ms;
        let frame_count = self.tuning.explosion_frames;
        for explosion in &mut self.store.explosions {
            explosion.anim.advance_once(dt, frame_duration, frame_count);
        }
        self.store
            .explosions
            .retain(|ex| !ex.anim.is_finished(frame_count));
    }
}
