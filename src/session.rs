//! Session orchestration
//!
//! Decides when the simulation runs at all. The host arms its per-frame
//! callback only while [`GameSession::on_frame`] answers
//! [`FrameControl::Continue`], and re-arms it when a transition method
//! returns `true`.

use crate::platform::{Action, FrameClock, InputState};
use crate::sim::Simulation;

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Before the first game
    Menu,
    Playing,
    /// Frozen mid-game (window blur, explicit pause)
    Paused,
    /// Final frame stays on screen until a restart
    GameOver,
}

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Stop,
}

/// One player's game: simulation, clock and held input
#[derive(Debug, Clone)]
pub struct GameSession {
    sim: Simulation,
    clock: FrameClock,
    input: InputState,
    phase: SessionPhase,
}

impl GameSession {
    pub fn new(sim: Simulation) -> Self {
        Self {
            sim,
            clock: FrameClock::new(),
            input: InputState::new(),
            phase: SessionPhase::Menu,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Begin a fresh game from the menu or after game over
    ///
    /// Returns `true` when the host must start its frame loop.
    pub fn start(&mut self) -> bool {
        match self.phase {
            SessionPhase::Playing | SessionPhase::Paused => false,
            SessionPhase::Menu | SessionPhase::GameOver => {
                let restarting = self.phase == SessionPhase::GameOver;
                self.sim.reset();
                self.clock.start();
                self.phase = SessionPhase::Playing;
                if restarting {
                    log::info!("Game restarted with seed {}", self.sim.seed);
                } else {
                    log::info!("Game started with seed {}", self.sim.seed);
                }
                true
            }
        }
    }

    /// Record a press or release; a restart press after game over starts a new game
    ///
    /// Returns `true` when the host must start its frame loop.
    pub fn handle_action(&mut self, action: Action, held: bool) -> bool {
        self.input.set(action, held);
        if held && action == Action::Restart && self.phase == SessionPhase::GameOver {
            return self.start();
        }
        false
    }

    /// Pointer tap: starts a game from the menu or after game over
    ///
    /// Returns `true` when the host must start its frame loop.
    pub fn tap(&mut self) -> bool {
        match self.phase {
            SessionPhase::Menu | SessionPhase::GameOver => self.start(),
            SessionPhase::Playing | SessionPhase::Paused => false,
        }
    }

    pub fn pause(&mut self) {
        if self.phase == SessionPhase::Playing {
            self.phase = SessionPhase::Paused;
            self.input.release_all();
            log::info!("Paused");
        }
    }

    /// Returns `true` when the host must restart its frame loop
    pub fn resume(&mut self) -> bool {
        if self.phase != SessionPhase::Paused {
            return false;
        }
        // The paused interval is not simulated
        self.clock.start();
        self.phase = SessionPhase::Playing;
        log::info!("Resumed");
        true
    }

    /// Run one frame at host timestamp `now_ms`
    pub fn on_frame(&mut self, now_ms: f64) -> FrameControl {
        if self.phase != SessionPhase::Playing {
            return FrameControl::Stop;
        }

        let delta = self.clock.tick(now_ms);
        let input = self.input.tick_input();
        self.sim.step(delta, &input);

        if self.sim.is_game_over() {
            self.phase = SessionPhase::GameOver;
            log::info!(
                "Session over after {} ticks, score {}",
                self.sim.time_ticks,
                self.sim.score()
            );
            return FrameControl::Stop;
        }
        FrameControl::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{Arena, Tuning};
    use glam::Vec2;

    fn session() -> GameSession {
        let tuning = Tuning {
            starting_lives: 1,
            spawn_interval_ms: 1.0e9,
            ..Default::default()
        };
        GameSession::new(Simulation::new(tuning, Arena::new(800.0, 600.0), 77).unwrap())
    }

    /// Drop an enemy onto the ship so the next frame ends the game
    fn doom(session: &mut GameSession) {
        let store = &mut session.simulation_mut().store;
        let pos = store.player.pos;
        store.spawn_enemy(pos, Vec2::new(16.0, 16.0), 0.0001);
    }

    #[test]
    fn menu_does_not_simulate() {
        let mut session = session();
        assert_eq!(session.phase(), SessionPhase::Menu);
        assert_eq!(session.on_frame(16.0), FrameControl::Stop);
        assert_eq!(session.simulation().time_ticks, 0);
    }

    #[test]
    fn start_enters_playing_and_runs_frames() {
        let mut session = session();
        assert!(session.start());
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert!(!session.start());

        assert_eq!(session.on_frame(1000.0), FrameControl::Continue);
        assert_eq!(session.on_frame(1016.0), FrameControl::Continue);
        assert_eq!(session.simulation().time_ticks, 2);
    }

    #[test]
    fn held_input_reaches_the_simulation() {
        let mut session = session();
        session.start();
        let start_x = session.simulation().store.player.pos.x;
        session.handle_action(Action::MoveLeft, true);
        session.on_frame(0.0);
        session.on_frame(100.0);
        assert!(session.simulation().store.player.pos.x < start_x);
    }

    #[test]
    fn game_over_stops_the_loop_and_freezes_state() {
        let mut session = session();
        session.start();
        session.on_frame(0.0);
        doom(&mut session);

        assert_eq!(session.on_frame(16.0), FrameControl::Stop);
        assert_eq!(session.phase(), SessionPhase::GameOver);

        let frozen = session.simulation().snapshot();
        assert_eq!(session.on_frame(32.0), FrameControl::Stop);
        assert_eq!(session.simulation().snapshot(), frozen);
    }

    #[test]
    fn restart_key_after_game_over_resets() {
        let mut session = session();
        session.start();
        let initial = session.simulation().snapshot();
        session.on_frame(0.0);
        doom(&mut session);
        session.on_frame(16.0);
        assert_eq!(session.phase(), SessionPhase::GameOver);

        assert!(session.handle_action(Action::Restart, true));
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.simulation().snapshot(), initial);
        // A second press while playing does nothing
        assert!(!session.handle_action(Action::Restart, true));
    }

    #[test]
    fn restart_key_while_playing_is_ignored() {
        let mut session = session();
        session.start();
        session.on_frame(0.0);
        session.on_frame(16.0);
        assert!(!session.handle_action(Action::Restart, true));
        assert_eq!(session.simulation().time_ticks, 2);
    }

    #[test]
    fn tap_starts_and_restarts_but_not_mid_game() {
        let mut session = session();
        let initial = session.simulation().snapshot();
        assert!(session.tap());
        assert_eq!(session.phase(), SessionPhase::Playing);

        session.on_frame(0.0);
        session.on_frame(16.0);
        assert!(!session.tap());
        assert_eq!(session.simulation().time_ticks, 2);

        doom(&mut session);
        session.on_frame(32.0);
        assert_eq!(session.phase(), SessionPhase::GameOver);

        assert!(session.tap());
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.simulation().snapshot(), initial);
    }

    #[test]
    fn pause_skips_the_elapsed_gap() {
        let mut session = session();
        session.start();
        session.handle_action(Action::MoveRight, true);
        session.on_frame(0.0);

        session.pause();
        assert_eq!(session.phase(), SessionPhase::Paused);
        assert!(!session.input().is_held(Action::MoveRight));
        assert_eq!(session.on_frame(50.0), FrameControl::Stop);

        assert!(session.resume());
        let x = session.simulation().store.player.pos.x;
        session.handle_action(Action::MoveRight, true);
        // First frame after resume has a zero delta
        assert_eq!(session.on_frame(60_000.0), FrameControl::Continue);
        assert_eq!(session.simulation().store.player.pos.x, x);
    }
}
