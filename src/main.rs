//! Downfall entry point
//!
//! In the browser this wires keyboard and focus events into the session and
//! drives it from `requestAnimationFrame`. Natively it runs a headless
//! autopilot game at a fixed 60 Hz and logs the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use downfall::platform::Action;
    use downfall::{Arena, FrameControl, GameSession, SessionPhase, Simulation, Tuning};

    type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

    /// Game instance shared between the frame loop and event handlers
    struct Game {
        session: GameSession,
        ctx: CanvasRenderingContext2d,
        /// A frame callback is scheduled and not yet run
        frame_armed: bool,
    }

    fn request_frame(callback: &Closure<dyn FnMut(f64)>) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                log::error!("requestAnimationFrame failed: {:?}", e);
            }
        }
    }

    /// Schedule the next frame unless one is already pending
    fn arm(game: &Rc<RefCell<Game>>, frame: &FrameCallback) {
        {
            let mut g = game.borrow_mut();
            if g.frame_armed {
                return;
            }
            g.frame_armed = true;
        }
        if let Some(callback) = frame.borrow().as_ref() {
            request_frame(callback);
        }
    }

    fn draw(ctx: &CanvasRenderingContext2d, session: &GameSession) {
        let sim = session.simulation();
        let arena = sim.arena;
        let (w, h) = (arena.width as f64, arena.height as f64);

        ctx.set_global_alpha(1.0);
        ctx.set_fill_style_str("#05060f");
        ctx.fill_rect(0.0, 0.0, w, h);

        ctx.set_fill_style_str("#d94141");
        for enemy in &sim.store.enemies {
            // Pulse with the animation frame until sprites are wired in
            let inset = enemy.anim.frame as f64;
            ctx.fill_rect(
                enemy.pos.x as f64 + inset,
                enemy.pos.y as f64 + inset,
                enemy.size.x as f64 - 2.0 * inset,
                enemy.size.y as f64 - 2.0 * inset,
            );
        }

        ctx.set_fill_style_str("#f5e663");
        for bullet in &sim.store.bullets {
            ctx.fill_rect(
                bullet.pos.x as f64,
                bullet.pos.y as f64,
                bullet.size.x as f64,
                bullet.size.y as f64,
            );
        }

        let player = &sim.store.player;
        let blink = player.is_invincible() && (player.invincible_ms / 100.0) as u32 % 2 == 0;
        if !blink {
            let (px, py) = (player.pos.x as f64, player.pos.y as f64);
            let (pw, ph) = (player.size.x as f64, player.size.y as f64);
            ctx.set_fill_style_str("#e8f0ff");
            ctx.fill_rect(px, py, pw, ph);
            // Cockpit banks toward the sprite column for the current facing
            let column = player.facing.sprite_frame() as f64;
            ctx.set_fill_style_str("#3a7bd5");
            ctx.fill_rect(px + pw * (column + 1.0) / 5.0, py + ph / 4.0, pw / 5.0, ph / 3.0);
        }

        let frames = sim.tuning.explosion_frames.max(1) as f64;
        ctx.set_fill_style_str("#ff9a1f");
        for explosion in &sim.store.explosions {
            ctx.set_global_alpha(1.0 - explosion.anim.frame as f64 / frames);
            ctx.fill_rect(
                explosion.pos.x as f64,
                explosion.pos.y as f64,
                explosion.size.x as f64,
                explosion.size.y as f64,
            );
        }
        ctx.set_global_alpha(1.0);

        ctx.set_fill_style_str("#ffffff");
        ctx.set_font("32px monospace");
        ctx.set_text_align("left");
        let _ = ctx.fill_text(&format!("Score: {}", sim.score()), 20.0, 40.0);
        let _ = ctx.fill_text(&format!("Lives: {}", player.lives), 20.0, 80.0);

        ctx.set_text_align("center");
        match session.phase() {
            SessionPhase::Menu => {
                let _ = ctx.fill_text("Press SPACE or tap to start", w / 2.0, h / 2.0);
            }
            SessionPhase::Paused => {
                let _ = ctx.fill_text("PAUSED", w / 2.0, h / 2.0);
            }
            SessionPhase::GameOver => {
                ctx.set_fill_style_str("#ff3030");
                ctx.set_font("48px monospace");
                let _ = ctx.fill_text("GAME OVER", w / 2.0, h / 2.0);
                ctx.set_fill_style_str("#ffffff");
                ctx.set_font("32px monospace");
                let _ = ctx.fill_text("Press R or tap to restart", w / 2.0, h / 2.0 + 50.0);
            }
            SessionPhase::Playing => {}
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }
        log::info!("Downfall starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #gameCanvas element on the page");
            return;
        };

        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let ctx = match canvas.get_context("2d") {
            Ok(Some(obj)) => match obj.dyn_into::<CanvasRenderingContext2d>() {
                Ok(ctx) => ctx,
                Err(_) => {
                    log::error!("2d context has an unexpected type");
                    return;
                }
            },
            _ => {
                log::error!("Canvas 2d context unavailable");
                return;
            }
        };

        let seed = js_sys::Date::now() as u64;
        let arena = Arena::new(width as f32, height as f32);
        let sim = match Simulation::new(Tuning::default(), arena, seed) {
            Ok(sim) => sim,
            Err(e) => {
                log::error!("Cannot start: {}", e);
                return;
            }
        };
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            session: GameSession::new(sim),
            ctx,
            frame_armed: false,
        }));
        {
            let g = game.borrow();
            draw(&g.ctx, &g.session);
        }

        // Frame loop; re-arms itself only while the session keeps playing
        let frame: FrameCallback = Rc::new(RefCell::new(None));
        {
            let game = game.clone();
            let frame_handle = frame.clone();
            *frame.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
                let control = {
                    let mut g = game.borrow_mut();
                    let control = g.session.on_frame(timestamp);
                    draw(&g.ctx, &g.session);
                    if control == FrameControl::Stop {
                        g.frame_armed = false;
                    }
                    control
                };
                if control == FrameControl::Continue {
                    if let Some(callback) = frame_handle.borrow().as_ref() {
                        request_frame(callback);
                    }
                }
            }));
        }

        // Keyboard
        {
            let game = game.clone();
            let frame = frame.clone();
            let closure = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
                let Some(action) = Action::from_key(&event.key()) else {
                    return;
                };
                event.prevent_default();
                let should_arm = {
                    let mut g = game.borrow_mut();
                    if g.session.phase() == SessionPhase::Menu && action == Action::Fire {
                        g.session.start()
                    } else {
                        g.session.handle_action(action, true)
                    }
                };
                if should_arm {
                    arm(&game, &frame);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
                if let Some(action) = Action::from_key(&event.key()) {
                    game.borrow_mut().session.handle_action(action, false);
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer tap (mouse, touch or pen) starts or restarts a game
        {
            let game = game.clone();
            let frame = frame.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                let should_arm = game.borrow_mut().session.tap();
                if should_arm {
                    arm(&game, &frame);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Auto-pause when the window loses focus or the tab is hidden
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
                let mut g = game.borrow_mut();
                g.session.pause();
                draw(&g.ctx, &g.session);
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let frame = frame.clone();
            let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
                let resumed = game.borrow_mut().session.resume();
                if resumed {
                    arm(&game, &frame);
                }
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let doc = document.clone();
            let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
                if doc.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().session.pause();
                    log::info!("Auto-paused (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        log::info!("Downfall running!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use downfall::consts::{DEFAULT_SEED, FRAME_MS};
    use downfall::{Arena, FrameControl, GameSession, Simulation, Tuning};

    env_logger::init();
    log::info!("Downfall (native) starting...");
    log::info!("Native mode runs a headless autopilot game - serve the wasm build for the canvas version");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::error!("Cannot load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    let sim = match Simulation::new(tuning, Arena::default(), DEFAULT_SEED) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Cannot start: {}", e);
            std::process::exit(1);
        }
    };

    let mut session = GameSession::new(sim);
    session.start();

    // Two minutes of play at most
    let max_frames = 60 * 120;
    let mut now = 0.0;
    for _ in 0..max_frames {
        let input = autopilot(session.simulation());
        let input_state = session.input_mut();
        input_state.set(downfall::platform::Action::MoveLeft, input.move_left);
        input_state.set(downfall::platform::Action::MoveRight, input.move_right);
        input_state.set(downfall::platform::Action::Fire, input.fire);

        now += FRAME_MS;
        if session.on_frame(now) == FrameControl::Stop {
            break;
        }
    }

    let sim = session.simulation();
    println!(
        "Final score: {} after {} ticks ({})",
        sim.score(),
        sim.time_ticks,
        if sim.is_game_over() { "game over" } else { "survived" }
    );
}

/// Chase the lowest enemy's column and fire once lined up
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(sim: &downfall::Simulation) -> downfall::TickInput {
    let player = &sim.store.player;
    let player_center = player.pos.x + player.size.x / 2.0;

    let target = sim
        .store
        .enemies
        .iter()
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|e| e.pos.x + e.size.x / 2.0);

    match target {
        Some(target_x) => {
            let offset = target_x - player_center;
            let aligned = offset.abs() < player.size.x / 4.0;
            downfall::TickInput {
                move_left: !aligned && offset < 0.0,
                move_right: !aligned && offset > 0.0,
                fire: aligned,
                restart: false,
            }
        }
        None => downfall::TickInput::default(),
    }
}
