//! Orb Shooter entry point
//!
//! In the browser this wires the DOM, the frame loop and the spawn interval.
//! Natively it runs a headless demo session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent, Window};

    use orb_shooter::renderer::CanvasSurface;
    use orb_shooter::sim::{GameEvent, GameState, TickInput, fire_at, frame, spawn_enemy};
    use orb_shooter::ui::{Overlay, hud_score_text};
    use orb_shooter::{Tuning, canvas_size};

    /// A game session plus the two repeating tasks that drive it
    struct Session {
        state: GameState,
        input: TickInput,
        surface: CanvasSurface,
        canvas: HtmlCanvasElement,
        /// Pending animation frame while the loop runs
        raf_id: Option<i32>,
        /// Spawn interval while the spawner runs
        spawn_id: Option<i32>,
    }

    impl Session {
        /// Cancel the frame loop and the spawner, whichever are active
        fn cancel_tasks(&mut self, window: &Window) {
            if let Some(id) = self.raf_id.take() {
                let _ = window.cancel_animation_frame(id);
            }
            if let Some(id) = self.spawn_id.take() {
                window.clear_interval_with_handle(id);
            }
        }
    }

    fn window() -> Result<Window, JsValue> {
        web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
    }

    fn element(document: &Document, id: &str) -> Option<HtmlElement> {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn set_display(el: &HtmlElement, value: &str) {
        let _ = el.style().set_property("display", value);
    }

    /// Update the HUD score element
    fn update_hud(document: &Document, score: u64) {
        if let Some(el) = element(document, "scoreEl") {
            el.set_text_content(Some(&hud_score_text(score)));
        }
    }

    /// Show or hide the modal to match `overlay`
    fn apply_overlay(document: &Document, overlay: &Overlay) {
        if let Some(modal) = element(document, "modal") {
            set_display(&modal, if overlay.visible { "flex" } else { "none" });
        }
        if !overlay.visible {
            return;
        }
        if let Some(el) = element(document, "modal-title") {
            el.set_text_content(Some(overlay.title));
        }
        if let Some(el) = element(document, "modal-score") {
            match &overlay.score_line {
                Some(text) => {
                    el.set_text_content(Some(text));
                    set_display(&el, "block");
                }
                None => set_display(&el, "none"),
            }
        }
        if let Some(el) = element(document, "startGameBtn") {
            el.set_text_content(Some(overlay.button_label));
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Orb Shooter starting...");

        let window = window()?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or_else(|| JsValue::from_str("no #gameCanvas"))?
            .dyn_into()?;

        // Fixed for the life of the page
        let viewport_w = window.inner_width()?.as_f64().unwrap_or(1280.0) as f32;
        let viewport_h = window.inner_height()?.as_f64().unwrap_or(720.0) as f32;
        let size = canvas_size(viewport_w, viewport_h);
        let mut surface = CanvasSurface::new(&canvas, size)?;
        surface.clear();

        let tuning_json = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content());
        let tuning = Tuning::load(tuning_json.as_deref());

        let seed = js_sys::Date::now() as u64;
        let state = GameState::new(seed, size, tuning);
        log::info!("Game initialized with seed: {}", seed);

        let session = Rc::new(RefCell::new(Session {
            state,
            input: TickInput::default(),
            surface,
            canvas,
            raf_id: None,
            spawn_id: None,
        }));

        apply_overlay(&document, &Overlay::for_phase(session.borrow().state.phase, 0));

        let spawn_fn = setup_spawner(session.clone());
        setup_input_handlers(&window, session.clone())?;
        setup_start_button(&document, session, spawn_fn)?;

        log::info!("Orb Shooter ready!");
        Ok(())
    }

    /// The spawn callback, created once and reused by every session
    fn setup_spawner(session: Rc<RefCell<Session>>) -> js_sys::Function {
        let closure = Closure::<dyn FnMut()>::new(move || {
            spawn_enemy(&mut session.borrow_mut().state);
        });
        let function: js_sys::Function = closure.as_ref().unchecked_ref::<js_sys::Function>().clone();
        closure.forget();
        function
    }

    fn setup_input_handlers(window: &Window, session: Rc<RefCell<Session>>) -> Result<(), JsValue> {
        // Movement keys
        for (event_name, held) in [("keydown", true), ("keyup", false)] {
            let session = session.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                session.borrow_mut().input.handle_key(&event.key(), held);
            });
            window.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Shoot toward the click
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut s = session.borrow_mut();
                if !s.state.is_running() {
                    return;
                }
                let rect = s.canvas.get_bounding_client_rect();
                let target = Vec2::new(
                    (event.client_x() as f64 - rect.left()) as f32,
                    (event.client_y() as f64 - rect.top()) as f32,
                );
                fire_at(&mut s.state, target);
            });
            window.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_start_button(
        document: &Document,
        session: Rc<RefCell<Session>>,
        spawn_fn: js_sys::Function,
    ) -> Result<(), JsValue> {
        let btn = element(document, "startGameBtn")
            .ok_or_else(|| JsValue::from_str("no #startGameBtn"))?;
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            // The window click handler would otherwise shoot at the button
            event.stop_propagation();
            if let Err(e) = start(&session, &spawn_fn) {
                log::error!("Failed to start session: {:?}", e);
            }
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Reset the session and (re)start the loop and the spawner
    fn start(session: &Rc<RefCell<Session>>, spawn_fn: &js_sys::Function) -> Result<(), JsValue> {
        let window = window()?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let mut s = session.borrow_mut();
        s.cancel_tasks(&window);
        s.state.start();

        let interval = i32::try_from(s.state.tuning.spawn_interval_ms).unwrap_or(i32::MAX);
        s.spawn_id = Some(window.set_interval_with_callback_and_timeout_and_arguments_0(spawn_fn, interval)?);
        s.raf_id = Some(request_animation_frame(&window, session.clone())?);

        update_hud(&document, 0);
        apply_overlay(&document, &Overlay::for_phase(s.state.phase, 0));
        Ok(())
    }

    fn request_animation_frame(window: &Window, session: Rc<RefCell<Session>>) -> Result<i32, JsValue> {
        let closure = Closure::once(move |_time: f64| {
            game_loop(session);
        });
        let id = window.request_animation_frame(closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(id)
    }

    fn game_loop(session: Rc<RefCell<Session>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        let mut s = session.borrow_mut();
        if !s.state.is_running() {
            s.raf_id = None;
            return;
        }

        match request_animation_frame(&window, session.clone()) {
            Ok(id) => s.raf_id = Some(id),
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                s.raf_id = None;
            }
        }

        let events = {
            let Session {
                state,
                input,
                surface,
                ..
            } = &mut *s;
            frame(state, input, surface)
        };

        for event in events {
            match event {
                GameEvent::EnemyDestroyed { .. } => update_hud(&document, s.state.score),
                GameEvent::GameOver { final_score } => {
                    s.cancel_tasks(&window);
                    apply_overlay(&document, &Overlay::for_phase(s.state.phase, final_score));
                }
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        web_sys::console::error_2(&JsValue::from_str("Orb Shooter failed to start:"), &e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Orb Shooter (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless session with a simple autopilot
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use serde::Serialize;

    use orb_shooter::consts::HEADLESS_FPS;
    use orb_shooter::sim::{
        Enemy, GameEvent, GamePhase, GameState, Player, TickInput, fire_at, spawn_enemy, tick,
    };
    use orb_shooter::{Tuning, canvas_size};

    /// Give up after this long if the autopilot survives
    const MAX_SECONDS: u64 = 120;
    const FIRE_EVERY_FRAMES: u64 = 12;
    /// Enemies closer than this make the autopilot flee
    const DANGER_DISTANCE: f32 = 180.0;

    #[derive(Serialize)]
    struct Summary<'a> {
        seed: u64,
        seconds: f32,
        score: u64,
        phase: GamePhase,
        player: &'a Player,
        enemies: &'a [Enemy],
        projectiles: usize,
    }

    fn clock_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    fn nearest_enemy(state: &GameState) -> Option<&Enemy> {
        let from = state.player.pos;
        state.enemies.iter().min_by(|a, b| {
            a.pos
                .distance_squared(from)
                .total_cmp(&b.pos.distance_squared(from))
        })
    }

    /// Flee the nearest threat, otherwise drift back to the middle
    fn steer(state: &GameState) -> TickInput {
        let player = state.player.pos;
        let away = match nearest_enemy(state) {
            Some(e) if e.pos.distance(player) < DANGER_DISTANCE => player - e.pos,
            _ => state.bounds / 2.0 - player,
        };
        let dead_zone = state.player.speed;
        TickInput {
            up: away.y < -dead_zone,
            down: away.y > dead_zone,
            left: away.x < -dead_zone,
            right: away.x > dead_zone,
        }
    }

    pub fn run() {
        let seed = std::env::args()
            .nth(1)
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(clock_seed);
        let tuning = Tuning::load(std::env::var("ORB_TUNING").ok().as_deref());

        let mut state = GameState::new(seed, canvas_size(1920.0, 1080.0), tuning);
        state.start();

        // The browser spawns on a wall-clock interval; here a second is HEADLESS_FPS frames
        let frames_per_spawn =
            (HEADLESS_FPS as u64 * state.tuning.spawn_interval_ms as u64 / 1000).max(1);

        for f in 1..=MAX_SECONDS * HEADLESS_FPS as u64 {
            if f % frames_per_spawn == 0 {
                spawn_enemy(&mut state);
            }
            if f % FIRE_EVERY_FRAMES == 0 {
                if let Some(target) = nearest_enemy(&state).map(|e| e.pos) {
                    fire_at(&mut state, target);
                }
            }

            let input = steer(&state);
            for event in tick(&mut state, &input) {
                if let GameEvent::GameOver { final_score } = event {
                    log::info!("Autopilot was hit after {} frames, score {}", f, final_score);
                }
            }
            if !state.is_running() {
                break;
            }
        }

        if state.is_running() {
            log::info!("Autopilot survived {} seconds, score {}", MAX_SECONDS, state.score);
        }

        let summary = Summary {
            seed,
            seconds: state.time_ticks as f32 / HEADLESS_FPS as f32,
            score: state.score,
            phase: state.phase,
            player: &state.player,
            enemies: &state.enemies,
            projectiles: state.projectiles.len(),
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize summary: {}", e),
        }
    }
}
