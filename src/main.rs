//! Rose Catcher entry point
//!
//! Browser: binds the canvas and DOM, drives frames with
//! `requestAnimationFrame` and the countdown with `setInterval`.
//! Native: plays one autopilot round on the headless clock and logs the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, MouseEvent, TouchEvent};

    use rose_catcher::Settings;
    use rose_catcher::consts::*;
    use rose_catcher::renderer::{FrameBuilder, RenderState};
    use rose_catcher::sim::{
        Difficulty, FrameInput, GameEvent, GameSession, RoundToken, Schedule, Viewport,
        celebration_frame, countdown_tick, frame,
    };

    /// Game instance holding all state
    struct Game {
        session: GameSession,
        render_state: Option<RenderState>,
        painter: FrameBuilder,
        input: FrameInput,
        /// Pending `requestAnimationFrame` id
        frame_handle: Option<i32>,
        /// Live `setInterval` id
        countdown_handle: Option<i32>,
        /// Interval callback; kept alive until the next round replaces it
        countdown_closure: Option<Closure<dyn FnMut()>>,
    }

    impl Game {
        fn new(session: GameSession) -> Self {
            Self {
                session,
                render_state: None,
                painter: FrameBuilder::new(),
                input: FrameInput::default(),
                frame_handle: None,
                countdown_handle: None,
                countdown_closure: None,
            }
        }

        /// Cancel the frame request and the countdown interval; idempotent
        fn cancel_timers(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            if let Some(id) = self.frame_handle.take() {
                let _ = window.cancel_animation_frame(id);
            }
            if let Some(id) = self.countdown_handle.take() {
                window.clear_interval_with_handle(id);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(self.painter.vertices()) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let (w, h) = render_state.size;
                        let logical = render_state.logical_size;
                        render_state.resize(w, h, logical);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Push session events into the DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            for event in self.session.drain_events() {
                match event {
                    GameEvent::RoundStarted { .. } => {
                        hide(&document, "start-screen");
                        hide(&document, "gameover-screen");
                        hide(&document, "pre-quiz-celebration");
                    }
                    GameEvent::ScoreChanged { .. } => {
                        if let Some(el) = document.get_element_by_id("love-fill") {
                            let width = format!("width: {}%", self.session.score.progress() * 100.0);
                            let _ = el.set_attribute("style", &width);
                        }
                    }
                    GameEvent::CountdownChanged { remaining } => {
                        if let Some(el) = document.get_element_by_id("timer") {
                            el.set_text_content(Some(&format!("⏱️ {remaining}s")));
                        }
                    }
                    GameEvent::RoundWon { .. } => show(&document, "pre-quiz-celebration"),
                    GameEvent::RoundLost { .. } => show(&document, "gameover-screen"),
                }
            }
        }

        fn update_level_display(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("level-display") {
                el.set_text_content(Some(self.session.profile().label));
                let classes = el.class_list();
                let _ = if self.session.difficulty == Difficulty::Easy {
                    classes.add_1("easy")
                } else {
                    classes.remove_1("easy")
                };
            }
        }
    }

    fn show(document: &Document, id: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().remove_1("hidden");
            let _ = el.class_list().add_1("active");
        }
    }

    fn hide(document: &Document, id: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().remove_1("active");
            let _ = el.class_list().add_1("hidden");
        }
    }

    /// Settings from `<script id="game-config" type="application/json">`, if present
    fn load_settings(document: &Document) -> Settings {
        let json = document
            .get_element_by_id("game-config")
            .and_then(|el| el.text_content());
        match json {
            Some(json) => Settings::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Invalid game config, using defaults: {e}");
                Settings::default()
            }),
            None => Settings::default(),
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Rose Catcher starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Size canvas to the window
        let dpr = window.device_pixel_ratio();
        let (css_w, css_h) = window_size(&window);
        let width = (css_w as f64 * dpr) as u32;
        let height = (css_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = load_settings(&document);
        let seed = settings.seed.unwrap_or(js_sys::Date::now() as u64);
        let viewport = Viewport::new(css_w, css_h).expect("window has no area");
        let session = GameSession::new(settings, viewport, seed).expect("invalid settings");
        let game = Rc::new(RefCell::new(Game::new(session)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height, (css_w, css_h)).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Rendering disabled: {e}"),
        }

        game.borrow().update_level_display();

        setup_input_handlers(game.clone());
        setup_resize(&canvas, game.clone());
        setup_buttons(game.clone());

        log::info!("Rose Catcher ready!");
    }

    fn window_size(window: &web_sys::Window) -> (f32, f32) {
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
        (w as f32, h as f32)
    }

    /// Begin (or restart) a round: cancel the old tasks first, then start both new ones
    fn start_round(game: &Rc<RefCell<Game>>) {
        let token = {
            let mut g = game.borrow_mut();
            g.cancel_timers();
            let token = g.session.restart();
            g.update_hud();
            token
        };
        request_frame(game.clone(), token);
        start_countdown(game.clone(), token);
    }

    fn request_frame(game: Rc<RefCell<Game>>, token: RoundToken) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let handle = game.clone();
        let closure = Closure::once(move |_time: f64| {
            game_loop(handle, token);
        });
        let id = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok();
        game.borrow_mut().frame_handle = id;
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, token: RoundToken) {
        let schedule = {
            let mut g = game.borrow_mut();
            g.frame_handle = None;
            let Game {
                session,
                painter,
                input,
                ..
            } = &mut *g;
            let schedule = frame(session, token, input, painter);
            g.render();
            g.update_hud();
            schedule
        };

        match schedule {
            Schedule::Continue => request_frame(game, token),
            Schedule::Stop => finish_round(game, token),
        }
    }

    fn start_countdown(game: Rc<RefCell<Game>>, token: RoundToken) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let handle = game.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            let schedule = {
                let mut g = handle.borrow_mut();
                let schedule = countdown_tick(&mut g.session, token);
                g.update_hud();
                schedule
            };
            if schedule == Schedule::Stop {
                finish_round(handle.clone(), token);
            }
        });
        let id = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                COUNTDOWN_INTERVAL_MS as i32,
            )
            .ok();

        let mut g = game.borrow_mut();
        g.countdown_handle = id;
        g.countdown_closure = Some(closure);
    }

    /// A round's task stopped: tear down both tasks, celebrate a win
    fn finish_round(game: Rc<RefCell<Game>>, token: RoundToken) {
        let won = {
            let mut g = game.borrow_mut();
            if !g.session.is_current(token) {
                return;
            }
            g.cancel_timers();
            g.session.phase == rose_catcher::sim::RoundState::WonRound
        };
        if won {
            game.borrow_mut().session.celebrate();
            request_celebration_frame(game);
        }
    }

    fn request_celebration_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let handle = game.clone();
        let closure = Closure::once(move |_time: f64| {
            let schedule = {
                let mut g = handle.borrow_mut();
                g.frame_handle = None;
                let Game {
                    session, painter, ..
                } = &mut *g;
                let schedule = celebration_frame(session, painter);
                g.render();
                schedule
            };
            if schedule == Schedule::Continue {
                request_celebration_frame(handle);
            }
        });
        let id = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok();
        game.borrow_mut().frame_handle = id;
        closure.forget();
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Mouse move - player follows the pointer directly
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .session
                    .pointer_moved(event.client_x() as f32);
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    game.borrow_mut()
                        .session
                        .pointer_moved(touch.client_x() as f32);
                }
            });
            let _ = window
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if event.key() == "a" || event.key() == "A" {
                    let mut g = game.borrow_mut();
                    g.input.autopilot = !g.input.autopilot;
                    log::info!("Autopilot: {}", g.input.autopilot);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (css_w, css_h) = window_size(&window);
            let dpr = window.device_pixel_ratio();
            let width = (css_w as f64 * dpr) as u32;
            let height = (css_h as f64 * dpr) as u32;

            let mut g = game.borrow_mut();
            if g.session.resize(css_w, css_h).is_err() {
                return;
            }
            canvas.set_width(width);
            canvas.set_height(height);
            if let Some(ref mut render_state) = g.render_state {
                render_state.resize(width, height, (css_w, css_h));
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        for id in ["start-btn", "try-again-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    start_round(&game);
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Unlock code switches to the easy profile and restarts
        if let Some(btn) = document.get_element_by_id("code-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                    return;
                };
                let Some(input) = document
                    .get_element_by_id("code-input")
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };

                let unlocked = game.borrow().session.settings().matches_unlock_code(&input.value());
                if unlocked {
                    {
                        let mut g = game.borrow_mut();
                        g.session.select_difficulty(Difficulty::Easy);
                        g.update_level_display();
                    }
                    if let Some(section) = document.get_element_by_id("code-section") {
                        let _ = section.set_attribute("style", "display: none");
                    }
                    start_round(&game);
                } else {
                    if let Some(msg) = document.get_element_by_id("code-message") {
                        msg.set_text_content(Some("❌ Wrong code!"));
                    }
                    input.set_value("");
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use rose_catcher::Settings;
    use rose_catcher::platform::{HeadlessRunner, NullPainter};
    use rose_catcher::sim::{GameSession, RoundState, Schedule, Viewport, celebration_frame};

    env_logger::init();
    log::info!("Rose Catcher (native) starting...");
    log::info!("Native mode plays a headless autopilot round - run with `trunk serve` for the web version");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::from_json(&std::fs::read_to_string(&path)?)?,
        None => Settings::default(),
    };
    let seed = settings.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    let viewport = Viewport::new(settings.viewport_width, settings.viewport_height)?;
    let session = GameSession::new(settings, viewport, seed)?;
    let round_ms = session.profile().round_seconds as f64 * 1000.0;

    let mut runner = HeadlessRunner::new(session);
    runner.input.autopilot = true;
    runner.start();
    let outcome = runner.run_round(round_ms + 1000.0, &mut NullPainter);

    let session = &mut runner.session;
    println!(
        "\n{} | seed {} | score {} | {}s left | {} frames",
        session.profile().label,
        seed,
        session.score.value(),
        session.countdown.remaining(),
        session.frame_count
    );

    match outcome {
        RoundState::WonRound => {
            session.celebrate();
            let mut frames = 0;
            while celebration_frame(session, &mut NullPainter) == Schedule::Continue {
                frames += 1;
            }
            println!("✓ Round won! Confetti lasted {frames} frames");
        }
        RoundState::LostRound => println!("✗ Time's up"),
        RoundState::NotStarted | RoundState::Running => println!("Round did not finish"),
    }

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
