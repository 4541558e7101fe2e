//! Pac-Boy entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement};

    use pac_boy::audio::AudioManager;
    use pac_boy::consts::*;
    use pac_boy::hud;
    use pac_boy::platform::{WebFaceTracker, web::request_camera};
    use pac_boy::renderer::{RenderState, build_scene};
    use pac_boy::sim::animation::{HudLayout, life_text, score_text};
    use pac_boy::sim::{ControlMode, FaceTracking, GamePhase, GameState, Key, TickInput, tick};
    use pac_boy::{Settings, Tuning};

    struct Game {
        state: GameState,
        tracker: WebFaceTracker,
        settings: Settings,
        audio: AudioManager,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning, settings: Settings) -> Self {
            Self {
                state: GameState::new(seed, tuning),
                tracker: WebFaceTracker::new(),
                audio: AudioManager::new(&settings),
                settings,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
            }
        }

        /// Run simulation ticks and flush their audio
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= FRAME_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input, &mut self.tracker);
                self.accumulator -= FRAME_DT;
                substeps += 1;

                // Keys are one-shot
                self.input.keys.clear();
            }

            for command in self.state.audio.drain() {
                self.audio.execute(command);
            }
            self.audio.update();
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = build_scene(&self.state, &self.settings);
            match render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update menu panels and HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let phase = self.state.phase();
            let session = &self.state.session;

            show(document, "main-menu", phase == GamePhase::MainMenu);
            show(document, "mode-select", phase == GamePhase::ModeSelect);
            show(document, "hud", matches!(phase, GamePhase::Playing | GamePhase::GameOver));
            show(document, "game-over", phase == GamePhase::GameOver);

            let camera = self.tracker.is_available();
            let status = hud::camera_status(phase, camera);
            show(document, "camera-status", status.is_some());
            if let Some(status) = status {
                set_text(document, "camera-status", status);
            }

            if phase == GamePhase::ModeSelect {
                // Without a camera, "2" always starts Button mode
                let selected = if camera {
                    self.state.selected_mode
                } else {
                    ControlMode::Button
                };
                for (mode, id) in ControlMode::ALL.iter().zip(["mode-face", "mode-button"]) {
                    set_class(document, id, hud::mode_option_class(*mode, selected, camera));
                }
                set_text(document, "mode-rule", selected.rule());
            }

            if matches!(phase, GamePhase::Playing | GamePhase::GameOver) {
                set_text(document, "hud-score", &score_text(session.score));
                set_text(document, "hud-lives", &life_text(session.lives));
                set_text(document, "hud-mode", session.control_mode.label());

                if let Some(canvas) = document.get_element_by_id("canvas") {
                    let viewport = (canvas.client_width() as u32, canvas.client_height() as u32);
                    let layout = HudLayout::new(&self.state.tuning, session.score, session.lives);
                    for (id, pos) in [("hud-score", layout.score_pos), ("hud-lives", layout.life_pos)] {
                        let style = hud::place(pos, &self.state.tuning, viewport).style();
                        set_attr(document, id, "style", &style);
                    }
                }
            }

            if phase == GamePhase::GameOver {
                set_text(document, "final-score", &session.score.to_string());
            }
        }
    }

    fn show(document: &Document, id: &str, visible: bool) {
        set_class(document, id, if visible { "" } else { "hidden" });
    }

    fn set_class(document: &Document, id: &str, class: &str) {
        set_attr(document, id, "class", class);
    }

    fn set_attr(document: &Document, id: &str, name: &str, value: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.get_attribute(name).as_deref() != Some(value) {
                let _ = el.set_attribute(name, value);
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn js_err(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Pac-Boy starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let tuning = Tuning::load();
        let logical = (tuning.screen_width, tuning.screen_height);
        let game = Rc::new(RefCell::new(Game::new(seed, tuning, Settings::load())));
        log::info!("Game initialized with seed: {}", seed);

        if !request_camera() {
            log::warn!("No camera API - button mode only");
        }

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(js_err)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(js_err)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, logical)
            .await
            .map_err(js_err)?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(game.clone())?;
        setup_resize_handler(canvas, game.clone())?;

        // Start game loop
        request_animation_frame(game);

        log::info!("Pac-Boy running!");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            if event.repeat() {
                return;
            }
            let mut g = game.borrow_mut();
            // First key press counts as the user gesture that unlocks audio
            g.audio.resume();
            let name = event.key();
            if let Some(key) = Key::from_key_name(&name) {
                g.input.keys.push(key);
            } else if name == "i" || name == "I" {
                g.input.autopilot = !g.input.autopilot;
                log::info!("Autopilot: {}", g.input.autopilot);
            }
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_resize_handler(
        canvas: HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else { return };
            let dpr = window.device_pixel_ratio();
            let width = (canvas.client_width() as f64 * dpr) as u32;
            let height = (canvas.client_height() as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);
            if let Some(render_state) = game.borrow_mut().render_state.as_mut() {
                render_state.resize(width, height);
            }
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                FRAME_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

/// Headless autoplay: `pac-boy [seed] [max_frames]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use pac_boy::Tuning;
    use pac_boy::sim::{FaceTracker, GamePhase, GameState, Key, TickInput, tick};

    env_logger::init();
    log::info!("Pac-Boy (native) starting...");
    log::info!("Native mode runs a headless autopilot - run with `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let max_frames: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60 * 60);

    let mut state = GameState::new(seed, Tuning::load());
    let mut tracker = FaceTracker::unavailable();

    // Main menu -> mode select -> button mode
    tick(&mut state, &TickInput::with_keys(&[Key::Two]), &mut tracker);
    tick(&mut state, &TickInput::with_keys(&[Key::Two]), &mut tracker);

    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    while state.phase() == GamePhase::Playing && state.time_ticks < max_frames {
        tick(&mut state, &input, &mut tracker);
        state.audio.clear();
    }

    println!(
        "seed {}: score {}, lives {}, {} frames, {:?}",
        seed,
        state.session.score,
        state.session.lives,
        state.time_ticks,
        state.phase()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
