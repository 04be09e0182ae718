//! Cube Dash entry point
//!
//! Web: drives the engine from `requestAnimationFrame` and forwards its events
//! to the page as DOM events. Native: headless runner for level files.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CustomEvent, CustomEventInit, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent,
    };

    use cube_dash::sim::{GameEvent, GameState, LevelDescriptor, TickInput, generate_default_level};
    use cube_dash::{Settings, Tuning};

    /// Element id of the game canvas in the host page
    const CANVAS_ID: &str = "gameCanvas";

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        /// Input queued by DOM listeners, consumed on the next frame
        input: TickInput,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let mut state = GameState::new(seed, Tuning::default(), &settings);
            state.load_level(&generate_default_level(seed));
            Self {
                state,
                settings,
                input: TickInput::default(),
            }
        }

        /// One frame: apply queued input and step. Returns the events to forward.
        fn update(&mut self, time: f64) -> Vec<GameEvent> {
            let input = std::mem::take(&mut self.input);
            self.state.step_with_input(time, &input);
            self.state.drain_events()
        }
    }

    thread_local! {
        static GAME: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
    }

    fn with_game<R>(f: impl FnOnce(&mut Game) -> R) -> Option<R> {
        GAME.with(|slot| slot.borrow().as_ref().map(|game| f(&mut *game.borrow_mut())))
    }

    /// Replace the current level with a JSON level descriptor
    #[wasm_bindgen]
    pub fn load_level(json: &str) -> Result<(), JsValue> {
        let descriptor =
            LevelDescriptor::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        with_game(|g| g.state.load_level(&descriptor));
        Ok(())
    }

    #[wasm_bindgen]
    pub fn start() {
        with_game(|g| g.state.start());
    }

    #[wasm_bindgen]
    pub fn stop() {
        with_game(|g| g.state.stop());
    }

    #[wasm_bindgen]
    pub fn jump() {
        with_game(|g| g.input.jump = true);
    }

    #[wasm_bindgen]
    pub fn toggle_pause() {
        with_game(|g| g.input.pause = true);
    }

    #[wasm_bindgen]
    pub fn toggle_mute() -> bool {
        with_game(|g| {
            let muted = g.settings.toggle_mute();
            g.settings.save();
            muted
        })
        .unwrap_or(false)
    }

    #[wasm_bindgen]
    pub fn set_particles(enabled: bool) {
        with_game(|g| {
            g.settings.particles = enabled;
            g.state.apply_settings(&g.settings);
            g.settings.save();
        });
    }

    #[wasm_bindgen]
    pub fn attempts() -> u32 {
        with_game(|g| g.state.stats.attempts).unwrap_or(0)
    }

    /// JSON snapshot of everything the canvas renderer draws
    #[wasm_bindgen]
    pub fn render_view() -> String {
        with_game(|g| serde_json::to_string(&g.state.render_view()).unwrap_or_default())
            .unwrap_or_default()
    }

    fn set_field(obj: &js_sys::Object, key: &str, value: JsValue) {
        let _ = js_sys::Reflect::set(obj, &JsValue::from_str(key), &value);
    }

    /// Forward an engine event to the page as a `CustomEvent` on `window`
    fn dispatch_event(event: &GameEvent, settings: &Settings) {
        let Some(window) = web_sys::window() else {
            return;
        };

        let detail = js_sys::Object::new();
        let name = match event {
            GameEvent::Sound { effect } => {
                set_field(&detail, "effect", JsValue::from_str(effect.as_str()));
                set_field(
                    &detail,
                    "volume",
                    JsValue::from_f64(settings.effective_sfx_volume() as f64),
                );
                "sound"
            }
            GameEvent::GameOver { progress, attempts } => {
                set_field(&detail, "progress", JsValue::from(*progress));
                set_field(&detail, "attempts", JsValue::from(*attempts));
                "gameover"
            }
            GameEvent::Victory { attempts } => {
                set_field(&detail, "attempts", JsValue::from(*attempts));
                "victory"
            }
        };

        let init = CustomEventInit::new();
        init.set_detail(&detail);
        match CustomEvent::new_with_event_init_dict(name, &init) {
            Ok(ev) => {
                let _ = window.dispatch_event(&ev);
            }
            Err(e) => log::warn!("Failed to create {} event: {:?}", name, e),
        }
    }

    fn viewport_size(window: &web_sys::Window) -> (f64, f64) {
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(cube_dash::consts::DEFAULT_VIEWPORT_WIDTH);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(cube_dash::consts::DEFAULT_VIEWPORT_HEIGHT);
        (width, height)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        let Some(window) = web_sys::window() else {
            log::error!("No window - cannot start");
            return;
        };

        let Some(canvas) = window
            .document()
            .and_then(|doc| doc.get_element_by_id(CANVAS_ID))
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No <canvas id=\"{}\"> - cannot start", CANVAS_ID);
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        fit_canvas(&window, &canvas, &game);
        GAME.with(|slot| *slot.borrow_mut() = Some(game.clone()));

        setup_input(&canvas, game.clone());
        setup_resize(canvas, game.clone());
        setup_auto_pause(game.clone());
        request_animation_frame(game);

        log::info!("Cube Dash ready (seed {})", seed);
    }

    fn setup_input(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard: Space jumps, Escape/P pauses
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "Space" => {
                        if g.state.is_running() {
                            event.prevent_default();
                        }
                        // Key repeat is a held key, not a new press
                        if !event.repeat() {
                            g.input.jump = true;
                        }
                    }
                    "Escape" | "KeyP" => g.input.pause = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click on the game canvas
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.jump = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().input.jump = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Canvas fills the window; the ground follows its height
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement, game: &Rc<RefCell<Game>>) {
        let (w, h) = viewport_size(window);
        canvas.set_width(w as u32);
        canvas.set_height(h as u32);
        game.borrow_mut().state.resize(w, h);
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let window_clone = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            fit_canvas(&window_clone, &canvas, &game);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        // Window blur (tab switch, click outside)
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            if g.state.is_running() {
                g.input.pause = true;
                log::info!("Auto-paused (window blur)");
            }
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let (events, settings) = {
            let mut g = game.borrow_mut();
            let events = g.update(time);
            (events, g.settings.clone())
        };
        // Page listeners may call back into the exports (e.g. restart on
        // gameover), so the game must not be borrowed while dispatching
        for event in &events {
            dispatch_event(event, &settings);
        }
        request_animation_frame(game);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;
    use thiserror::Error;

    use cube_dash::sim::{
        GameEvent, GameState, LevelError, LevelPack, RunPhase, TickInput, generate_default_level,
    };
    use cube_dash::{Settings, Tuning, TuningError};

    /// Safety stop for levels that never end
    pub const MAX_FRAMES: u64 = 1_000_000;
    /// Nominal 60 Hz host timestamps (ms)
    const FRAME_MS: f64 = 1000.0 / 60.0;

    #[derive(Parser, Debug)]
    #[command(name = "cube-dash")]
    #[command(about = "Play one attempt of a Cube Dash level headless", long_about = None)]
    #[command(version)]
    pub struct Cli {
        /// Level pack JSON (`{"levels": [...]}`); a generated level is used when omitted
        pub level_file: Option<PathBuf>,

        /// Index of the level inside the pack
        #[arg(long, default_value_t = 0)]
        pub level: usize,

        /// Physics tuning JSON (partial documents allowed)
        #[arg(long)]
        pub tuning: Option<PathBuf>,

        /// Press jump every N frames
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        pub jump_every: Option<u64>,

        /// Seed for particles and the generated level
        #[arg(long, default_value_t = 1)]
        pub seed: u64,
    }

    #[derive(Error, Debug)]
    pub enum RunError {
        #[error(transparent)]
        Level(#[from] LevelError),

        #[error(transparent)]
        Tuning(#[from] TuningError),

        #[error("I/O error: {0}")]
        Io(#[from] std::io::Error),

        #[error("Level did not finish within {0} frames")]
        FrameLimit(u64),
    }

    pub fn run(cli: Cli) -> Result<(), RunError> {
        let tuning = match &cli.tuning {
            Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
            None => Tuning::default(),
        };

        let descriptor = match &cli.level_file {
            Some(path) => LevelPack::from_path(path)?.get(cli.level)?.clone(),
            None => {
                log::info!("No level file given, using generated level (seed {})", cli.seed);
                generate_default_level(cli.seed)
            }
        };

        let mut state = GameState::new(cli.seed, tuning, &Settings::default());
        state.load_level(&descriptor);
        state.start();

        play(&mut state, cli.jump_every, MAX_FRAMES)?;

        println!(
            "{} after {} frames, camera x={} / {}",
            if state.phase == RunPhase::Won { "Won" } else { "Dead" },
            state.frame,
            state.camera.x,
            state.level.length_units
        );
        Ok(())
    }

    /// Step a started run until it ends, printing the outcome events
    pub fn play(
        state: &mut GameState,
        jump_every: Option<u64>,
        max_frames: u64,
    ) -> Result<(), RunError> {
        let mut frame = 0u64;
        while !state.phase.is_terminal() {
            if frame >= max_frames {
                state.stop();
                return Err(RunError::FrameLimit(max_frames));
            }
            let input = TickInput {
                jump: jump_every.is_some_and(|n| frame % n == 0),
                ..Default::default()
            };
            state.step_with_input(frame as f64 * FRAME_MS, &input);
            frame += 1;

            for event in state.drain_events() {
                match event {
                    GameEvent::Sound { effect } => log::debug!("sound: {}", effect.as_str()),
                    GameEvent::GameOver { progress, attempts } => {
                        println!("Game over at {}% (attempt {})", progress, attempts);
                    }
                    GameEvent::Victory { attempts } => {
                        println!("Victory after {} attempt(s)", attempts);
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    let cli = native::Cli::parse();
    log::info!("Cube Dash (native, headless) starting...");

    if let Err(e) = native::run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
