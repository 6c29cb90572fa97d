//! Cube Dash entry point
//!
//! On the web this boots the canvas and runs the game loop. Natively it runs
//! a headless autopilot session and logs what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use cube_dash::Settings;
    use cube_dash::audio::{AudioManager, SoundEffect};
    use cube_dash::platform::{Command, command_for_button, command_for_key};
    use cube_dash::renderer::{CanvasRenderer, Effects, Skin, shapes};
    use cube_dash::sim::{FrameClock, GameEvent, GamePhase, GameState, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        clock: FrameClock,
        input: TickInput,
        renderer: CanvasRenderer,
        effects: Effects,
        audio: AudioManager,
        settings: Settings,
        skin: Skin,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, renderer: CanvasRenderer) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            audio.set_muted(settings.muted);

            let mut state = GameState::new(seed);
            if settings.muted {
                state.toggle_mute();
                state.drain_events();
            }

            Self {
                state,
                clock: FrameClock::new(),
                input: TickInput::default(),
                renderer,
                effects: Effects::new(settings.effective_screen_shake()),
                audio,
                skin: Skin::from_index(settings.skin),
                settings,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn command(&mut self, command: Command) {
            // Any gesture may unlock the audio context
            self.audio.resume();
            command.apply(&mut self.input);
            if command == Command::ToggleDemo {
                log::info!("Idle mode: {}", self.input.idle_mode);
            }
        }

        /// Run simulation ticks and route the events they produced
        fn update(&mut self, time: f64) {
            let ticks = self.clock.frame(time);
            for _ in 0..ticks {
                tick(&mut self.state, &self.input);
                // Clear one-shot inputs after processing
                self.input.clear_one_shots();
            }

            for event in self.state.drain_events() {
                self.on_event(&event);
            }
            self.effects
                .update(self.clock.last_dt(), &self.state.snapshot());

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 && time > oldest_time {
                self.fps = (60000.0 / (time - oldest_time)).round() as u32;
            }
        }

        fn on_event(&mut self, event: &GameEvent) {
            if let GameEvent::MuteToggled { muted } = event {
                self.audio.set_muted(*muted);
                self.settings.muted = *muted;
                self.settings.save();
            }
            if let Some(effect) = SoundEffect::for_event(event) {
                self.audio.play(effect);
            }
            self.effects.on_event(event, &self.state.snapshot());
        }

        fn cycle_skin(&mut self) {
            self.settings.skin = shapes::next_skin(self.settings.skin);
            self.skin = Skin::from_index(self.settings.skin);
            self.settings.save();
        }

        /// Render the current frame
        fn render(&self, time: f64) {
            let snap = self.state.snapshot();
            if let Err(e) =
                self.renderer
                    .render(&snap, &self.effects, &self.skin, &self.state.tuning, time)
            {
                log::warn!("Render error: {:?}", e);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let phase = self.state.phase;

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("level") {
                el.set_text_content(Some(&self.state.level.to_string()));
            }
            if let Some(el) = document.get_element_by_id("collected") {
                el.set_text_content(Some(&self.state.collected.to_string()));
            }
            if let Some(el) = document.get_element_by_id("level-progress") {
                el.set_text_content(Some(&format!("{:.0}%", self.state.progress_percent())));
            }
            if let Some(el) = document.get_element_by_id("mute-btn") {
                el.set_text_content(Some(if self.state.muted { "🔇" } else { "🔊" }));
            }
            if let Some(el) = document.get_element_by_id("fps") {
                set_hidden(document, "fps", !self.settings.show_fps);
                el.set_text_content(Some(&self.fps.to_string()));
            }

            set_hidden(document, "start-screen", phase != GamePhase::Idle);
            set_hidden(document, "game-ui", phase == GamePhase::Idle);
            set_hidden(document, "pause-menu", phase != GamePhase::Paused);

            set_hidden(document, "game-over-screen", phase != GamePhase::Dead);
            if phase == GamePhase::Dead {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&self.state.score.to_string()));
                }
            }

            set_hidden(document, "level-complete-screen", phase != GamePhase::Completed);
            if phase == GamePhase::Completed {
                if let Some(el) = document.get_element_by_id("completion-score") {
                    el.set_text_content(Some(&self.state.score.to_string()));
                }
            }
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Cube Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        set_hidden(&document, "loading-screen", true);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(cube_dash::consts::CANVAS_WIDTH as u32);
        canvas.set_height(cube_dash::consts::CANVAS_HEIGHT as u32);

        let seed = js_sys::Date::now() as u64;
        let renderer = CanvasRenderer::new(&canvas, seed).expect("Failed to get 2d context");
        let game = Rc::new(RefCell::new(Game::new(seed, renderer)));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(&document, game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Cube Dash running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().command(Command::Action);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().command(Command::Action);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                let Some(command) = command_for_key(&event.code()) else {
                    return;
                };
                // Keep Space/ArrowUp from scrolling the page
                if command == Command::Action {
                    event.prevent_default();
                }
                game.borrow_mut().command(command);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in ["play-btn", "restart-btn", "next-level-btn", "pause-btn", "mute-btn"] {
            let (Some(btn), Some(command)) = (document.get_element_by_id(id), command_for_button(id))
            else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().command(command);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("customize-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().cycle_skin();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }

    /// Pause a running level when the tab hides or the window loses focus
    fn auto_pause(game: &Rc<RefCell<Game>>, reason: &str) {
        let mut g = game.borrow_mut();
        if g.settings.pause_on_blur && g.state.phase == GamePhase::Running && !g.input.pause {
            g.input.pause = true;
            log::info!("Auto-paused ({})", reason);
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    auto_pause(&game, "tab hidden");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                auto_pause(&game, "window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
mod headless {
    use std::path::{Path, PathBuf};

    use clap::Parser;
    use cube_dash::audio::SoundEffect;
    use cube_dash::sim::{GamePhase, GameState, TickInput, Tuning, tick};

    /// Give up on a run after ten simulated minutes
    const MAX_TICKS: u64 = 60 * 60 * 10;

    /// Headless autopilot runner for Cube Dash
    #[derive(Debug, Parser)]
    #[command(
        name = "cube-dash",
        version,
        about = "Runs Cube Dash headless on autopilot and reports how far it got. Use `trunk serve` for the playable web build."
    )]
    pub struct Options {
        /// Seed for the field generator
        #[arg(short, long, default_value_t = 12345, value_name = "SEED")]
        pub seed: u64,

        /// Number of levels to attempt; the run stops at the first death
        #[arg(
            short,
            long,
            default_value_t = 1,
            value_name = "N",
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        pub levels: u32,

        /// JSON tuning override (any subset of fields)
        #[arg(short, long, value_name = "FILE")]
        pub tuning: Option<PathBuf>,
    }

    pub fn load_tuning(path: Option<&Path>) -> Result<Tuning, Box<dyn std::error::Error>> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                let tuning = Tuning::from_json(&json)?;
                log::info!("Loaded tuning from {}", path.display());
                Ok(tuning)
            }
            None => Ok(Tuning::default()),
        }
    }

    /// Play `levels` levels on autopilot, stopping at the first death
    pub fn run(options: &Options, tuning: Tuning) -> Result<GameState, Box<dyn std::error::Error>> {
        let mut state = GameState::builder()
            .tuning(tuning)
            .seed(options.seed)
            .build()?;
        let mut input = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        for level in 1..=options.levels {
            let mut ticks = 0;
            if level > 1 {
                input.next_level = true;
                tick(&mut state, &input);
                input.clear_one_shots();
                ticks += 1;
            }
            while !state.phase.is_terminal() && ticks < MAX_TICKS {
                tick(&mut state, &input);
                input.clear_one_shots();
                ticks += 1;

                for event in state.drain_events() {
                    let cue = SoundEffect::for_event(&event);
                    log::debug!("tick {}: {:?} (cue {:?})", state.time_ticks, event, cue);
                }
            }

            let snap = state.snapshot();
            log::info!(
                "Level {} ended {:?}: progress {:.0}% score {} collected {}",
                snap.level,
                snap.phase,
                snap.progress_percent,
                snap.score,
                snap.collected
            );
            if log::log_enabled!(log::Level::Debug) {
                log::debug!("Final snapshot: {}", serde_json::to_string(&snap)?);
            }
            if state.phase != GamePhase::Completed {
                break;
            }
        }

        Ok(state)
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    log::info!("Cube Dash (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    let options = headless::Options::parse();
    let tuning = match headless::load_tuning(options.tuning.as_deref()) {
        Ok(tuning) => tuning,
        Err(e) => {
            log::error!("Invalid tuning: {}", e);
            std::process::exit(1);
        }
    };

    match headless::run(&options, tuning) {
        Ok(state) => println!(
            "seed {} level {} {:?} score {}",
            options.seed, state.level, state.phase, state.score
        ),
        Err(e) => {
            log::error!("Run failed: {}", e);
            std::process::exit(1);
        }
    }
}
