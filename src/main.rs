//! Midnight Heist entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CustomEvent, CustomEventInit, EventTarget, HtmlCanvasElement, KeyboardEvent, Window};

    use midnight_heist::camera::{FollowCamera, Viewport};
    use midnight_heist::consts::*;
    use midnight_heist::hud::publish_after;
    use midnight_heist::input::KeyState;
    use midnight_heist::renderer::{RenderState, ScenePainter, SceneVertex};
    use midnight_heist::scene::Scenery;
    use midnight_heist::sim::{FrameInput, GameEvent, GameState, tick};
    use midnight_heist::{HudPublisher, HudView, Settings, Tuning};

    /// Name of the window event carrying HUD updates for page scripts
    const HUD_EVENT: &str = "heist-state";

    /// Game instance holding all state
    struct Game {
        state: GameState,
        scenery: Scenery,
        painter: ScenePainter,
        render_state: Option<RenderState>,
        camera: FollowCamera,
        keys: KeyState,
        hud: HudPublisher,
        settings: Settings,
        canvas: HtmlCanvasElement,
        accumulator: f32,
        last_time: f64,
        resize_pending: bool,
        /// Reused per-frame vertex buffer
        frame_vertices: Vec<SceneVertex>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Frame loop control
        running: bool,
        frame_request: Option<i32>,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning, settings: Settings, canvas: HtmlCanvasElement) -> Self {
            let mut camera = FollowCamera::new();
            camera.set_viewport(Viewport::new(canvas.width(), canvas.height()));

            Self {
                state: GameState::with_tuning(seed, tuning),
                scenery: Scenery::generate(seed),
                painter: ScenePainter::new(settings.quality),
                render_state: None,
                camera,
                keys: KeyState::new(),
                hud: HudPublisher::new(),
                settings,
                canvas,
                accumulator: 0.0,
                last_time: 0.0,
                resize_pending: false,
                frame_vertices: Vec::new(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                running: true,
                frame_request: None,
            }
        }

        fn attach_renderer(&mut self, mut render_state: RenderState) {
            render_state.set_scenery(&self.painter.scenery_vertices(&self.scenery));
            self.render_state = Some(render_state);
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(MAX_FRAME_DT);
            self.accumulator += dt;

            let input = FrameInput {
                keys: self.keys.move_keys(),
                time_ms: time,
            };

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &input);
                self.log_events();
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
            // Drop the backlog rather than spiral on slow frames
            if substeps == MAX_SUBSTEPS {
                self.accumulator = self.accumulator.min(SIM_DT);
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        fn log_events(&self) {
            for event in &self.state.events {
                match *event {
                    GameEvent::JewelCollected { score } => log::debug!("Jewel collected, score {}", score),
                    GameEvent::AlarmSpawned { count } => log::debug!("Alarm spawned, {} active", count),
                    GameEvent::Caught { score } => log::debug!("Session over at score {}", score),
                }
            }
        }

        /// Apply a pending canvas resize
        fn apply_resize(&mut self) {
            if !std::mem::take(&mut self.resize_pending) {
                return;
            }
            let Some(window) = web_sys::window() else {
                return;
            };

            let viewport = canvas_viewport(&window, &self.canvas, &self.settings);
            self.canvas.set_width(viewport.width);
            self.canvas.set_height(viewport.height);
            self.camera.set_viewport(viewport);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(viewport);
            }
            log::debug!("Resized to {}x{}", viewport.width, viewport.height);
        }

        /// Render the current frame
        fn render(&mut self) {
            self.camera.follow(self.state.player.pos);
            self.painter
                .frame_vertices(&self.state, self.settings.reduced_motion, &mut self.frame_vertices);

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(self.camera.view_projection_matrix(), &self.frame_vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM. Returns the view if it changed.
        fn update_hud(&mut self) -> Option<HudView> {
            let window = web_sys::window()?;
            let document = window.document()?;

            if self.settings.show_fps {
                if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                    el.set_text_content(Some(&self.fps.to_string()));
                }
            }

            let view = self.hud.publish(&self.state)?;

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&view.score.to_string()));
            }

            if let Some(el) = document.get_element_by_id("game-over") {
                let class = if view.is_game_over { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }

            Some(view)
        }

        /// Throw the session away and start a new one
        fn restart(&mut self, seed: u64) {
            self.state = self.state.restarted(seed);
            self.scenery = Scenery::generate(seed);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.set_scenery(&self.painter.scenery_vertices(&self.scenery));
            }
            self.keys.reset();
            self.hud.reset();
            self.accumulator = 0.0;
            log::info!("Game restarted with seed: {}", seed);
        }
    }

    fn dispatch_hud_event(window: &Window, view: &HudView) -> Result<(), JsValue> {
        let detail = js_sys::JSON::parse(&view.to_json())?;
        let init = CustomEventInit::new();
        init.set_detail(&detail);
        let event = CustomEvent::new_with_event_init_dict(HUD_EVENT, &init)?;
        window.dispatch_event(&event)?;
        Ok(())
    }

    /// Canvas backing size: CSS size times device pixel ratio, capped by quality
    fn canvas_viewport(window: &Window, canvas: &HtmlCanvasElement, settings: &Settings) -> Viewport {
        Viewport::from_css(
            canvas.client_width() as f64,
            canvas.client_height() as f64,
            window.device_pixel_ratio(),
            settings.quality.max_pixel_ratio(),
        )
    }

    fn has_webgpu(window: &Window) -> bool {
        js_sys::Reflect::has(&window.navigator(), &JsValue::from_str("gpu")).unwrap_or(false)
    }

    /// A registered DOM listener, removed again on teardown
    struct Listener {
        target: EventTarget,
        event: &'static str,
        callback: Closure<dyn FnMut(web_sys::Event)>,
    }

    impl Listener {
        fn attach(
            target: &EventTarget,
            event: &'static str,
            handler: impl FnMut(web_sys::Event) + 'static,
        ) -> Result<Self, JsValue> {
            let callback = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
            target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
            Ok(Self {
                target: target.clone(),
                event,
                callback,
            })
        }

        fn detach(self) {
            if let Err(e) = self
                .target
                .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
            {
                log::warn!("Failed to remove {} listener: {:?}", self.event, e);
            }
        }
    }

    /// Everything that must be released when the page goes away
    struct Session {
        game: Rc<RefCell<Game>>,
        listeners: Vec<Listener>,
    }

    impl Session {
        fn teardown(self) {
            {
                let mut g = self.game.borrow_mut();
                g.running = false;
                if let Some(id) = g.frame_request.take() {
                    if let Some(window) = web_sys::window() {
                        let _ = window.cancel_animation_frame(id);
                    }
                }
                // Drops surface and device
                g.render_state = None;
                g.keys.reset();
            }

            for listener in self.listeners {
                listener.detach();
            }
            log::info!("Midnight Heist shut down");
        }
    }

    thread_local! {
        static SESSION: RefCell<Option<Session>> = const { RefCell::new(None) };
    }

    /// Release the session. Safe to call more than once.
    pub fn shutdown() {
        let session = SESSION.with(|s| s.borrow_mut().take());
        if let Some(session) = session {
            session.teardown();
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&format!("Failed to init logger: {e}")))?;

        log::info!("Midnight Heist starting...");

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

        let settings = Settings::load();
        let tuning = Tuning::load();

        let viewport = canvas_viewport(&window, &canvas, &settings);
        canvas.set_width(viewport.width);
        canvas.set_height(viewport.height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, tuning, settings, canvas.clone())));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU, falling back to WebGL2
        let backends = if has_webgpu(&window) {
            wgpu::Backends::BROWSER_WEBGPU
        } else {
            log::warn!("WebGPU unavailable, falling back to WebGL2");
            wgpu::Backends::GL
        };
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {e}")))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, viewport)
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get device: {e}")))?;
        game.borrow_mut().attach_renderer(render_state);

        let listeners = setup_listeners(&window, &document, &game)?;
        SESSION.with(|s| {
            *s.borrow_mut() = Some(Session {
                game: game.clone(),
                listeners,
            })
        });

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }
        if let Some(fps) = document.get_element_by_id("hud-fps") {
            let class = if game.borrow().settings.show_fps { "hud-item" } else { "hud-item hidden" };
            let _ = fps.set_attribute("class", class);
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Midnight Heist running!");
        Ok(())
    }

    fn setup_listeners(
        window: &Window,
        document: &web_sys::Document,
        game: &Rc<RefCell<Game>>,
    ) -> Result<Vec<Listener>, JsValue> {
        let mut listeners = Vec::new();

        // Keyboard
        {
            let game = game.clone();
            listeners.push(Listener::attach(window, "keydown", move |event| {
                if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                    if game.borrow_mut().keys.set_key(&event.key(), true) {
                        // Keep arrow keys from scrolling the page
                        event.prevent_default();
                    }
                }
            })?);
        }
        {
            let game = game.clone();
            listeners.push(Listener::attach(window, "keyup", move |event| {
                if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                    game.borrow_mut().keys.set_key(&event.key(), false);
                }
            })?);
        }

        // Keyup never arrives once focus is gone
        {
            let game = game.clone();
            listeners.push(Listener::attach(window, "blur", move |_event| {
                game.borrow_mut().keys.reset();
            })?);
        }

        {
            let game = game.clone();
            listeners.push(Listener::attach(window, "resize", move |_event| {
                game.borrow_mut().resize_pending = true;
            })?);
        }

        // Restart button
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            listeners.push(Listener::attach(&btn, "click", move |_event| {
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().restart(seed);
            })?);
        }

        listeners.push(Listener::attach(window, "pagehide", move |_event| shutdown())?);

        Ok(listeners)
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if !game.borrow().running {
            return;
        }

        let handle = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(handle, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => game.borrow_mut().frame_request = Some(id),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        // Page listeners for the HUD event run after the game is released
        publish_after(
            &game,
            |g| {
                g.frame_request = None;
                if !g.running {
                    return None;
                }

                // Calculate delta time
                let dt = if g.last_time > 0.0 {
                    ((time - g.last_time) / 1000.0) as f32
                } else {
                    SIM_DT
                };
                g.last_time = time;

                g.apply_resize();
                g.update(dt, time);
                g.render();
                g.update_hud()
            },
            |view| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                if let Err(e) = dispatch_hud_event(&window, &view) {
                    log::warn!("Failed to dispatch {}: {:?}", HUD_EVENT, e);
                }
            },
        );

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Midnight Heist failed to start: {:?}", e);
    }
}

/// Stop the game loop and release listeners and GPU resources
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn shutdown() {
    wasm_game::shutdown();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Midnight Heist (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    let state = demo::run(seed, demo::DEMO_STEPS);
    println!(
        "Seed {}: {} jewels in {} steps ({})",
        seed,
        state.score,
        state.time_steps,
        if state.is_game_over() { "caught" } else { "escaped" }
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless autopilot: walk to the nearest jewel until caught or out of time
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use midnight_heist::consts::SIM_DT;
    use midnight_heist::ground_distance;
    use midnight_heist::sim::{FrameInput, GameEvent, GameState, MoveKeys, advance};

    /// One minute of play
    pub const DEMO_STEPS: u64 = 3600;

    pub fn run(seed: u64, steps: u64) -> GameState {
        let mut state = GameState::new(seed);
        log::info!("Demo session with seed: {}", seed);

        for step in 0..steps {
            let input = FrameInput {
                keys: steer(&state),
                time_ms: step as f64 * SIM_DT as f64 * 1000.0,
            };
            state = advance(state, &input);

            for event in &state.events {
                match *event {
                    GameEvent::JewelCollected { score } => log::info!("Step {}: jewel, score {}", step, score),
                    GameEvent::AlarmSpawned { count } => log::info!("Step {}: alarm #{}", step, count),
                    GameEvent::Caught { .. } => {}
                }
            }
            if state.is_game_over() {
                break;
            }
        }

        state
    }

    /// Move along the dominant axis toward the nearest jewel
    fn steer(state: &GameState) -> MoveKeys {
        let pos = state.player.pos;
        let target = state
            .jewels
            .iter()
            .map(|j| j.pos)
            .min_by(|a, b| ground_distance(pos, *a).total_cmp(&ground_distance(pos, *b)));

        let Some(target) = target else {
            return MoveKeys::default();
        };
        let delta = target - pos;
        if delta.x.abs() > delta.y.abs() {
            MoveKeys {
                left: delta.x < 0.0,
                right: delta.x > 0.0,
                ..Default::default()
            }
        } else {
            MoveKeys {
                forward: delta.y < 0.0,
                back: delta.y > 0.0,
                ..Default::default()
            }
        }
    }

}
