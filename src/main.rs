//! Steam Loco entry point
//!
//! Handles platform-specific initialization and wires the scene to the
//! platform's frame callback and interval timer.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_scene {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, Window};

    use steam_loco::consts::SMOKE_INTERVAL;
    use steam_loco::renderer::RenderState;
    use steam_loco::sim::{FrameClock, FrameStats, SceneState, frame, spawn_tick};

    /// Frames between debug FPS reports
    const STATS_EVERY: u64 = 600;

    /// Scene instance holding all state
    struct App {
        scene: SceneState,
        render_state: Option<RenderState>,
        clock: FrameClock,
        stats: FrameStats,
    }

    impl App {
        fn new(seed: u64, width: f32, height: f32, now_ms: f64) -> Self {
            Self {
                scene: SceneState::new(seed, width, height),
                render_state: None,
                clock: FrameClock::started_at(now_ms),
                stats: FrameStats::default(),
            }
        }

        /// Per-frame callback: recompute everything from absolute time
        fn on_frame(&mut self, time_ms: f64) {
            let t = self.clock.elapsed(time_ms);
            frame(&mut self.scene, t);
            self.render();

            self.stats.record(time_ms);
            if self.stats.frames() % STATS_EVERY == 0 {
                log::debug!(
                    "{} fps, {} smoke puffs live",
                    self.stats.fps(),
                    self.scene.smoke.len()
                );
            }
        }

        /// Interval callback: one puff from wherever the chimney is now
        fn on_spawn(&mut self, now_ms: f64) {
            let t = self.clock.elapsed(now_ms);
            spawn_tick(&mut self.scene, t);
        }

        fn on_resize(&mut self, size: CanvasSize, now_ms: f64) {
            let t = self.clock.elapsed(now_ms);
            self.scene.resize(size.css_width, size.css_height, t);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(size.px_width, size.px_height);
                render_state.set_stage(size.css_width, size.css_height);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render_scene(&self.scene) {
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
        }
    }

    /// Canvas size in CSS pixels (the stage) and device pixels (the surface)
    #[derive(Debug, Clone, Copy)]
    struct CanvasSize {
        css_width: f32,
        css_height: f32,
        px_width: u32,
        px_height: u32,
    }

    fn canvas_size(window: &Window, canvas: &HtmlCanvasElement) -> CanvasSize {
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(0);
        let client_h = canvas.client_height().max(0);
        CanvasSize {
            css_width: client_w as f32,
            css_height: client_h as f32,
            px_width: ((client_w as f64 * dpr) as u32).max(1),
            px_height: ((client_h as f64 * dpr) as u32).max(1),
        }
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map_or(0.0, |p| p.now())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {e}").into());
        }

        log::info!("Steam Loco starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "element #canvas is not a canvas")?;

        let size = canvas_size(&window, &canvas);
        canvas.set_width(size.px_width);
        canvas.set_height(size.px_height);

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(
            seed,
            size.css_width,
            size.css_height,
            now_ms(),
        )));
        log::info!("Scene initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| format!("Failed to create surface: {e}"))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| format!("Failed to get adapter: {e}"))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(
            surface,
            &adapter,
            size.px_width,
            size.px_height,
            (size.css_width, size.css_height),
        )
        .await
        .map_err(|e| format!("Failed to create device: {e}"))?;
        app.borrow_mut().render_state = Some(render_state);

        setup_resize(&window, &canvas, app.clone());
        setup_spawn_interval(&window, app.clone())?;

        // Start frame loop
        request_animation_frame(app);

        log::info!("Steam Loco running!");
        Ok(())
    }

    fn setup_resize(window: &Window, canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let size = canvas_size(&window, &canvas);
            canvas.set_width(size.px_width);
            canvas.set_height(size.px_height);
            app.borrow_mut().on_resize(size, now_ms());
        });
        if let Err(e) =
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
        {
            log::warn!("Resize listener not installed: {:?}", e);
        }
        closure.forget();
    }

    fn setup_spawn_interval(window: &Window, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut()>::new(move || {
            app.borrow_mut().on_spawn(now_ms());
        });
        let interval_ms = (SMOKE_INTERVAL * 1000.0).round() as i32;
        window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            interval_ms,
        )?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            log::error!("No window, frame loop stopped");
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::warn!("requestAnimationFrame failed, frame loop stopped: {:?}", e);
        }
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().on_frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_scene::run().await {
        log::error!("Steam Loco failed to start: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use serde::Serialize;

    use steam_loco::consts::*;
    use steam_loco::sim::{IntervalTimer, LinkageFrame, SceneState, frame, spawn_tick};

    /// Fixed stepping rate for the headless run
    const FRAME_RATE: f32 = 60.0;

    /// One line of headless output
    #[derive(Serialize)]
    struct Snapshot<'a> {
        t: f32,
        offset_x: f32,
        wheel_angles: [f32; 2],
        linkage: &'a LinkageFrame,
        rod_length: f32,
        live_smoke: usize,
    }

    /// Step the scene for `seconds` of simulated time, printing a JSON
    /// snapshot every simulated second.
    pub fn run(seed: u64, seconds: f32) {
        let mut scene = SceneState::new(seed, STAGE_WIDTH, STAGE_HEIGHT);
        let mut spawner = IntervalTimer::new(SMOKE_INTERVAL, 0.0);

        let frames = (seconds * FRAME_RATE) as u32;
        let mut next_report = 0.0;

        for i in 0..=frames {
            let t = i as f32 / FRAME_RATE;
            frame(&mut scene, t);
            for _ in 0..spawner.poll(t, MAX_SPAWNS_PER_FRAME) {
                spawn_tick(&mut scene, t);
            }

            if t >= next_report {
                next_report += 1.0;
                let snapshot = Snapshot {
                    t,
                    offset_x: scene.motion.offset_x,
                    wheel_angles: scene.motion.wheel_angles,
                    linkage: &scene.linkage,
                    rod_length: scene.linkage.rod_length(),
                    live_smoke: scene.smoke.len(),
                };
                match serde_json::to_string(&snapshot) {
                    Ok(json) => println!("{json}"),
                    Err(e) => log::warn!("Snapshot at t={:.2} failed: {}", t, e),
                }
            }
        }

        log::info!(
            "Ran {:.1}s: {} puffs spawned, {} retired, {} live",
            seconds,
            scene.smoke.spawned_total(),
            scene.smoke.removed_total(),
            scene.smoke.len()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    log::info!("Steam Loco (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the web version");

    headless::run(0x5EED, 12.0);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
