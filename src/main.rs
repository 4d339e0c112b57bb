//! Epicycles - a chain of rotating circles drawing a signal's Fourier series.
//!
//! The signal is analysed once at startup; each frame the chain is re-posed
//! and its apex leaves a fading trace.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{error, info};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use epicycles::canvas::LineBatch;
use epicycles::cli::Args;
use epicycles::engine::EpicycleEngine;
use epicycles::frame::FrameClock;
use epicycles::params::{RecordingConfig, RenderConfig};
use epicycles::rendering::RenderSystem;

/// FFT length for the `--verify` cross-check
const VERIFY_SAMPLES: usize = 4096;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    batch: LineBatch,

    // Animation
    engine: EpicycleEngine,
    clock: FrameClock,

    // Configuration
    render_config: RenderConfig,
    recording_config: Option<RecordingConfig>,
    frame_delay: Duration,

    // Frame pacing
    next_frame_at: Instant,
    frame_num: usize,
    failed: bool,
}

impl App {
    fn new(
        engine: EpicycleEngine,
        clock: FrameClock,
        render_config: RenderConfig,
        recording_config: Option<RecordingConfig>,
        frame_delay: Duration,
    ) -> Self {
        Self {
            window: None,
            render_system: None,
            batch: LineBatch::new(),
            engine,
            clock,
            render_config,
            recording_config,
            frame_delay,
            next_frame_at: Instant::now(),
            frame_num: 0,
            failed: false,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, message: String) {
        error!("{}", message);
        self.failed = true;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };

        // Recording renders as fast as frames can be captured
        if self.recording_config.is_some() || Instant::now() >= self.next_frame_at {
            window.request_redraw();
        } else {
            event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame_at));
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Create window
        let window_attributes = Window::default_attributes()
            .with_title("Epicycles")
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, format!("Failed to create window: {}", e)),
        };

        // Initialize rendering system
        let render_system = match pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            self.engine.palette().background,
            self.recording_config.clone(),
        )) {
            Ok(render_system) => render_system,
            Err(e) => return self.fail(event_loop, e),
        };

        // The window manager may not honour the requested size
        let (width, height) = render_system.size();
        self.engine.resize(width, height);

        info!("Epicycles is running ({}x{}), press ESC to quit", width, height);

        self.window = Some(window);
        self.render_system = Some(render_system);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(ref mut render_system) = self.render_system {
                    render_system.resize(size.width, size.height);
                }
                if size.width > 0 && size.height > 0 {
                    self.engine.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render_frame(event_loop);
            }
            _ => {}
        }
    }
}

impl App {
    /// Render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(ref mut render_system) = self.render_system else {
            return;
        };

        let tick = self.clock.tick();
        self.batch.clear();
        self.engine.frame(&tick, &mut self.batch);
        render_system.update_lines(self.batch.vertices());

        match render_system.render(self.frame_num) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = render_system.size();
                render_system.resize(width, height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return self.fail(event_loop, "Render error: out of GPU memory".to_string());
            }
            Err(e) => error!("Render error: {:?}", e),
        }

        self.frame_num += 1;
        self.next_frame_at = Instant::now() + self.frame_delay;

        if let Some(ref config) = self.recording_config {
            if self.frame_num >= config.total_frames() {
                info!(
                    "Recorded {} frames to {}",
                    self.frame_num,
                    config.frames_dir()
                );
                event_loop.exit();
            }
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    let recording_config = match args.create_recording_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to create recording directories: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let engine_config = match args.engine_config(recording_config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let time_step = engine_config.animation.time_step;
    let frame_delay = match recording_config {
        Some(_) => Duration::ZERO,
        None => engine_config.animation.frame_delay(),
    };

    let render_config = args.render_config();
    let engine = match EpicycleEngine::new(
        engine_config,
        render_config.window_width,
        render_config.window_height,
    ) {
        Ok(engine) => engine,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.verify {
        match engine.cross_check(VERIFY_SAMPLES) {
            Some(Ok(deviation)) => info!("FFT cross-check: max deviation {:.6}", deviation),
            Some(Err(e)) => error!("FFT cross-check failed: {}", e),
            None => info!("FFT cross-check skipped: coefficients were not analysed"),
        }
    }

    let clock = FrameClock::new(time_step);
    info!(
        "Period {} s, time step {:?}",
        engine.period_s(),
        clock.step()
    );

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            error!("Failed to create event loop: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut app = App::new(
        engine,
        clock,
        render_config,
        recording_config,
        frame_delay,
    );

    if let Err(e) = event_loop.run_app(&mut app) {
        error!("Event loop error: {}", e);
        return ExitCode::FAILURE;
    }

    if app.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
