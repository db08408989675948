//! Windowed viewer (feature `viewer`).
//!
//! Opens a square window, ticks the sketch at its configured frame rate and
//! shows the canvas as it is drawn. Snapshot outcomes are written to disk as
//! they happen; the final canvas is written when the window closes.
//!
//! Keys: `Space` pauses, `S` saves the current canvas, `Esc` quits.

mod present;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use crate::canvas::numbered_path;
use crate::error::{ExportError, ViewerError};
use crate::sketch::{Sketch, SketchState, TickOutcome};
use crate::time::FrameClock;

pub use present::Presenter;

/// Where the viewer writes images.
#[derive(Clone, Debug)]
pub struct ViewerOptions {
    /// Final canvas on close; snapshots use this path with a `-NNNN` suffix.
    pub out: PathBuf,
    /// Stop ticking after this many frames.
    pub max_frames: Option<u64>,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            out: PathBuf::from("driftfield.png"),
            max_frames: None,
        }
    }
}

/// Run `sketch` in a window until it is closed. The sketch must be started.
///
/// Returns the sketch so the caller can inspect its final state.
pub fn run(sketch: Sketch, options: ViewerOptions) -> Result<Sketch, ViewerError> {
    let event_loop = EventLoop::new()?;
    let mut app = ViewerApp::new(sketch, options);
    event_loop.run_app(&mut app)?;

    if let Some(err) = app.error.take() {
        return Err(err);
    }
    app.sketch.surface().save(&app.options.out)?;
    Ok(app.sketch)
}

struct ViewerApp {
    sketch: Sketch,
    options: ViewerOptions,
    clock: FrameClock,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    /// Canvas changed since the last upload.
    dirty: bool,
    manual_saves: u64,
    error: Option<ViewerError>,
}

impl ViewerApp {
    fn new(sketch: Sketch, options: ViewerOptions) -> Self {
        let clock = FrameClock::new(sketch.config().frame_rate);
        Self {
            sketch,
            options,
            clock,
            window: None,
            presenter: None,
            dirty: true,
            manual_saves: 0,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: ViewerError) {
        error!(target: "viewer", "{err}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn finished(&self) -> bool {
        self.sketch.state() == SketchState::Frozen
            || self
                .options
                .max_frames
                .is_some_and(|max| self.sketch.total_frames() >= max)
    }

    fn tick(&mut self) -> Result<(), ViewerError> {
        match self.sketch.tick()? {
            TickOutcome::Snapshot => {
                let path = numbered_path(&self.options.out, self.sketch.snapshots());
                self.sketch.surface().save(&path)?;
            }
            TickOutcome::Froze => {
                info!(target: "viewer", frames = self.sketch.total_frames(), "sketch frozen");
            }
            TickOutcome::Advanced | TickOutcome::Idle => {}
        }
        self.dirty = true;
        Ok(())
    }

    fn save_now(&mut self) -> Result<(), ExportError> {
        self.manual_saves += 1;
        let mut stem = self.options.out.clone();
        stem.set_file_name(format!(
            "{}-manual.png",
            self.options
                .out
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("driftfield")
        ));
        self.sketch.surface().save(numbered_path(&stem, self.manual_saves))
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(presenter) = &mut self.presenter else {
            return;
        };
        if self.dirty {
            presenter.upload(self.sketch.surface().as_bytes());
            self.dirty = false;
        }
        match presenter.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = presenter.size();
                presenter.resize(width, height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!(target: "viewer", "GPU out of memory");
                event_loop.exit();
            }
            Err(e) => warn!(target: "viewer", "render error: {e:?}"),
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let size = self.sketch.config().canvas_size;
        let attrs = Window::default_attributes()
            .with_title(format!("driftfield - {}", self.sketch.config().name))
            .with_inner_size(winit::dpi::LogicalSize::new(size, size));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        match pollster::block_on(Presenter::new(window.clone(), size)) {
            Ok(presenter) => self.presenter = Some(presenter),
            Err(e) => return self.fail(event_loop, e.into()),
        }
        info!(target: "viewer", size, fps = self.sketch.config().frame_rate, "viewer opened");
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(physical_size) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.resize(physical_size.width, physical_size.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match logical_key {
                Key::Named(NamedKey::Escape) => event_loop.exit(),
                Key::Named(NamedKey::Space) => {
                    self.clock.toggle_pause();
                    info!(target: "viewer", paused = self.clock.is_paused(), "pause toggled");
                }
                Key::Character(c) if c.as_str().eq_ignore_ascii_case("s") => {
                    if let Err(e) = self.save_now() {
                        warn!(target: "viewer", "save skipped: {e}");
                    }
                }
                _ => {}
            },
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.error.is_some() {
            return;
        }
        if self.finished() || self.clock.is_paused() {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        }

        let now = Instant::now();
        if self.clock.advance(now) {
            if let Err(e) = self.tick() {
                return self.fail(event_loop, e);
            }
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        match self.clock.next_due() {
            Some(due) => event_loop.set_control_flow(ControlFlow::WaitUntil(due)),
            None => event_loop.set_control_flow(ControlFlow::Poll),
        }
    }
}
