//! The frame scheduler.
//!
//! [`Backdrop`] is the public entry point: configure it, then call
//! [`run`](Backdrop::run) to open a window and drive the simulation until
//! the window closes. Internally an [`App`] implements the winit
//! `ApplicationHandler` and owns everything with per-session lifetime: the
//! grid, the pointer sample, the frame clock, and the GPU state.
//!
//! Lifecycle is a small state machine:
//! `Uninitialized -> Running` on first resume, `Running -> Reinitializing ->
//! Running` on every resize (the grid is rebuilt wholesale, synchronously,
//! inside the resize handler so no frame ever reads a half-built grid), and
//! `Running -> Stopped` on teardown. Teardown is idempotent.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::GridConfig;
use crate::error::{BackdropError, GpuError};
use crate::gpu::GpuState;
use crate::grid::PointGrid;
use crate::physics;
use crate::pointer::Pointer;
use crate::render::{self, LineVertex, MarkerInstance};
use crate::time::FrameClock;

/// How often to surface an fps figure in the debug log, in frames.
const FPS_LOG_INTERVAL: u64 = 300;

/// A pointer-reactive particle-grid backdrop.
///
/// # Example
///
/// ```ignore
/// use driftgrid::{Backdrop, GridConfig, Theme};
///
/// Backdrop::with_config(GridConfig::new().with_theme(Theme::Light)).run()?;
/// ```
pub struct Backdrop {
    config: GridConfig,
}

impl Backdrop {
    /// Create a backdrop with the default parameter set.
    pub fn new() -> Self {
        Self {
            config: GridConfig::new(),
        }
    }

    /// Create a backdrop from an explicit config.
    pub fn with_config(config: GridConfig) -> Self {
        Self { config }
    }

    /// Open a window and run the simulation. Blocks until the window is
    /// closed.
    ///
    /// A missing rendering context does not abort the session; the loop
    /// keeps ticking with no-op frames and the failure is reported here
    /// after the window closes.
    pub fn run(self) -> Result<(), BackdropError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self.config);
        event_loop.run_app(&mut app)?;

        match app.init_failure.take() {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

impl Default for Backdrop {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Uninitialized,
    Running,
    Reinitializing,
    Stopped,
}

struct App {
    config: GridConfig,
    phase: Phase,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    grid: Option<PointGrid>,
    pointer: Pointer,
    clock: FrameClock,
    markers: Vec<MarkerInstance>,
    lines: Vec<LineVertex>,
    init_failure: Option<GpuError>,
}

impl App {
    fn new(config: GridConfig) -> Self {
        Self {
            config,
            phase: Phase::Uninitialized,
            window: None,
            gpu: None,
            grid: None,
            pointer: Pointer::new(),
            clock: FrameClock::new(),
            markers: Vec::new(),
            lines: Vec::new(),
            init_failure: None,
        }
    }

    /// Rebuild the grid for a new viewport. Precondition: no tick in flight,
    /// which the event loop guarantees by serializing events and redraws.
    ///
    /// A degenerate viewport keeps the previous grid (if any) and retries on
    /// the next valid resize.
    fn reinitialize(&mut self, width: u32, height: u32) {
        if self.phase == Phase::Stopped {
            return;
        }
        self.phase = Phase::Reinitializing;

        match PointGrid::new(width as f32, height as f32, &self.config) {
            Some(grid) => {
                log::debug!(
                    "grid rebuilt for {width}x{height}: {}x{} points",
                    grid.cols(),
                    grid.rows()
                );
                self.grid = Some(grid);
            }
            None => {
                log::warn!("degenerate viewport {width}x{height}, keeping previous grid");
            }
        }

        self.phase = Phase::Running;
    }

    /// One simulation tick: physics step plus geometry rebuild. Draw
    /// submission happens separately so this stays testable without a GPU.
    fn advance(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        let Some(grid) = self.grid.as_mut() else {
            return;
        };

        physics::step(grid, self.pointer.sample(), &self.config);
        render::marker_instances(grid, &mut self.markers);
        render::line_vertices(grid, &mut self.lines);

        self.clock.update();
        if self.clock.frame() % FPS_LOG_INTERVAL == 0 {
            log::debug!("frame {}: {:.1} fps", self.clock.frame(), self.clock.fps());
        }
    }

    /// Release everything with per-session lifetime. Safe to call any number
    /// of times; only the first has any effect.
    fn shutdown(&mut self) {
        if self.phase == Phase::Stopped {
            return;
        }
        self.phase = Phase::Stopped;
        self.grid = None;
        self.gpu = None;
        self.window = None;
        log::debug!("backdrop stopped after {} frames", self.clock.frame());
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("driftgrid")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("window creation failed: {e}");
                return;
            }
        };
        self.window = Some(window.clone());

        match pollster::block_on(GpuState::new(window.clone(), self.config.theme)) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                // Keep running with no-op frames rather than taking the
                // host down with us.
                log::error!("renderer unavailable, frames will no-op: {e}");
                self.init_failure = Some(e);
            }
        }

        let size = window.inner_size();
        self.reinitialize(size.width, size.height);
        window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.pointer.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                self.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size);
                }
                self.reinitialize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                self.advance();

                let line_capacity = self
                    .grid
                    .as_ref()
                    .map(render::max_line_vertices)
                    .unwrap_or(0);
                let outcome = self
                    .gpu
                    .as_mut()
                    .map(|gpu| gpu.render(&self.markers, &self.lines, line_capacity));
                match outcome {
                    None | Some(Ok(())) => {}
                    Some(Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                        if let Some(gpu) = &mut self.gpu {
                            let size = winit::dpi::PhysicalSize::new(
                                gpu.config.width,
                                gpu.config.height,
                            );
                            gpu.resize(size);
                        }
                    }
                    Some(Err(wgpu::SurfaceError::OutOfMemory)) => {
                        log::error!("surface out of memory, stopping");
                        self.shutdown();
                        event_loop.exit();
                    }
                    Some(Err(e)) => log::warn!("skipping frame: {e:?}"),
                }

                if self.phase == Phase::Running {
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Fires after CloseRequested already tore down; must stay a no-op
        // the second time.
        self.shutdown();
    }
}
