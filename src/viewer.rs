//! Desktop viewer: one particle field filling a window.
//!
//! Autonomous fields drive themselves through a [`RedrawScheduler`], which
//! turns frame requests into `Window::request_redraw` calls. Interactive
//! fields are advanced on every redraw, the way a host drives them.

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::FieldConfig;
use crate::error::ViewerError;
use crate::field::ParticleField;
use crate::gpu::GpuSurface;
use crate::pointer::PointerTracker;
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::time::FrameClock;

const TITLE: &str = "driftfield";

/// Frame scheduler backed by window redraws.
///
/// Requested handles become due on the next `RedrawRequested`.
#[derive(Debug, Default)]
pub struct RedrawScheduler {
    window: Option<Arc<Window>>,
    next_id: u64,
    due: Vec<FrameHandle>,
}

impl RedrawScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn attach(&mut self, window: Arc<Window>) {
        self.window = Some(window);
    }

    /// Handles to fire for this redraw.
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.due)
    }
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.due.push(handle);
        if let Some(window) = &self.window {
            window.request_redraw();
        }
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.due.retain(|h| *h != handle);
    }
}

struct Viewer {
    window: Option<Arc<Window>>,
    gpu: Option<GpuSurface>,
    field: ParticleField,
    pointer: PointerTracker,
    scheduler: RedrawScheduler,
    clock: FrameClock,
    error: Option<ViewerError>,
}

impl Viewer {
    fn new(config: FieldConfig) -> Self {
        Self {
            window: None,
            gpu: None,
            field: ParticleField::new(config),
            pointer: PointerTracker::new(),
            scheduler: RedrawScheduler::new(),
            clock: FrameClock::new(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: ViewerError) {
        error!(error = %err, "viewer failed");
        self.field.teardown(&mut self.scheduler);
        self.error = Some(err);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let due = self.scheduler.take_due();
        if self.field.config().interactive {
            self.field.advance(gpu);
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        } else {
            for handle in due {
                self.field.on_frame(handle, gpu, &mut self.scheduler);
            }
        }

        match gpu.present() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("surface lost, reconfiguring");
                gpu.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("out of GPU memory");
                self.field.teardown(&mut self.scheduler);
                event_loop.exit();
                return;
            }
            Err(e) => warn!(error = %e, "dropped frame"),
        }

        if self.clock.tick() {
            if let Some(window) = &self.window {
                window.set_title(&format!("{TITLE} - {:.0} fps", self.clock.fps()));
            }
        }
    }
}

impl ApplicationHandler for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        let gpu = match pollster::block_on(GpuSurface::new(window.clone())) {
            Ok(gpu) => gpu,
            Err(e) => return self.fail(event_loop, e.into()),
        };

        let size = window.inner_size();
        self.scheduler.attach(window.clone());
        self.field.initialize(size.width as f32, size.height as f32);
        self.field.subscribe_pointer(&mut self.pointer);
        self.field.start(&mut self.scheduler);
        info!(
            width = size.width,
            height = size.height,
            particles = self.field.particles().len(),
            interactive = self.field.config().interactive,
            "viewer started"
        );

        window.request_redraw();
        self.window = Some(window);
        self.gpu = Some(gpu);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if self.pointer.handle_event(&event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.field.teardown(&mut self.scheduler);
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size.width, size.height);
                }
                self.field
                    .resize(size.width as f32, size.height as f32, &mut self.scheduler);
                self.clock.reset();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.field.teardown(&mut self.scheduler);
    }
}

/// Open a window and run a field built from `config` until it is closed.
pub fn run(config: FieldConfig) -> Result<(), ViewerError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut viewer = Viewer::new(config);
    event_loop.run_app(&mut viewer)?;

    match viewer.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redraw_scheduler_without_window() {
        let mut scheduler = RedrawScheduler::new();
        let a = scheduler.request_frame();
        let b = scheduler.request_frame();
        assert_ne!(a, b);

        scheduler.cancel_frame(a);
        assert_eq!(scheduler.take_due(), vec![b]);
        assert!(scheduler.take_due().is_empty());
    }
}
