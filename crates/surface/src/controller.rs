use crate::context::{ContextFactory, GpuContext};
use crate::diagnostics::{DiagnosticHub, DiagnosticSink};
use cubefield_common::SurfaceEvent;

/// Errors surfaced by scene lifecycle hooks.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Per-frame information handed to the scene.
#[derive(Debug, Clone, Copy)]
pub struct FrameInfo {
    /// Current surface size in physical pixels.
    pub width: u32,
    pub height: u32,
    pub scale_factor: f64,
}

/// Enqueues exactly one deferred render notification on the host event feed.
/// The host delivers it back as [`SurfaceEvent::FrameDelivered`].
pub trait FramePump {
    fn request_frame(&self);
}

/// Capability interface the concrete scene implements; the controller
/// invokes it through an owned value, no inheritance involved.
pub trait Scene {
    /// Called once, right after the context is created.
    fn initialize(&mut self, context: &GpuContext) -> Result<(), HookError>;

    /// Called for every frame between acquire and present.
    fn render(&mut self, context: &GpuContext, target: &wgpu::TextureView, frame: FrameInfo);

    /// Called on close. Must be idempotent and safe when resources were
    /// never created.
    fn deinitialize(&mut self);
}

/// Owns the graphics context and gates rendering to exactly one scheduled
/// frame at a time.
pub struct SurfaceController<S, P, F> {
    scene: S,
    pump: P,
    factory: F,
    context: Option<GpuContext>,
    diagnostics: DiagnosticHub,
    diagnostics_enabled: bool,
    pending_frame: bool,
    animating: bool,
    exposed: bool,
    closing: bool,
    context_failed: bool,
    width: u32,
    height: u32,
    scale_factor: f64,
}

impl<S: Scene, P: FramePump, F: ContextFactory> SurfaceController<S, P, F> {
    pub fn new(
        scene: S,
        pump: P,
        factory: F,
        initial_size: (u32, u32),
        scale_factor: f64,
        diagnostics_enabled: bool,
    ) -> Self {
        Self {
            scene,
            pump,
            factory,
            context: None,
            diagnostics: DiagnosticHub::new(),
            diagnostics_enabled,
            pending_frame: false,
            animating: false,
            exposed: false,
            closing: false,
            context_failed: false,
            width: initial_size.0,
            height: initial_size.1,
            scale_factor,
        }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn frame_pending(&self) -> bool {
        self.pending_frame
    }

    /// Forward GPU diagnostics to `sink` once the logger is running.
    pub fn subscribe_diagnostics(&mut self, sink: DiagnosticSink) {
        self.diagnostics.subscribe(sink);
    }

    /// Continuous-redraw mode. Turning it on schedules a frame immediately.
    pub fn set_animating(&mut self, animating: bool) {
        self.animating = animating;
        if animating {
            self.schedule_frame();
        }
    }

    /// Idempotent: while a frame request is in flight (or after close) this
    /// is a no-op, so any burst of calls produces one delivered request.
    pub fn schedule_frame(&mut self) {
        if self.closing || self.pending_frame {
            return;
        }
        self.pending_frame = true;
        self.pump.request_frame();
    }

    pub fn handle_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Exposed => {
                self.exposed = true;
                self.render_frame_now();
            }
            SurfaceEvent::Obscured => {
                self.exposed = false;
            }
            SurfaceEvent::Resized {
                width,
                height,
                scale_factor,
            } => {
                self.width = width;
                self.height = height;
                self.scale_factor = scale_factor;
                if let Some(context) = self.context.as_mut() {
                    context.resize(width, height);
                }
            }
            SurfaceEvent::FrameDelivered => {
                self.pending_frame = false;
                self.render_frame_now();
            }
            SurfaceEvent::CloseRequested => {
                self.close();
            }
        }
    }

    /// Render one frame immediately, creating the context on first use.
    pub fn render_frame_now(&mut self) {
        if !self.exposed || self.closing {
            return;
        }
        if self.context.is_none() && !self.create_context() {
            return;
        }
        self.draw();
        if self.animating {
            self.schedule_frame();
        }
    }

    /// GPU teardown ahead of window destruction. All future scheduling is
    /// cancelled; an in-flight frame is never aborted.
    pub fn close(&mut self) {
        if self.closing {
            return;
        }
        self.closing = true;
        self.animating = false;
        if self.context.is_some() {
            self.scene.deinitialize();
        }
        tracing::debug!("surface controller closed");
    }

    fn create_context(&mut self) -> bool {
        if self.context_failed {
            return false;
        }
        let context = match self.factory.create_context() {
            Ok(context) => context,
            Err(error) => {
                // Not retried: this surface instance will never render.
                tracing::error!(%error, "context creation failed; rendering disabled");
                self.context_failed = true;
                return false;
            }
        };
        if self.diagnostics_enabled {
            match self.factory.start_diagnostics(&context) {
                Ok(source) => self.diagnostics.attach_source(source),
                Err(error) => {
                    tracing::warn!(%error, "diagnostic logger unavailable; forwarding disabled");
                }
            }
        }
        if let Err(error) = self.scene.initialize(&context) {
            tracing::error!(%error, "scene initialization failed; output will be degraded");
        }
        self.context = Some(context);
        true
    }

    fn draw(&mut self) {
        let Some(context) = self.context.as_ref() else {
            return;
        };
        let frame = match context.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                context.reconfigure();
                return;
            }
            Err(error) => {
                tracing::error!(%error, "failed to acquire surface texture");
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.scene.render(
            context,
            &view,
            FrameInfo {
                width: self.width,
                height: self.height,
                scale_factor: self.scale_factor,
            },
        );
        frame.present();
        self.diagnostics.drain();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SurfaceError;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct RecordingScene {
        deinit_calls: usize,
    }

    impl Scene for RecordingScene {
        fn initialize(&mut self, _context: &GpuContext) -> Result<(), HookError> {
            Ok(())
        }

        fn render(&mut self, _context: &GpuContext, _target: &wgpu::TextureView, _frame: FrameInfo) {}

        fn deinitialize(&mut self) {
            self.deinit_calls += 1;
        }
    }

    #[derive(Clone, Default)]
    struct CountingPump {
        requests: Rc<Cell<usize>>,
    }

    impl FramePump for CountingPump {
        fn request_frame(&self) {
            self.requests.set(self.requests.get() + 1);
        }
    }

    /// Factory for surfaces that never get a working adapter.
    #[derive(Clone, Default)]
    struct FailingFactory {
        attempts: Rc<Cell<usize>>,
    }

    impl ContextFactory for FailingFactory {
        fn create_context(&mut self) -> Result<GpuContext, SurfaceError> {
            self.attempts.set(self.attempts.get() + 1);
            Err(SurfaceError::NoAdapter)
        }
    }

    fn controller(
        pump: CountingPump,
        factory: FailingFactory,
    ) -> SurfaceController<RecordingScene, CountingPump, FailingFactory> {
        SurfaceController::new(RecordingScene::default(), pump, factory, (800, 600), 1.0, false)
    }

    #[test]
    fn schedule_frame_is_idempotent_until_delivery() {
        let pump = CountingPump::default();
        let mut surface = controller(pump.clone(), FailingFactory::default());

        surface.schedule_frame();
        surface.schedule_frame();
        surface.schedule_frame();
        assert_eq!(pump.requests.get(), 1);

        // Delivery clears the pending flag; the next request goes through.
        surface.handle_event(SurfaceEvent::FrameDelivered);
        surface.schedule_frame();
        assert_eq!(pump.requests.get(), 2);
    }

    #[test]
    fn enabling_animation_schedules_immediately() {
        let pump = CountingPump::default();
        let mut surface = controller(pump.clone(), FailingFactory::default());

        surface.set_animating(true);
        assert!(surface.is_animating());
        assert_eq!(pump.requests.get(), 1);

        surface.set_animating(false);
        assert_eq!(pump.requests.get(), 1);
    }

    #[test]
    fn unexposed_surface_never_creates_a_context() {
        let factory = FailingFactory::default();
        let mut surface = controller(CountingPump::default(), factory.clone());

        surface.handle_event(SurfaceEvent::FrameDelivered);
        surface.render_frame_now();
        assert_eq!(factory.attempts.get(), 0);
    }

    #[test]
    fn context_creation_failure_is_not_retried() {
        let factory = FailingFactory::default();
        let mut surface = controller(CountingPump::default(), factory.clone());

        surface.handle_event(SurfaceEvent::Exposed);
        assert_eq!(factory.attempts.get(), 1);

        surface.handle_event(SurfaceEvent::FrameDelivered);
        surface.handle_event(SurfaceEvent::FrameDelivered);
        assert_eq!(factory.attempts.get(), 1);
    }

    #[test]
    fn close_cancels_future_scheduling() {
        let pump = CountingPump::default();
        let mut surface = controller(pump.clone(), FailingFactory::default());

        surface.handle_event(SurfaceEvent::CloseRequested);
        surface.schedule_frame();
        surface.set_animating(true);
        assert_eq!(pump.requests.get(), 0);
        assert!(!surface.frame_pending());
    }

    #[test]
    fn deinitialize_skipped_when_context_was_never_created() {
        let mut surface = controller(CountingPump::default(), FailingFactory::default());

        surface.handle_event(SurfaceEvent::CloseRequested);
        surface.handle_event(SurfaceEvent::CloseRequested);
        assert_eq!(surface.scene().deinit_calls, 0);
    }

    #[test]
    fn resize_is_tracked_before_the_context_exists() {
        let mut surface = controller(CountingPump::default(), FailingFactory::default());

        surface.handle_event(SurfaceEvent::Resized {
            width: 400,
            height: 300,
            scale_factor: 2.0,
        });
        assert_eq!((surface.width, surface.height), (400, 300));
        assert_eq!(surface.scale_factor, 2.0);
    }
}
