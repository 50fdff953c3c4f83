use crate::diagnostics::DiagnosticSource;

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("no compatible graphics adapter found")]
    NoAdapter,
    #[error("failed to create rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("failed to acquire graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("diagnostic channel unavailable")]
    DiagnosticsUnavailable,
}

/// The graphics context and output surface owned by the controller.
///
/// Created lazily by a [`ContextFactory`] the first time a frame is actually
/// rendered, and dropped with the controller.
pub struct GpuContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
}

impl GpuContext {
    /// Reconfigure the surface for a new physical size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
    }

    /// Reapply the current configuration after the surface was lost.
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }
}

/// Builds the GPU context bound to the host window.
///
/// The host implements this so the controller stays independent of the
/// window-system crate.
pub trait ContextFactory {
    fn create_context(&mut self) -> Result<GpuContext, SurfaceError>;

    /// Start the optional diagnostic message source for the new context.
    ///
    /// Failure disables message forwarding only; it never blocks rendering.
    fn start_diagnostics(
        &mut self,
        _context: &GpuContext,
    ) -> Result<DiagnosticSource, SurfaceError> {
        Err(SurfaceError::DiagnosticsUnavailable)
    }
}
