use cubefield_common::clamp;
use glam::Mat4;
use std::time::Instant;

const FOV_Y_DEGREES: f32 = 45.0;
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 100.0;

/// Interpolation weight between the two bound textures, kept in [0, 1].
#[derive(Debug, Clone, Copy)]
pub struct BlendState {
    mix_balance: f32,
}

impl BlendState {
    pub fn new() -> Self {
        Self { mix_balance: 0.5 }
    }

    pub fn value(&self) -> f32 {
        self.mix_balance
    }

    pub fn adjust(&mut self, delta: f32) {
        self.mix_balance = clamp(0.0, self.mix_balance + delta, 1.0);
    }
}

impl Default for BlendState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FrameTiming {
    /// Seconds since the clock started.
    pub elapsed: f32,
    /// Seconds since the previous tick.
    pub delta: f32,
}

/// Monotonic per-frame clock.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last_frame: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            last_frame: 0.0,
        }
    }

    pub fn tick(&mut self) -> FrameTiming {
        let elapsed = self.start.elapsed().as_secs_f32();
        let delta = elapsed - self.last_frame;
        self.last_frame = elapsed;
        FrameTiming { elapsed, delta }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Projection matrix cached against the last observed surface size.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionState {
    last_size: Option<(u32, u32)>,
    screen_ratio: f32,
    matrix: Mat4,
}

impl ProjectionState {
    pub fn new() -> Self {
        Self {
            last_size: None,
            screen_ratio: 1.0,
            matrix: Mat4::IDENTITY,
        }
    }

    pub fn screen_ratio(&self) -> f32 {
        self.screen_ratio
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// Rebuild the projection when the surface size changed; returns whether
    /// a rebuild happened.
    pub fn update_if_resized(&mut self, width: u32, height: u32) -> bool {
        if self.last_size == Some((width, height)) {
            return false;
        }
        self.last_size = Some((width, height));
        self.screen_ratio = if height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        };
        self.matrix = Mat4::perspective_rh(
            FOV_Y_DEGREES.to_radians(),
            self.screen_ratio,
            NEAR_PLANE,
            FAR_PLANE,
        );
        true
    }
}

impl Default for ProjectionState {
    fn default() -> Self {
        Self::new()
    }
}
