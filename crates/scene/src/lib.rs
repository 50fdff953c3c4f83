//! Scene renderer for the textured cube field.
//!
//! Owns the GPU resources (mesh buffers, pipeline, two textures), the fly
//! camera, and the texture blend scalar; draws one frame per invocation of
//! the surface controller's render hook.
//!
//! # Invariants
//! - Camera and blend state are mutated only by applying input actions or
//!   by the per-frame integration inside `render`.
//! - The cube mesh is immutable and computed once per process.
//! - Exactly one indexed draw call is issued per world-space instance.

pub mod camera;
pub mod geometry;
pub mod renderer;
pub mod state;

pub use camera::{CameraController, MovementFlags};
pub use renderer::SceneRenderer;
