//! Shared types for the cube field demo.
//!
//! # Invariants
//! - Event payloads carry no window-system handles; any host that can
//!   produce these shapes can drive the core.
//! - `clamp` is total over floats, including `min == max`.

pub mod events;
pub mod math;

pub use events::{InputEvent, Key, MouseButton, SurfaceEvent};
pub use math::clamp;
