//! Render-surface controller.
//!
//! Gates rendering to at most one scheduled frame at a time, creates the
//! GPU context lazily on first draw, and dispatches lifecycle hooks to the
//! scene through the [`Scene`] capability trait.
//!
//! # Invariants
//! - At most one deferred frame request is in flight; `schedule_frame` is
//!   idempotent until the request is delivered back.
//! - Context creation happens at most once per controller; a failed attempt
//!   permanently skips rendering for this surface instance.
//! - Close cancels all future scheduling but never aborts an in-flight frame.
//! - Everything runs on the single event-processing thread; no locks.

mod context;
mod controller;
mod diagnostics;

pub use context::{ContextFactory, GpuContext, SurfaceError};
pub use controller::{FrameInfo, FramePump, HookError, Scene, SurfaceController};
pub use diagnostics::{DiagnosticHub, DiagnosticMessage, DiagnosticSink, DiagnosticSource, Severity};
