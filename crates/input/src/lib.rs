//! Input routing: raw host events mapped to shared actions.
//!
//! # Invariants
//! - The router holds no camera or blend state; it only translates events.
//! - Camera and blend state are mutated exclusively by consumers applying
//!   the produced actions.

pub mod action;
pub mod router;

pub use action::{Action, Direction};
pub use router::InputRouter;
