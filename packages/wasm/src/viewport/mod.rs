//! Viewport responsiveness.
//!
//! Any surface size change leads to a full relayout; nothing is diffed.

mod controller;

pub use controller::{ResizeOutcome, ViewportController};
