//! Floating member motion.
//!
//! Members drift around their home pose forever, each on its own staggered
//! chain. The motion is stylistic: every step picks a new target inside a
//! bounded disc and the renderer eases toward it.

pub mod easing;
pub mod float;
pub mod scheduler;

pub use scheduler::{ChainPhase, FloatScheduler};
