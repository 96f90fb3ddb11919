//! Per-generation scene state.
//!
//! The scene owns every member pose of the live layout generation together
//! with the ring topology (petgraph's StableGraph) and SoA position buffers.
//! Poses are addressed through generation-tagged handles.

mod handle;
mod scene;

pub use handle::{Generation, PoseHandle};
pub use scene::{Scene, SceneEdge};
