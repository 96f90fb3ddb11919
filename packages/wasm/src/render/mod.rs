//! Render-facing output.
//!
//! The engine performs no drawing. It emits position/size/style records per
//! frame and the host turns them into SVG, canvas or GPU commands.

pub mod frame;
pub mod style;

pub use frame::{AreaRecord, ConnectionRecord, FrameSnapshot, MemberRecord, ProjectRecord};
