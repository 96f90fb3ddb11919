//! Layout algorithms for the radial diagram.
//!
//! This module provides the CPU-side placement pass that turns a hierarchy
//! and a surface size into area/project anchors, project extents and initial
//! member poses. The animation layer then floats members around those poses.

pub mod geometry;
pub mod radial;

pub use geometry::{Point, Viewport};
pub use radial::{AreaAnchor, MemberPose, Placement, ProjectAnchor, RadialPlacement, Skeleton};
