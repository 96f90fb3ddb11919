//! Spatial indexing for member hit testing.
//!
//! This module provides an R-tree based spatial index for nearest-member
//! queries against the positions drawn in the latest frame.

mod rtree;

pub use rtree::SpatialIndex;
