//! R-tree based member hit testing using the rstar crate.
//!
//! The index is bulk-loaded from the positions drawn in the latest frame,
//! so a pointer lands on the member the user actually sees.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::hierarchy::MemberId;

/// A drawn member position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberPoint {
    pub id: MemberId,
    pub x: f32,
    pub y: f32,
}

impl MemberPoint {
    pub fn new(id: MemberId, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }
}

impl RTreeObject for MemberPoint {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for MemberPoint {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }
}

/// Spatial index over member positions.
pub struct SpatialIndex {
    tree: RTree<MemberPoint>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Find the nearest member within a maximum distance.
    pub fn nearest_within(&self, x: f32, y: f32, max_distance: f32) -> Option<MemberId> {
        let max_distance_sq = max_distance * max_distance;
        self.tree
            .nearest_neighbor(&[x, y])
            .filter(|point| point.distance_2(&[x, y]) <= max_distance_sq)
            .map(|point| point.id)
    }

    /// Rebuild the index from `(id, x, y)` tuples.
    pub fn rebuild(&mut self, points: &[(MemberId, f32, f32)]) {
        let member_points: Vec<_> = points
            .iter()
            .map(|&(id, x, y)| MemberPoint::new(id, x, y))
            .collect();

        self.tree = RTree::bulk_load(member_points);
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_within() {
        let mut index = SpatialIndex::new();
        index.rebuild(&[(MemberId(0), 0.0, 0.0), (MemberId(1), 10.0, 10.0)]);

        assert_eq!(index.nearest_within(0.0, 0.0, 5.0), Some(MemberId(0)));
        // nothing within 1 of (5, 5)
        assert_eq!(index.nearest_within(5.0, 5.0, 1.0), None);
        // member 0 is ~7.07 from (5, 5)
        assert!(index.nearest_within(5.0, 5.0, 8.0).is_some());
    }

    #[test]
    fn test_rebuild_replaces_contents() {
        let mut index = SpatialIndex::new();
        index.rebuild(&[(MemberId(0), 0.0, 0.0)]);
        index.rebuild(&[
            (MemberId(1), 1.0, 1.0),
            (MemberId(2), 2.0, 2.0),
            (MemberId(3), 3.0, 3.0),
        ]);
        assert_eq!(index.nearest_within(0.0, 0.0, 10.0), Some(MemberId(1)));
        assert_eq!(index.nearest_within(3.1, 3.1, 1.0), Some(MemberId(3)));
    }

    #[test]
    fn test_clear() {
        let mut index = SpatialIndex::new();
        index.rebuild(&[(MemberId(0), 0.0, 0.0)]);
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.nearest_within(0.0, 0.0, 100.0), None);
    }
}
