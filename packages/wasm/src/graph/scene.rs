//! Scene - per-generation member state.
//!
//! The Scene stores the ring topology using petgraph's StableGraph and keeps
//! SoA (Structure of Arrays) buffers for live and home positions, so the
//! renderer can read positions without walking records.
//!
//! All of it belongs to exactly one layout generation. `rebuild` tears the
//! previous generation down before installing the next one, and every pose
//! access goes through a `PoseHandle` checked against the live generation.

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::Directed;
use std::collections::HashMap;

use super::handle::{Generation, PoseHandle};
use crate::error::{GraphError, GraphResult};
use crate::hierarchy::{MemberId, ProjectId, ProjectRing};
use crate::layout::{MemberPose, Point};
use crate::spatial::SpatialIndex;

/// A ring edge with both endpoints resolved to scene slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneEdge {
    pub project: ProjectId,
    pub source: MemberId,
    pub target: MemberId,
    pub source_slot: usize,
    pub target_slot: usize,
}

/// Per-generation member state.
///
/// This struct manages:
/// - Ring topology via petgraph (nodes are members, edge weights are projects)
/// - Live and home position buffers in SoA layout
/// - The project extent each member wanders within
/// - Spatial index over the most recently rendered positions
pub struct Scene {
    /// Nodes store their MemberId, edges store the owning project.
    graph: StableGraph<MemberId, ProjectId, Directed>,

    /// Map from MemberId to petgraph NodeIndex
    member_to_index: HashMap<MemberId, NodeIndex>,

    /// Generation the buffers belong to
    generation: Generation,

    /// Owning project per slot
    projects: Vec<ProjectId>,

    /// Live X positions (SoA layout)
    pos_x: Vec<f32>,

    /// Live Y positions (SoA layout)
    pos_y: Vec<f32>,

    /// Home X positions (SoA layout)
    base_x: Vec<f32>,

    /// Home Y positions (SoA layout)
    base_y: Vec<f32>,

    /// Radius of the owning project per slot
    extents: Vec<f32>,

    /// Spatial index for hit testing
    spatial: SpatialIndex,

    /// Whether the spatial index needs rebuilding
    spatial_dirty: bool,
}

impl Scene {
    /// Create an empty scene at generation 0.
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            member_to_index: HashMap::new(),
            generation: Generation::default(),
            projects: Vec::new(),
            pos_x: Vec::new(),
            pos_y: Vec::new(),
            base_x: Vec::new(),
            base_y: Vec::new(),
            extents: Vec::new(),
            spatial: SpatialIndex::new(),
            spatial_dirty: false,
        }
    }

    /// Current generation.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    // =========================================================================
    // Generation Lifecycle
    // =========================================================================

    /// Replace the scene with a new generation.
    ///
    /// `extent_of` gives the radius of a placed project. Ring edges whose
    /// endpoints were not placed are skipped. Returns one handle per pose,
    /// in `poses` order.
    pub fn rebuild(
        &mut self,
        generation: Generation,
        poses: &[MemberPose],
        rings: &[ProjectRing],
        extent_of: impl Fn(ProjectId) -> Option<f32>,
    ) -> Vec<PoseHandle> {
        self.clear();
        self.generation = generation;

        let count = poses.len();
        self.member_to_index.reserve(count);
        self.projects.reserve(count);
        self.pos_x.reserve(count);
        self.pos_y.reserve(count);
        self.base_x.reserve(count);
        self.base_y.reserve(count);
        self.extents.reserve(count);

        let mut handles = Vec::with_capacity(count);
        for pose in poses {
            let index = self.graph.add_node(pose.member);
            self.member_to_index.insert(pose.member, index);

            self.projects.push(pose.project);
            self.pos_x.push(pose.x);
            self.pos_y.push(pose.y);
            self.base_x.push(pose.base_x);
            self.base_y.push(pose.base_y);
            self.extents.push(extent_of(pose.project).unwrap_or(0.0));

            handles.push(PoseHandle::new(generation, index.index()));
        }

        for ring in rings {
            for connection in &ring.connections {
                let source = self.member_to_index.get(&connection.source);
                let target = self.member_to_index.get(&connection.target);
                if let (Some(&source), Some(&target)) = (source, target) {
                    self.graph.add_edge(source, target, ring.project);
                }
            }
        }

        self.spatial_dirty = true;
        handles
    }

    /// Drop every pose and edge. The generation counter is kept so stale
    /// handles stay stale.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.member_to_index.clear();
        self.projects.clear();
        self.pos_x.clear();
        self.pos_y.clear();
        self.base_x.clear();
        self.base_y.clear();
        self.extents.clear();
        self.spatial.clear();
        self.spatial_dirty = false;
    }

    /// Invalidate every outstanding handle without installing new poses.
    pub fn retire(&mut self) {
        self.clear();
        self.generation = self.generation.next();
    }

    // =========================================================================
    // Pose Access
    // =========================================================================

    fn check(&self, handle: PoseHandle) -> GraphResult<usize> {
        let slot = handle.slot();
        if handle.generation() != self.generation || slot >= self.pos_x.len() {
            return Err(GraphError::StaleHandle {
                handle,
                current: self.generation,
            });
        }
        Ok(slot)
    }

    /// Read a pose through its handle.
    pub fn pose(&self, handle: PoseHandle) -> GraphResult<MemberPose> {
        let slot = self.check(handle)?;
        Ok(self.pose_at(slot))
    }

    /// Move a pose through its handle.
    pub fn write_pose(&mut self, handle: PoseHandle, position: Point) -> GraphResult<()> {
        let slot = self.check(handle)?;
        self.pos_x[slot] = position.x;
        self.pos_y[slot] = position.y;
        self.spatial_dirty = true;
        Ok(())
    }

    /// Radius of the project the handle's member belongs to.
    pub fn extent(&self, handle: PoseHandle) -> GraphResult<f32> {
        let slot = self.check(handle)?;
        Ok(self.extents[slot])
    }

    /// Look up a pose by member id in the live generation.
    pub fn member_pose(&self, member: MemberId) -> Option<MemberPose> {
        self.member_to_index
            .get(&member)
            .map(|&index| self.pose_at(index.index()))
    }

    /// Slot of a member in the live generation.
    pub fn slot_of(&self, member: MemberId) -> Option<usize> {
        self.member_to_index.get(&member).map(|index| index.index())
    }

    fn pose_at(&self, slot: usize) -> MemberPose {
        let member = self
            .graph
            .node_weight(NodeIndex::new(slot))
            .copied()
            .unwrap_or(MemberId(u32::MAX));
        MemberPose {
            member,
            project: self.projects[slot],
            x: self.pos_x[slot],
            y: self.pos_y[slot],
            base_x: self.base_x[slot],
            base_y: self.base_y[slot],
        }
    }

    /// All poses of the live generation, in slot order.
    pub fn poses(&self) -> impl Iterator<Item = MemberPose> + '_ {
        (0..self.pos_x.len()).map(|slot| self.pose_at(slot))
    }

    /// Number of members in the live generation.
    pub fn member_count(&self) -> usize {
        self.graph.node_count()
    }

    // =========================================================================
    // Topology
    // =========================================================================

    /// Ring edges of the live generation with their endpoint slots.
    ///
    /// Endpoints are slots, not coordinates: callers read positions at
    /// draw time so lines always follow the members.
    pub fn edges(&self) -> impl Iterator<Item = SceneEdge> + '_ {
        self.graph.edge_references().filter_map(|edge| {
            let source = *self.graph.node_weight(edge.source())?;
            let target = *self.graph.node_weight(edge.target())?;
            Some(SceneEdge {
                project: *edge.weight(),
                source,
                target,
                source_slot: edge.source().index(),
                target_slot: edge.target().index(),
            })
        })
    }

    /// Number of ring edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Ring neighbors of a member (the member it points to).
    pub fn ring_next(&self, member: MemberId) -> Option<MemberId> {
        let &index = self.member_to_index.get(&member)?;
        self.graph
            .neighbors(index)
            .next()
            .and_then(|n| self.graph.node_weight(n).copied())
    }

    // =========================================================================
    // Buffer Access
    // =========================================================================

    /// Live X positions slice.
    pub fn positions_x(&self) -> &[f32] {
        &self.pos_x
    }

    /// Live Y positions slice.
    pub fn positions_y(&self) -> &[f32] {
        &self.pos_y
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// Record the positions that were last drawn, for hit testing.
    pub fn set_rendered_positions(&mut self, positions: &[Point]) {
        let points: Vec<_> = positions
            .iter()
            .enumerate()
            .filter(|(_, p)| p.x.is_finite() && p.y.is_finite())
            .filter_map(|(slot, p)| {
                let member = self.graph.node_weight(NodeIndex::new(slot))?;
                Some((*member, p.x, p.y))
            })
            .collect();
        self.spatial.rebuild(&points);
        self.spatial_dirty = false;
    }

    /// Find the member drawn nearest to a point, within `max_distance`.
    pub fn find_member_at(&mut self, x: f32, y: f32, max_distance: f32) -> Option<MemberId> {
        if self.spatial_dirty {
            self.rebuild_spatial_index();
        }
        if self.spatial.is_empty() {
            return None;
        }
        self.spatial.nearest_within(x, y, max_distance)
    }

    /// Rebuild the spatial index from live poses.
    pub fn rebuild_spatial_index(&mut self) {
        let points: Vec<_> = self
            .member_to_index
            .iter()
            .map(|(&id, &index)| {
                let i = index.index();
                (id, self.pos_x[i], self.pos_y[i])
            })
            .filter(|(_, x, y)| x.is_finite() && y.is_finite())
            .collect();

        self.spatial.rebuild(&points);
        self.spatial_dirty = false;
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
