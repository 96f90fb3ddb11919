//! Frame snapshots: everything the renderer needs to draw one frame.
//!
//! A snapshot is plain data. Member positions come from a single vector of
//! drawn positions, and every connection endpoint is looked up in that same
//! vector, so lines and avatars never disagree within a frame.

use serde::Serialize;

use super::style::{self, MemberStyle};
use crate::graph::{Generation, Scene};
use crate::hierarchy::{AreaId, Hierarchy, MemberId, ProjectId};
use crate::layout::{Point, Skeleton, Viewport};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaRecord {
    pub id: AreaId,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub rx: f32,
    pub ry: f32,
    pub fill: String,
    pub stroke: String,
    pub underline: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: ProjectId,
    pub area_id: AreaId,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: String,
    pub member_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    pub id: MemberId,
    pub project_id: ProjectId,
    pub name: String,
    pub avatar: String,
    pub x: f32,
    pub y: f32,
    pub base_x: f32,
    pub base_y: f32,
    pub color: String,
    pub lead: bool,
    pub halo_radius: f32,
    pub avatar_size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    pub source: MemberId,
    pub target: MemberId,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub color: String,
}

/// One drawable frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSnapshot {
    pub generation: u32,
    pub time: f64,
    pub viewport: Option<Viewport>,
    pub areas: Vec<AreaRecord>,
    pub projects: Vec<ProjectRecord>,
    pub members: Vec<MemberRecord>,
    pub connections: Vec<ConnectionRecord>,
}

impl FrameSnapshot {
    /// An empty frame, e.g. before the first size arrives or after teardown.
    pub fn empty(generation: Generation, time: f64) -> Self {
        Self {
            generation: generation.raw(),
            time,
            ..Default::default()
        }
    }

    /// Assemble a frame from the live generation.
    ///
    /// `drawn` holds one position per scene slot.
    pub fn build(
        hierarchy: &Hierarchy,
        skeleton: &Skeleton,
        scene: &Scene,
        drawn: &[Point],
        time: f64,
    ) -> Self {
        let (rx, ry) = skeleton.ellipse;

        let areas = skeleton
            .areas
            .iter()
            .filter_map(|anchor| {
                let area = hierarchy.area(anchor.id)?;
                let accent = style::area_accent(hierarchy, anchor.id);
                Some(AreaRecord {
                    id: anchor.id,
                    name: area.name.clone(),
                    x: anchor.center.x,
                    y: anchor.center.y,
                    rx,
                    ry,
                    fill: style::AREA_FILL.to_owned(),
                    stroke: accent.unwrap_or(style::AREA_STROKE_FALLBACK).to_owned(),
                    underline: accent.unwrap_or(style::AREA_UNDERLINE_FALLBACK).to_owned(),
                })
            })
            .collect();

        let projects = skeleton
            .projects
            .iter()
            .filter_map(|anchor| {
                let project = hierarchy.project(anchor.id)?;
                Some(ProjectRecord {
                    id: anchor.id,
                    area_id: anchor.area,
                    name: project.name.clone(),
                    x: anchor.center.x,
                    y: anchor.center.y,
                    radius: anchor.radius,
                    color: project.color.clone(),
                    member_count: anchor.member_count,
                })
            })
            .collect();

        let members = scene
            .poses()
            .zip(drawn)
            .filter_map(|(pose, at)| {
                let member = hierarchy.member(pose.member)?;
                let lead = hierarchy.is_lead_member(member);
                let look = MemberStyle::for_member(lead);
                Some(MemberRecord {
                    id: pose.member,
                    project_id: pose.project,
                    name: member.name.clone(),
                    avatar: member.avatar.clone(),
                    x: at.x,
                    y: at.y,
                    base_x: pose.base_x,
                    base_y: pose.base_y,
                    color: style::member_color(hierarchy, member).to_owned(),
                    lead,
                    halo_radius: look.halo_radius,
                    avatar_size: look.avatar_size,
                })
            })
            .collect();

        let connections = scene
            .edges()
            .filter_map(|edge| {
                let from = drawn.get(edge.source_slot)?;
                let to = drawn.get(edge.target_slot)?;
                Some(ConnectionRecord {
                    source: edge.source,
                    target: edge.target,
                    x1: from.x,
                    y1: from.y,
                    x2: to.x,
                    y2: to.y,
                    color: style::project_color(hierarchy, edge.project).to_owned(),
                })
            })
            .collect();

        Self {
            generation: scene.generation().raw(),
            time,
            viewport: Some(skeleton.viewport),
            areas,
            projects,
            members,
            connections,
        }
    }

    /// Look up a member record by id.
    pub fn member(&self, id: MemberId) -> Option<&MemberRecord> {
        self.members.iter().find(|m| m.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Generation;
    use crate::hierarchy::build_rings;
    use crate::hierarchy::model::fixtures::sample;
    use crate::layout::RadialPlacement;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn frame_with_offset(offset: f32) -> FrameSnapshot {
        let h = sample();
        let placement = RadialPlacement::default().place(
            &h,
            Viewport::new(1000.0, 800.0).unwrap(),
            &mut StdRng::seed_from_u64(1),
        );
        let rings = build_rings(h.projects(), h.members());
        let mut scene = Scene::new();
        scene.rebuild(Generation(1), &placement.members, &rings, |p| {
            placement.skeleton.project(p).map(|a| a.radius)
        });
        let drawn: Vec<_> = scene
            .poses()
            .map(|p| Point::new(p.x + offset, p.y))
            .collect();
        FrameSnapshot::build(&h, &placement.skeleton, &scene, &drawn, 16.0)
    }

    #[test]
    fn test_frame_counts() {
        let frame = frame_with_offset(0.0);
        assert_eq!(frame.generation, 1);
        assert_eq!(frame.areas.len(), 3);
        assert_eq!(frame.projects.len(), 4);
        assert_eq!(frame.members.len(), 12);
        // 5 + 2 + 3 + 2 ring edges
        assert_eq!(frame.connections.len(), 12);
    }

    #[test]
    fn test_connection_endpoints_match_drawn_members() {
        let frame = frame_with_offset(7.5);
        for c in &frame.connections {
            let source = frame.member(c.source).unwrap();
            let target = frame.member(c.target).unwrap();
            assert_eq!((c.x1, c.y1), (source.x, source.y));
            assert_eq!((c.x2, c.y2), (target.x, target.y));
            assert_eq!(source.x, source.base_x + 7.5);
        }
    }

    #[test]
    fn test_styles_derived_from_projects() {
        let frame = frame_with_offset(0.0);

        let wada = frame.areas.iter().find(|a| a.id == AreaId(1)).unwrap();
        assert_eq!(wada.stroke, "#ff6b6b");
        assert_eq!(wada.fill, style::AREA_FILL);
        assert_eq!(wada.rx, 250.0);

        let lead = frame.member(MemberId(1)).unwrap();
        assert!(lead.lead);
        assert_eq!(lead.halo_radius, 30.0);
        let other = frame.member(MemberId(2)).unwrap();
        assert!(!other.lead);
        assert_eq!(other.color, "#ff6b6b");

        let p2 = frame.projects.iter().find(|p| p.id == ProjectId(2)).unwrap();
        assert_eq!(p2.member_count, 2);
        assert!(frame.connections.iter().any(|c| c.color == "#ff9e7d"));
    }

    #[test]
    fn test_serialized_shape() {
        let frame = frame_with_offset(0.0);
        let json = serde_json::to_value(&frame).unwrap();
        assert!(json["members"][0]["haloRadius"].is_number());
        assert!(json["members"][0]["baseX"].is_number());
        assert!(json["projects"][0]["memberCount"].is_number());
        assert_eq!(json["viewport"]["width"], 1000.0);
        assert!(json["connections"][0]["x1"].is_number());
    }

    #[test]
    fn test_empty_frame() {
        let frame = FrameSnapshot::empty(Generation(4), 1.0);
        assert_eq!(frame.generation, 4);
        assert!(frame.viewport.is_none());
        assert!(frame.members.is_empty());
    }
}
