//! Three-tier radial placement: areas on an ellipse, projects around their
//! area, members around their project.
//!
//! # Algorithm
//!
//! 1. **Area anchors**: `N` areas are spread evenly on an ellipse centered at
//!    `(width/2 - center_offset_x, height/2)` with radii
//!    `(ellipse_fraction * width, ellipse_fraction * height)`.
//! 2. **Project anchors**: the `k` projects of an area sit on a circle of
//!    radius `project_distance_fraction * rx` around the area anchor,
//!    project `j` at angle `2πj/k`.
//! 3. **Project extent**: `radius = project_radius_fraction * width * sizeFactor`
//!    where `sizeFactor = base + (members - reference) * step`, floored at
//!    `min_size_factor`.
//! 4. **Member poses**: the `n` members of a project sit just outside its
//!    circle, member `m` at angle `2πm/n + jitter`, distance
//!    `radius * (1 + jitter_r)`.
//!
//! Steps 1-3 are a pure function of hierarchy and viewport (the skeleton).
//! Only step 4 draws from the RNG, so a resize produces a fresh member
//! arrangement around the same anchors.
//!
//! Projects with an unknown area and members with an unplaced project are
//! left out of the result; the rest of the layout is unaffected.

use rand::Rng;
use std::collections::HashMap;
use std::f32::consts::TAU;

use super::geometry::{Point, Viewport};
use crate::config::PlacementConfig;
use crate::hierarchy::{AreaId, Hierarchy, MemberId, ProjectId};

/// Placed area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaAnchor {
    pub id: AreaId,
    pub center: Point,
}

/// Placed project with its extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectAnchor {
    pub id: ProjectId,
    pub area: AreaId,
    pub center: Point,
    pub radius: f32,
    pub member_count: usize,
}

/// A member's live and home position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberPose {
    pub member: MemberId,
    pub project: ProjectId,
    pub x: f32,
    pub y: f32,
    pub base_x: f32,
    pub base_y: f32,
}

impl MemberPose {
    pub fn at_rest(member: MemberId, project: ProjectId, position: Point) -> Self {
        Self {
            member,
            project,
            x: position.x,
            y: position.y,
            base_x: position.x,
            base_y: position.y,
        }
    }

    #[inline]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn base(&self) -> Point {
        Point::new(self.base_x, self.base_y)
    }

    /// Distance of the live pose from home.
    #[inline]
    pub fn displacement(&self) -> f32 {
        self.position().distance_to(self.base())
    }
}

/// Deterministic part of a layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    pub viewport: Viewport,
    /// Area ellipse radii `(rx, ry)`; every area ellipse uses the same radii.
    pub ellipse: (f32, f32),
    pub areas: Vec<AreaAnchor>,
    pub projects: Vec<ProjectAnchor>,
    project_slots: HashMap<ProjectId, usize>,
}

impl Skeleton {
    pub fn project(&self, id: ProjectId) -> Option<&ProjectAnchor> {
        self.project_slots.get(&id).map(|&i| &self.projects[i])
    }

    pub fn area(&self, id: AreaId) -> Option<&AreaAnchor> {
        self.areas.iter().find(|a| a.id == id)
    }
}

/// Full output of one layout pass.
#[derive(Debug, Clone)]
pub struct Placement {
    pub skeleton: Skeleton,
    pub members: Vec<MemberPose>,
}

/// The radial placement engine.
#[derive(Debug, Clone, Default)]
pub struct RadialPlacement {
    config: PlacementConfig,
}

impl RadialPlacement {
    pub fn new(config: PlacementConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Size factor for a project with `member_count` members.
    ///
    /// Monotonic in `member_count`; never below `min_size_factor`.
    pub fn size_factor(&self, member_count: usize) -> f32 {
        let delta = member_count as f32 - self.config.reference_member_count as f32;
        (self.config.base_size_factor + delta * self.config.size_step).max(self.config.min_size_factor)
    }

    /// Project circle radius for the given surface width.
    pub fn project_radius(&self, member_count: usize, width: f32) -> f32 {
        self.config.project_radius_fraction * width * self.size_factor(member_count)
    }

    /// Compute area and project anchors. Pure.
    pub fn skeleton(&self, hierarchy: &Hierarchy, viewport: Viewport) -> Skeleton {
        let rx = viewport.width * self.config.ellipse_fraction;
        let ry = viewport.height * self.config.ellipse_fraction;
        let center = Point::new(
            viewport.width / 2.0 - self.config.center_offset_x,
            viewport.height / 2.0,
        );

        let area_count = hierarchy.areas().len();
        let areas: Vec<AreaAnchor> = hierarchy
            .areas()
            .iter()
            .enumerate()
            .map(|(i, area)| {
                let angle = (i as f32 * TAU) / area_count as f32;
                AreaAnchor {
                    id: area.id,
                    center: Point::new(center.x + angle.cos() * rx, center.y + angle.sin() * ry),
                }
            })
            .collect();

        let distance = rx * self.config.project_distance_fraction;
        let mut projects = Vec::with_capacity(hierarchy.projects().len());
        for anchor in &areas {
            let siblings: Vec<_> = hierarchy.projects_in_area(anchor.id).collect();
            let k = siblings.len();
            for (j, project) in siblings.into_iter().enumerate() {
                let angle = (j as f32 * TAU) / k as f32;
                let member_count = hierarchy.member_count(project.id);
                projects.push(ProjectAnchor {
                    id: project.id,
                    area: anchor.id,
                    center: anchor.center.polar_offset(angle, distance),
                    radius: self.project_radius(member_count, viewport.width),
                    member_count,
                });
            }
        }

        for project in hierarchy.projects() {
            if hierarchy.area(project.area_id).is_none() {
                log::warn!(
                    "event=relayout_dropped module=layout kind=project id={} missing_area={}",
                    project.id,
                    project.area_id
                );
            }
        }

        let project_slots = projects.iter().enumerate().map(|(i, p)| (p.id, i)).collect();

        Skeleton {
            viewport,
            ellipse: (rx, ry),
            areas,
            projects,
            project_slots,
        }
    }

    /// Seed member poses around an existing skeleton.
    pub fn seed_members<R: Rng>(
        &self,
        hierarchy: &Hierarchy,
        skeleton: &Skeleton,
        rng: &mut R,
    ) -> Vec<MemberPose> {
        let mut poses = Vec::with_capacity(hierarchy.members().len());

        for anchor in &skeleton.projects {
            let members: Vec<_> = hierarchy.members_in_project(anchor.id).collect();
            let n = members.len();
            for (m, member) in members.into_iter().enumerate() {
                let angle = (m as f32 * TAU) / n as f32 + jitter(rng, self.config.angle_jitter);
                let distance = anchor.radius * (1.0 + jitter(rng, self.config.radius_jitter));
                let position = anchor.center.polar_offset(angle, distance);
                poses.push(MemberPose::at_rest(member.id, anchor.id, position));
            }
        }

        for member in hierarchy.members() {
            if skeleton.project(member.project_id).is_none() {
                log::warn!(
                    "event=relayout_dropped module=layout kind=member id={} missing_project={}",
                    member.id,
                    member.project_id
                );
            }
        }

        poses
    }

    /// Run a whole layout pass.
    pub fn place<R: Rng>(
        &self,
        hierarchy: &Hierarchy,
        viewport: Viewport,
        rng: &mut R,
    ) -> Placement {
        let skeleton = self.skeleton(hierarchy, viewport);
        let members = self.seed_members(hierarchy, &skeleton, rng);
        Placement { skeleton, members }
    }
}

/// Uniform sample from `[0, bound)`, or 0 when the bound is not a finite
/// positive number.
fn jitter<R: Rng>(rng: &mut R, bound: f32) -> f32 {
    if bound > 0.0 && bound.is_finite() {
        rng.gen_range(0.0..bound)
    } else {
        0.0
    }
}
