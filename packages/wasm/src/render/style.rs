//! Style tokens handed to the renderer.

use crate::hierarchy::{AreaId, Hierarchy, Member, ProjectId};

/// Neutral gradient token for area ellipses.
pub const AREA_FILL: &str = "#f8f9fa";
/// Area outline when the area has no project to borrow a color from.
pub const AREA_STROKE_FALLBACK: &str = "#e2e8f0";
/// Area label underline when the area has no project.
pub const AREA_UNDERLINE_FALLBACK: &str = "#334155";
/// Member outline and ring line color when the project color is unknown.
pub const MEMBER_FALLBACK: &str = "#94a3b8";

/// Halo and avatar sizes of a member node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberStyle {
    pub halo_radius: f32,
    pub avatar_size: f32,
}

impl MemberStyle {
    /// The first member of a project is drawn larger.
    pub fn for_member(lead: bool) -> Self {
        if lead {
            Self {
                halo_radius: 30.0,
                avatar_size: 50.0,
            }
        } else {
            Self {
                halo_radius: 24.0,
                avatar_size: 40.0,
            }
        }
    }
}

/// Accent color of an area: the color of its first project.
pub fn area_accent(hierarchy: &Hierarchy, area: AreaId) -> Option<&str> {
    hierarchy
        .first_project_in_area(area)
        .map(|p| p.color.as_str())
        .filter(|c| !c.is_empty())
}

/// Color of a project, or the member fallback.
pub fn project_color(hierarchy: &Hierarchy, project: ProjectId) -> &str {
    hierarchy
        .project(project)
        .map(|p| p.color.as_str())
        .filter(|c| !c.is_empty())
        .unwrap_or(MEMBER_FALLBACK)
}

/// Outline color of a member node.
pub fn member_color<'a>(hierarchy: &'a Hierarchy, member: &Member) -> &'a str {
    project_color(hierarchy, member.project_id)
}
