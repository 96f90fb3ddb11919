//! The validated in-memory hierarchy: areas, projects and members.
//!
//! Records are immutable once a `Hierarchy` is built. Grouping indices
//! (projects per area, members per project) are computed once in input
//! order so every consumer enumerates siblings the same way.
//!
//! Duplicate ids keep their first occurrence; later duplicates are dropped
//! with a warning so a bad row cannot corrupt a sibling's slot.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::ids::{AreaId, MemberId, ProjectId};

/// Top-level grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub id: AreaId,
    pub name: String,
    /// Style token, e.g. `#ff6b6b`.
    #[serde(default)]
    pub color: String,
}

/// Mid-level grouping, owned by one area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub color: String,
    pub area_id: AreaId,
}

/// Leaf entity, owned by one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    /// Opaque image handle passed through to the renderer.
    #[serde(default, alias = "image")]
    pub avatar: String,
    pub project_id: ProjectId,
}

/// An edge between two members of the same project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub source: MemberId,
    pub target: MemberId,
}

impl Connection {
    pub fn new(source: MemberId, target: MemberId) -> Self {
        Self { source, target }
    }
}

/// Wire shape of the three relations as delivered by the host.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HierarchyPayload {
    pub areas: Vec<Area>,
    pub projects: Vec<Project>,
    #[serde(alias = "users")]
    pub members: Vec<Member>,
}

/// The three relations plus stable sibling indices.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    areas: Vec<Area>,
    projects: Vec<Project>,
    members: Vec<Member>,
    area_index: HashMap<AreaId, usize>,
    project_index: HashMap<ProjectId, usize>,
    member_index: HashMap<MemberId, usize>,
    /// Project slots per area id, in input order.
    projects_by_area: HashMap<AreaId, Vec<usize>>,
    /// Member slots per project id, in input order.
    members_by_project: HashMap<ProjectId, Vec<usize>>,
}

impl Hierarchy {
    /// Build a hierarchy from the three relations.
    ///
    /// Dangling references are kept as-is: a project whose area is missing
    /// stays in `projects()` but the placement pass skips it.
    pub fn new(areas: Vec<Area>, projects: Vec<Project>, members: Vec<Member>) -> Self {
        let areas = dedup_by_id(areas, |a| a.id, "area");
        let projects = dedup_by_id(projects, |p| p.id, "project");
        let members = dedup_by_id(members, |m| m.id, "member");

        let area_index = areas.iter().enumerate().map(|(i, a)| (a.id, i)).collect();
        let project_index = projects
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id, i))
            .collect();
        let member_index = members.iter().enumerate().map(|(i, m)| (m.id, i)).collect();

        let mut projects_by_area: HashMap<AreaId, Vec<usize>> = HashMap::new();
        for (i, project) in projects.iter().enumerate() {
            projects_by_area.entry(project.area_id).or_default().push(i);
        }

        let mut members_by_project: HashMap<ProjectId, Vec<usize>> = HashMap::new();
        for (i, member) in members.iter().enumerate() {
            members_by_project.entry(member.project_id).or_default().push(i);
        }

        Self {
            areas,
            projects,
            members,
            area_index,
            project_index,
            member_index,
            projects_by_area,
            members_by_project,
        }
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty() && self.projects.is_empty() && self.members.is_empty()
    }

    pub fn area(&self, id: AreaId) -> Option<&Area> {
        self.area_index.get(&id).map(|&i| &self.areas[i])
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.project_index.get(&id).map(|&i| &self.projects[i])
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.member_index.get(&id).map(|&i| &self.members[i])
    }

    /// Projects whose `area_id` is `area`, in input order.
    pub fn projects_in_area(&self, area: AreaId) -> impl Iterator<Item = &Project> + '_ {
        self.projects_by_area
            .get(&area)
            .into_iter()
            .flatten()
            .map(|&i| &self.projects[i])
    }

    /// Members whose `project_id` is `project`, in input order.
    pub fn members_in_project(&self, project: ProjectId) -> impl Iterator<Item = &Member> + '_ {
        self.members_by_project
            .get(&project)
            .into_iter()
            .flatten()
            .map(|&i| &self.members[i])
    }

    /// Number of members referencing `project`.
    pub fn member_count(&self, project: ProjectId) -> usize {
        self.members_by_project.get(&project).map_or(0, Vec::len)
    }

    /// The first project of an area, used for the area's accent color.
    pub fn first_project_in_area(&self, area: AreaId) -> Option<&Project> {
        self.projects_in_area(area).next()
    }

    /// Whether `member` is the first member of its project.
    pub fn is_lead_member(&self, member: &Member) -> bool {
        self.members_in_project(member.project_id)
            .next()
            .is_some_and(|first| first.id == member.id)
    }
}

impl From<HierarchyPayload> for Hierarchy {
    fn from(payload: HierarchyPayload) -> Self {
        Self::new(payload.areas, payload.projects, payload.members)
    }
}

fn dedup_by_id<T, K>(items: Vec<T>, key: impl Fn(&T) -> K, kind: &str) -> Vec<T>
where
    K: std::hash::Hash + Eq + std::fmt::Display + Copy,
{
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| {
            let id = key(item);
            let fresh = seen.insert(id);
            if !fresh {
                log::warn!("event=duplicate_id module=hierarchy kind={kind} id={id} status=dropped");
            }
            fresh
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_grouping_keeps_input_order() {
        let h = sample();
        let in_area: Vec<_> = h.projects_in_area(AreaId(1)).map(|p| p.id.0).collect();
        assert_eq!(in_area, vec![1, 2]);

        let in_project: Vec<_> = h.members_in_project(ProjectId(3)).map(|m| m.id.0).collect();
        assert_eq!(in_project, vec![8, 9, 10]);
    }

    #[test]
    fn test_member_count() {
        let h = sample();
        assert_eq!(h.member_count(ProjectId(1)), 5);
        assert_eq!(h.member_count(ProjectId(2)), 2);
        assert_eq!(h.member_count(ProjectId(99)), 0);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let h = Hierarchy::new(
            vec![area(1, "A", "#000000")],
            vec![project(1, 1, "#111111")],
            vec![member(1, 1), member(2, 1), member(1, 1)],
        );
        assert_eq!(h.members().len(), 2);
        assert_eq!(h.member_count(ProjectId(1)), 2);
    }

    #[test]
    fn test_member_listed_under_two_projects_stays_in_first() {
        let h = Hierarchy::new(
            vec![area(1, "A", "#000000")],
            vec![project(1, 1, "#111111"), project(2, 1, "#222222")],
            vec![member(1, 1), member(2, 1), member(1, 2), member(3, 2)],
        );
        let second: Vec<_> = h.members_in_project(ProjectId(2)).map(|m| m.id.0).collect();
        assert_eq!(second, vec![3]);
        assert_eq!(h.member(MemberId(1)).map(|m| m.project_id), Some(ProjectId(1)));
    }

    #[test]
    fn test_lead_member() {
        let h = sample();
        let members = h.members();
        assert!(h.is_lead_member(&members[0]));
        assert!(!h.is_lead_member(&members[1]));
        assert!(h.is_lead_member(&members[5]));
    }

    #[test]
    fn test_payload_accepts_users_alias() {
        let json = r##"{
            "areas": [{ "id": 1, "name": "A", "color": "#ff6b6b" }],
            "projects": [{ "id": 1, "name": "P", "color": "#ff6b6b", "areaId": 1 }],
            "users": [{ "id": 1, "name": "u", "image": "/img/u.svg", "projectId": 1 }]
        }"##;
        let payload: HierarchyPayload = serde_json::from_str(json).unwrap();
        let h = Hierarchy::from(payload);
        assert_eq!(h.members().len(), 1);
        assert_eq!(h.members()[0].avatar, "/img/u.svg");
        assert_eq!(h.first_project_in_area(AreaId(1)).map(|p| p.id), Some(ProjectId(1)));
    }
}
