//! Ring connections: members of a project joined into a single cycle.
//!
//! Member `i` connects to member `(i + 1) mod n` in input order. A project
//! with fewer than two members yields no connection at all; a one-member
//! ring would be a self-loop, which renders as nothing useful.

use std::collections::HashMap;

use super::ids::{MemberId, ProjectId};
use super::model::{Connection, Member, Project};

/// The ring of one project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRing {
    pub project: ProjectId,
    pub connections: Vec<Connection>,
}

/// Build one ring per project.
///
/// Members referencing an unknown project are ignored. Output order follows
/// `projects`, but callers should only rely on the set of pairs.
pub fn build_rings(projects: &[Project], members: &[Member]) -> Vec<ProjectRing> {
    let mut by_project: HashMap<ProjectId, Vec<MemberId>> = HashMap::new();
    for member in members {
        by_project.entry(member.project_id).or_default().push(member.id);
    }

    projects
        .iter()
        .map(|project| ProjectRing {
            project: project.id,
            connections: by_project
                .get(&project.id)
                .map(|ids| ring_of(ids))
                .unwrap_or_default(),
        })
        .collect()
}

/// Cyclic connections over an ordered member list.
pub fn ring_of(members: &[MemberId]) -> Vec<Connection> {
    let n = members.len();
    if n < 2 {
        return Vec::new();
    }
    (0..n)
        .map(|i| Connection::new(members[i], members[(i + 1) % n]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::model::fixtures::{member, project, sample};
    use std::collections::HashSet;

    /// Walk the ring from its first source and check it visits every member once.
    fn assert_single_cycle(connections: &[Connection], expected: &[MemberId]) {
        assert_eq!(connections.len(), expected.len());
        let next: HashMap<MemberId, MemberId> =
            connections.iter().map(|c| (c.source, c.target)).collect();
        assert_eq!(next.len(), expected.len(), "every member is a source exactly once");

        let start = expected[0];
        let mut seen = HashSet::new();
        let mut cursor = start;
        for _ in 0..expected.len() {
            assert!(seen.insert(cursor), "{cursor} visited twice");
            cursor = next[&cursor];
        }
        assert_eq!(cursor, start, "walk must close the cycle");
        assert_eq!(seen, expected.iter().copied().collect::<HashSet<_>>());
    }

    #[test]
    fn test_three_member_ring() {
        let rings = build_rings(
            &[project(1, 1, "#fff")],
            &[member(10, 1), member(11, 1), member(12, 1)],
        );
        assert_eq!(rings.len(), 1);
        let pairs: HashSet<_> = rings[0]
            .connections
            .iter()
            .map(|c| (c.source.0, c.target.0))
            .collect();
        assert_eq!(pairs, HashSet::from([(10, 11), (11, 12), (12, 10)]));
    }

    #[test]
    fn test_every_ring_is_single_cycle() {
        let h = sample();
        for ring in build_rings(h.projects(), h.members()) {
            let ids: Vec<_> = h.members_in_project(ring.project).map(|m| m.id).collect();
            assert_single_cycle(&ring.connections, &ids);
        }
    }

    #[test]
    fn test_two_members_connect_both_ways() {
        let connections = ring_of(&[MemberId(1), MemberId(2)]);
        assert_eq!(
            connections,
            vec![
                Connection::new(MemberId(1), MemberId(2)),
                Connection::new(MemberId(2), MemberId(1)),
            ]
        );
    }

    #[test]
    fn test_degenerate_projects_have_no_connections() {
        assert!(ring_of(&[]).is_empty());
        assert!(ring_of(&[MemberId(7)]).is_empty());

        let rings = build_rings(&[project(1, 1, "#fff"), project(2, 1, "#fff")], &[member(1, 1)]);
        assert!(rings.iter().all(|r| r.connections.is_empty()));
    }

    #[test]
    fn test_orphan_members_ignored() {
        let rings = build_rings(
            &[project(1, 1, "#fff")],
            &[member(1, 1), member(2, 9), member(3, 1)],
        );
        let ids: Vec<_> = rings[0].connections.iter().map(|c| c.source.0).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
