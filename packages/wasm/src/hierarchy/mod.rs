//! The area → project → member hierarchy.
//!
//! Pure data: the three relations supplied by the host, their stable ids,
//! and the ring connections derived from them.

mod ids;
pub(crate) mod model;
mod ring;

pub use ids::{AreaId, MemberId, ProjectId};
pub use model::{Area, Connection, Hierarchy, HierarchyPayload, Member, Project};
pub use ring::{ProjectRing, build_rings, ring_of};
