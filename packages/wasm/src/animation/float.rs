//! The steady-state floating step.
//!
//! A member may drift at most `wander_fraction * project_radius` from home.
//! Inside that disc it picks a fresh spot near home each step; outside it,
//! it is pulled back to `return_fraction` of the limit.

use rand::Rng;
use std::f32::consts::TAU;

use crate::config::FloatConfig;
use crate::layout::{MemberPose, Point};

/// Largest allowed distance from home for a member of a project with
/// radius `extent`.
#[inline]
pub fn max_distance(extent: f32, config: &FloatConfig) -> f32 {
    extent * config.wander_fraction
}

/// Where the member should go next.
pub fn next_position<R: Rng>(
    pose: &MemberPose,
    max_distance: f32,
    config: &FloatConfig,
    rng: &mut R,
) -> Point {
    let home = pose.base();

    if pose.displacement() > max_distance {
        let angle = pose.position().angle_to(home);
        return home.polar_offset(angle, max_distance * config.return_fraction);
    }

    let roam = max_distance * config.roam_fraction;
    // a huge extent times the fraction can overflow to infinity
    if !(roam > 0.0 && roam.is_finite()) {
        return home;
    }
    let angle = rng.gen_range(0.0..TAU);
    let distance = rng.gen_range(0.0..roam);
    home.polar_offset(angle, distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{MemberId, ProjectId};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pose_at(x: f32, y: f32) -> MemberPose {
        MemberPose {
            member: MemberId(1),
            project: ProjectId(1),
            x,
            y,
            base_x: 100.0,
            base_y: 100.0,
        }
    }

    #[test]
    fn test_max_distance() {
        assert_eq!(max_distance(50.0, &FloatConfig::default()), 20.0);
    }

    #[test]
    fn test_wander_stays_near_home() {
        let config = FloatConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        let pose = pose_at(100.0, 100.0);
        for _ in 0..1000 {
            let next = next_position(&pose, 20.0, &config, &mut rng);
            assert!(next.distance_to(pose.base()) < 6.0 + 1e-4);
        }
    }

    #[test]
    fn test_outlier_pulled_back() {
        let config = FloatConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        // 50 to the right of home with a limit of 20
        let pose = pose_at(150.0, 100.0);
        let next = next_position(&pose, 20.0, &config, &mut rng);

        assert!((next.distance_to(pose.base()) - 16.0).abs() < 1e-3);
        // lands on the far side of home, along current -> home
        assert!((next.x - 84.0).abs() < 1e-3);
        assert!((next.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_extent_stays_home() {
        let config = FloatConfig::default();
        let mut rng = StdRng::seed_from_u64(0);
        let pose = pose_at(100.0, 100.0);
        assert_eq!(next_position(&pose, 0.0, &config, &mut rng), pose.base());
    }
}
