//! The native orchestrator.
//!
//! `OrbitEngine` owns one hierarchy, the viewport controller, the live scene
//! and the animation scheduler, and turns host events (new data, new sizes,
//! frame ticks) into frame snapshots. It never reads a clock or an OS RNG;
//! `now` comes from the host and randomness from a seeded `StdRng`.
//!
//! A relayout is a barrier: every chain of the old generation is cancelled
//! before the scene is rebuilt, and new chains only start once the new
//! generation is installed.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::animation::FloatScheduler;
use crate::config::EngineConfig;
use crate::error::{GraphError, GraphResult};
use crate::graph::{Generation, Scene};
use crate::hierarchy::{Hierarchy, MemberId, build_rings};
use crate::layout::{RadialPlacement, Skeleton, Viewport};
use crate::render::FrameSnapshot;
use crate::viewport::{ResizeOutcome, ViewportController};

/// Mixed into the caller's seed so placement and animation draw from
/// different streams.
const PLACEMENT_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

/// Layout and animation engine for one visualization surface.
pub struct OrbitEngine {
    hierarchy: Hierarchy,
    viewport: ViewportController,
    placement: RadialPlacement,
    scene: Scene,
    scheduler: FloatScheduler,
    skeleton: Option<Skeleton>,
    rng: StdRng,
    mounted: bool,
}

impl OrbitEngine {
    /// Create an engine.
    ///
    /// # Errors
    /// - Returns `InvalidConfig` when a config value is non-finite or out
    ///   of range.
    pub fn new(config: EngineConfig, seed: u64) -> GraphResult<Self> {
        config.validate()?;
        Ok(Self {
            hierarchy: Hierarchy::default(),
            viewport: ViewportController::new(config.viewport),
            placement: RadialPlacement::new(config.placement),
            scene: Scene::new(),
            scheduler: FloatScheduler::new(config.float, seed),
            skeleton: None,
            rng: StdRng::seed_from_u64(seed ^ PLACEMENT_STREAM),
            mounted: true,
        })
    }

    fn ensure_mounted(&self) -> GraphResult<()> {
        if self.mounted {
            Ok(())
        } else {
            Err(GraphError::Unmounted)
        }
    }

    // =========================================================================
    // Host Events
    // =========================================================================

    /// Replace the hierarchy. The next tick lays it out at the current size.
    pub fn set_hierarchy(&mut self, hierarchy: Hierarchy) -> GraphResult<()> {
        self.ensure_mounted()?;
        self.hierarchy = hierarchy;
        self.viewport.invalidate();
        Ok(())
    }

    /// Observe a new surface size.
    pub fn resize(&mut self, width: f32, height: f32, now: f64) -> GraphResult<ResizeOutcome> {
        self.ensure_mounted()?;
        self.viewport.observe(width, height, now)
    }

    /// Observe a new window size; the header strip is subtracted.
    pub fn resize_window(
        &mut self,
        width: f32,
        height: f32,
        now: f64,
    ) -> GraphResult<ResizeOutcome> {
        self.ensure_mounted()?;
        self.viewport.observe_window(width, height, now)
    }

    /// Advance to `now` and produce the frame to draw.
    ///
    /// Runs a due relayout first, then steps the floating chains, then
    /// reads every drawn position once.
    pub fn tick(&mut self, now: f64) -> GraphResult<FrameSnapshot> {
        self.ensure_mounted()?;

        if let Some(viewport) = self.viewport.poll(now) {
            self.relayout(viewport, now);
        }

        let Some(skeleton) = &self.skeleton else {
            return Ok(FrameSnapshot::empty(self.scene.generation(), now));
        };

        self.scheduler.tick(&mut self.scene, now);
        let drawn = self.scheduler.rendered_positions(&self.scene, now);
        self.scene.set_rendered_positions(&drawn);

        Ok(FrameSnapshot::build(
            &self.hierarchy,
            skeleton,
            &self.scene,
            &drawn,
            now,
        ))
    }

    /// Tear the visualization down. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        let cancelled = self.scheduler.cancel_all();
        self.scene.retire();
        self.viewport.reset();
        self.skeleton = None;
        self.mounted = false;
        log::info!(
            "event=unmount module=engine generation={} chains={}",
            self.scene.generation(),
            cancelled
        );
    }

    // =========================================================================
    // Layout Generations
    // =========================================================================

    fn relayout(&mut self, viewport: Viewport, now: f64) {
        self.scheduler.cancel_all();

        let generation = self.scene.generation().next();
        let placement = self
            .placement
            .place(&self.hierarchy, viewport, &mut self.rng);
        let rings = build_rings(self.hierarchy.projects(), self.hierarchy.members());

        let skeleton = &placement.skeleton;
        let handles = self.scene.rebuild(generation, &placement.members, &rings, |project| {
            skeleton.project(project).map(|anchor| anchor.radius)
        });
        self.scheduler.start(&self.scene, &handles, now);

        log::info!(
            "event=relayout module=engine generation={} width={} height={} areas={} projects={} members={} connections={}",
            generation,
            viewport.width,
            viewport.height,
            placement.skeleton.areas.len(),
            placement.skeleton.projects.len(),
            self.scene.member_count(),
            self.scene.edge_count()
        );
        self.skeleton = Some(placement.skeleton);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Member drawn nearest to `(x, y)` in the last frame, within `max_distance`.
    pub fn member_at(&mut self, x: f32, y: f32, max_distance: f32) -> Option<MemberId> {
        if !self.mounted {
            return None;
        }
        self.scene.find_member_at(x, y, max_distance)
    }

    pub fn generation(&self) -> Generation {
        self.scene.generation()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport.current()
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scheduler(&self) -> &FloatScheduler {
        &self.scheduler
    }

    pub fn skeleton(&self) -> Option<&Skeleton> {
        self.skeleton.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ChainPhase;
    use crate::hierarchy::model::fixtures::sample;

    fn engine() -> OrbitEngine {
        let mut engine = OrbitEngine::new(EngineConfig::default(), 7).unwrap();
        engine.set_hierarchy(sample()).unwrap();
        engine
    }

    #[test]
    fn test_no_frame_before_first_size() {
        let mut engine = engine();
        let frame = engine.tick(0.0).unwrap();
        assert_eq!(frame.generation, 0);
        assert!(frame.members.is_empty());
        assert!(frame.viewport.is_none());
    }

    #[test]
    fn test_first_size_lays_out_at_once() {
        let mut engine = engine();
        assert_eq!(
            engine.resize(1000.0, 800.0, 0.0),
            Ok(ResizeOutcome::Immediate)
        );
        let frame = engine.tick(0.0).unwrap();
        assert_eq!(frame.generation, 1);
        assert_eq!(frame.members.len(), 12);
        assert_eq!(engine.scheduler().active_chains(), 12);

        // nothing has moved yet
        for m in &frame.members {
            assert_eq!((m.x, m.y), (m.base_x, m.base_y));
        }
    }

    #[test]
    fn test_resize_mid_animation_is_a_barrier() {
        let mut engine = engine();
        engine.resize(1000.0, 800.0, 0.0).unwrap();
        for i in 0..=40 {
            engine.tick(i as f64 * 250.0).unwrap();
        }
        assert_eq!(engine.generation(), Generation(1));

        let outcome = engine.resize(1400.0, 900.0, 10_000.0).unwrap();
        assert_eq!(outcome, ResizeOutcome::Deferred { due_at: 10_150.0 });

        // the old generation keeps animating until the debounce settles
        let frame = engine.tick(10_100.0).unwrap();
        assert_eq!(frame.generation, 1);

        let frame = engine.tick(10_150.0).unwrap();
        assert_eq!(frame.generation, 2);
        assert_eq!(engine.scheduler().generation(), Some(Generation(2)));
        assert_eq!(frame.viewport, Some(Viewport::new(1400.0, 900.0).unwrap()));

        for m in &frame.members {
            assert_eq!((m.x, m.y), (m.base_x, m.base_y));
            match engine.scheduler().phase(m.id) {
                ChainPhase::Pending { start_at } => assert!(start_at >= 10_150.0),
                other => panic!("expected a fresh pending chain, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_hierarchy_change_relayouts_at_current_size() {
        let mut engine = engine();
        engine.resize(1000.0, 800.0, 0.0).unwrap();
        engine.tick(0.0).unwrap();

        engine.set_hierarchy(Hierarchy::default()).unwrap();
        let frame = engine.tick(16.0).unwrap();
        assert_eq!(frame.generation, 2);
        assert!(frame.members.is_empty());
        assert!(frame.areas.is_empty());
        assert_eq!(engine.scheduler().active_chains(), 0);
    }

    #[test]
    fn test_member_at_uses_drawn_positions() {
        let mut engine = engine();
        engine.resize(1000.0, 800.0, 0.0).unwrap();
        let frame = engine.tick(0.0).unwrap();
        let target = frame.member(MemberId(3)).unwrap();
        assert_eq!(
            engine.member_at(target.x + 1.0, target.y, 5.0),
            Some(MemberId(3))
        );
        assert_eq!(engine.member_at(-500.0, -500.0, 5.0), None);
    }

    #[test]
    fn test_unmount_is_terminal_and_idempotent() {
        let mut engine = engine();
        engine.resize(1000.0, 800.0, 0.0).unwrap();
        engine.tick(0.0).unwrap();

        engine.unmount();
        engine.unmount();
        assert!(!engine.is_mounted());
        assert_eq!(engine.scheduler().active_chains(), 0);
        assert_eq!(engine.scene().member_count(), 0);
        assert_eq!(engine.tick(100.0), Err(GraphError::Unmounted));
        assert_eq!(
            engine.resize(10.0, 10.0, 100.0),
            Err(GraphError::Unmounted)
        );
        assert_eq!(engine.member_at(0.0, 0.0, 1e6), None);
    }

    #[test]
    fn test_overflowing_config_rejected() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "placement": { "angleJitter": 1e39 } }"#).unwrap();
        assert!(matches!(
            OrbitEngine::new(config, 1),
            Err(GraphError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_huge_finite_config_never_panics() {
        let config: EngineConfig = serde_json::from_str(
            r#"{
                "placement": { "angleJitter": 3e38, "radiusJitter": 3e38 },
                "float": { "wanderFraction": 3e38, "maxStaggerMs": 1e300, "stepMs": 10 }
            }"#,
        )
        .unwrap();
        let mut engine = OrbitEngine::new(config, 3).unwrap();
        engine.set_hierarchy(sample()).unwrap();
        engine.resize(1000.0, 800.0, 0.0).unwrap();
        for i in 0..20 {
            engine.tick(i as f64 * 50.0).unwrap();
        }
        assert_eq!(engine.generation(), Generation(1));
        assert_eq!(engine.member_at(-1e6, -1e6, 1.0), None);
    }

    #[test]
    fn test_invalid_size_keeps_layout() {
        let mut engine = engine();
        engine.resize(1000.0, 800.0, 0.0).unwrap();
        engine.tick(0.0).unwrap();
        assert!(engine.resize(-1.0, 800.0, 5.0).is_err());
        assert_eq!(engine.tick(500.0).unwrap().generation, 1);
    }
}
