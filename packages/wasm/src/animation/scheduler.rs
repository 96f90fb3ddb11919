//! Floating animation scheduler.
//!
//! One resumable chain per member, multiplexed on the host's frame clock:
//!
//! ```text
//! Unscheduled -> Pending(delay) -> Animating(step) -> Animating(step) -> ...
//! ```
//!
//! A chain waits out a random stagger delay, holds its home pose for one
//! step period, then keeps picking a new target every `step_ms`. Between
//! targets the drawn position is eased from the previous pose.
//!
//! The chain set is keyed by generation. Cancelling drops the whole set;
//! starting a generation cancels whatever came before it first, so a stale
//! chain never gets to write into a fresh scene. Pose writes still go
//! through generation-checked handles.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::easing::quad_in_out;
use super::float::{max_distance, next_position};
use crate::config::FloatConfig;
use crate::graph::{Generation, PoseHandle, Scene};
use crate::hierarchy::MemberId;
use crate::layout::Point;

/// Externally visible state of one member's chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChainPhase {
    /// No chain exists for the member in the live generation.
    Unscheduled,
    /// Waiting for its staggered start.
    Pending { start_at: f64 },
    /// Easing from `from` toward the live pose since `started_at`.
    Animating { from: Point, started_at: f64 },
}

struct Chain {
    member: MemberId,
    handle: PoseHandle,
    phase: ChainPhase,
}

/// Cancellable set of per-member floating chains.
pub struct FloatScheduler {
    config: FloatConfig,
    generation: Option<Generation>,
    chains: Vec<Chain>,
    rng: StdRng,
}

impl FloatScheduler {
    pub fn new(config: FloatConfig, seed: u64) -> Self {
        Self {
            config,
            generation: None,
            chains: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generation the running chains belong to, if any.
    pub fn generation(&self) -> Option<Generation> {
        self.generation
    }

    /// Number of live chains.
    pub fn active_chains(&self) -> usize {
        self.chains.len()
    }

    /// Start one chain per handle with staggered delays.
    ///
    /// Any chains of an earlier generation are cancelled before the new
    /// ones are created.
    pub fn start(&mut self, scene: &Scene, handles: &[PoseHandle], now: f64) {
        self.cancel_all();
        self.generation = Some(scene.generation());

        self.chains.reserve(handles.len());
        for &handle in handles {
            let Ok(pose) = scene.pose(handle) else {
                continue;
            };
            let max_stagger = self.config.max_stagger_ms;
            let delay = if max_stagger > 0.0 && max_stagger.is_finite() {
                self.rng.gen_range(0.0..max_stagger)
            } else {
                0.0
            };
            self.chains.push(Chain {
                member: pose.member,
                handle,
                phase: ChainPhase::Pending {
                    start_at: now + delay,
                },
            });
        }
    }

    /// Drop every chain and pending start. Safe to call repeatedly.
    ///
    /// Returns how many chains were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.chains.len();
        if let Some(generation) = self.generation.take() {
            log::debug!(
                "event=animation_cancelled module=animation generation={} chains={}",
                generation,
                cancelled
            );
        }
        self.chains.clear();
        cancelled
    }

    /// Advance every chain to `now`. Returns the number of steps taken.
    pub fn tick(&mut self, scene: &mut Scene, now: f64) -> usize {
        if self.generation != Some(scene.generation()) {
            // the scene moved on without us; nothing here may write to it
            self.cancel_all();
            return 0;
        }

        let step_ms = self.config.step_ms.max(0.0);
        let mut steps = 0;
        let mut stale = false;

        for chain in &mut self.chains {
            if let ChainPhase::Pending { start_at } = chain.phase {
                if now < start_at {
                    continue;
                }
                let Ok(pose) = scene.pose(chain.handle) else {
                    stale = true;
                    continue;
                };
                chain.phase = ChainPhase::Animating {
                    from: pose.position(),
                    started_at: start_at,
                };
            }

            let ChainPhase::Animating { started_at, .. } = chain.phase else {
                continue;
            };
            if now - started_at < step_ms {
                continue;
            }

            let (Ok(pose), Ok(extent)) = (scene.pose(chain.handle), scene.extent(chain.handle))
            else {
                stale = true;
                continue;
            };
            let limit = max_distance(extent, &self.config);
            let target = next_position(&pose, limit, &self.config, &mut self.rng);
            if scene.write_pose(chain.handle, target).is_err() {
                stale = true;
                continue;
            }

            let next_start = started_at + step_ms;
            chain.phase = ChainPhase::Animating {
                from: pose.position(),
                // a host that stopped ticking for a while resumes from now
                started_at: if now - next_start >= step_ms { now } else { next_start },
            };
            steps += 1;
        }

        if stale {
            log::warn!(
                "event=stale_chain module=animation generation={}",
                scene.generation()
            );
            self.cancel_all();
        }
        steps
    }

    /// Drawn position of every scene slot at `now`.
    ///
    /// All positions come from one read of the scene, so connection
    /// endpoints taken from this vector are consistent within the frame.
    pub fn rendered_positions(&self, scene: &Scene, now: f64) -> Vec<Point> {
        let mut positions: Vec<Point> = scene
            .positions_x()
            .iter()
            .zip(scene.positions_y())
            .map(|(&x, &y)| Point::new(x, y))
            .collect();

        if self.generation != Some(scene.generation()) {
            return positions;
        }

        let step_ms = self.config.step_ms;
        for chain in &self.chains {
            let ChainPhase::Animating { from, started_at } = chain.phase else {
                continue;
            };
            let Some(target) = positions.get_mut(chain.handle.slot()) else {
                continue;
            };
            let t = if step_ms > 0.0 {
                ((now - started_at) / step_ms) as f32
            } else {
                1.0
            };
            *target = from.lerp(*target, quad_in_out(t));
        }
        positions
    }

    /// Current phase of a member's chain.
    pub fn phase(&self, member: MemberId) -> ChainPhase {
        self.chains
            .iter()
            .find(|c| c.member == member)
            .map_or(ChainPhase::Unscheduled, |c| c.phase)
    }
}
