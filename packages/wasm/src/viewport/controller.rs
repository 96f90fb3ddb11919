//! Viewport responsiveness controller.
//!
//! Turns a stream of surface sizes into relayout decisions. The first size
//! is applied at once; later sizes are debounced on the trailing edge, so a
//! drag-resize produces one relayout when it settles instead of one per
//! event. A size equal to the current one is not a change.

use crate::config::ViewportConfig;
use crate::error::GraphResult;
use crate::layout::Viewport;

/// What happened to an observed size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeOutcome {
    /// Due now; the next `poll` returns it.
    Immediate,
    /// Waiting for the debounce window to close.
    Deferred { due_at: f64 },
    /// Same as the applied size and nothing pending.
    Unchanged,
}

#[derive(Debug, Clone, Copy)]
struct PendingResize {
    viewport: Viewport,
    due_at: f64,
}

/// Observes surface sizes and decides when a full relayout is due.
#[derive(Debug, Clone)]
pub struct ViewportController {
    config: ViewportConfig,
    current: Option<Viewport>,
    pending: Option<PendingResize>,
    invalidated: bool,
}

impl ViewportController {
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            config,
            current: None,
            pending: None,
            invalidated: false,
        }
    }

    /// The size the live layout was computed for.
    pub fn current(&self) -> Option<Viewport> {
        self.current
    }

    /// Observe a surface size.
    ///
    /// # Errors
    /// - Returns `InvalidViewport` for a non-finite or non-positive size; the
    ///   controller state is left untouched.
    pub fn observe(&mut self, width: f32, height: f32, now: f64) -> GraphResult<ResizeOutcome> {
        let viewport = Viewport::new(width, height)?;
        Ok(self.schedule(viewport, now))
    }

    /// Observe a window size; the page header strip is subtracted first.
    pub fn observe_window(
        &mut self,
        width: f32,
        height: f32,
        now: f64,
    ) -> GraphResult<ResizeOutcome> {
        let viewport = Viewport::from_window(width, height, self.config.chrome_height)?;
        Ok(self.schedule(viewport, now))
    }

    fn schedule(&mut self, viewport: Viewport, now: f64) -> ResizeOutcome {
        if self.current.is_none() {
            self.pending = Some(PendingResize {
                viewport,
                due_at: now,
            });
            return ResizeOutcome::Immediate;
        }

        if self.pending.is_none() && self.current == Some(viewport) {
            return ResizeOutcome::Unchanged;
        }

        let due_at = now + self.config.debounce_ms.max(0.0);
        self.pending = Some(PendingResize { viewport, due_at });
        log::debug!(
            "event=viewport_deferred module=viewport width={} height={} due_at={}",
            viewport.width,
            viewport.height,
            due_at
        );
        ResizeOutcome::Deferred { due_at }
    }

    /// Ask for a relayout at the current size (e.g. the hierarchy changed).
    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    /// The viewport to lay out for, if a relayout is due at `now`.
    pub fn poll(&mut self, now: f64) -> Option<Viewport> {
        if let Some(pending) = self.pending.filter(|p| now >= p.due_at) {
            self.pending = None;
            let changed = self.current != Some(pending.viewport);
            self.current = Some(pending.viewport);
            if changed || self.invalidated {
                self.invalidated = false;
                return Some(pending.viewport);
            }
        }

        if self.invalidated && self.pending.is_none() {
            if let Some(current) = self.current {
                self.invalidated = false;
                return Some(current);
            }
        }
        None
    }

    /// Forget every observed size.
    pub fn reset(&mut self) {
        self.current = None;
        self.pending = None;
        self.invalidated = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ViewportController {
        ViewportController::new(ViewportConfig {
            chrome_height: 80.0,
            debounce_ms: 100.0,
        })
    }

    #[test]
    fn test_first_size_is_immediate() {
        let mut c = controller();
        assert_eq!(c.observe(1000.0, 800.0, 0.0), Ok(ResizeOutcome::Immediate));
        assert_eq!(c.poll(0.0), Some(Viewport::new(1000.0, 800.0).unwrap()));
        assert_eq!(c.poll(1.0), None);
    }

    #[test]
    fn test_storm_collapses_to_last_size() {
        let mut c = controller();
        c.observe(1000.0, 800.0, 0.0).unwrap();
        c.poll(0.0);

        for i in 0..50 {
            let now = 10.0 + i as f64 * 5.0;
            let outcome = c.observe(1001.0 + i as f32, 800.0, now).unwrap();
            assert!(matches!(outcome, ResizeOutcome::Deferred { .. }));
            assert_eq!(c.poll(now), None);
        }

        // last event at t=255, due at t=355
        assert_eq!(c.poll(354.0), None);
        assert_eq!(c.poll(355.0), Some(Viewport::new(1050.0, 800.0).unwrap()));
        assert_eq!(c.poll(400.0), None);
    }

    #[test]
    fn test_same_size_is_unchanged() {
        let mut c = controller();
        c.observe(1000.0, 800.0, 0.0).unwrap();
        c.poll(0.0);
        assert_eq!(c.observe(1000.0, 800.0, 5.0), Ok(ResizeOutcome::Unchanged));
    }

    #[test]
    fn test_bounce_back_to_same_size_skips_relayout() {
        let mut c = controller();
        c.observe(1000.0, 800.0, 0.0).unwrap();
        c.poll(0.0);
        c.observe(900.0, 800.0, 10.0).unwrap();
        c.observe(1000.0, 800.0, 20.0).unwrap();
        assert_eq!(c.poll(500.0), None);
    }

    #[test]
    fn test_invalid_size_rejected() {
        let mut c = controller();
        assert!(c.observe(0.0, 800.0, 0.0).is_err());
        assert!(c.observe(f32::NAN, 800.0, 0.0).is_err());
        assert_eq!(c.poll(0.0), None);
        assert_eq!(c.current(), None);
    }

    #[test]
    fn test_window_size_removes_chrome() {
        let mut c = controller();
        c.observe_window(1280.0, 880.0, 0.0).unwrap();
        assert_eq!(c.poll(0.0), Some(Viewport::new(1280.0, 800.0).unwrap()));
    }

    #[test]
    fn test_invalidate_relayouts_at_current_size() {
        let mut c = controller();
        c.invalidate();
        assert_eq!(c.poll(0.0), None, "no size yet");

        c.observe(1000.0, 800.0, 0.0).unwrap();
        assert!(c.poll(0.0).is_some());
        c.invalidate();
        assert_eq!(c.poll(1.0), Some(Viewport::new(1000.0, 800.0).unwrap()));
        assert_eq!(c.poll(2.0), None);
    }

    #[test]
    fn test_reset_forgets_size() {
        let mut c = controller();
        c.observe(1000.0, 800.0, 0.0).unwrap();
        c.poll(0.0);
        c.reset();
        assert_eq!(c.current(), None);
        assert_eq!(c.observe(1000.0, 800.0, 1.0), Ok(ResizeOutcome::Immediate));
    }
}
