//! Easing curves for step transitions.

/// Quadratic ease-in-out over `t` in `[0, 1]`.
///
/// Same curve as d3's `easeQuadInOut`: accelerates through the first half,
/// decelerates through the second.
#[inline]
pub fn quad_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t / 2.0
    } else {
        let t = t - 1.0;
        (t * (2.0 - t) + 1.0) / 2.0
    }
}
