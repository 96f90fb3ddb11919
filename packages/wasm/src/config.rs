//! Engine configuration.
//!
//! Every knob has a default matching the reference look of the diagram, so
//! the host can pass a partial object (or nothing) from JavaScript.

use serde::Deserialize;

use crate::error::{GraphError, GraphResult};

/// Every value must be finite.
fn finite(field: &'static str, value: f64) -> GraphResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GraphError::InvalidConfig {
            field,
            value,
            reason: "must be finite",
        })
    }
}

/// Fractions, bounds and durations must also be non-negative.
fn non_negative(field: &'static str, value: f64) -> GraphResult<()> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(GraphError::InvalidConfig {
            field,
            value,
            reason: "must not be negative",
        });
    }
    Ok(())
}

/// Configuration for the radial placement pass.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlacementConfig {
    /// Horizontal shift of the area ellipse center to the left (default: 100.0).
    pub center_offset_x: f32,
    /// Area ellipse radii as a fraction of viewport width/height (default: 0.25).
    pub ellipse_fraction: f32,
    /// Project distance from its area anchor, as a fraction of `rx` (default: 0.5).
    pub project_distance_fraction: f32,
    /// Base project radius as a fraction of viewport width (default: 0.06).
    pub project_radius_fraction: f32,
    /// Size factor of a project with `reference_member_count` members (default: 0.7).
    pub base_size_factor: f32,
    /// Size factor increment per additional member (default: 0.1).
    pub size_step: f32,
    /// Member count that maps to `base_size_factor` (default: 2).
    pub reference_member_count: u32,
    /// Lower clamp on the size factor (default: 0.1).
    pub min_size_factor: f32,
    /// Upper bound of the random angular offset per member, radians (default: 0.3).
    pub angle_jitter: f32,
    /// Upper bound of the random radial stretch per member (default: 0.3).
    pub radius_jitter: f32,
}

impl PlacementConfig {
    pub fn validate(&self) -> GraphResult<()> {
        finite("placement.centerOffsetX", self.center_offset_x.into())?;
        finite("placement.baseSizeFactor", self.base_size_factor.into())?;
        finite("placement.sizeStep", self.size_step.into())?;
        non_negative("placement.ellipseFraction", self.ellipse_fraction.into())?;
        non_negative(
            "placement.projectDistanceFraction",
            self.project_distance_fraction.into(),
        )?;
        non_negative(
            "placement.projectRadiusFraction",
            self.project_radius_fraction.into(),
        )?;
        non_negative("placement.minSizeFactor", self.min_size_factor.into())?;
        non_negative("placement.angleJitter", self.angle_jitter.into())?;
        non_negative("placement.radiusJitter", self.radius_jitter.into())
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            center_offset_x: 100.0,
            ellipse_fraction: 0.25,
            project_distance_fraction: 0.5,
            project_radius_fraction: 0.06,
            base_size_factor: 0.7,
            size_step: 0.1,
            reference_member_count: 2,
            min_size_factor: 0.1,
            angle_jitter: 0.3,
            radius_jitter: 0.3,
        }
    }
}

/// Configuration for the floating motion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FloatConfig {
    /// Duration of one eased step in milliseconds (default: 3000.0).
    pub step_ms: f64,
    /// Staggered start delays are drawn from `[0, max_stagger_ms)` (default: 3000.0).
    pub max_stagger_ms: f64,
    /// Max wander distance as a fraction of the project radius (default: 0.4).
    pub wander_fraction: f32,
    /// Where an outlier lands on its way home, as a fraction of max distance (default: 0.8).
    pub return_fraction: f32,
    /// Upper bound of a regular wander, as a fraction of max distance (default: 0.3).
    pub roam_fraction: f32,
}

impl FloatConfig {
    pub fn validate(&self) -> GraphResult<()> {
        non_negative("float.stepMs", self.step_ms)?;
        non_negative("float.maxStaggerMs", self.max_stagger_ms)?;
        non_negative("float.wanderFraction", self.wander_fraction.into())?;
        non_negative("float.returnFraction", self.return_fraction.into())?;
        non_negative("float.roamFraction", self.roam_fraction.into())
    }
}

impl Default for FloatConfig {
    fn default() -> Self {
        Self {
            step_ms: 3000.0,
            max_stagger_ms: 3000.0,
            wander_fraction: 0.4,
            return_fraction: 0.8,
            roam_fraction: 0.3,
        }
    }
}

/// Configuration for the viewport responsiveness controller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportConfig {
    /// Height of the page header strip subtracted from the window height (default: 80.0).
    pub chrome_height: f32,
    /// Trailing-edge debounce for resize events in milliseconds (default: 150.0).
    pub debounce_ms: f64,
}

impl ViewportConfig {
    pub fn validate(&self) -> GraphResult<()> {
        non_negative("viewport.chromeHeight", self.chrome_height.into())?;
        non_negative("viewport.debounceMs", self.debounce_ms)
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            chrome_height: 80.0,
            debounce_ms: 150.0,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub placement: PlacementConfig,
    pub float: FloatConfig,
    pub viewport: ViewportConfig,
}

impl EngineConfig {
    /// Check every value before it reaches placement or animation.
    ///
    /// # Errors
    /// - Returns `InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> GraphResult<()> {
        self.placement.validate()?;
        self.float.validate()?;
        self.viewport.validate()
    }
}
