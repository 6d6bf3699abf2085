use crate::{
    constants::{
        DEFAULT_BOX_SHRINK, DEFAULT_CANVAS_HEIGHT_PX, DEFAULT_CANVAS_WIDTH_PX,
        DEFAULT_GRID_CELL_PX, DEFAULT_MARGIN_PX, DEFAULT_MAX_NUDGES, DEFAULT_NUDGE_FRACTION,
        DEFAULT_OVERLAP_TOLERANCE, DEFAULT_SAMPLE_COUNT, DISPLAY_MAX, DISPLAY_MIN,
        MAX_EXTRA_POINTS,
    },
    error::{ArcTextError, Result},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration, loadable from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub curve: CurveConfig,
    #[serde(default)]
    pub fit: FitConfig,
    #[serde(default)]
    pub placement: PlacementConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CurveConfig {
    /// Number of composite-curve samples over the full timeline
    #[serde(default = "default_sample_count")]
    pub sample_count: usize,

    /// Display range the rescaled scores land in (before the pixel transform)
    #[serde(default = "default_display_min")]
    pub display_min: f64,
    #[serde(default = "default_display_max")]
    pub display_max: f64,

    /// Pixel canvas the curve is laid out on
    #[serde(default = "default_canvas_width")]
    pub canvas_width_px: f64,
    #[serde(default = "default_canvas_height")]
    pub canvas_height_px: f64,
    #[serde(default = "default_margin")]
    pub margin_px: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FitConfig {
    /// Hard cap on extrapolated points appended while lengthening a segment
    #[serde(default = "default_max_extra_points")]
    pub max_extra_points: usize,
}

/// What to do when a segment's curve runs out before all glyphs are placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Drop the glyphs that no longer fit, keep the ones already committed
    #[default]
    DropRemaining,
    /// Discard every glyph of the affected segment
    RollbackSegment,
    /// Clamp overflowing glyphs to the curve end and accept the overlap
    ClampToEnd,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlacementConfig {
    /// Glyph quads are shrunk to this factor of the measured box before testing
    #[serde(default = "default_box_shrink")]
    pub box_shrink: f64,

    /// Tolerated intersection area as a ratio of the glyph's own area
    #[serde(default = "default_overlap_tolerance")]
    pub overlap_tolerance: f64,

    /// Forward nudge per retry, as a fraction of the glyph width
    #[serde(default = "default_nudge_fraction")]
    pub nudge_fraction: f64,

    /// Retry budget per glyph before committing with residual overlap
    #[serde(default = "default_max_nudges")]
    pub max_nudges: usize,

    /// Cell size of the spatial grid holding committed glyph quads
    #[serde(default = "default_grid_cell")]
    pub grid_cell_px: f64,

    #[serde(default)]
    pub overflow_policy: OverflowPolicy,
}

fn default_sample_count() -> usize {
    DEFAULT_SAMPLE_COUNT
}
fn default_display_min() -> f64 {
    DISPLAY_MIN
}
fn default_display_max() -> f64 {
    DISPLAY_MAX
}
fn default_canvas_width() -> f64 {
    DEFAULT_CANVAS_WIDTH_PX
}
fn default_canvas_height() -> f64 {
    DEFAULT_CANVAS_HEIGHT_PX
}
fn default_margin() -> f64 {
    DEFAULT_MARGIN_PX
}
fn default_max_extra_points() -> usize {
    MAX_EXTRA_POINTS
}
fn default_box_shrink() -> f64 {
    DEFAULT_BOX_SHRINK
}
fn default_overlap_tolerance() -> f64 {
    DEFAULT_OVERLAP_TOLERANCE
}
fn default_nudge_fraction() -> f64 {
    DEFAULT_NUDGE_FRACTION
}
fn default_max_nudges() -> usize {
    DEFAULT_MAX_NUDGES
}
fn default_grid_cell() -> f64 {
    DEFAULT_GRID_CELL_PX
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            sample_count: default_sample_count(),
            display_min: default_display_min(),
            display_max: default_display_max(),
            canvas_width_px: default_canvas_width(),
            canvas_height_px: default_canvas_height(),
            margin_px: default_margin(),
        }
    }
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            max_extra_points: default_max_extra_points(),
        }
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            box_shrink: default_box_shrink(),
            overlap_tolerance: default_overlap_tolerance(),
            nudge_fraction: default_nudge_fraction(),
            max_nudges: default_max_nudges(),
            grid_cell_px: default_grid_cell(),
            overflow_policy: OverflowPolicy::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            curve: CurveConfig::default(),
            fit: FitConfig::default(),
            placement: PlacementConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ArcTextError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: EngineConfig = toml::from_str(&content).map_err(|e| {
            ArcTextError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.curve.sample_count < 2 {
            return Err(ArcTextError::Config(format!(
                "sample_count must be at least 2, got {}",
                self.curve.sample_count
            )));
        }
        if self.curve.display_max <= self.curve.display_min {
            return Err(ArcTextError::Config(format!(
                "display range is empty: [{}, {}]",
                self.curve.display_min, self.curve.display_max
            )));
        }
        if self.curve.canvas_width_px <= 2.0 * self.curve.margin_px
            || self.curve.canvas_height_px <= 2.0 * self.curve.margin_px
        {
            return Err(ArcTextError::Config(format!(
                "canvas {}x{} px leaves no room inside {} px margins",
                self.curve.canvas_width_px, self.curve.canvas_height_px, self.curve.margin_px
            )));
        }
        if !(0.0..=1.0).contains(&self.placement.box_shrink) {
            return Err(ArcTextError::Config(format!(
                "box_shrink must be in [0, 1], got {}",
                self.placement.box_shrink
            )));
        }
        if self.placement.nudge_fraction <= 0.0 {
            return Err(ArcTextError::Config(format!(
                "nudge_fraction must be positive, got {}",
                self.placement.nudge_fraction
            )));
        }
        if self.placement.grid_cell_px <= 0.0 {
            return Err(ArcTextError::Config(format!(
                "grid_cell_px must be positive, got {}",
                self.placement.grid_cell_px
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_sample_count_rejected() {
        let mut config = EngineConfig::default();
        config.curve.sample_count = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_display_range_rejected() {
        let mut config = EngineConfig::default();
        config.curve.display_min = 1.0;
        config.curve.display_max = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        std::fs::write(
            &path,
            r#"
[curve]
sample_count = 250

[placement]
overflow_policy = "rollback_segment"
max_nudges = 4
"#,
        )
        .unwrap();

        let config = EngineConfig::load_from_file(&path).unwrap();
        assert_eq!(config.curve.sample_count, 250);
        assert_eq!(config.placement.max_nudges, 4);
        assert_eq!(
            config.placement.overflow_policy,
            OverflowPolicy::RollbackSegment
        );
        // untouched sections keep defaults
        assert_eq!(config.fit.max_extra_points, MAX_EXTRA_POINTS);
    }
}
