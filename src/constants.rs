/// Story component value ranges
pub const TIME_MIN: f64 = 0.0; // timeline start [%]
pub const TIME_MAX: f64 = 100.0; // timeline end [%]
pub const SCORE_MIN: f64 = -10.0;
pub const SCORE_MAX: f64 = 10.0;

/// Curve sampling defaults
pub const DEFAULT_SAMPLE_COUNT: usize = 500;
pub const DEFAULT_CANVAS_WIDTH_PX: f64 = 2000.0;
pub const DEFAULT_CANVAS_HEIGHT_PX: f64 = 1200.0;
pub const DEFAULT_MARGIN_PX: f64 = 100.0;

/// Display range the sampled scores are rescaled into
pub const DISPLAY_MIN: f64 = 0.0;
pub const DISPLAY_MAX: f64 = 1.0;

/// Fitting limits
pub const MAX_EXTRA_POINTS: usize = 1000; // extrapolation safety cap

/// Placement defaults
pub const DEFAULT_BOX_SHRINK: f64 = 0.8; // glyph quad shrink factor
pub const DEFAULT_OVERLAP_TOLERANCE: f64 = 0.05; // overlap area / glyph area
pub const DEFAULT_NUDGE_FRACTION: f64 = 0.25; // of glyph width, per retry
pub const DEFAULT_MAX_NUDGES: usize = 8;
pub const DEFAULT_GRID_CELL_PX: f64 = 64.0;

/// Geometric tolerance
pub const GEOM_EPS: f64 = 1e-9;
