pub mod glyph;
pub mod grid;
pub mod placement;

pub use glyph::GlyphBox;
pub use grid::GlyphIndex;
pub use placement::{GlyphMetrics, PlacedGlyph, PlacementResult, PlacementStatus, place_along_curve};
