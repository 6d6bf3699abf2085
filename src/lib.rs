pub mod config;
pub mod constants;
pub mod curve;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod render;
pub mod shaping;
pub mod story;

pub use config::{EngineConfig, OverflowPolicy};
pub use curve::{ArcSegment, ArcType, Point, ScreenTransform};
pub use error::ArcTextError;
pub use layout::{PlacedGlyph, PlacementResult, PlacementStatus};
pub use pipeline::{StoryLayout, layout_story, write_back_cache};
pub use shaping::{FixedShaper, FontShaper, TextShaper};
pub use story::{StoryComponent, resolve_segments};
