pub mod arc_fn;
pub mod arc_length;
pub mod cascade;
pub mod fitter;
pub mod sampler;
pub mod types;

pub use arc_fn::{ArcSegment, ArcType};
pub use arc_length::ArcLengthTable;
pub use cascade::{SegmentCurve, propagate_from, resample_segment};
pub use fitter::{FitOutcome, FitStatus, fit_to_length};
pub use sampler::{domain_to_screen, rescale_to_display, sample_composite};
pub use types::{Point, ScreenTransform};
