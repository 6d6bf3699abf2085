use crate::curve::{
    arc_fn::ArcSegment,
    types::{Point, ScreenTransform},
};
use log::debug;

/// Sample the full composite curve: N evenly spaced x values over the total
/// domain, each evaluated through the first segment whose domain contains it.
///
/// Segments are contiguous and non-overlapping (see `story::resolve_segments`),
/// so "first match" is unambiguous; the shared boundary x belongs to the
/// earlier segment.
pub fn sample_composite(segments: &[ArcSegment], sample_count: usize) -> Vec<Point> {
    let Some(first) = segments.first() else {
        return Vec::new();
    };
    let last = segments.last().unwrap();
    let (x_min, x_max) = (first.x1, last.x2);
    let width = x_max - x_min;
    if width.abs() < f64::EPSILON || sample_count < 2 {
        debug!("composite domain is degenerate ({x_min}..{x_max}); no samples");
        return Vec::new();
    }

    let step = width / (sample_count - 1) as f64;
    let mut points = Vec::with_capacity(sample_count);
    for i in 0..sample_count {
        let x = x_min + i as f64 * step;
        let y = segments
            .iter()
            .find_map(|seg| seg.eval(x))
            // fp drift at the far edge: clamp onto the last segment
            .unwrap_or_else(|| last.eval_extrapolated(x));
        points.push(Point::new(x, y));
    }
    points
}

/// Min-max rescale of the sampled y values into a fixed display range.
///
/// A flat curve (zero y spread) cannot be rescaled; every point is pinned to
/// the middle of the display range instead.
pub fn rescale_to_display(points: &mut [Point], display_min: f64, display_max: f64) {
    if points.is_empty() {
        return;
    }
    let y_min = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let y_max = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    let spread = y_max - y_min;

    if spread.abs() < f64::EPSILON {
        let mid = (display_min + display_max) * 0.5;
        debug!("flat curve (y = {y_min}); pinning to display midpoint {mid}");
        for p in points.iter_mut() {
            p.y = mid;
        }
        return;
    }

    let scale = (display_max - display_min) / spread;
    for p in points.iter_mut() {
        p.y = display_min + (p.y - y_min) * scale;
    }
}

/// Compose the min-max display rescale with the pixel transform into one
/// affine map straight from the time/score domain to pixel space.
///
/// Fitting and cascading both need to cross between the domains repeatedly
/// (extrapolated samples go forward, fitted endpoints come back), so the two
/// linear steps are fused rather than threaded separately.
///
/// A flat curve (zero y spread) keeps a unit score-to-display scale centered
/// on the flat value, so the map stays invertible and extrapolated samples
/// that leave the flat value still land somewhere sensible.
pub fn domain_to_screen(
    samples: &[Point],
    display_min: f64,
    display_max: f64,
    screen: &ScreenTransform,
) -> ScreenTransform {
    let y_min = samples.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let y_max = samples.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    let spread = y_max - y_min;

    let (rescale, re_offset) = if samples.is_empty() || spread.abs() < f64::EPSILON {
        let mid = (display_min + display_max) * 0.5;
        let base = if samples.is_empty() { 0.0 } else { y_min };
        (1.0, mid - base)
    } else {
        let s = (display_max - display_min) / spread;
        (s, display_min - y_min * s)
    };

    ScreenTransform {
        scale_x: screen.scale_x,
        scale_y: screen.scale_y * rescale,
        offset_x: screen.offset_x,
        offset_y: screen.offset_y + screen.scale_y * re_offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::arc_fn::ArcType;

    fn three_segments() -> Vec<ArcSegment> {
        vec![
            ArcSegment::new(0.0, 30.0, -5.0, 0.0, ArcType::Linear),
            ArcSegment::new(30.0, 65.0, 0.0, -8.0, ArcType::Step),
            ArcSegment::new(65.0, 100.0, -8.0, 6.0, ArcType::SCurve),
        ]
    }

    #[test]
    fn test_sample_count_and_domain() {
        let points = sample_composite(&three_segments(), 201);
        assert_eq!(points.len(), 201);
        assert!((points[0].x - 0.0).abs() < 1e-9);
        assert!((points[200].x - 100.0).abs() < 1e-9);
        assert!((points[0].y - -5.0).abs() < 1e-6);
        assert!((points[200].y - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_no_discontinuity_at_segment_boundaries() {
        // dense sampling: adjacent samples inside one segment stay close, and
        // the jump across a segment boundary is bounded by the segment formulas
        // themselves (shared endpoint), not by which segment evaluated it
        let segments = vec![
            ArcSegment::new(0.0, 50.0, -5.0, 2.0, ArcType::Linear),
            ArcSegment::new(50.0, 100.0, 2.0, 8.0, ArcType::ConcaveUpIncreasing),
        ];
        let points = sample_composite(&segments, 1001);
        let boundary_idx = 500; // x == 50.0
        let before = points[boundary_idx - 1].y;
        let at = points[boundary_idx].y;
        let after = points[boundary_idx + 1].y;
        assert!((at - before).abs() < 0.05);
        assert!((after - at).abs() < 0.05);
    }

    #[test]
    fn test_rescale_hits_display_bounds() {
        let mut points = sample_composite(&three_segments(), 101);
        rescale_to_display(&mut points, 0.0, 1.0);
        let y_min = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let y_max = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        assert!((y_min - 0.0).abs() < 1e-9);
        assert!((y_max - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rescale_flat_curve_pins_to_midpoint() {
        let mut points = vec![Point::new(0.0, 3.0), Point::new(1.0, 3.0)];
        rescale_to_display(&mut points, 0.0, 1.0);
        assert_eq!(points[0].y, 0.5);
        assert_eq!(points[1].y, 0.5);
    }

    #[test]
    fn test_empty_segments_yield_no_samples() {
        assert!(sample_composite(&[], 100).is_empty());
    }

    #[test]
    fn test_domain_to_screen_matches_two_step_mapping() {
        let segments = three_segments();
        let samples = sample_composite(&segments, 101);
        let screen = ScreenTransform::fit((0.0, 100.0), (0.0, 1.0), 2000.0, 1200.0, 100.0);
        let combined = domain_to_screen(&samples, 0.0, 1.0, &screen);

        let mut display = samples.clone();
        rescale_to_display(&mut display, 0.0, 1.0);
        for (raw, disp) in samples.iter().zip(&display) {
            let via_combined = combined.apply(*raw);
            let via_steps = screen.apply(*disp);
            assert!((via_combined.x - via_steps.x).abs() < 1e-6);
            assert!((via_combined.y - via_steps.y).abs() < 1e-6);
        }
    }

    #[test]
    fn test_domain_to_screen_flat_curve_is_invertible() {
        let samples = vec![Point::new(0.0, 3.0), Point::new(100.0, 3.0)];
        let screen = ScreenTransform::fit((0.0, 100.0), (0.0, 1.0), 2000.0, 1200.0, 100.0);
        let combined = domain_to_screen(&samples, 0.0, 1.0, &screen);
        let p = combined.apply(Point::new(50.0, 3.0));
        let back = combined.invert(p);
        assert!((back.y - 3.0).abs() < 1e-9);
        // flat value sits on the display midpoint row
        let mid = screen.apply(Point::new(50.0, 0.5));
        assert!((p.y - mid.y).abs() < 1e-9);
    }
}
