use crate::curve::{
    arc_fn::ArcSegment,
    types::{Point, ScreenTransform},
};
use log::{debug, warn};

/// Per-segment curve state carried through fitting and cascading.
///
/// `points` is the segment's screen polyline; `None` means the segment has no
/// curve data (no descriptor was generated for it) and blocks propagation.
#[derive(Debug, Clone)]
pub struct SegmentCurve {
    pub segment: ArcSegment,
    pub points: Option<Vec<Point>>,
}

/// Resample a segment at `count` evenly spaced x values and map the result
/// into screen space.
pub fn resample_segment(
    segment: &ArcSegment,
    count: usize,
    to_screen: &ScreenTransform,
) -> Vec<Point> {
    let count = count.max(2);
    let step = segment.domain_width() / (count - 1) as f64;
    (0..count)
        .map(|i| {
            let x = segment.x1 + i as f64 * step;
            to_screen.apply(Point::new(x, segment.eval_extrapolated(x)))
        })
        .collect()
}

/// Propagate segment `fitted_index`'s new endpoint through every later
/// segment: each one is rebuilt so its start equals the previous segment's
/// endpoint converted back into the time/score domain, while its own original
/// end (time, score, arc type) is preserved exactly.
///
/// A downstream segment without curve data is skipped unmodified and the
/// walk stops there; segments past the gap keep their now-stale geometry.
/// This mirrors the upstream pipeline's behavior and is deliberately not
/// auto-repaired.
///
/// Returns the number of rebuilt segments.
pub fn propagate_from(
    curves: &mut [SegmentCurve],
    fitted_index: usize,
    to_screen: &ScreenTransform,
) -> usize {
    let Some(points) = curves[fitted_index].points.as_ref() else {
        return 0;
    };
    let Some(mut prev_end) = points.last().copied() else {
        return 0;
    };

    let mut rebuilt = 0;
    for j in (fitted_index + 1)..curves.len() {
        let Some(old_points) = curves[j].points.as_ref() else {
            warn!(
                "segment {} has no curve data; stopping cascade (segments beyond it keep stale starts)",
                j
            );
            break;
        };
        let count = old_points.len();

        let new_start = to_screen.invert(prev_end);
        let old = curves[j].segment;
        let segment = ArcSegment::new(new_start.x, old.x2, new_start.y, old.y2, old.arc_type);
        let points = resample_segment(&segment, count, to_screen);
        debug!(
            "cascade: segment {} start moved to ({:.3}, {:.3}), end pinned at ({:.3}, {:.3})",
            j, segment.x1, segment.y1, segment.x2, segment.y2
        );

        prev_end = *points.last().unwrap();
        curves[j].segment = segment;
        curves[j].points = Some(points);
        rebuilt += 1;
    }
    rebuilt
}
