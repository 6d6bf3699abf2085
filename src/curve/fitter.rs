use crate::{
    config::FitConfig,
    curve::{
        arc_fn::ArcSegment,
        arc_length::ArcLengthTable,
        types::{Point, ScreenTransform},
    },
};
use log::{debug, warn};

/// How a segment polyline was brought to its required length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitStatus {
    /// Already within tolerance of the required length
    Unchanged,
    /// Cut down to a prefix plus one interpolated point
    Truncated,
    /// Extended by extrapolating the arc function past its domain
    Extended,
    /// Zero-length input, returned untouched
    SkippedDegenerate,
    /// Extrapolation cap reached before the target length was met
    CapReached,
}

#[derive(Debug, Clone)]
pub struct FitOutcome {
    pub points: Vec<Point>,
    pub status: FitStatus,
}

/// Resize a segment's screen polyline so its arc length matches the pixel
/// width of the text assigned to it.
///
/// `to_screen` must be the same affine map that produced `points` from the
/// segment's domain samples; lengthening re-evaluates the segment formula
/// beyond `x2` and pushes the new samples through it.
pub fn fit_to_length(
    points: &[Point],
    segment: &ArcSegment,
    to_screen: &ScreenTransform,
    required_length: f64,
    cfg: &FitConfig,
) -> FitOutcome {
    let table = ArcLengthTable::build(points);
    let current_length = table.total();

    if current_length < f64::EPSILON {
        warn!(
            "segment {:?}..{:?} has a zero-length curve; skipping length fit",
            segment.x1, segment.x2
        );
        return FitOutcome {
            points: points.to_vec(),
            status: FitStatus::SkippedDegenerate,
        };
    }

    if (required_length - current_length).abs() <= 1e-9 {
        return FitOutcome {
            points: points.to_vec(),
            status: FitStatus::Unchanged,
        };
    }

    if required_length < current_length {
        let truncated = truncate_to(points, &table, required_length);
        debug!(
            "truncated segment curve {current_length:.1}px -> {required_length:.1}px ({} -> {} points)",
            points.len(),
            truncated.len()
        );
        return FitOutcome {
            points: truncated,
            status: FitStatus::Truncated,
        };
    }

    extend_to(points, segment, to_screen, required_length, current_length, cfg)
}

/// Prefix of the polyline up to the exact cut coordinate, lerped between the
/// two bracketing samples.
fn truncate_to(points: &[Point], table: &ArcLengthTable, required_length: f64) -> Vec<Point> {
    let (idx, ratio) = table.locate(required_length);
    let mut result: Vec<Point> = points[..=idx].to_vec();
    let cut = if idx + 1 < points.len() {
        points[idx].lerp(&points[idx + 1], ratio)
    } else {
        points[idx]
    };
    result.push(cut);
    result
}

fn extend_to(
    points: &[Point],
    segment: &ArcSegment,
    to_screen: &ScreenTransform,
    required_length: f64,
    current_length: f64,
    cfg: &FitConfig,
) -> FitOutcome {
    // extrapolation step in the original domain: domain width per original sample
    let domain_step = segment.domain_width() / (points.len() - 1) as f64;
    if domain_step.abs() < f64::EPSILON {
        warn!(
            "segment at x={} has no domain width; cannot extrapolate",
            segment.x1
        );
        return FitOutcome {
            points: points.to_vec(),
            status: FitStatus::SkippedDegenerate,
        };
    }

    let mut extended = points.to_vec();
    let mut length = current_length;
    let mut reached = false;
    for k in 1..=cfg.max_extra_points {
        let x = segment.x2 + k as f64 * domain_step;
        let y = segment.eval_extrapolated(x);
        let p = to_screen.apply(Point::new(x, y));
        length += extended.last().unwrap().distance(&p);
        extended.push(p);
        if length >= required_length {
            reached = true;
            break;
        }
    }

    if !reached {
        warn!(
            "extrapolation cap ({} points) hit at {length:.1}px of required {required_length:.1}px",
            cfg.max_extra_points
        );
        return FitOutcome {
            points: extended,
            status: FitStatus::CapReached,
        };
    }

    // trim the overshoot of the final appended edge the same way as truncation
    let result = if length - required_length > f64::EPSILON {
        let table = ArcLengthTable::build(&extended);
        truncate_to(&extended, &table, required_length)
    } else {
        extended
    };

    FitOutcome {
        points: result,
        status: FitStatus::Extended,
    }
}
