use crate::{
    config::{OverflowPolicy, PlacementConfig},
    curve::{ArcLengthTable, Point},
    layout::{glyph::GlyphBox, grid::GlyphIndex},
};
use log::{debug, warn};
use serde::Serialize;

/// Measured box of one character, from the text-shaping collaborator
#[derive(Debug, Clone, Copy)]
pub struct GlyphMetrics {
    pub ch: char,
    pub width: f64,
    pub height: f64,
}

/// One committed character: final position and tangent rotation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacedGlyph {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub ch: char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStatus {
    /// Text and curve lengths agree to within one average character width
    Fits,
    /// The curve ran out before every glyph was placed
    CurveTooShort,
    /// Leftover curve beyond the last glyph exceeds one average character width
    CurveTooLong,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlacementResult {
    pub glyphs: Vec<PlacedGlyph>,
    pub status: PlacementStatus,
}

/// Walk a segment's final polyline and assign every glyph a position and
/// rotation along it, avoiding the boxes already committed by this and all
/// earlier segments.
///
/// Proportional mapping with a bounded local nudge: each glyph's ideal
/// distance is its text-midpoint scaled by curve length over text width;
/// overlapping placements are nudged forward by a fraction of the glyph
/// width up to a retry budget, then committed with the residual overlap.
/// Deterministic: identical inputs commit identical boxes.
pub fn place_along_curve(
    points: &[Point],
    glyphs: &[GlyphMetrics],
    index: &mut GlyphIndex,
    cfg: &PlacementConfig,
) -> PlacementResult {
    if glyphs.is_empty() {
        return PlacementResult {
            glyphs: Vec::new(),
            status: PlacementStatus::Fits,
        };
    }

    let table = ArcLengthTable::build(points);
    let total_curve = table.total();
    let total_text: f64 = glyphs.iter().map(|g| g.width).sum();

    if total_curve < f64::EPSILON {
        warn!("zero-length curve: no glyphs can be placed");
        return PlacementResult {
            glyphs: Vec::new(),
            status: PlacementStatus::CurveTooShort,
        };
    }
    if total_text < f64::EPSILON {
        // whitespace-only text occupies nothing
        return PlacementResult {
            glyphs: Vec::new(),
            status: PlacementStatus::Fits,
        };
    }

    let scale = total_curve / total_text;
    let rollback_mark = index.len();
    let mut placed = Vec::with_capacity(glyphs.len());
    let mut cum_width = 0.0;
    let mut consumed_end = 0.0;
    let mut exhausted = false;

    'glyphs: for glyph in glyphs {
        let ideal = (cum_width + glyph.width * 0.5) * scale;
        cum_width += glyph.width;

        let mut distance = ideal;
        let nudge = (glyph.width * cfg.nudge_fraction).max(f64::EPSILON);
        let mut attempt = 0usize;
        let mut clamped = false;
        loop {
            if distance > total_curve {
                match cfg.overflow_policy {
                    OverflowPolicy::DropRemaining => {
                        debug!(
                            "curve exhausted at '{}' ({} of {} placed); dropping the rest",
                            glyph.ch,
                            placed.len(),
                            glyphs.len()
                        );
                        exhausted = true;
                        break 'glyphs;
                    }
                    OverflowPolicy::RollbackSegment => {
                        debug!(
                            "curve exhausted at '{}'; rolling back {} glyphs of this segment",
                            glyph.ch,
                            placed.len()
                        );
                        index.truncate(rollback_mark);
                        placed.clear();
                        exhausted = true;
                        break 'glyphs;
                    }
                    OverflowPolicy::ClampToEnd => {
                        distance = total_curve;
                        exhausted = true;
                        clamped = true;
                    }
                }
            }

            let center = table.point_at(points, distance);
            let rotation = table.tangent_at(points, distance);
            let quad = GlyphBox::new(
                center,
                rotation,
                glyph.width * cfg.box_shrink,
                glyph.height * cfg.box_shrink,
            );

            let commit = quad.area() < f64::EPSILON
                || clamped
                || overlap_ratio(&quad, index) <= cfg.overlap_tolerance
                || attempt >= cfg.max_nudges;
            if commit {
                if attempt >= cfg.max_nudges {
                    debug!(
                        "retry budget spent on '{}'; committing with residual overlap",
                        glyph.ch
                    );
                }
                index.insert(quad);
                placed.push(PlacedGlyph {
                    x: center.x,
                    y: center.y,
                    rotation,
                    ch: glyph.ch,
                });
                consumed_end = distance + glyph.width * 0.5;
                break;
            }
            attempt += 1;
            distance = ideal + attempt as f64 * nudge;
        }
    }

    let status = if exhausted {
        PlacementStatus::CurveTooShort
    } else {
        let avg_width = total_text / glyphs.len() as f64;
        if total_curve - consumed_end > avg_width {
            PlacementStatus::CurveTooLong
        } else {
            PlacementStatus::Fits
        }
    };

    PlacementResult {
        glyphs: placed,
        status,
    }
}

/// Worst overlap against committed boxes, as a ratio of the glyph's own area.
fn overlap_ratio(quad: &GlyphBox, index: &GlyphIndex) -> f64 {
    let area = quad.area();
    let mut worst = 0.0f64;
    for idx in index.candidates(quad.aabb()) {
        let other = &index.boxes()[idx];
        worst = worst.max(quad.intersection_area(other) / area);
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(points: usize, length: f64) -> Vec<Point> {
        (0..points)
            .map(|i| Point::new(i as f64 * length / (points - 1) as f64, 0.0))
            .collect()
    }

    fn word(text: &str, width: f64, height: f64) -> Vec<GlyphMetrics> {
        text.chars()
            .map(|ch| GlyphMetrics { ch, width, height })
            .collect()
    }

    fn cfg() -> PlacementConfig {
        PlacementConfig::default()
    }

    #[test]
    fn test_glyphs_spread_proportionally() {
        let points = line(101, 100.0);
        let glyphs = word("abcd", 10.0, 12.0);
        let mut index = GlyphIndex::new(64.0);
        let result = place_along_curve(&points, &glyphs, &mut index, &cfg());

        assert_eq!(result.glyphs.len(), 4);
        // centers at (5, 15, 25, 35) * 100/40
        let expected = [12.5, 37.5, 62.5, 87.5];
        for (glyph, ex) in result.glyphs.iter().zip(expected) {
            assert!((glyph.x - ex).abs() < 1e-6, "got {} want {}", glyph.x, ex);
            assert_eq!(glyph.y, 0.0);
            assert_eq!(glyph.rotation, 0.0);
        }
        assert_eq!(result.status, PlacementStatus::Fits);
    }

    #[test]
    fn test_committed_boxes_respect_overlap_tolerance() {
        // curve exactly as long as the text: no slack, neighbors shrunk to 80%
        // still clear each other at natural spacing
        let points = line(101, 40.0);
        let glyphs = word("abcd", 10.0, 12.0);
        let mut index = GlyphIndex::new(16.0);
        let result = place_along_curve(&points, &glyphs, &mut index, &cfg());

        assert_eq!(result.glyphs.len(), 4);
        let boxes = index.boxes();
        for i in 0..boxes.len() {
            for j in (i + 1)..boxes.len() {
                let ratio = boxes[i].intersection_area(&boxes[j]) / boxes[i].area();
                assert!(
                    ratio <= cfg().overlap_tolerance + 1e-9,
                    "boxes {i} and {j} overlap at ratio {ratio}"
                );
            }
        }
    }

    #[test]
    fn test_nudge_resolves_collision_with_prior_segment() {
        let mut index = GlyphIndex::new(16.0);
        // a box from an earlier segment sits right on this curve's start
        index.insert(GlyphBox::new(Point::new(5.0, 0.0), 0.0, 8.0, 9.6));

        let points = line(101, 100.0);
        let glyphs = word("x", 10.0, 12.0);
        let result = place_along_curve(&points, &glyphs, &mut index, &cfg());

        assert_eq!(result.glyphs.len(), 1);
        // without the blocker the single glyph would map to the curve middle
        // (50.0); the blocker is far from there, so the ideal spot wins
        assert!((result.glyphs[0].x - 50.0).abs() < 1e-6);

        // now force a collision: blocker at the middle
        let mut index = GlyphIndex::new(16.0);
        index.insert(GlyphBox::new(Point::new(50.0, 0.0), 0.0, 8.0, 9.6));
        let result = place_along_curve(&points, &glyphs, &mut index, &cfg());
        assert_eq!(result.glyphs.len(), 1);
        assert!(
            result.glyphs[0].x > 50.0,
            "glyph must be nudged forward, got {}",
            result.glyphs[0].x
        );
    }

    #[test]
    fn test_retry_budget_commits_with_residual_overlap() {
        let points = line(101, 10.0);
        // two glyphs forced onto nearly the same spot on a tiny curve
        let glyphs = word("ab", 10.0, 12.0);
        let mut config = cfg();
        config.max_nudges = 1;
        let mut index = GlyphIndex::new(16.0);
        let result = place_along_curve(&points, &glyphs, &mut index, &config);
        // nothing is dropped inside the curve: both commit despite overlap
        assert_eq!(result.glyphs.len(), 2);
    }

    #[test]
    fn test_curve_too_long_status() {
        let points = line(101, 500.0);
        let glyphs = word("ab", 10.0, 12.0);
        let mut index = GlyphIndex::new(64.0);
        let result = place_along_curve(&points, &glyphs, &mut index, &cfg());
        assert_eq!(result.status, PlacementStatus::CurveTooLong);
        assert_eq!(result.glyphs.len(), 2);
    }

    #[test]
    fn test_overflow_policy_drop_remaining() {
        // blockers along the whole curve force endless nudging off the end
        let points = line(101, 20.0);
        let glyphs = word("abc", 10.0, 12.0);
        let mut config = cfg();
        config.max_nudges = usize::MAX;
        let mut index = GlyphIndex::new(16.0);
        // wall of committed boxes covering the entire curve
        for i in 0..5 {
            index.insert(GlyphBox::new(Point::new(i as f64 * 5.0, 0.0), 0.0, 10.0, 12.0));
        }
        let wall = index.len();
        let result = place_along_curve(&points, &glyphs, &mut index, &config);
        assert_eq!(result.status, PlacementStatus::CurveTooShort);
        assert!(result.glyphs.len() < glyphs.len());
        assert!(index.len() >= wall);
    }

    #[test]
    fn test_overflow_policy_rollback() {
        let points = line(101, 20.0);
        let glyphs = word("abc", 10.0, 12.0);
        let mut config = cfg();
        config.max_nudges = usize::MAX;
        config.overflow_policy = OverflowPolicy::RollbackSegment;
        let mut index = GlyphIndex::new(16.0);
        for i in 0..5 {
            index.insert(GlyphBox::new(Point::new(i as f64 * 5.0, 0.0), 0.0, 10.0, 12.0));
        }
        let wall = index.len();
        let result = place_along_curve(&points, &glyphs, &mut index, &config);
        assert_eq!(result.status, PlacementStatus::CurveTooShort);
        assert!(result.glyphs.is_empty());
        // the earlier segments' boxes survive the rollback
        assert_eq!(index.len(), wall);
    }

    #[test]
    fn test_empty_text_fits_trivially() {
        let points = line(11, 100.0);
        let mut index = GlyphIndex::new(64.0);
        let result = place_along_curve(&points, &[], &mut index, &cfg());
        assert_eq!(result.status, PlacementStatus::Fits);
        assert!(result.glyphs.is_empty());
    }

    #[test]
    fn test_deterministic_output() {
        let points = line(101, 60.0);
        let glyphs = word("hello", 9.0, 11.0);
        let run = || {
            let mut index = GlyphIndex::new(16.0);
            place_along_curve(&points, &glyphs, &mut index, &cfg()).glyphs
        };
        assert_eq!(run(), run());
    }
}
