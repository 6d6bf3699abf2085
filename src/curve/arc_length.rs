use crate::curve::types::Point;
use itertools::Itertools;

/// Cumulative arc-length parameterization of a screen-space polyline.
///
/// `table[i]` is the distance traveled from the first point to point `i`;
/// the table is non-decreasing and `table[0] == 0`.
#[derive(Debug, Clone)]
pub struct ArcLengthTable {
    cumulative: Vec<f64>,
}

impl ArcLengthTable {
    pub fn build(points: &[Point]) -> Self {
        let mut cumulative = Vec::with_capacity(points.len());
        if points.is_empty() {
            return Self { cumulative };
        }
        cumulative.push(0.0);
        let mut total = 0.0;
        for (a, b) in points.iter().tuple_windows() {
            total += a.distance(b);
            cumulative.push(total);
        }
        Self { cumulative }
    }

    pub fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn length_at(&self, index: usize) -> f64 {
        self.cumulative[index]
    }

    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Locate a target distance on the polyline: the index of the edge's
    /// start point and the interpolation ratio along that edge.
    ///
    /// The target is clamped into `[0, total]`; a degenerate table locates
    /// everything at `(0, 0.0)`.
    pub fn locate(&self, target: f64) -> (usize, f64) {
        if self.cumulative.len() < 2 {
            return (0, 0.0);
        }
        let total = self.total();
        let target = target.clamp(0.0, total);

        // first entry strictly greater than target = end of the bracketing edge
        let upper = self.cumulative.partition_point(|&d| d <= target);
        if upper >= self.cumulative.len() {
            return (self.cumulative.len() - 2, 1.0);
        }
        let idx = upper - 1;
        let edge_start = self.cumulative[idx];
        let edge_len = self.cumulative[upper] - edge_start;
        // zero-length edge (duplicate point): sit on its start
        let ratio = if edge_len < f64::EPSILON {
            0.0
        } else {
            (target - edge_start) / edge_len
        };
        (idx, ratio)
    }

    /// Interpolated point at a distance along the polyline.
    pub fn point_at(&self, points: &[Point], target: f64) -> Point {
        let (idx, ratio) = self.locate(target);
        if idx + 1 >= points.len() {
            return points[idx];
        }
        points[idx].lerp(&points[idx + 1], ratio)
    }

    /// Tangent angle [radians] at a distance along the polyline, from the
    /// bracketing edge's direction; endpoints use their single adjacent edge.
    pub fn tangent_at(&self, points: &[Point], target: f64) -> f64 {
        if points.len() < 2 {
            return 0.0;
        }
        let (idx, _) = self.locate(target);
        let idx = idx.min(points.len() - 2);
        let a = points[idx];
        let b = points[idx + 1];
        (b.y - a.y).atan2(b.x - a.x)
    }
}
