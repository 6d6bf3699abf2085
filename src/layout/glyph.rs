use crate::curve::Point;

/// Oriented rectangle occupied by one rendered character.
///
/// Transient: built to test overlap during placement, discarded once the
/// placement pass is committed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphBox {
    pub center: Point,
    pub rotation: f64,
    pub width: f64,
    pub height: f64,
}

impl GlyphBox {
    pub fn new(center: Point, rotation: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            rotation,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Corner points in consistent winding order.
    pub fn corners(&self) -> [Point; 4] {
        let (sin, cos) = self.rotation.sin_cos();
        let hw = self.width * 0.5;
        let hh = self.height * 0.5;
        let local = [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)];
        local.map(|(lx, ly)| {
            Point::new(
                self.center.x + lx * cos - ly * sin,
                self.center.y + lx * sin + ly * cos,
            )
        })
    }

    /// Axis-aligned bounds `(min_x, min_y, max_x, max_y)`.
    pub fn aabb(&self) -> (f64, f64, f64, f64) {
        let corners = self.corners();
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for c in corners {
            min_x = min_x.min(c.x);
            min_y = min_y.min(c.y);
            max_x = max_x.max(c.x);
            max_y = max_y.max(c.y);
        }
        (min_x, min_y, max_x, max_y)
    }

    /// Exact intersection area with another glyph box.
    pub fn intersection_area(&self, other: &GlyphBox) -> f64 {
        convex_intersection_area(&self.corners(), &other.corners())
    }
}

fn signed_area(poly: &[Point]) -> f64 {
    let n = poly.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum * 0.5
}

/// Sutherland-Hodgman clip of a convex subject polygon against one half-plane
/// (left side of the directed edge a->b).
fn clip_halfplane(subject: &[Point], a: Point, b: Point) -> Vec<Point> {
    let inside = |p: Point| (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x) >= 0.0;
    let intersect = |p: Point, q: Point| {
        let d1 = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
        let d2 = (b.x - a.x) * (q.y - a.y) - (b.y - a.y) * (q.x - a.x);
        let t = d1 / (d1 - d2);
        p.lerp(&q, t)
    };

    let mut out = Vec::with_capacity(subject.len() + 1);
    for i in 0..subject.len() {
        let cur = subject[i];
        let next = subject[(i + 1) % subject.len()];
        match (inside(cur), inside(next)) {
            (true, true) => out.push(next),
            (true, false) => out.push(intersect(cur, next)),
            (false, true) => {
                out.push(intersect(cur, next));
                out.push(next);
            }
            (false, false) => {}
        }
    }
    out
}

/// Area of the intersection of two convex polygons.
pub fn convex_intersection_area(a: &[Point], b: &[Point]) -> f64 {
    // clipping assumes a counter-clockwise clip polygon
    let mut clip: Vec<Point> = b.to_vec();
    if signed_area(&clip) < 0.0 {
        clip.reverse();
    }

    let mut subject: Vec<Point> = a.to_vec();
    for i in 0..clip.len() {
        if subject.is_empty() {
            return 0.0;
        }
        let edge_a = clip[i];
        let edge_b = clip[(i + 1) % clip.len()];
        subject = clip_halfplane(&subject, edge_a, edge_b);
    }
    signed_area(&subject).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis_box(cx: f64, cy: f64, w: f64, h: f64) -> GlyphBox {
        GlyphBox::new(Point::new(cx, cy), 0.0, w, h)
    }

    #[test]
    fn test_disjoint_boxes_have_zero_intersection() {
        let a = axis_box(0.0, 0.0, 2.0, 2.0);
        let b = axis_box(10.0, 0.0, 2.0, 2.0);
        assert_eq!(a.intersection_area(&b), 0.0);
    }

    #[test]
    fn test_identical_boxes_intersect_fully() {
        let a = axis_box(1.0, 1.0, 4.0, 2.0);
        let area = a.intersection_area(&a);
        assert!((area - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_half_overlap() {
        let a = axis_box(0.0, 0.0, 2.0, 2.0);
        let b = axis_box(1.0, 0.0, 2.0, 2.0);
        // overlap strip is 1 x 2
        assert!((a.intersection_area(&b) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotated_box_intersection() {
        // 45-degree square over an identical axis-aligned one: known area
        let a = axis_box(0.0, 0.0, 2.0, 2.0);
        let b = GlyphBox::new(Point::new(0.0, 0.0), std::f64::consts::FRAC_PI_4, 2.0, 2.0);
        // regular octagon: 8 * (sqrt(2) - 1)
        let expected = 8.0 * (std::f64::consts::SQRT_2 - 1.0);
        assert!((a.intersection_area(&b) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_preserves_area_and_aabb_grows() {
        let b = GlyphBox::new(Point::new(5.0, 5.0), 0.7, 3.0, 1.0);
        assert!((b.area() - 3.0).abs() < 1e-12);
        let (min_x, min_y, max_x, max_y) = b.aabb();
        assert!(max_x - min_x >= 1.0 && max_y - min_y >= 1.0);
        assert!(min_x < 5.0 && max_x > 5.0 && min_y < 5.0 && max_y > 5.0);
    }
}
