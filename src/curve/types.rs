use serde::{Deserialize, Serialize};

/// One sample point, either in the time/score domain or in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Affine scale + translate between the display domain and pixel space.
///
/// Pixel y grows downward, so `scale_y` is negative for an upward-growing
/// score axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTransform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl ScreenTransform {
    /// Map `[x_min, x_max] x [y_min, y_max]` onto the canvas interior.
    ///
    /// Degenerate source ranges collapse onto the canvas center instead of
    /// producing infinities; the inverse transform then maps everything back
    /// to the range's single value.
    pub fn fit(
        (x_min, x_max): (f64, f64),
        (y_min, y_max): (f64, f64),
        canvas_width_px: f64,
        canvas_height_px: f64,
        margin_px: f64,
    ) -> Self {
        let inner_w = canvas_width_px - 2.0 * margin_px;
        let inner_h = canvas_height_px - 2.0 * margin_px;
        let dx = x_max - x_min;
        let dy = y_max - y_min;

        let scale_x = if dx.abs() < f64::EPSILON {
            0.0
        } else {
            inner_w / dx
        };
        let scale_y = if dy.abs() < f64::EPSILON {
            0.0
        } else {
            -inner_h / dy
        };

        let offset_x = if scale_x == 0.0 {
            canvas_width_px * 0.5
        } else {
            margin_px - x_min * scale_x
        };
        let offset_y = if scale_y == 0.0 {
            canvas_height_px * 0.5
        } else {
            margin_px - y_max * scale_y
        };

        Self {
            scale_x,
            scale_y,
            offset_x,
            offset_y,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale_x + self.offset_x,
            p.y * self.scale_y + self.offset_y,
        )
    }

    /// Pixel coordinate back to the display domain. A collapsed axis
    /// (zero scale) maps every pixel to the offset origin of that axis.
    pub fn invert(&self, p: Point) -> Point {
        let x = if self.scale_x == 0.0 {
            0.0
        } else {
            (p.x - self.offset_x) / self.scale_x
        };
        let y = if self.scale_y == 0.0 {
            0.0
        } else {
            (p.y - self.offset_y) / self.scale_y
        };
        Point::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_then_invert_round_trips() {
        let t = ScreenTransform::fit((0.0, 100.0), (0.0, 1.0), 2000.0, 1200.0, 100.0);
        let p = Point::new(42.5, 0.3);
        let back = t.invert(t.apply(p));
        assert!((back.x - p.x).abs() < 1e-9);
        assert!((back.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn test_y_axis_points_up() {
        let t = ScreenTransform::fit((0.0, 100.0), (0.0, 1.0), 2000.0, 1200.0, 100.0);
        let low = t.apply(Point::new(0.0, 0.0));
        let high = t.apply(Point::new(0.0, 1.0));
        assert!(high.y < low.y, "larger scores render higher on the canvas");
    }

    #[test]
    fn test_degenerate_range_collapses_to_center() {
        let t = ScreenTransform::fit((5.0, 5.0), (1.0, 1.0), 2000.0, 1200.0, 100.0);
        let p = t.apply(Point::new(5.0, 1.0));
        assert_eq!(p, Point::new(1000.0, 600.0));
    }
}
