//! Geometry - points on the dial and hit testing
//!
//! All coordinates are screen coordinates: the origin is the top-left corner
//! of the drawing surface and `y` grows downward.

/// A point on the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Point at `radius` from `center` in direction `angle`
pub fn point_on_circle(center: Point, angle: f64, radius: f64) -> Point {
    Point {
        x: center.x + angle.cos() * radius,
        y: center.y + angle.sin() * radius,
    }
}

/// Screen angle of `point` as seen from `center`
///
/// Inverse of [`point_on_circle`]: `point_on_circle(c, angle_of(c, p), r)`
/// lies on the ray from `c` through `p`.
pub fn angle_of(center: Point, point: Point) -> f64 {
    (point.y - center.y).atan2(point.x - center.x)
}

/// Shortest distance from `point` to the segment `a`-`b`
pub fn distance_to_segment(point: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return point.distance(a);
    }

    // Project onto the segment and clamp to its ends
    let t = (((point.x - a.x) * dx + (point.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    point.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Whether `point` falls inside a stroke of width `tolerance` along `path`
///
/// `path` is an open polyline. A single-point path is treated as a dot.
pub fn is_point_near_path(path: &[Point], point: Point, tolerance: f64) -> bool {
    let half_width = tolerance / 2.0;
    match path {
        [] => false,
        [only] => point.distance(*only) <= half_width,
        _ => path
            .windows(2)
            .any(|seg| distance_to_segment(point, seg[0], seg[1]) <= half_width),
    }
}
