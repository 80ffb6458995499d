//! Clock pointers (hands)
//!
//! A pointer holds its current value in its own time unit (hours, minutes or
//! seconds) and the screen angle it is drawn at.

use thiserror::Error;

use crate::canvas::{Canvas, Paint};
use crate::geometry::{is_point_near_path, point_on_circle, Point};
use crate::time_angle::{angle_to_time, time_to_angle};

/// Hit width used when grabbing a pointer, independent of its stroke width
pub const DEFAULT_HIT_WIDTH: f64 = 20.0;

/// Errors raised while building a pointer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PointerError {
    #[error("Invalid configuration for {kind:?} pointer: {reason}")]
    InvalidConfiguration { kind: PointerKind, reason: String },
}

/// Which hand a pointer is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Hour,
    Minute,
    Second,
}

impl PointerKind {
    /// All kinds in selection priority order
    pub const ALL: [PointerKind; 3] = [PointerKind::Hour, PointerKind::Minute, PointerKind::Second];

    /// Seconds represented by one unit of this pointer's value
    pub fn time_unit(self) -> f64 {
        match self {
            PointerKind::Hour => 3600.0,
            PointerKind::Minute => 60.0,
            PointerKind::Second => 1.0,
        }
    }

    /// Value at which this pointer completes a revolution
    pub fn max(self) -> f64 {
        match self {
            PointerKind::Hour => 12.0,
            PointerKind::Minute | PointerKind::Second => 60.0,
        }
    }
}

/// Static configuration of a pointer
#[derive(Debug, Clone, PartialEq)]
pub struct PointerSpec {
    pub kind: PointerKind,
    /// Seconds per unit of value
    pub time_unit: f64,
    /// Wrap modulus of the value
    pub max: f64,
    pub body_length: f64,
    pub stroke_width: f64,
    pub has_tail: bool,
}

impl PointerSpec {
    /// Spec with the kind's standard time unit and modulus
    pub fn standard(kind: PointerKind, body_length: f64, stroke_width: f64, has_tail: bool) -> Self {
        Self {
            kind,
            time_unit: kind.time_unit(),
            max: kind.max(),
            body_length,
            stroke_width,
            has_tail,
        }
    }

    fn validate(&self) -> Result<(), PointerError> {
        let reason = if !(self.max > 0.0 && self.max.is_finite()) {
            format!("max must be strictly positive, got {}", self.max)
        } else if !(self.time_unit > 0.0 && self.time_unit.is_finite()) {
            format!("time unit must be strictly positive, got {}", self.time_unit)
        } else {
            return Ok(());
        };
        Err(PointerError::InvalidConfiguration {
            kind: self.kind,
            reason,
        })
    }
}

/// Geometry needed to render a pointer
#[derive(Debug, Clone, PartialEq)]
pub struct PointerShape {
    /// Center to tip base
    pub body: [Point; 2],
    /// Center to the short end on the opposite side; `None` without a tail
    pub tail: Option<[Point; 2]>,
    /// Arrow head: two base corners and the apex
    pub tip: [Point; 3],
    pub stroke_width: f64,
}

/// One clock hand
#[derive(Debug, Clone)]
pub struct Pointer {
    spec: PointerSpec,
    value: f64,
    angle: f64,
}

impl Pointer {
    pub fn new(spec: PointerSpec) -> Result<Self, PointerError> {
        spec.validate()?;
        Ok(Self {
            value: 0.0,
            angle: time_to_angle(0.0, spec.max),
            spec,
        })
    }

    pub fn spec(&self) -> &PointerSpec {
        &self.spec
    }

    pub fn kind(&self) -> PointerKind {
        self.spec.kind
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Set the value and move the pointer to match it
    pub fn set_from_time(&mut self, value: f64) {
        self.value = value;
        self.sync_angle();
    }

    /// Update the value without moving the pointer
    pub(crate) fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// Place the pointer directly, leaving its value stale
    pub fn set_angle(&mut self, angle: f64) {
        self.angle = angle;
    }

    /// Move the pointer back to where its value says it should be
    pub fn sync_angle(&mut self) {
        self.angle = time_to_angle(self.value, self.spec.max);
    }

    /// Seconds this pointer contributes, read from where it is drawn
    pub fn to_elapsed_seconds(&self) -> f64 {
        angle_to_time(self.angle, self.spec.max) * self.spec.time_unit
    }

    /// Seconds this pointer contributes, read from its value
    pub fn value_seconds(&self) -> f64 {
        self.value * self.spec.time_unit
    }

    /// One full revolution, in seconds
    pub fn revolution_seconds(&self) -> f64 {
        self.spec.max * self.spec.time_unit
    }

    pub fn tail_length(&self) -> f64 {
        if self.spec.has_tail {
            self.spec.body_length / 10.0
        } else {
            0.0
        }
    }

    pub fn edge_length(&self) -> f64 {
        self.spec.body_length / 30.0
    }

    pub fn shape(&self, center: Point) -> PointerShape {
        let body_length = self.spec.body_length;
        let tip_base = point_on_circle(center, self.angle, body_length);

        let tail = self
            .spec
            .has_tail
            .then(|| [point_on_circle(center, self.angle + std::f64::consts::PI, self.tail_length()), center]);

        // Half the angular width of the arrow head at the tip radius
        let spread = (self.spec.stroke_width / (body_length * std::f64::consts::PI)) * 1.5;
        let tip = [
            point_on_circle(center, self.angle + spread, body_length),
            point_on_circle(center, self.angle, body_length + self.edge_length()),
            point_on_circle(center, self.angle - spread, body_length),
        ];

        PointerShape {
            body: [center, tip_base],
            tail,
            tip,
            stroke_width: self.spec.stroke_width,
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, center: Point) {
        let shape = self.shape(center);
        canvas.draw_line(shape.body[0], shape.body[1], shape.stroke_width, Paint::Pointer);
        if let Some([from, to]) = shape.tail {
            canvas.draw_line(from, to, shape.stroke_width, Paint::Pointer);
        }
        canvas.fill_triangle(shape.tip, Paint::Pointer);
    }

    /// Whether `point` grabs this pointer's body with the given hit width
    pub fn hit_test(&self, center: Point, point: Point, hit_width: f64) -> bool {
        let tip = point_on_circle(center, self.angle, self.spec.body_length);
        is_point_near_path(&[center, tip], point, hit_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::recording::{RecordingCanvas, Shape};
    use std::f64::consts::FRAC_PI_2;

    fn minute_pointer() -> Pointer {
        Pointer::new(PointerSpec::standard(PointerKind::Minute, 60.0, 2.0, true)).unwrap()
    }

    #[test]
    fn test_rejects_non_positive_max() {
        let mut spec = PointerSpec::standard(PointerKind::Hour, 10.0, 1.0, false);
        spec.max = 0.0;
        assert!(matches!(
            Pointer::new(spec.clone()),
            Err(PointerError::InvalidConfiguration { kind: PointerKind::Hour, .. })
        ));
        spec.max = -12.0;
        assert!(Pointer::new(spec.clone()).is_err());
        spec.max = f64::NAN;
        assert!(Pointer::new(spec).is_err());
    }

    #[test]
    fn test_set_from_time() {
        let mut p = minute_pointer();
        p.set_from_time(17.25);
        assert_eq!(p.value(), 17.25);
        assert_eq!(p.angle(), time_to_angle(17.25, 60.0));
    }

    #[test]
    fn test_to_elapsed_seconds_reads_angle() {
        let mut p = minute_pointer();
        p.set_from_time(10.0);
        assert!((p.to_elapsed_seconds() - 600.0).abs() < 1e-9);

        // Pointing at 3 o'clock: 15 minutes, whatever the stale value says
        p.set_angle(0.0);
        assert_eq!(p.value(), 10.0);
        assert!((p.to_elapsed_seconds() - 900.0).abs() < 1e-9);
    }

    #[test]
    fn test_shape_at_twelve() {
        let mut p = minute_pointer();
        p.set_from_time(0.0);
        let center = Point::new(100.0, 100.0);
        let shape = p.shape(center);

        assert!((shape.body[1].x - 100.0).abs() < 1e-9);
        assert!((shape.body[1].y - 40.0).abs() < 1e-9);

        // Tail points down, a tenth of the body
        let tail = shape.tail.unwrap();
        assert!((tail[0].y - 106.0).abs() < 1e-9);

        // Apex sits beyond the body, base corners straddle it
        assert!((shape.tip[1].y - 38.0).abs() < 1e-9);
        assert!(shape.tip[0].x > 100.0 && shape.tip[2].x < 100.0);
    }

    #[test]
    fn test_no_tail() {
        let p = Pointer::new(PointerSpec::standard(PointerKind::Hour, 40.0, 3.0, false)).unwrap();
        assert!(p.shape(Point::default()).tail.is_none());
        assert_eq!(p.tail_length(), 0.0);
    }

    #[test]
    fn test_draw_emits_body_tail_and_tip() {
        let p = minute_pointer();
        let mut canvas = RecordingCanvas::default();
        p.draw(&mut canvas, Point::new(0.0, 0.0));
        assert_eq!(canvas.count(|s| matches!(s, Shape::Line { .. })), 2);
        assert_eq!(canvas.count(|s| matches!(s, Shape::Triangle(_))), 1);
    }

    #[test]
    fn test_hit_test_uses_wide_band() {
        let mut p = minute_pointer();
        p.set_angle(-FRAC_PI_2);
        let center = Point::new(0.0, 0.0);
        // Visual stroke is 2 wide but a point 8 units off still grabs it
        assert!(p.hit_test(center, Point::new(8.0, -30.0), DEFAULT_HIT_WIDTH));
        assert!(!p.hit_test(center, Point::new(12.0, -30.0), DEFAULT_HIT_WIDTH));
        assert!(!p.hit_test(center, Point::new(0.0, 30.0), DEFAULT_HIT_WIDTH));
    }
}
