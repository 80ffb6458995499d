//! Drawing capability used by the clock model
//!
//! The model computes geometry and hands it to a [`Canvas`]; the backend
//! decides how the shapes actually reach the screen. Colors are given as
//! roles so each backend keeps its own palette.

use crate::geometry::Point;

/// Color roles of the dial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Paint {
    OuterBackground,
    InnerBackground,
    Border,
    Graduation,
    HourGraduation,
    Digit,
    Pointer,
    Pivot,
}

/// Rendering backend
pub trait Canvas {
    /// Fill the rectangle `origin`..`origin + (width, height)`
    fn clear_rect(&mut self, origin: Point, width: f64, height: f64, paint: Paint);

    fn draw_line(&mut self, from: Point, to: Point, width: f64, paint: Paint);

    /// Full circle; stroked with `width` when not filled
    fn draw_arc(&mut self, center: Point, radius: f64, width: f64, paint: Paint, filled: bool);

    /// Text centered on `position`
    fn draw_text(&mut self, text: &str, position: Point, font_size: f64, paint: Paint);

    fn fill_triangle(&mut self, points: [Point; 3], paint: Paint);
}
