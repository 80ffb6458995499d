//! Drawing module - nannou backend for the dial
//!
//! The shared model draws in screen coordinates (origin top-left, y down);
//! nannou draws around the window center with y up. [`NannouCanvas`]
//! translates between the two.

use nannou::prelude::*;
use shared::{Canvas, Paint, Point, Viewport};

/// Color palette for the dial
pub mod colors {
    use nannou::prelude::*;

    pub const OUTER_BACKGROUND: Srgb<u8> = Srgb {
        red: 0,
        green: 0,
        blue: 0,
        standard: std::marker::PhantomData,
    };
    pub const INNER_BACKGROUND: Srgb<u8> = Srgb {
        red: 0,
        green: 0,
        blue: 0,
        standard: std::marker::PhantomData,
    };
    pub const BORDER: Srgb<u8> = Srgb {
        red: 0,
        green: 0,
        blue: 255,
        standard: std::marker::PhantomData,
    };
    pub const GRADUATION: Srgb<u8> = Srgb {
        red: 255,
        green: 255,
        blue: 0,
        standard: std::marker::PhantomData,
    };
    pub const HOUR_GRADUATION: Srgb<u8> = Srgb {
        red: 255,
        green: 255,
        blue: 255,
        standard: std::marker::PhantomData,
    };
    pub const DIGIT: Srgb<u8> = Srgb {
        red: 255,
        green: 255,
        blue: 0,
        standard: std::marker::PhantomData,
    };
    pub const POINTER: Srgb<u8> = Srgb {
        red: 255,
        green: 255,
        blue: 0,
        standard: std::marker::PhantomData,
    };
    pub const PIVOT: Srgb<u8> = Srgb {
        red: 255,
        green: 0,
        blue: 0,
        standard: std::marker::PhantomData,
    };
}

fn paint_color(paint: Paint) -> Srgb<u8> {
    match paint {
        Paint::OuterBackground => colors::OUTER_BACKGROUND,
        Paint::InnerBackground => colors::INNER_BACKGROUND,
        Paint::Border => colors::BORDER,
        Paint::Graduation => colors::GRADUATION,
        Paint::HourGraduation => colors::HOUR_GRADUATION,
        Paint::Digit => colors::DIGIT,
        Paint::Pointer => colors::POINTER,
        Paint::Pivot => colors::PIVOT,
    }
}

/// Convert a nannou window position into dial screen coordinates
pub fn to_screen(viewport: Viewport, pos: Point2) -> Point {
    Point::new(
        <f64 as From<f32>>::from(pos.x) + viewport.width / 2.0,
        viewport.height / 2.0 - <f64 as From<f32>>::from(pos.y),
    )
}

/// Canvas that forwards to a nannou `Draw`
pub struct NannouCanvas<'a> {
    draw: &'a Draw,
    viewport: Viewport,
}

impl<'a> NannouCanvas<'a> {
    pub fn new(draw: &'a Draw, viewport: Viewport) -> Self {
        Self { draw, viewport }
    }

    fn to_window(&self, p: Point) -> Point2 {
        pt2(
            (p.x - self.viewport.width / 2.0) as f32,
            (self.viewport.height / 2.0 - p.y) as f32,
        )
    }
}

impl Canvas for NannouCanvas<'_> {
    fn clear_rect(&mut self, origin: Point, width: f64, height: f64, paint: Paint) {
        let center = self.to_window(Point::new(origin.x + width / 2.0, origin.y + height / 2.0));
        self.draw
            .rect()
            .xy(center)
            .w_h(width as f32, height as f32)
            .color(paint_color(paint));
    }

    fn draw_line(&mut self, from: Point, to: Point, width: f64, paint: Paint) {
        self.draw
            .line()
            .start(self.to_window(from))
            .end(self.to_window(to))
            .weight(width as f32)
            .color(paint_color(paint));
    }

    fn draw_arc(&mut self, center: Point, radius: f64, width: f64, paint: Paint, filled: bool) {
        let center = self.to_window(center);
        if filled {
            self.draw
                .ellipse()
                .xy(center)
                .radius(radius as f32)
                .color(paint_color(paint));
        } else {
            draw_ring(self.draw, center, radius as f32, width as f32, paint_color(paint));
        }
    }

    fn draw_text(&mut self, text: &str, position: Point, font_size: f64, paint: Paint) {
        let size = font_size.max(1.0);
        self.draw
            .text(text)
            .xy(self.to_window(position))
            .color(paint_color(paint))
            .font_size(size.round() as u32)
            .w((size * 3.0) as f32);
    }

    fn fill_triangle(&mut self, points: [Point; 3], paint: Paint) {
        let [a, b, c] = points.map(|p| self.to_window(p));
        self.draw.tri().points(a, b, c).color(paint_color(paint));
    }
}

/// Draw a ring (circle outline) using line segments
fn draw_ring(draw: &Draw, center: Point2, radius: f32, weight: f32, color: Srgb<u8>) {
    let segments = 120;
    let points: Vec<Point2> = (0..=segments)
        .map(|i| {
            let angle = (i as f32 / segments as f32) * TAU;
            center + vec2(angle.cos(), angle.sin()) * radius
        })
        .collect();

    draw.polyline().weight(weight).color(color).points(points);
}
