//! Drawing sinks
//!
//! The export engine is format-agnostic: it turns the scene into device-space
//! marks and hands them to a [`Sink`]. Each output format implements the four
//! drawing operations; [`Document`] adds the final serialization step.

use cgmath::Point2;

use crate::error::ExportError;
use crate::gfx::scene::primitive::Color;

/// Mark-making operations in device space (origin top-left, y down).
pub trait Sink {
    /// Strokes a segment with round caps.
    fn draw_line(&mut self, from: Point2<f64>, to: Point2<f64>, width: f64, color: Color);

    fn fill_polygon(&mut self, points: &[Point2<f64>], color: Color);

    fn fill_circle(&mut self, center: Point2<f64>, radius: f64, color: Color);

    fn fill_square(&mut self, center: Point2<f64>, half_side: f64, color: Color);
}

/// A sink that serializes to a complete output file.
pub trait Document: Sink {
    /// Creates an empty page of `width` x `height` output units painted with
    /// `background`.
    fn create(width: u32, height: u32, background: Color) -> Self
    where
        Self: Sized;

    /// Serializes everything drawn so far.
    fn finish(self) -> Result<Vec<u8>, ExportError>
    where
        Self: Sized;
}

/// One call received by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Line {
        from: Point2<f64>,
        to: Point2<f64>,
        width: f64,
        color: Color,
    },
    Polygon {
        points: Vec<Point2<f64>>,
        color: Color,
    },
    Circle {
        center: Point2<f64>,
        radius: f64,
        color: Color,
    },
    Square {
        center: Point2<f64>,
        half_side: f64,
        color: Color,
    },
}

impl DrawCall {
    pub fn color(&self) -> Color {
        match self {
            DrawCall::Line { color, .. }
            | DrawCall::Polygon { color, .. }
            | DrawCall::Circle { color, .. }
            | DrawCall::Square { color, .. } => *color,
        }
    }
}

/// Keeps every draw call in order, for inspecting what an export would draw.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub calls: Vec<DrawCall>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sink for RecordingSink {
    fn draw_line(&mut self, from: Point2<f64>, to: Point2<f64>, width: f64, color: Color) {
        self.calls.push(DrawCall::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_polygon(&mut self, points: &[Point2<f64>], color: Color) {
        self.calls.push(DrawCall::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn fill_circle(&mut self, center: Point2<f64>, radius: f64, color: Color) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_square(&mut self, center: Point2<f64>, half_side: f64, color: Color) {
        self.calls.push(DrawCall::Square {
            center,
            half_side,
            color,
        });
    }
}

/// Composites `color` over an opaque `background`, for formats without alpha.
pub(crate) fn flatten_alpha(color: Color, background: Color) -> Color {
    let a = u32::from(color.a);
    let mix = |c: u8, bg: u8| ((u32::from(c) * a + u32::from(bg) * (255 - a) + 127) / 255) as u8;
    Color::rgb(
        mix(color.r, background.r),
        mix(color.g, background.g),
        mix(color.b, background.b),
    )
}

/// Formats a coordinate with fixed precision so output is reproducible.
pub(crate) fn fmt_coord(value: f64) -> String {
    let rounded = format!("{:.3}", value);
    // Avoid "-0.000" for values that round to zero.
    if rounded.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        "0.000".to_string()
    } else {
        rounded
    }
}
