//! PNG output.
//!
//! Marks are drawn with `plotters` into an in-memory RGB bitmap, then encoded
//! with `image`. Translucent marks are blended over what is already drawn.

use cgmath::Point2;
use image::{codecs::png::PngEncoder, ColorType, ImageEncoder};
use plotters::prelude::{
    BitMapBackend, Circle, DrawingArea, IntoDrawingArea, PathElement, Polygon, RGBAColor,
    RGBColor, Rectangle,
};
use plotters::{coord::Shift, style::Color as _};

use super::sink::{Document, Sink};
use crate::error::ExportError;
use crate::gfx::geometry::round_capped_segment;
use crate::gfx::scene::primitive::Color;

/// Strokes at most this wide are drawn as one-pixel paths.
const HAIRLINE_WIDTH: f64 = 1.5;

/// Device coordinates beyond this are clamped before rounding to pixels.
const COORD_LIMIT: f64 = 1.0e6;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

fn to_pixel(p: Point2<f64>) -> (i32, i32) {
    let clamp = |v: f64| v.clamp(-COORD_LIMIT, COORD_LIMIT).round() as i32;
    (clamp(p.x), clamp(p.y))
}

fn rgba(color: Color) -> RGBAColor {
    RGBAColor(color.r, color.g, color.b, color.opacity())
}

#[derive(Debug, Clone)]
pub struct PngDocument {
    buffer: Vec<u8>,
    width: u32,
    height: u32,
    /// First drawing failure, reported by `finish`.
    error: Option<String>,
}

impl PngDocument {
    /// Runs `paint` against a drawing area over the pixel buffer.
    fn paint<F>(&mut self, paint: F)
    where
        F: FnOnce(&Area<'_>) -> Result<(), String>,
    {
        if self.error.is_some() {
            return;
        }
        let size = (self.width, self.height);
        let result = {
            let root = BitMapBackend::with_buffer(&mut self.buffer, size).into_drawing_area();
            paint(&root).and_then(|()| root.present().map_err(|e| e.to_string()))
        };
        if let Err(err) = result {
            log::warn!("PNG drawing failed: {}", err);
            self.error = Some(err);
        }
    }

    /// RGB value of the pixel at `(x, y)`, `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = 3 * (y as usize * self.width as usize + x as usize);
        let rgb = &self.buffer[offset..offset + 3];
        Some([rgb[0], rgb[1], rgb[2]])
    }
}

impl Sink for PngDocument {
    fn draw_line(&mut self, from: Point2<f64>, to: Point2<f64>, width: f64, color: Color) {
        if width <= HAIRLINE_WIDTH {
            let path = PathElement::new(
                vec![to_pixel(from), to_pixel(to)],
                rgba(color).stroke_width(1),
            );
            self.paint(|root| root.draw(&path).map_err(|e| e.to_string()));
        } else {
            let outline = round_capped_segment(from, to, width);
            self.fill_polygon(&outline, color);
        }
    }

    fn fill_polygon(&mut self, points: &[Point2<f64>], color: Color) {
        if points.len() < 3 {
            return;
        }
        let vertices: Vec<(i32, i32)> = points.iter().map(|p| to_pixel(*p)).collect();
        let polygon = Polygon::new(vertices, rgba(color).filled());
        self.paint(|root| root.draw(&polygon).map_err(|e| e.to_string()));
    }

    fn fill_circle(&mut self, center: Point2<f64>, radius: f64, color: Color) {
        let radius = radius.clamp(1.0, COORD_LIMIT).round() as u32;
        let circle = Circle::new(to_pixel(center), radius, rgba(color).filled());
        self.paint(|root| root.draw(&circle).map_err(|e| e.to_string()));
    }

    fn fill_square(&mut self, center: Point2<f64>, half_side: f64, color: Color) {
        let h = half_side.max(0.5);
        let corners = [
            to_pixel(Point2::new(center.x - h, center.y - h)),
            to_pixel(Point2::new(center.x + h, center.y + h)),
        ];
        let square = Rectangle::new(corners, rgba(color).filled());
        self.paint(|root| root.draw(&square).map_err(|e| e.to_string()));
    }
}

impl Document for PngDocument {
    fn create(width: u32, height: u32, background: Color) -> Self {
        let mut document = Self {
            buffer: vec![0u8; 3 * width as usize * height as usize],
            width,
            height,
            error: None,
        };
        let background = RGBColor(background.r, background.g, background.b);
        document.paint(|root| root.fill(&background).map_err(|e| e.to_string()));
        document
    }

    fn finish(self) -> Result<Vec<u8>, ExportError> {
        if let Some(err) = self.error {
            return Err(ExportError::Raster(err));
        }
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes).write_image(
            &self.buffer,
            self.width,
            self.height,
            ColorType::Rgb8,
        )?;
        Ok(bytes)
    }
}
