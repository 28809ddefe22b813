//! SVG output.

use cgmath::Point2;

use super::sink::{fmt_coord, Document, Sink};
use crate::error::ExportError;
use crate::gfx::scene::primitive::Color;

/// Writes marks as SVG elements, one element per call.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    body: String,
    width: u32,
    height: u32,
}

fn fill_attributes(color: Color) -> String {
    let mut attributes = format!("fill=\"rgb({},{},{})\"", color.r, color.g, color.b);
    if !color.is_opaque() {
        attributes.push_str(&format!(" fill-opacity=\"{:.3}\"", color.opacity()));
    }
    attributes
}

impl Sink for SvgDocument {
    fn draw_line(&mut self, from: Point2<f64>, to: Point2<f64>, width: f64, color: Color) {
        let mut element = format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"rgb({},{},{})\" stroke-width=\"{}\" stroke-linecap=\"round\"",
            fmt_coord(from.x),
            fmt_coord(from.y),
            fmt_coord(to.x),
            fmt_coord(to.y),
            color.r,
            color.g,
            color.b,
            fmt_coord(width)
        );
        if !color.is_opaque() {
            element.push_str(&format!(" stroke-opacity=\"{:.3}\"", color.opacity()));
        }
        element.push_str("/>\n");
        self.body.push_str(&element);
    }

    fn fill_polygon(&mut self, points: &[Point2<f64>], color: Color) {
        if points.len() < 3 {
            return;
        }
        let coordinates: Vec<String> = points
            .iter()
            .map(|p| format!("{},{}", fmt_coord(p.x), fmt_coord(p.y)))
            .collect();
        self.body.push_str(&format!(
            "<polygon points=\"{}\" {}/>\n",
            coordinates.join(" "),
            fill_attributes(color)
        ));
    }

    fn fill_circle(&mut self, center: Point2<f64>, radius: f64, color: Color) {
        self.body.push_str(&format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" {}/>\n",
            fmt_coord(center.x),
            fmt_coord(center.y),
            fmt_coord(radius),
            fill_attributes(color)
        ));
    }

    fn fill_square(&mut self, center: Point2<f64>, half_side: f64, color: Color) {
        self.body.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" {}/>\n",
            fmt_coord(center.x - half_side),
            fmt_coord(center.y - half_side),
            fmt_coord(2.0 * half_side),
            fmt_coord(2.0 * half_side),
            fill_attributes(color)
        ));
    }
}

impl Document for SvgDocument {
    fn create(width: u32, height: u32, background: Color) -> Self {
        let body = format!(
            "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" {}/>\n",
            width,
            height,
            fill_attributes(background)
        );
        Self {
            body,
            width,
            height,
        }
    }

    fn finish(self) -> Result<Vec<u8>, ExportError> {
        let mut svg = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = self.width,
            h = self.height
        );
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        Ok(svg.into_bytes())
    }
}
