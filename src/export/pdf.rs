//! Single-page PDF output.
//!
//! Marks are written to one uncompressed content stream. Each distinct alpha
//! value gets its own graphics state resource so translucent marks keep their
//! opacity.

use std::collections::BTreeMap;

use cgmath::Point2;

use super::sink::{fmt_coord, Document, Sink};
use crate::error::ExportError;
use crate::gfx::scene::primitive::Color;

/// Control point distance for approximating a quarter circle with a cubic
/// Bézier curve.
const KAPPA: f64 = 0.552_284_749_8;

#[derive(Debug, Clone)]
pub struct PdfDocument {
    content: String,
    alpha_states: BTreeMap<u8, usize>,
    width: u32,
    height: u32,
}

impl PdfDocument {
    fn point(&self, p: Point2<f64>) -> String {
        format!("{} {}", fmt_coord(p.x), fmt_coord(f64::from(self.height) - p.y))
    }

    /// Opens a saved graphics state carrying `color`'s alpha.
    fn begin(&mut self, color: Color) {
        self.content.push_str("q\n");
        if !color.is_opaque() {
            let next = self.alpha_states.len();
            let index = *self.alpha_states.entry(color.a).or_insert(next);
            self.content.push_str(&format!("/GA{} gs\n", index));
        }
    }

    fn end(&mut self) {
        self.content.push_str("Q\n");
    }

    fn fill_rgb(color: Color) -> String {
        let [r, g, b] = color.unit_rgb();
        format!("{:.4} {:.4} {:.4} rg\n", r, g, b)
    }

    fn stroke_rgb(color: Color) -> String {
        let [r, g, b] = color.unit_rgb();
        format!("{:.4} {:.4} {:.4} RG\n", r, g, b)
    }
}

impl Sink for PdfDocument {
    fn draw_line(&mut self, from: Point2<f64>, to: Point2<f64>, width: f64, color: Color) {
        self.begin(color);
        let ops = format!(
            "{}{} w 1 J\n{} m {} l S\n",
            Self::stroke_rgb(color),
            fmt_coord(width),
            self.point(from),
            self.point(to)
        );
        self.content.push_str(&ops);
        self.end();
    }

    fn fill_polygon(&mut self, points: &[Point2<f64>], color: Color) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        if rest.len() < 2 {
            return;
        }
        self.begin(color);
        let mut ops = Self::fill_rgb(color);
        ops.push_str(&format!("{} m", self.point(*first)));
        for p in rest {
            ops.push_str(&format!(" {} l", self.point(*p)));
        }
        ops.push_str(" h f\n");
        self.content.push_str(&ops);
        self.end();
    }

    fn fill_circle(&mut self, center: Point2<f64>, radius: f64, color: Color) {
        self.begin(color);
        let (cx, cy) = (center.x, f64::from(self.height) - center.y);
        let k = radius * KAPPA;
        let c = |x: f64, y: f64| format!("{} {}", fmt_coord(x), fmt_coord(y));
        let mut ops = Self::fill_rgb(color);
        ops.push_str(&format!("{} m\n", c(cx + radius, cy)));
        ops.push_str(&format!(
            "{} {} {} c\n",
            c(cx + radius, cy + k),
            c(cx + k, cy + radius),
            c(cx, cy + radius)
        ));
        ops.push_str(&format!(
            "{} {} {} c\n",
            c(cx - k, cy + radius),
            c(cx - radius, cy + k),
            c(cx - radius, cy)
        ));
        ops.push_str(&format!(
            "{} {} {} c\n",
            c(cx - radius, cy - k),
            c(cx - k, cy - radius),
            c(cx, cy - radius)
        ));
        ops.push_str(&format!(
            "{} {} {} c\n",
            c(cx + k, cy - radius),
            c(cx + radius, cy - k),
            c(cx + radius, cy)
        ));
        ops.push_str("h f\n");
        self.content.push_str(&ops);
        self.end();
    }

    fn fill_square(&mut self, center: Point2<f64>, half_side: f64, color: Color) {
        self.begin(color);
        let corner = Point2::new(center.x - half_side, center.y + half_side);
        let ops = format!(
            "{}{} {} {} re f\n",
            Self::fill_rgb(color),
            self.point(corner),
            fmt_coord(2.0 * half_side),
            fmt_coord(2.0 * half_side)
        );
        self.content.push_str(&ops);
        self.end();
    }
}

impl Document for PdfDocument {
    fn create(width: u32, height: u32, background: Color) -> Self {
        let mut document = Self {
            content: String::new(),
            alpha_states: BTreeMap::new(),
            width,
            height,
        };
        document.content.push_str(&Self::fill_rgb(background));
        document
            .content
            .push_str(&format!("0 0 {} {} re f\n", width, height));
        document
    }

    fn finish(self) -> Result<Vec<u8>, ExportError> {
        let mut ext_states = String::new();
        let mut state_objects = Vec::new();
        // Objects 1-4 are fixed; graphics states follow.
        for (alpha, index) in &self.alpha_states {
            let object_id = 5 + index;
            ext_states.push_str(&format!("/GA{} {} 0 R ", index, object_id));
            let opacity = f64::from(*alpha) / 255.0;
            state_objects.push((
                *index,
                format!(
                    "<< /Type /ExtGState /ca {:.4} /CA {:.4} >>",
                    opacity, opacity
                ),
            ));
        }
        state_objects.sort_by_key(|(index, _)| *index);

        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Resources << /ExtGState << {}>> >> /Contents 4 0 R >>",
                self.width, self.height, ext_states
            ),
            format!(
                "<< /Length {} >>\nstream\n{}endstream",
                self.content.len(),
                self.content
            ),
        ];
        objects.extend(state_objects.into_iter().map(|(_, object)| object));

        let mut out = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, object) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, object));
        }

        let xref_offset = out.len();
        out.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
        out.push_str("0000000000 65535 f \n");
        for offset in offsets {
            out.push_str(&format!("{:010} 00000 n \n", offset));
        }
        out.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        ));
        Ok(out.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_structure() {
        let mut pdf = PdfDocument::create(100, 100, Color::WHITE);
        pdf.fill_square(Point2::new(50.0, 50.0), 10.0, Color::rgb(255, 0, 0));
        pdf.draw_line(Point2::new(0.0, 0.0), Point2::new(100.0, 100.0), 2.0, Color::BLACK);
        let text = String::from_utf8(pdf.finish().unwrap()).unwrap();

        assert!(text.starts_with("%PDF-1.4\n"));
        assert!(text.contains("/MediaBox [0 0 100 100]"));
        assert!(text.contains("1.0000 0.0000 0.0000 rg\n40.000 40.000 20.000 20.000 re f"));
        assert!(text.contains("0.000 100.000 m 100.000 0.000 l S"));
        assert!(text.ends_with("%%EOF\n"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let mut pdf = PdfDocument::create(10, 10, Color::WHITE);
        pdf.fill_circle(Point2::new(5.0, 5.0), 2.0, Color::rgba(0, 0, 255, 100));
        let text = String::from_utf8(pdf.finish().unwrap()).unwrap();

        let xref_start = text.find("xref\n").unwrap();
        let entries: Vec<usize> = text[xref_start..]
            .lines()
            .skip(3)
            .take_while(|line| line.ends_with(" n "))
            .map(|line| line[..10].parse().unwrap())
            .collect();
        assert_eq!(entries.len(), 5);
        for (i, offset) in entries.iter().enumerate() {
            assert!(text[*offset..].starts_with(&format!("{} 0 obj", i + 1)));
        }
        assert!(text.contains("/GA0 gs"));
        assert!(text.contains("/ca 0.3922"));
    }

    #[test]
    fn test_alpha_states_are_shared() {
        let mut pdf = PdfDocument::create(10, 10, Color::WHITE);
        pdf.fill_circle(Point2::new(5.0, 5.0), 2.0, Color::rgba(0, 0, 255, 100));
        pdf.fill_circle(Point2::new(6.0, 5.0), 2.0, Color::rgba(0, 255, 0, 100));
        pdf.fill_circle(Point2::new(7.0, 5.0), 2.0, Color::rgba(255, 0, 0, 50));
        assert_eq!(pdf.alpha_states.len(), 2);
    }
}
