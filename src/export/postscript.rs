//! PostScript and Encapsulated PostScript output.
//!
//! PostScript has no transparency, so translucent colors are composited over
//! the background before being written. Device y (down) is flipped to the
//! PostScript y (up) axis.

use cgmath::Point2;

use super::sink::{flatten_alpha, fmt_coord, Document, Sink};
use crate::error::ExportError;
use crate::gfx::scene::primitive::Color;

#[derive(Debug, Clone)]
struct PostScriptBody {
    program: String,
    width: u32,
    height: u32,
    background: Color,
}

impl PostScriptBody {
    fn new(width: u32, height: u32, background: Color) -> Self {
        let mut body = Self {
            program: String::new(),
            width,
            height,
            background,
        };
        body.set_color(background);
        body.program
            .push_str(&format!("0 0 {} {} rectfill\n", width, height));
        body
    }

    fn set_color(&mut self, color: Color) {
        let [r, g, b] = flatten_alpha(color, self.background).unit_rgb();
        self.program
            .push_str(&format!("{:.4} {:.4} {:.4} setrgbcolor\n", r, g, b));
    }

    fn point(&self, p: Point2<f64>) -> String {
        format!("{} {}", fmt_coord(p.x), fmt_coord(f64::from(self.height) - p.y))
    }

    fn draw_line(&mut self, from: Point2<f64>, to: Point2<f64>, width: f64, color: Color) {
        self.set_color(color);
        let command = format!(
            "{} setlinewidth 1 setlinecap newpath {} moveto {} lineto stroke\n",
            fmt_coord(width),
            self.point(from),
            self.point(to)
        );
        self.program.push_str(&command);
    }

    fn fill_polygon(&mut self, points: &[Point2<f64>], color: Color) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        if rest.len() < 2 {
            return;
        }
        self.set_color(color);
        let mut command = format!("newpath {} moveto", self.point(*first));
        for p in rest {
            command.push_str(&format!(" {} lineto", self.point(*p)));
        }
        command.push_str(" closepath fill\n");
        self.program.push_str(&command);
    }

    fn fill_circle(&mut self, center: Point2<f64>, radius: f64, color: Color) {
        self.set_color(color);
        let command = format!(
            "newpath {} {} 0 360 arc closepath fill\n",
            self.point(center),
            fmt_coord(radius)
        );
        self.program.push_str(&command);
    }

    fn fill_square(&mut self, center: Point2<f64>, half_side: f64, color: Color) {
        self.set_color(color);
        let corner = Point2::new(center.x - half_side, center.y + half_side);
        let command = format!(
            "{} {} {} rectfill\n",
            self.point(corner),
            fmt_coord(2.0 * half_side),
            fmt_coord(2.0 * half_side)
        );
        self.program.push_str(&command);
    }
}

macro_rules! delegate_sink {
    ($document:ty) => {
        impl Sink for $document {
            fn draw_line(&mut self, from: Point2<f64>, to: Point2<f64>, width: f64, color: Color) {
                self.body.draw_line(from, to, width, color);
            }

            fn fill_polygon(&mut self, points: &[Point2<f64>], color: Color) {
                self.body.fill_polygon(points, color);
            }

            fn fill_circle(&mut self, center: Point2<f64>, radius: f64, color: Color) {
                self.body.fill_circle(center, radius, color);
            }

            fn fill_square(&mut self, center: Point2<f64>, half_side: f64, color: Color) {
                self.body.fill_square(center, half_side, color);
            }
        }
    };
}

/// A single-page PostScript program.
#[derive(Debug, Clone)]
pub struct PostScriptDocument {
    body: PostScriptBody,
}

delegate_sink!(PostScriptDocument);

impl Document for PostScriptDocument {
    fn create(width: u32, height: u32, background: Color) -> Self {
        Self {
            body: PostScriptBody::new(width, height, background),
        }
    }

    fn finish(self) -> Result<Vec<u8>, ExportError> {
        let body = self.body;
        let mut out = String::from("%!PS-Adobe-3.0\n");
        out.push_str("%%Creator: digiscene\n");
        out.push_str(&format!("%%BoundingBox: 0 0 {} {}\n", body.width, body.height));
        out.push_str("%%Pages: 1\n");
        out.push_str("%%EndComments\n");
        out.push_str(&format!(
            "%%Page: 1 1\n<< /PageSize [{} {}] >> setpagedevice\n",
            body.width, body.height
        ));
        out.push_str(&body.program);
        out.push_str("showpage\n%%EOF\n");
        Ok(out.into_bytes())
    }
}

/// An Encapsulated PostScript figure.
#[derive(Debug, Clone)]
pub struct EpsDocument {
    body: PostScriptBody,
}

delegate_sink!(EpsDocument);

impl Document for EpsDocument {
    fn create(width: u32, height: u32, background: Color) -> Self {
        Self {
            body: PostScriptBody::new(width, height, background),
        }
    }

    fn finish(self) -> Result<Vec<u8>, ExportError> {
        let body = self.body;
        let mut out = String::from("%!PS-Adobe-3.0 EPSF-3.0\n");
        out.push_str("%%Creator: digiscene\n");
        out.push_str(&format!("%%BoundingBox: 0 0 {} {}\n", body.width, body.height));
        out.push_str("%%EndComments\n");
        out.push_str("gsave\n");
        out.push_str(&body.program);
        out.push_str("grestore\nshowpage\n%%EOF\n");
        Ok(out.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postscript_header_and_flip() {
        let mut ps = PostScriptDocument::create(100, 80, Color::WHITE);
        ps.fill_polygon(
            &[Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), Point2::new(0.0, 10.0)],
            Color::rgb(255, 0, 0),
        );
        let text = String::from_utf8(ps.finish().unwrap()).unwrap();
        assert!(text.starts_with("%!PS-Adobe-3.0\n"));
        assert!(text.contains("%%BoundingBox: 0 0 100 80"));
        assert!(text.contains("1.0000 0.0000 0.0000 setrgbcolor"));
        assert!(text.contains("newpath 0.000 80.000 moveto 10.000 80.000 lineto 0.000 70.000 lineto closepath fill"));
        assert!(text.ends_with("%%EOF\n"));
    }

    #[test]
    fn test_eps_header() {
        let mut eps = EpsDocument::create(20, 20, Color::BLACK);
        eps.fill_circle(Point2::new(10.0, 10.0), 3.0, Color::rgba(255, 255, 255, 0));
        let text = String::from_utf8(eps.finish().unwrap()).unwrap();
        assert!(text.starts_with("%!PS-Adobe-3.0 EPSF-3.0\n"));
        assert!(!text.contains("setpagedevice"));
        // Fully transparent white over black flattens to black.
        assert!(!text.contains("1.0000 1.0000 1.0000 setrgbcolor"));
        assert!(text.contains("newpath 10.000 10.000 3.000 0 360 arc closepath fill"));
    }
}
