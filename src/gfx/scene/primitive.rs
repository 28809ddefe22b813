//! # Primitive Data Structures
//!
//! Plain value types for every drawable kind the scene accepts. A primitive
//! carries its geometry in object space, an RGBA [`Color`] and whatever
//! kind-specific scalar it needs (voxel half-width, line width, point size).
//!
//! Primitives have no behavior of their own; the export pass decides how each
//! kind turns into 2D marks.

use std::fmt;

use cgmath::Point3;

/// An RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Creates a color with an explicit alpha component.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Alpha as a value in `[0, 1]`.
    pub fn opacity(&self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// Color components as `[0, 1]` floats, alpha excluded.
    pub fn unit_rgb(&self) -> [f64; 3] {
        [
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        ]
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }
}

/// Tag identifying the kind of a primitive and of the list holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Voxel,
    Line,
    Point,
    Quad,
    Surfel,
    Pointel,
    Linel,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 7] = [
        PrimitiveKind::Voxel,
        PrimitiveKind::Line,
        PrimitiveKind::Point,
        PrimitiveKind::Quad,
        PrimitiveKind::Surfel,
        PrimitiveKind::Pointel,
        PrimitiveKind::Linel,
    ];

    /// Registry key used for styles and modes applied to this kind.
    pub fn style_name(&self) -> &'static str {
        match self {
            PrimitiveKind::Voxel => "Voxel",
            PrimitiveKind::Line => "Line",
            PrimitiveKind::Point => "Point",
            PrimitiveKind::Quad => "Quad",
            PrimitiveKind::Surfel => "Surfel",
            PrimitiveKind::Pointel => "Pointel",
            PrimitiveKind::Linel => "Linel",
        }
    }

    /// Whether the kind is drawn with the line color rather than the fill color.
    pub fn is_stroked(&self) -> bool {
        matches!(self, PrimitiveKind::Line | PrimitiveKind::Linel)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.style_name())
    }
}

/// A voxel: an axis-aligned cube around `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voxel {
    pub center: Point3<f64>,
    /// Half of the cube's edge length.
    pub half_width: f64,
    pub color: Color,
}

/// A straight segment whose width is given in output units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub from: Point3<f64>,
    pub to: Point3<f64>,
    pub width: f64,
    pub color: Color,
}

/// A point drawn as a disc whose diameter is given in output units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub center: Point3<f64>,
    pub size: f64,
    pub color: Color,
}

/// A planar quadrilateral with corners listed in boundary order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub corners: [Point3<f64>; 4],
    pub color: Color,
}

/// A cellular 2-cell glyph (surfel) drawn as a quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surfel {
    pub corners: [Point3<f64>; 4],
    pub color: Color,
}

/// A cellular 0-cell glyph (pointel); `radius` is in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointel {
    pub center: Point3<f64>,
    pub radius: f64,
    pub color: Color,
}

/// A cellular 1-cell glyph (linel); `width` is in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Linel {
    pub from: Point3<f64>,
    pub to: Point3<f64>,
    pub width: f64,
    pub color: Color,
}

/// Any primitive the scene can hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Voxel(Voxel),
    Line(Line),
    Point(Point),
    Quad(Quad),
    Surfel(Surfel),
    Pointel(Pointel),
    Linel(Linel),
}

impl Primitive {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Primitive::Voxel(_) => PrimitiveKind::Voxel,
            Primitive::Line(_) => PrimitiveKind::Line,
            Primitive::Point(_) => PrimitiveKind::Point,
            Primitive::Quad(_) => PrimitiveKind::Quad,
            Primitive::Surfel(_) => PrimitiveKind::Surfel,
            Primitive::Pointel(_) => PrimitiveKind::Pointel,
            Primitive::Linel(_) => PrimitiveKind::Linel,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Primitive::Voxel(v) => v.color,
            Primitive::Line(l) => l.color,
            Primitive::Point(p) => p.color,
            Primitive::Quad(q) => q.color,
            Primitive::Surfel(s) => s.color,
            Primitive::Pointel(p) => p.color,
            Primitive::Linel(l) => l.color,
        }
    }

    /// Points spanning the primitive's extent, used for scene bounds.
    pub fn extent_points(&self) -> Vec<Point3<f64>> {
        match self {
            Primitive::Voxel(v) => {
                let h = v.half_width;
                vec![
                    Point3::new(v.center.x - h, v.center.y - h, v.center.z - h),
                    Point3::new(v.center.x + h, v.center.y + h, v.center.z + h),
                ]
            }
            Primitive::Line(l) => vec![l.from, l.to],
            Primitive::Point(p) => vec![p.center],
            Primitive::Quad(q) => q.corners.to_vec(),
            Primitive::Surfel(s) => s.corners.to_vec(),
            Primitive::Pointel(p) => vec![p.center],
            Primitive::Linel(l) => vec![l.from, l.to],
        }
    }
}

macro_rules! impl_from_primitive {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Primitive {
                fn from(value: $variant) -> Self {
                    Primitive::$variant(value)
                }
            }
        )*
    };
}

impl_from_primitive!(Voxel, Line, Point, Quad, Surfel, Pointel, Linel);
