use cgmath::{EuclideanSpace, Point2, Point3};

use super::sink::Sink;
use crate::error::ExportError;
use crate::gfx::{
    camera::{ProjectedPoint, Projector},
    clipping::ClippingPlanes,
    geometry::{convex_hull, cube_corners, CUBE_EDGES},
    scene::{
        primitive::{Color, Primitive, PrimitiveKind},
        scene::SceneStore,
    },
};

/// Mode drawing filled kinds as outlines.
pub const MODE_WIREFRAME: &str = "Wireframe";
/// Mode drawing points and pointels as squares instead of discs.
pub const MODE_SQUARE: &str = "Square";

/// Stroke width of outlines drawn in wireframe mode, in output units.
const OUTLINE_WIDTH: f64 = 1.0;

/// A device-space shape ready for a sink.
#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Polygon(Vec<Point2<f64>>),
    Segments { segments: Vec<[Point2<f64>; 2]>, width: f64 },
    Circle { center: Point2<f64>, radius: f64 },
    Square { center: Point2<f64>, half_side: f64 },
}

#[derive(Debug, Clone, PartialEq)]
struct Mark {
    depth: f64,
    color: Color,
    shape: Shape,
}

impl Mark {
    fn emit<S: Sink + ?Sized>(&self, sink: &mut S) {
        match &self.shape {
            Shape::Polygon(points) => sink.fill_polygon(points, self.color),
            Shape::Segments { segments, width } => {
                for [from, to] in segments {
                    sink.draw_line(*from, *to, *width, self.color);
                }
            }
            Shape::Circle { center, radius } => sink.fill_circle(*center, *radius, self.color),
            Shape::Square { center, half_side } => {
                sink.fill_square(*center, *half_side, self.color)
            }
        }
    }
}

/// Counts gathered during one export pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Primitives that produced marks, clipping plane patches included.
    pub drawn: usize,
    /// Primitives dropped by clipping planes or the near/far range.
    pub culled: usize,
}

/// How one primitive kind is drawn, resolved once per list.
#[derive(Debug, Clone, Copy)]
struct KindStyle {
    color_override: Option<Color>,
    outline: bool,
    square: bool,
}

/// Walks a scene and draws it into a sink.
///
/// Lists are drawn in creation order and primitives in append order, except
/// that a depth-tested list is drawn farthest first (stable, so ties keep
/// their append order). Visible clipping planes are drawn last as one
/// depth-tested group.
pub struct ExportEngine<'s> {
    scene: &'s SceneStore,
}

impl<'s> ExportEngine<'s> {
    pub fn new(scene: &'s SceneStore) -> Self {
        Self { scene }
    }

    /// Draws the scene into `sink` using a `width` x `height` viewport.
    pub fn render<S: Sink + ?Sized>(
        &self,
        sink: &mut S,
        width: u32,
        height: u32,
    ) -> Result<RenderSummary, ExportError> {
        if width == 0 || height == 0 {
            return Err(ExportError::InvalidSize { width, height });
        }
        let mut camera = self.scene.camera().clone();
        camera.set_viewport(width, height);
        let projector = camera.projector()?;
        let planes = self.scene.clipping_planes();

        let mut summary = RenderSummary::default();
        let mut marks = Vec::new();
        for list in self.scene.lists() {
            let style = self.kind_style(list.kind());
            marks.clear();
            for primitive in list.primitives() {
                if self.primitive_marks(primitive, &style, projector, planes, &mut marks) {
                    summary.drawn += 1;
                } else {
                    summary.culled += 1;
                }
            }
            if list.depth_test() {
                sort_far_to_near(&mut marks);
            }
            for mark in &marks {
                log::trace!("{:?}", mark);
                mark.emit(sink);
            }
        }

        marks.clear();
        for quad in self.plane_patches() {
            match polygon_mark(&quad, self.scene.config().clipping_plane_color, false, projector) {
                Some(mark) => {
                    marks.push(mark);
                    summary.drawn += 1;
                }
                None => summary.culled += 1,
            }
        }
        sort_far_to_near(&mut marks);
        for mark in &marks {
            mark.emit(sink);
        }

        log::info!(
            "Rendered {} primitives at {}x{} ({} culled)",
            summary.drawn,
            width,
            height,
            summary.culled
        );
        Ok(summary)
    }

    fn kind_style(&self, kind: PrimitiveKind) -> KindStyle {
        let name = kind.style_name();
        let mode = self.scene.mode(name);
        KindStyle {
            color_override: self
                .scene
                .style(name)
                .and_then(|style| style.color_override(kind)),
            outline: self.scene.wireframe() || mode == MODE_WIREFRAME,
            square: mode == MODE_SQUARE,
        }
    }

    /// Square patches for every visible clipping plane, sized from the scene
    /// bounds.
    fn plane_patches(&self) -> Vec<[Point3<f64>; 4]> {
        let (center, half_size) = match self.scene.bounds() {
            Some(bounds) => (bounds.center(), (bounds.diagonal() / 2.0).max(1.0)),
            None => (Point3::origin(), 1.0),
        };
        self.scene
            .clipping_planes()
            .iter()
            .filter(|plane| plane.visible)
            .filter_map(|plane| {
                let quad = plane.boundary_quad(center, half_size);
                if quad.is_none() {
                    log::warn!("Visible clipping plane {:?} has a zero normal, not drawn", plane);
                }
                quad
            })
            .collect()
    }

    /// Appends the marks of one primitive. Returns false when it was culled.
    fn primitive_marks(
        &self,
        primitive: &Primitive,
        style: &KindStyle,
        projector: &Projector,
        planes: &ClippingPlanes,
        marks: &mut Vec<Mark>,
    ) -> bool {
        let color = style.color_override.unwrap_or_else(|| primitive.color());
        let mark = match primitive {
            Primitive::Voxel(voxel) => {
                if !planes.contains(voxel.center) {
                    return false;
                }
                voxel_mark(voxel.center, voxel.half_width, color, style.outline, projector)
            }
            Primitive::Line(line) => planes
                .clip_segment(line.from, line.to)
                .and_then(|(from, to)| segment_mark(from, to, line.width, color, projector)),
            Primitive::Linel(linel) => planes.clip_segment(linel.from, linel.to).and_then(|(from, to)| {
                let width = projector.project_length(from.midpoint(to), linel.width);
                segment_mark(from, to, width, color, projector)
            }),
            Primitive::Point(point) => {
                if !planes.contains(point.center) {
                    return false;
                }
                dot_mark(point.center, point.size / 2.0, color, style.square, projector)
            }
            Primitive::Pointel(pointel) => {
                if !planes.contains(pointel.center) {
                    return false;
                }
                let radius = projector.project_length(pointel.center, pointel.radius);
                dot_mark(pointel.center, radius, color, style.square, projector)
            }
            Primitive::Quad(quad) => {
                polygon_mark(&planes.clip_polygon(&quad.corners), color, style.outline, projector)
            }
            Primitive::Surfel(surfel) => {
                polygon_mark(&planes.clip_polygon(&surfel.corners), color, style.outline, projector)
            }
        };

        match mark {
            Some(mark) => {
                marks.push(mark);
                true
            }
            None => false,
        }
    }
}

fn sort_far_to_near(marks: &mut [Mark]) {
    marks.sort_by(|a, b| b.depth.total_cmp(&a.depth));
}

/// Projects every point, `None` if any falls outside the near/far range.
fn project_all(points: &[Point3<f64>], projector: &Projector) -> Option<Vec<ProjectedPoint>> {
    points
        .iter()
        .map(|p| Some(projector.project(*p)).filter(|projected| projected.visible))
        .collect()
}

fn device(p: &ProjectedPoint) -> Point2<f64> {
    Point2::new(p.x, p.y)
}

fn mean_depth(points: &[ProjectedPoint]) -> f64 {
    points.iter().map(|p| p.depth).sum::<f64>() / points.len() as f64
}

fn voxel_mark(
    center: Point3<f64>,
    half_width: f64,
    color: Color,
    outline: bool,
    projector: &Projector,
) -> Option<Mark> {
    let corners = project_all(&cube_corners(center, half_width), projector)?;
    let depth = projector.project(center).depth;
    let shape = if outline {
        Shape::Segments {
            segments: CUBE_EDGES
                .iter()
                .map(|&(a, b)| [device(&corners[a]), device(&corners[b])])
                .collect(),
            width: OUTLINE_WIDTH,
        }
    } else {
        let silhouette: Vec<Point2<f64>> = corners.iter().map(device).collect();
        Shape::Polygon(convex_hull(&silhouette))
    };
    Some(Mark {
        depth,
        color,
        shape,
    })
}

fn segment_mark(
    from: Point3<f64>,
    to: Point3<f64>,
    width: f64,
    color: Color,
    projector: &Projector,
) -> Option<Mark> {
    let ends = project_all(&[from, to], projector)?;
    Some(Mark {
        depth: mean_depth(&ends),
        color,
        shape: Shape::Segments {
            segments: vec![[device(&ends[0]), device(&ends[1])]],
            width,
        },
    })
}

fn dot_mark(
    center: Point3<f64>,
    radius: f64,
    color: Color,
    square: bool,
    projector: &Projector,
) -> Option<Mark> {
    let projected = projector.project(center);
    if !projected.visible {
        return None;
    }
    let center = device(&projected);
    let shape = if square {
        Shape::Square {
            center,
            half_side: radius,
        }
    } else {
        Shape::Circle { center, radius }
    };
    Some(Mark {
        depth: projected.depth,
        color,
        shape,
    })
}

fn polygon_mark(
    polygon: &[Point3<f64>],
    color: Color,
    outline: bool,
    projector: &Projector,
) -> Option<Mark> {
    if polygon.len() < 3 {
        return None;
    }
    let projected = project_all(polygon, projector)?;
    let points: Vec<Point2<f64>> = projected.iter().map(device).collect();
    let shape = if outline {
        Shape::Segments {
            segments: (0..points.len())
                .map(|i| [points[i], points[(i + 1) % points.len()]])
                .collect(),
            width: OUTLINE_WIDTH,
        }
    } else {
        Shape::Polygon(points)
    };
    Some(Mark {
        depth: mean_depth(&projected),
        color,
        shape,
    })
}
