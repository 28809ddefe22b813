//! # Clipping Planes
//!
//! Half-space clipping for the export pass. A plane `a x + b y + c z + d = 0`
//! keeps every point where `a x + b y + c z + d >= 0`. With several planes the
//! kept region is their intersection, so a point survives only if it is on
//! the keep side of every plane.
//!
//! A plane flagged `visible` also contributes a square patch lying in the
//! plane, so its boundary can be seen in the output.
//!
//! ```
//! use cgmath::Point3;
//! use digiscene::gfx::clipping::{ClippingPlane, ClippingPlanes};
//!
//! let mut planes = ClippingPlanes::new();
//! planes.add(ClippingPlane::new(0.0, 0.0, 1.0, 0.0, false)).unwrap();
//! assert!(planes.contains(Point3::new(0.0, 0.0, 1.0)));
//! assert!(!planes.contains(Point3::new(0.0, 0.0, -1.0)));
//! ```

use cgmath::{InnerSpace, Point3, Vector3};

use crate::error::SceneError;

/// Maximal number of planes a scene may hold.
pub const MAX_CLIPPING_PLANES: usize = 5;

const EPSILON: f64 = 1e-12;

/// A half-space `a x + b y + c z + d >= 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClippingPlane {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    /// Whether the plane itself is drawn.
    pub visible: bool,
}

impl ClippingPlane {
    pub fn new(a: f64, b: f64, c: f64, d: f64, visible: bool) -> Self {
        Self { a, b, c, d, visible }
    }

    pub fn normal(&self) -> Vector3<f64> {
        Vector3::new(self.a, self.b, self.c)
    }

    /// Signed evaluation of the plane equation at `p`.
    pub fn evaluate(&self, p: Point3<f64>) -> f64 {
        self.a * p.x + self.b * p.y + self.c * p.z + self.d
    }

    pub fn keeps(&self, p: Point3<f64>) -> bool {
        self.evaluate(p) >= 0.0
    }

    /// Orthogonal projection of `p` onto the plane, `None` for a zero normal.
    pub fn project_point(&self, p: Point3<f64>) -> Option<Point3<f64>> {
        let n = self.normal();
        let len2 = n.magnitude2();
        if len2 < EPSILON {
            return None;
        }
        Some(p - n * (self.evaluate(p) / len2))
    }

    /// A square of half-size `half_size` lying in the plane, centered on the
    /// projection of `center`. `None` when the normal is zero.
    pub fn boundary_quad(&self, center: Point3<f64>, half_size: f64) -> Option<[Point3<f64>; 4]> {
        let origin = self.project_point(center)?;
        let n = self.normal().normalize();
        // Any axis not parallel to the normal spans the plane with it.
        let helper = if n.x.abs() < 0.9 {
            Vector3::unit_x()
        } else {
            Vector3::unit_y()
        };
        let u = n.cross(helper).normalize() * half_size;
        let v = n.cross(u).normalize() * half_size;
        Some([
            origin - u - v,
            origin + u - v,
            origin + u + v,
            origin - u + v,
        ])
    }
}

/// The set of clipping planes of a scene, bounded by [`MAX_CLIPPING_PLANES`].
#[derive(Debug, Clone, Default)]
pub struct ClippingPlanes {
    planes: Vec<ClippingPlane>,
}

impl ClippingPlanes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plane, failing once the capacity is reached.
    pub fn add(&mut self, plane: ClippingPlane) -> Result<(), SceneError> {
        if self.planes.len() >= MAX_CLIPPING_PLANES {
            return Err(SceneError::ClippingPlaneCapacity {
                max: MAX_CLIPPING_PLANES,
            });
        }
        self.planes.push(plane);
        Ok(())
    }

    /// Snapshot of the planes in insertion order.
    pub fn planes(&self) -> Vec<ClippingPlane> {
        self.planes.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClippingPlane> {
        self.planes.iter()
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// True when `p` lies on the keep side of every plane.
    pub fn contains(&self, p: Point3<f64>) -> bool {
        self.planes.iter().all(|plane| plane.keeps(p))
    }

    /// Clips a segment against every plane, `None` if nothing remains.
    pub fn clip_segment(
        &self,
        from: Point3<f64>,
        to: Point3<f64>,
    ) -> Option<(Point3<f64>, Point3<f64>)> {
        let (mut a, mut b) = (from, to);
        for plane in &self.planes {
            let da = plane.evaluate(a);
            let db = plane.evaluate(b);
            match (da >= 0.0, db >= 0.0) {
                (true, true) => {}
                (false, false) => return None,
                (true, false) => b = intersect(a, b, da, db),
                (false, true) => a = intersect(a, b, da, db),
            }
        }
        Some((a, b))
    }

    /// Clips a convex or simple polygon against every plane
    /// (Sutherland-Hodgman). Returns fewer than three points when the
    /// polygon is entirely cut away.
    pub fn clip_polygon(&self, polygon: &[Point3<f64>]) -> Vec<Point3<f64>> {
        let mut output = polygon.to_vec();
        for plane in &self.planes {
            if output.is_empty() {
                break;
            }
            let input = std::mem::take(&mut output);
            for (i, &current) in input.iter().enumerate() {
                let previous = input[(i + input.len() - 1) % input.len()];
                let dc = plane.evaluate(current);
                let dp = plane.evaluate(previous);
                if dc >= 0.0 {
                    if dp < 0.0 {
                        output.push(intersect(previous, current, dp, dc));
                    }
                    output.push(current);
                } else if dp >= 0.0 {
                    output.push(intersect(previous, current, dp, dc));
                }
            }
        }
        output
    }
}

/// Point where the segment `a`-`b` crosses the plane, given the signed
/// evaluations at both ends (which must have opposite signs).
fn intersect(a: Point3<f64>, b: Point3<f64>, da: f64, db: f64) -> Point3<f64> {
    let t = da / (da - db);
    a + (b - a) * t
}
