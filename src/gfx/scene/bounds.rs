//! Axis-aligned scene bounds.
//!
//! The store grows a bounding box as primitives arrive. The export pass uses
//! it to size the quads that make visible clipping planes show up.

use cgmath::{EuclideanSpace, InnerSpace, Point3};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Point3<f64>,
    /// Maximum corner of the bounding box
    pub max: Point3<f64>,
}

impl Aabb {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Create a box from a set of points, `None` when the slice is empty
    pub fn from_points(points: &[Point3<f64>]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut aabb = Self::new(*first, *first);
        for p in rest {
            aabb.include(*p);
        }
        Some(aabb)
    }

    /// Grow the box so it contains `p`
    pub fn include(&mut self, p: Point3<f64>) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Smallest box containing both `self` and `other`
    pub fn merge(mut self, other: &Aabb) -> Self {
        self.include(other.min);
        self.include(other.max);
        self
    }

    pub fn center(&self) -> Point3<f64> {
        self.min.midpoint(self.max)
    }

    /// Length of the box diagonal
    pub fn diagonal(&self) -> f64 {
        (self.max - self.min).magnitude()
    }
}
