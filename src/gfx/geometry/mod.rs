//! # Geometry Helpers
//!
//! Small geometric building blocks shared by the export pass and the sinks.
//!
//! ## Provided
//!
//! - **Cube**: the 8 corners and 12 edges of a voxel
//! - **Convex hull**: silhouette of a projected voxel
//! - **Round-capped segment**: a line of given width as a fillable outline
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::{Point2, Point3};
//! use digiscene::gfx::geometry::{convex_hull, cube_corners};
//!
//! let corners = cube_corners(Point3::new(0.0, 0.0, 0.0), 0.5);
//! assert_eq!(corners.len(), 8);
//!
//! let hull = convex_hull(&[
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(0.5, 0.2),
//!     Point2::new(0.0, 1.0),
//! ]);
//! assert_eq!(hull.len(), 3);
//! ```

pub mod primitives;

pub use primitives::*;
