//! # Scene Graphics
//!
//! Everything needed to describe a scene before it is exported:
//!
//! - **Scene Store** ([`scene`]) - primitive lists, streaming protocol, modes and styles
//! - **Camera** ([`camera`]) - projection camera and its cached projector
//! - **Clipping** ([`clipping`]) - half-space clipping planes
//! - **Geometry** ([`geometry`]) - cube, hull and segment helpers
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Point3;
//! use digiscene::gfx::scene::{PrimitiveKind, SceneStore};
//!
//! let mut scene = SceneStore::default();
//! scene.open_list(PrimitiveKind::Pointel, false);
//! scene.add_pointel(Point3::new(1.0, 2.0, 3.0)).unwrap();
//! assert_eq!(scene.lists().len(), 1);
//! ```

pub mod camera;
pub mod clipping;
pub mod geometry;
pub mod scene;

// Re-export commonly used types
pub use camera::ProjectionCamera;
pub use clipping::{ClippingPlane, ClippingPlanes};
pub use scene::SceneStore;
