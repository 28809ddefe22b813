//! # Digiscene Prelude
//!
//! Commonly used types and traits in one import.
//!
//! ```rust
//! use digiscene::prelude::*;
//!
//! let mut scene = SceneStore::new(SceneConfig::default());
//! scene
//!     .send(Command::AddNewListOf { kind: PrimitiveKind::Voxel, depth_test: true })?
//!     .send(Color::rgb(0, 120, 255))?;
//! scene.add_voxel(Point3::new(0.0, 0.0, 0.0))?;
//! let svg = scene.render_to_bytes(ExportFormat::Svg, 64, 64)?;
//! assert!(svg.starts_with(b"<?xml"));
//! # Ok::<(), ExportError>(())
//! ```

// Re-export scene types
pub use crate::gfx::scene::{
    Color, Command, CustomColors, Drawable, KindDefaults, Primitive, PrimitiveKind, SceneConfig,
    SceneStore, Style,
};
pub use crate::gfx::scene::{ClippingPlaneModifier, CustomStyle, SetMode};

// Re-export camera and clipping
pub use crate::gfx::camera::{CameraConfig, ProjectionCamera, ProjectionMode};
pub use crate::gfx::clipping::ClippingPlane;

// Re-export export and errors
pub use crate::error::{ExportError, SceneError};
pub use crate::export::{ExportFormat, RenderSummary};

// Re-export common external dependencies
pub use cgmath::{Point3, Vector3};
