// src/lib.rs
//! Digiscene
//!
//! A retained-mode 3D scene builder for digital-geometry primitives (voxels,
//! cells and segments) with a projection camera, clipping planes and
//! PDF/PNG/PostScript/EPS/SVG export.

pub mod error;
pub mod export;
pub mod gfx;
pub mod prelude;

// Re-export main types for convenience
pub use error::{ExportError, SceneError};
pub use export::ExportFormat;
pub use gfx::scene::SceneStore;
