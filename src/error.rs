//! Error types for scene construction and export.

use thiserror::Error;

use crate::gfx::scene::primitive::PrimitiveKind;

/// Errors raised while building a scene or configuring its camera.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    /// A primitive was appended before any list of its kind was opened.
    #[error("no open {0} list; open one with AddNewListOf before appending")]
    NoActiveList(PrimitiveKind),

    /// The scene already holds the maximum number of clipping planes.
    #[error("clipping plane capacity reached ({max} planes)")]
    ClippingPlaneCapacity { max: usize },

    /// Camera parameters cannot produce a valid view transform.
    #[error("degenerate camera: {0}")]
    DegenerateCamera(String),

    /// A style or mode was registered under an empty type name.
    #[error("style/mode key must not be empty")]
    InvalidKeyLookup,
}

/// Errors raised by the export pass.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid output size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("sink I/O error: {0}")]
    SinkIo(#[from] std::io::Error),

    #[error("PNG drawing failed: {0}")]
    Raster(String),

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error(transparent)]
    Scene(#[from] SceneError),
}
