pub mod camera_utils;
pub mod projection_camera;

// Re-export main types
pub use camera_utils::{Camera, CameraBasis};
pub use projection_camera::{
    CameraConfig, ProjectedPoint, ProjectionCamera, ProjectionMode, Projector, Viewport,
};
