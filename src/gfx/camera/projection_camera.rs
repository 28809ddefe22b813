use std::cell::OnceCell;

use cgmath::*;

use super::camera_utils::{Camera, CameraBasis};
use crate::error::SceneError;

/// How camera-space coordinates are flattened onto the image plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    /// Perspective divide with the given vertical field of view.
    Perspective { fovy: Rad<f64> },
    /// Parallel projection showing `half_height` world units above and
    /// below the view axis.
    Parallel { half_height: f64 },
}

/// Output rectangle in device units, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: f64::from(width),
            height: f64::from(height),
        }
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

/// Initial camera parameters handed to a scene at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub position: Point3<f64>,
    pub direction: Vector3<f64>,
    pub up: Vector3<f64>,
    pub znear: f64,
    pub zfar: f64,
    pub projection: ProjectionMode,
    pub viewport: Viewport,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 10.0),
            direction: Vector3::new(0.0, 0.0, -1.0),
            up: Vector3::unit_y(),
            znear: 0.1,
            zfar: 1000.0,
            projection: ProjectionMode::Perspective {
                fovy: Rad(std::f64::consts::PI / 4.0),
            },
            viewport: Viewport::new(800, 600),
        }
    }
}

/// A point mapped to device space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
    /// Distance from the camera along the view direction.
    pub depth: f64,
    /// False when the point is closer than the near plane or farther than
    /// the far plane.
    pub visible: bool,
}

/// Precomputed view-projection transform for one camera state.
#[derive(Debug, Clone)]
pub struct Projector {
    view_proj: Matrix4<f64>,
    eye: Point3<f64>,
    forward: Vector3<f64>,
    right: Vector3<f64>,
    viewport: Viewport,
    znear: f64,
    zfar: f64,
}

impl Projector {
    /// Maps a world point to device coordinates plus depth.
    pub fn project(&self, p: Point3<f64>) -> ProjectedPoint {
        let depth = (p - self.eye).dot(self.forward);
        let clip = self.view_proj * p.to_homogeneous();

        let (ndc_x, ndc_y) = if clip.w.abs() > f64::EPSILON {
            (clip.x / clip.w, clip.y / clip.w)
        } else {
            (0.0, 0.0)
        };

        ProjectedPoint {
            x: self.viewport.x + (ndc_x + 1.0) * 0.5 * self.viewport.width,
            y: self.viewport.y + (1.0 - ndc_y) * 0.5 * self.viewport.height,
            depth,
            visible: depth >= self.znear && depth <= self.zfar,
        }
    }

    /// Device-space length of a world-space segment of length `world` placed
    /// perpendicular to the view direction at `center`.
    pub fn project_length(&self, center: Point3<f64>, world: f64) -> f64 {
        let a = self.project(center);
        let b = self.project(center + self.right * world);
        ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

/// Camera used by the export pass.
///
/// Every setter invalidates the cached [`Projector`]; it is rebuilt lazily on
/// the next projection and then reused for every point of that pass.
#[derive(Debug, Clone)]
pub struct ProjectionCamera {
    position: Point3<f64>,
    direction: Vector3<f64>,
    up: Vector3<f64>,
    znear: f64,
    zfar: f64,
    projection: ProjectionMode,
    viewport: Viewport,
    cache: OnceCell<Projector>,
}

impl Camera for ProjectionCamera {
    fn build_view_projection_matrix(&self) -> Result<Matrix4<f64>, SceneError> {
        let basis = CameraBasis::new(self.direction, self.up)?;
        let view = basis.view_matrix(self.position.to_vec());
        let proj = match self.projection {
            ProjectionMode::Perspective { fovy } => {
                perspective(fovy, self.viewport.aspect(), self.znear, self.zfar)
            }
            ProjectionMode::Parallel { half_height } => {
                let half_width = half_height * self.viewport.aspect();
                ortho(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.znear,
                    self.zfar,
                )
            }
        };
        Ok(proj * view)
    }
}

impl ProjectionCamera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            position: config.position,
            direction: config.direction,
            up: config.up,
            znear: config.znear,
            zfar: config.zfar,
            projection: config.projection,
            viewport: config.viewport,
            cache: OnceCell::new(),
        }
    }

    pub fn set_camera(&mut self, position: Point3<f64>, direction: Vector3<f64>, up: Vector3<f64>) {
        self.position = position;
        self.direction = direction;
        self.up = up;
        self.invalidate();
    }

    pub fn set_camera_position(&mut self, position: Point3<f64>) {
        self.position = position;
        self.invalidate();
    }

    pub fn set_camera_direction(&mut self, direction: Vector3<f64>) {
        self.direction = direction;
        self.invalidate();
    }

    pub fn set_camera_up_vector(&mut self, up: Vector3<f64>) {
        self.up = up;
        self.invalidate();
    }

    pub fn set_near_far(&mut self, znear: f64, zfar: f64) {
        self.znear = znear;
        self.zfar = zfar;
        self.invalidate();
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.invalidate();
    }

    pub fn set_projection(&mut self, projection: ProjectionMode) {
        self.projection = projection;
        self.invalidate();
    }

    pub fn position(&self) -> Point3<f64> {
        self.position
    }

    pub fn direction(&self) -> Vector3<f64> {
        self.direction
    }

    pub fn up(&self) -> Vector3<f64> {
        self.up
    }

    pub fn near_far(&self) -> (f64, f64) {
        (self.znear, self.zfar)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn projection(&self) -> ProjectionMode {
        self.projection
    }

    /// The cached projector, rebuilt first if a setter ran since the last call.
    pub fn projector(&self) -> Result<&Projector, SceneError> {
        if let Some(projector) = self.cache.get() {
            return Ok(projector);
        }
        let projector = self.build_projector()?;
        Ok(self.cache.get_or_init(|| projector))
    }

    pub fn project(&self, p: Point3<f64>) -> Result<ProjectedPoint, SceneError> {
        Ok(self.projector()?.project(p))
    }

    fn invalidate(&mut self) {
        self.cache = OnceCell::new();
    }

    fn validate(&self) -> Result<(), SceneError> {
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return Err(SceneError::DegenerateCamera(format!(
                "viewport {}x{} has no area",
                self.viewport.width, self.viewport.height
            )));
        }
        if !(self.zfar > self.znear) {
            return Err(SceneError::DegenerateCamera(format!(
                "far distance {} must exceed near distance {}",
                self.zfar, self.znear
            )));
        }
        match self.projection {
            ProjectionMode::Perspective { fovy } => {
                if self.znear <= 0.0 {
                    return Err(SceneError::DegenerateCamera(format!(
                        "near distance {} must be positive for a perspective projection",
                        self.znear
                    )));
                }
                if fovy.0 <= 0.0 || fovy.0 >= std::f64::consts::PI {
                    return Err(SceneError::DegenerateCamera(format!(
                        "field of view {} rad is out of range",
                        fovy.0
                    )));
                }
            }
            ProjectionMode::Parallel { half_height } => {
                if half_height <= 0.0 {
                    return Err(SceneError::DegenerateCamera(format!(
                        "parallel half-height {} must be positive",
                        half_height
                    )));
                }
            }
        }
        Ok(())
    }

    fn build_projector(&self) -> Result<Projector, SceneError> {
        self.validate()?;
        let basis = CameraBasis::new(self.direction, self.up)?;
        let view_proj = self.build_view_projection_matrix()?;
        log::debug!(
            "Rebuilt projector: eye={:?} forward={:?} viewport={}x{}",
            self.position,
            basis.forward,
            self.viewport.width,
            self.viewport.height
        );
        Ok(Projector {
            view_proj,
            eye: self.position,
            forward: basis.forward,
            right: basis.right,
            viewport: self.viewport,
            znear: self.znear,
            zfar: self.zfar,
        })
    }
}

impl Default for ProjectionCamera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}
