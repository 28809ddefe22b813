use cgmath::{InnerSpace, Matrix4, Vector3};

use crate::error::SceneError;

const DEGENERACY_EPSILON: f64 = 1e-12;

pub trait Camera {
    fn build_view_projection_matrix(&self) -> Result<Matrix4<f64>, SceneError>;
}

/// Orthonormal camera frame built from a look direction and an up hint.
///
/// The up hint does not need to be perpendicular to the direction; it is
/// re-orthogonalized through two cross products so that
/// `forward`, `right` and `up` are mutually perpendicular unit vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub forward: Vector3<f64>,
    pub right: Vector3<f64>,
    pub up: Vector3<f64>,
}

impl CameraBasis {
    pub fn new(direction: Vector3<f64>, up_hint: Vector3<f64>) -> Result<Self, SceneError> {
        let direction_len = direction.magnitude();
        if direction_len < DEGENERACY_EPSILON {
            return Err(SceneError::DegenerateCamera(
                "view direction must not be the zero vector".to_string(),
            ));
        }
        let up_len = up_hint.magnitude();
        if up_len < DEGENERACY_EPSILON {
            return Err(SceneError::DegenerateCamera(
                "up vector must not be the zero vector".to_string(),
            ));
        }

        let forward = direction / direction_len;
        let side = forward.cross(up_hint / up_len);
        if side.magnitude() < 1e-9 {
            return Err(SceneError::DegenerateCamera(
                "up vector is parallel to the view direction".to_string(),
            ));
        }
        let right = side.normalize();
        let up = right.cross(forward);

        Ok(Self { forward, right, up })
    }

    /// Right-handed view matrix placing the camera at `eye`.
    pub fn view_matrix(&self, eye: Vector3<f64>) -> Matrix4<f64> {
        let (f, s, u) = (self.forward, self.right, self.up);
        #[rustfmt::skip]
        let view = Matrix4::new(
            s.x, u.x, -f.x, 0.0,
            s.y, u.y, -f.y, 0.0,
            s.z, u.z, -f.z, 0.0,
            -eye.dot(s), -eye.dot(u), eye.dot(f), 1.0,
        );
        view
    }
}
