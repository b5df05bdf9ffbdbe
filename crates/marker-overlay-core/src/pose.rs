//! Rigid marker poses and their render-surface transform form.

use nalgebra::{Matrix3, Point3, Rotation3, Vector3};

/// Rigid camera-from-marker transform estimated for one detected marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub rotation: Rotation3<f64>,
    pub translation: Vector3<f64>,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    pub fn identity() -> Self {
        Self {
            rotation: Rotation3::identity(),
            translation: Vector3::zeros(),
        }
    }

    pub fn new(rotation: Rotation3<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Build a pose from a raw rotation matrix, e.g. a PnP solver output.
    ///
    /// The matrix is trusted to be orthonormal, matching how estimator
    /// output is consumed verbatim everywhere else.
    pub fn from_matrix_parts(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation: Rotation3::from_matrix_unchecked(rotation),
            translation,
        }
    }

    /// Map a marker-frame point into the camera frame.
    #[inline]
    pub fn transform_point(&self, p: &Point3<f64>) -> Point3<f64> {
        self.rotation * p + self.translation
    }

    /// Column-major 4x4 model-view matrix for a render surface.
    ///
    /// Pose estimates live in image conventions (Y down, Z toward the
    /// scene); the render surface uses Y up, Z toward the viewer. The
    /// conversion negates the Y and Z rows of `[R | t]`. This flip is
    /// unconditional; it is what keeps rendered geometry registered to the
    /// marker plane seen in the background image.
    pub fn model_view_matrix(&self) -> [f64; 16] {
        let r = self.rotation.matrix();
        let t = &self.translation;
        let mut m = [0.0f64; 16];
        for col in 0..3 {
            m[4 * col] = r[(0, col)];
            m[4 * col + 1] = -r[(1, col)];
            m[4 * col + 2] = -r[(2, col)];
        }
        m[12] = t.x;
        m[13] = -t.y;
        m[14] = -t.z;
        m[15] = 1.0;
        m
    }
}
