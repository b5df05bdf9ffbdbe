//! Camera intrinsics and the projection math derived from them.

use nalgebra::{Matrix3, Point2, Point3};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum IntrinsicsIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// On-disk camera calibration document.
///
/// Produced once by an external calibration tool and read back at
/// construction time. `camera_matrix` is row-major.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntrinsicsFile {
    pub image_width: u32,
    pub image_height: u32,
    pub camera_matrix: [[f64; 3]; 3],
    #[serde(default)]
    pub distortion: Vec<f64>,
}

/// Pinhole camera model: intrinsic matrix, distortion coefficients, and the
/// resolution the calibration was performed at.
///
/// Loaded once from a calibration file and owned by the frame pipeline.
/// The only mutation is [`CameraModel::resize`], which rescales the
/// intrinsics proportionally to a new working resolution. The distortion
/// coefficients are carried along (and rescaled resolutions keep them
/// unchanged) but never applied anywhere in this workspace: the pipeline's
/// undistortion stage is an identity passthrough.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraModel {
    pub camera_matrix: Matrix3<f64>,
    pub distortion: Vec<f64>,
    pub width: u32,
    pub height: u32,
}

impl Default for CameraModel {
    /// An unusable model. `is_valid()` is false until real intrinsics are
    /// loaded; every projection derived from an invalid model is undefined.
    fn default() -> Self {
        Self {
            camera_matrix: Matrix3::zeros(),
            distortion: Vec::new(),
            width: 0,
            height: 0,
        }
    }
}

impl CameraModel {
    /// Read a calibration JSON document from disk.
    ///
    /// Load failures propagate; there is no retry. Callers must check the
    /// result before using the model for any geometry.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IntrinsicsIoError> {
        let raw = fs::read_to_string(path)?;
        let doc: IntrinsicsFile = serde_json::from_str(&raw)?;
        Ok(Self::from_document(&doc))
    }

    /// Write the model to disk as a pretty-printed calibration document.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IntrinsicsIoError> {
        let json = serde_json::to_string_pretty(&self.to_document())?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn from_document(doc: &IntrinsicsFile) -> Self {
        let m = doc.camera_matrix;
        Self {
            camera_matrix: Matrix3::new(
                m[0][0], m[0][1], m[0][2], //
                m[1][0], m[1][1], m[1][2], //
                m[2][0], m[2][1], m[2][2],
            ),
            distortion: doc.distortion.clone(),
            width: doc.image_width,
            height: doc.image_height,
        }
    }

    pub fn to_document(&self) -> IntrinsicsFile {
        let m = &self.camera_matrix;
        IntrinsicsFile {
            image_width: self.width,
            image_height: self.height,
            camera_matrix: [
                [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
                [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
                [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
            ],
            distortion: self.distortion.clone(),
        }
    }

    #[inline]
    pub fn fx(&self) -> f64 {
        self.camera_matrix[(0, 0)]
    }

    #[inline]
    pub fn fy(&self) -> f64 {
        self.camera_matrix[(1, 1)]
    }

    #[inline]
    pub fn cx(&self) -> f64 {
        self.camera_matrix[(0, 2)]
    }

    #[inline]
    pub fn cy(&self) -> f64 {
        self.camera_matrix[(1, 2)]
    }

    /// Whether the model carries usable intrinsics.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0 && self.fx() > 0.0 && self.fy() > 0.0
    }

    /// Rescale the intrinsics to a new working resolution.
    ///
    /// Focal lengths and the principal point scale with the per-axis size
    /// ratios; distortion coefficients are resolution-independent and stay
    /// as loaded.
    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.is_valid() || (width == self.width && height == self.height) {
            self.width = width;
            self.height = height;
            return;
        }
        let ax = width as f64 / self.width as f64;
        let ay = height as f64 / self.height as f64;
        self.camera_matrix[(0, 0)] *= ax;
        self.camera_matrix[(0, 2)] *= ax;
        self.camera_matrix[(1, 1)] *= ay;
        self.camera_matrix[(1, 2)] *= ay;
        self.width = width;
        self.height = height;
    }

    /// Column-major 4x4 projection matrix for a render surface viewport.
    ///
    /// The intrinsics are first rescaled from the model's own resolution to
    /// `viewport`, then mapped to a frustum for the given near/far planes.
    /// The matrix composes with model-view matrices produced by
    /// [`crate::Pose::model_view_matrix`]: pixel (0,0) lands in the top-left
    /// corner of the viewport.
    ///
    /// Requires `is_valid()`; the output is undefined otherwise.
    pub fn gl_projection(&self, viewport: (u32, u32), near: f64, far: f64) -> [f64; 16] {
        debug_assert!(self.is_valid());
        let (vw, vh) = (viewport.0 as f64, viewport.1 as f64);
        let ax = vw / self.width as f64;
        let ay = vh / self.height as f64;
        let fx = self.fx() * ax;
        let fy = self.fy() * ay;
        let cx = self.cx() * ax;
        let cy = self.cy() * ay;

        let mut m = [0.0f64; 16];
        m[0] = 2.0 * fx / vw;
        m[5] = 2.0 * fy / vh;
        m[8] = 1.0 - 2.0 * cx / vw;
        m[9] = 2.0 * cy / vh - 1.0;
        m[10] = -(far + near) / (far - near);
        m[11] = -1.0;
        m[14] = -2.0 * far * near / (far - near);
        m
    }

    /// Project a camera-frame point to pixel coordinates (no distortion).
    ///
    /// Returns `None` for points at or behind the camera plane.
    pub fn project(&self, p_cam: &Point3<f64>) -> Option<Point2<f32>> {
        if p_cam.z <= 1e-9 {
            return None;
        }
        let u = self.fx() * p_cam.x / p_cam.z + self.cx();
        let v = self.fy() * p_cam.y / p_cam.z + self.cy();
        Some(Point2::new(u as f32, v as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_model() -> CameraModel {
        CameraModel::from_document(&IntrinsicsFile {
            image_width: 640,
            image_height: 480,
            camera_matrix: [[500.0, 0.0, 320.0], [0.0, 520.0, 240.0], [0.0, 0.0, 1.0]],
            distortion: vec![0.1, -0.05, 0.0, 0.0, 0.01],
        })
    }

    #[test]
    fn default_model_is_invalid() {
        assert!(!CameraModel::default().is_valid());
        assert!(test_model().is_valid());
    }

    #[test]
    fn json_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("intrinsics.json");

        let model = test_model();
        model.write_json(&path).expect("write intrinsics");
        let back = CameraModel::load_json(&path).expect("load intrinsics");

        assert_eq!(back, model);
    }

    #[test]
    fn load_rejects_malformed_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").expect("write file");

        assert!(matches!(
            CameraModel::load_json(&path),
            Err(IntrinsicsIoError::Json(_))
        ));
        assert!(matches!(
            CameraModel::load_json(dir.path().join("missing.json")),
            Err(IntrinsicsIoError::Io(_))
        ));
    }

    #[test]
    fn resize_rescales_intrinsics_per_axis() {
        let mut model = test_model();
        model.resize(1280, 720);

        assert_relative_eq!(model.fx(), 1000.0);
        assert_relative_eq!(model.cx(), 640.0);
        assert_relative_eq!(model.fy(), 520.0 * 1.5);
        assert_relative_eq!(model.cy(), 360.0);
        assert_eq!((model.width, model.height), (1280, 720));
        // resolution-independent
        assert_eq!(model.distortion, test_model().distortion);
    }

    #[test]
    fn projection_centers_principal_point() {
        let mut model = test_model();
        // principal point exactly at the image center
        model.camera_matrix[(0, 2)] = 320.0;
        model.camera_matrix[(1, 2)] = 240.0;

        let m = model.gl_projection((640, 480), 0.01, 100.0);
        assert_relative_eq!(m[8], 0.0);
        assert_relative_eq!(m[9], 0.0);
        assert_relative_eq!(m[0], 2.0 * 500.0 / 640.0);
        assert_relative_eq!(m[11], -1.0);
        // rescaling to a proportional viewport leaves clip coords unchanged
        let half = model.gl_projection((320, 240), 0.01, 100.0);
        assert_relative_eq!(half[0], m[0]);
        assert_relative_eq!(half[5], m[5]);
    }

    #[test]
    fn project_maps_optical_axis_to_principal_point() {
        let model = test_model();
        let p = model
            .project(&Point3::new(0.0, 0.0, 2.0))
            .expect("in front of camera");
        assert_relative_eq!(p.x, 320.0);
        assert_relative_eq!(p.y, 240.0);

        assert!(model.project(&Point3::new(0.0, 0.0, 0.0)).is_none());
        assert!(model.project(&Point3::new(0.1, 0.1, -1.0)).is_none());
    }
}
