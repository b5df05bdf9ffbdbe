use crate::{CameraModel, DetectedMarker, RgbImageView};

/// External marker pose estimation capability.
///
/// The detection algorithm itself is outside this workspace; hosts plug in
/// a concrete detector (and tests plug in scripted stubs). The returned
/// list is trusted verbatim; ids and poses are not validated further.
pub trait PoseEstimator {
    /// Detect markers in `image` and estimate their poses.
    ///
    /// `marker_size` is the physical marker side length, in the same units
    /// the rendered geometry should use.
    fn detect(
        &mut self,
        image: &RgbImageView<'_>,
        camera: &CameraModel,
        marker_size: f32,
    ) -> Vec<DetectedMarker>;
}
