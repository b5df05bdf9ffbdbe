use nalgebra::Point2;

use crate::Pose;

/// One marker detection produced by the external pose estimator.
///
/// The list a frame's detection produced is consumed verbatim and replaced
/// wholesale next frame; nothing here is tracked across frames.
#[derive(Debug, Clone)]
pub struct DetectedMarker {
    /// Registry id of the fiducial pattern.
    pub id: u32,
    /// Camera-from-marker pose.
    pub pose: Pose,
    /// Corner positions in display-image pixels (TL, TR, BR, BL), when the
    /// estimator reports them.
    pub corners: Option<[Point2<f32>; 4]>,
}

impl DetectedMarker {
    pub fn new(id: u32, pose: Pose) -> Self {
        Self {
            id,
            pose,
            corners: None,
        }
    }
}
