//! Per-frame acquisition: clone, channel swap, identity undistortion,
//! aligned resize, and the estimator hand-off.

use std::path::Path;

use marker_overlay_core::{
    resize_bilinear, CameraModel, DetectedMarker, IntrinsicsIoError, PoseEstimator, RgbImage,
    RgbImageView,
};

/// Grow `width` until a 3-byte-per-pixel row is 4-byte aligned.
///
/// Raster blits require each image row's byte length to be a multiple of
/// four. The loop adds `width * 3 % 4` and re-checks; it reaches the fixed
/// point in at most three iterations for any width, and never shrinks.
pub fn align_display_width(mut width: u32) -> u32 {
    while width * 3 % 4 != 0 {
        width += width * 3 % 4;
    }
    width
}

/// Owns the camera model, the per-stage frame buffers, and the external
/// pose estimator.
///
/// Strictly synchronous: one `process_frame` call runs the whole
/// acquisition-to-detection sequence before returning, and `&mut self`
/// keeps a second frame from entering while it does. Buffers and the
/// camera model belong to exactly one pipeline.
pub struct FramePipeline<E> {
    camera: CameraModel,
    marker_size: f32,
    window_width: u32,
    window_height: u32,
    estimator: E,
    raw: RgbImage,
    undistorted: RgbImage,
    display: RgbImage,
    markers: Vec<DetectedMarker>,
}

impl<E: PoseEstimator> FramePipeline<E> {
    /// Build a pipeline from a calibration file and a physical marker size
    /// (same units as the rendered geometry).
    ///
    /// A load failure propagates as-is; there is no retry and no usable
    /// fallback model.
    pub fn from_intrinsics_file(
        path: impl AsRef<Path>,
        marker_size: f32,
        estimator: E,
    ) -> Result<Self, IntrinsicsIoError> {
        Ok(Self::new(CameraModel::load_json(path)?, marker_size, estimator))
    }

    pub fn new(camera: CameraModel, marker_size: f32, estimator: E) -> Self {
        Self {
            camera,
            marker_size,
            window_width: 0,
            window_height: 0,
            estimator,
            raw: RgbImage::empty(),
            undistorted: RgbImage::empty(),
            display: RgbImage::empty(),
            markers: Vec::new(),
        }
    }

    #[inline]
    pub fn camera(&self) -> &CameraModel {
        &self.camera
    }

    #[inline]
    pub fn marker_size(&self) -> f32 {
        self.marker_size
    }

    /// Active display resolution (aligned width, height).
    #[inline]
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    /// The current display buffer. Empty until the first frame has been
    /// processed; an empty buffer means "nothing to draw".
    #[inline]
    pub fn display(&self) -> &RgbImage {
        &self.display
    }

    /// The current frame's detections.
    #[inline]
    pub fn markers(&self) -> &[DetectedMarker] {
        &self.markers
    }

    #[inline]
    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    #[inline]
    pub fn estimator_mut(&mut self) -> &mut E {
        &mut self.estimator
    }

    /// Configure the display resolution.
    ///
    /// The requested width is first grown to the blit-alignment fixed
    /// point, then the camera intrinsics are rescaled to the new resolution
    /// and the display buffer is re-derived from the undistorted buffer.
    /// Before the first frame there is nothing to re-derive; the display
    /// stays empty and that is not an error.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        let width = align_display_width(width);
        self.window_width = width;
        self.window_height = height;
        self.camera.resize(width, height);
        if !self.undistorted.is_empty() {
            self.display =
                resize_bilinear(&self.undistorted.view(), width as usize, height as usize);
        }
    }

    /// Process one captured frame and return the fresh detection list.
    ///
    /// Stages, each producing its own buffer: clone the caller's frame,
    /// swap the native channel order into what the blit API reads, pass
    /// through the undistortion stage (an identity; the distortion
    /// coefficients stay unapplied), resize to the display resolution, and
    /// run the pose estimator on the result. The previous frame's marker
    /// list is discarded wholesale.
    ///
    /// If no display resolution was configured yet, the capture resolution
    /// (width aligned) is adopted.
    pub fn process_frame(&mut self, frame: &RgbImageView<'_>) -> &[DetectedMarker] {
        self.raw = frame.to_owned();
        if self.window_width == 0 || self.window_height == 0 {
            self.set_window_size(frame.width as u32, frame.height as u32);
        }

        self.undistorted = self.raw.swapped_channels();
        self.display = resize_bilinear(
            &self.undistorted.view(),
            self.window_width as usize,
            self.window_height as usize,
        );

        self.markers = if self.display.is_empty() {
            Vec::new()
        } else {
            self.estimator
                .detect(&self.display.view(), &self.camera, self.marker_size)
        };
        &self.markers
    }
}
