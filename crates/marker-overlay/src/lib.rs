//! Marker-registered overlay rendering.
//!
//! This crate turns per-frame fiducial pose estimates into draw calls on a
//! host-provided render surface:
//!
//! - [`FramePipeline`] acquires a captured frame, normalizes its channel
//!   order, resizes it to the display resolution, and runs the external
//!   pose estimator,
//! - [`SceneCompositor`] blits the display frame as the background and
//!   dispatches one solid primitive per detected marker,
//! - the primitive functions in [`primitives`] emit the actual geometry in
//!   each marker's local frame.
//!
//! Marker detection itself, camera calibration, and the host window/event
//! loop are external; see [`marker_overlay_core::PoseEstimator`] and
//! [`RenderSurface`] for the two seams.

mod catalog;
mod debug_draw;
mod pipeline;
pub mod primitives;
mod scene;
mod surface;

pub use catalog::{MarkerCatalog, ShapeKind};
pub use debug_draw::{draw_marker_axis, draw_marker_cube};
pub use pipeline::{align_display_width, FramePipeline};
pub use scene::SceneCompositor;
pub use surface::{
    DrawMode, PolygonMode, RecordingSurface, RenderSurface, SurfaceCall, TransformGuard,
};

pub use marker_overlay_core::{
    CameraModel, DetectedMarker, IntrinsicsIoError, Pose, PoseEstimator, RgbImage, RgbImageView,
};
