//! Core types for marker-registered overlay rendering.
//!
//! This crate is intentionally small and purely geometric. It knows nothing
//! about any concrete render surface or marker-detection algorithm; it owns
//! the camera model, marker poses, and the RGB frame buffers the pipeline
//! stages hand to each other.

mod camera;
mod estimator;
mod image;
mod logger;
mod marker;
mod pose;

pub use camera::{CameraModel, IntrinsicsFile, IntrinsicsIoError};
pub use estimator::PoseEstimator;
pub use image::{resize_bilinear, RgbImage, RgbImageView};
pub use logger::init_with_level;
pub use marker::DetectedMarker;
pub use pose::Pose;
