//! Scene composition: background blit plus per-marker primitive dispatch.
//!
//! One [`SceneCompositor::render`] call is a complete, independent
//! presentation cycle; the compositor keeps no state between frames beyond
//! its injected catalog and marker size.
//!
//! Known limitation, preserved on purpose: depth testing is enabled while
//! the camera projection is loaded but switched off again before the
//! per-marker loop and never re-enabled inside it. Geometry from different
//! markers therefore does not depth-sort against other markers' geometry
//! or the background; later detections simply paint over earlier ones.

use log::{debug, trace};

use marker_overlay_core::{CameraModel, DetectedMarker, RgbImage};

use crate::catalog::{MarkerCatalog, ShapeKind};
use crate::primitives::{draw_cube, draw_cylinder, draw_pyramid};
use crate::surface::{RenderSurface, TransformGuard};

/// Near clip distance for the camera-derived projection.
const NEAR_PLANE: f64 = 0.01;
/// Far clip distance for the camera-derived projection.
const FAR_PLANE: f64 = 100.0;

/// Draws the display frame and one primitive per catalogued marker.
pub struct SceneCompositor {
    catalog: MarkerCatalog,
    marker_size: f32,
}

impl SceneCompositor {
    /// `marker_size` is the physical marker side length, in the units the
    /// estimator's translations use.
    pub fn new(catalog: MarkerCatalog, marker_size: f32) -> Self {
        Self {
            catalog,
            marker_size,
        }
    }

    #[inline]
    pub fn catalog(&self) -> &MarkerCatalog {
        &self.catalog
    }

    #[inline]
    pub fn marker_size(&self) -> f32 {
        self.marker_size
    }

    /// Present one frame.
    ///
    /// The call order is load-bearing: transform reset, 2D ortho matching
    /// the display image, full viewport, texturing off, flipped raster
    /// blit, depth on, camera projection, depth off, then the marker loop
    /// in detection order. Reordering breaks the background/overlay
    /// registration.
    ///
    /// An empty display buffer (startup, before the first processed frame)
    /// is "nothing to draw": the method returns without touching the
    /// surface. The `camera` is trusted to be valid; a model that never
    /// loaded produces an undefined projection.
    pub fn render<S: RenderSurface + ?Sized>(
        &self,
        surface: &mut S,
        display: &RgbImage,
        markers: &[DetectedMarker],
        camera: &CameraModel,
    ) {
        if display.is_empty() {
            return;
        }
        let (width, height) = (display.width as u32, display.height as u32);

        surface.reset_transforms();
        surface.set_ortho_2d(f64::from(width), f64::from(height));
        surface.set_viewport(width, height);

        surface.set_texturing(false);
        surface.blit_pixels_flipped(&display.view());

        surface.set_depth_test(true);
        let projection = camera.gl_projection((width, height), NEAR_PLANE, FAR_PLANE);
        surface.load_projection(&projection);

        debug!("markers detected: {}", markers.len());
        surface.set_depth_test(false);

        for marker in markers {
            trace!("marker id {}", marker.id);
            surface.load_model_view(&marker.pose.model_view_matrix());
            // objects sit on the marker plane, not centered in it
            surface.translate(0.0, 0.0, f64::from(self.marker_size) / 2.0);

            let mut guard = TransformGuard::new(surface);
            match self.catalog.shape_for(marker.id) {
                Some(ShapeKind::Pyramid) => draw_pyramid(&mut *guard, self.marker_size),
                Some(ShapeKind::Cube) => draw_cube(&mut *guard, self.marker_size),
                Some(ShapeKind::Cylinder) => draw_cylinder(&mut *guard, self.marker_size),
                None => trace!("marker id {} has no shape mapping", marker.id),
            }
        }

        surface.set_depth_test(false);
    }
}
