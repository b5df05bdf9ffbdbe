//! The render-surface seam.
//!
//! Hosts own the actual window and graphics context; the compositor and the
//! primitive renderer only ever talk to the small matrix-stack /
//! raster-blit / immediate-mode contract below. [`RecordingSurface`]
//! implements it by recording the call stream, which is how the geometry
//! tests observe emitted vertices without a graphics context.

use std::ops::{Deref, DerefMut};

use marker_overlay_core::RgbImageView;

/// Rasterization style for subsequent polygons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolygonMode {
    Fill,
    Line,
}

/// Immediate-mode primitive topologies used by the primitive renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawMode {
    Lines,
    LineLoop,
    Triangles,
    Quads,
    QuadStrip,
    Polygon,
}

/// Contract a host rendering context implements.
///
/// The compositor calls these in a fixed per-frame order; see
/// [`crate::SceneCompositor::render`]. Matrices are column-major 4x4.
pub trait RenderSurface {
    /// Reset both projection and model-view transforms to identity.
    fn reset_transforms(&mut self);
    /// Orthographic projection covering `[0, width] x [0, height]`.
    fn set_ortho_2d(&mut self, width: f64, height: f64);
    /// Full-surface viewport in pixels.
    fn set_viewport(&mut self, width: u32, height: u32);
    fn set_texturing(&mut self, enabled: bool);
    /// Blit the image as a raw pixel raster anchored at the top of the
    /// surface, flipped vertically (image rows are top-down, the surface's
    /// vertical axis is bottom-up; the flip is unconditional).
    fn blit_pixels_flipped(&mut self, image: &RgbImageView<'_>);
    fn set_depth_test(&mut self, enabled: bool);
    fn load_projection(&mut self, m: &[f64; 16]);
    fn load_model_view(&mut self, m: &[f64; 16]);
    /// Post-multiply the model-view transform by a translation.
    fn translate(&mut self, dx: f64, dy: f64, dz: f64);
    fn push_transform(&mut self);
    fn pop_transform(&mut self);
    fn set_polygon_mode(&mut self, mode: PolygonMode);
    fn set_color(&mut self, rgb: [f32; 3]);
    fn begin(&mut self, mode: DrawMode);
    fn normal(&mut self, n: [f32; 3]);
    fn vertex(&mut self, v: [f32; 3]);
    fn end(&mut self);
}

/// Scoped push/pop of the model-view transform.
///
/// Pushes on construction and pops when dropped, so the prior transform is
/// restored on every exit path out of a draw call.
pub struct TransformGuard<'a, S: RenderSurface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: RenderSurface + ?Sized> TransformGuard<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        surface.push_transform();
        Self { surface }
    }
}

impl<S: RenderSurface + ?Sized> Deref for TransformGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: RenderSurface + ?Sized> DerefMut for TransformGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: RenderSurface + ?Sized> Drop for TransformGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.pop_transform();
    }
}

/// One recorded surface call.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCall {
    ResetTransforms,
    Ortho2d { width: f64, height: f64 },
    Viewport { width: u32, height: u32 },
    Texturing(bool),
    Blit { width: usize, height: usize },
    DepthTest(bool),
    LoadProjection([f64; 16]),
    LoadModelView([f64; 16]),
    Translate([f64; 3]),
    PushTransform,
    PopTransform,
    SetPolygonMode(PolygonMode),
    SetColor([f32; 3]),
    Begin(DrawMode),
    Normal([f32; 3]),
    Vertex([f32; 3]),
    End,
}

/// A surface that records every call instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// All vertices submitted between `Begin`/`End` pairs of `mode`.
    pub fn vertices_in(&self, mode: DrawMode) -> Vec<[f32; 3]> {
        let mut out = Vec::new();
        let mut active = false;
        for call in &self.calls {
            match call {
                SurfaceCall::Begin(m) => active = *m == mode,
                SurfaceCall::End => active = false,
                SurfaceCall::Vertex(v) if active => out.push(*v),
                _ => {}
            }
        }
        out
    }
}

impl RenderSurface for RecordingSurface {
    fn reset_transforms(&mut self) {
        self.calls.push(SurfaceCall::ResetTransforms);
    }

    fn set_ortho_2d(&mut self, width: f64, height: f64) {
        self.calls.push(SurfaceCall::Ortho2d { width, height });
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.calls.push(SurfaceCall::Viewport { width, height });
    }

    fn set_texturing(&mut self, enabled: bool) {
        self.calls.push(SurfaceCall::Texturing(enabled));
    }

    fn blit_pixels_flipped(&mut self, image: &RgbImageView<'_>) {
        self.calls.push(SurfaceCall::Blit {
            width: image.width,
            height: image.height,
        });
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.calls.push(SurfaceCall::DepthTest(enabled));
    }

    fn load_projection(&mut self, m: &[f64; 16]) {
        self.calls.push(SurfaceCall::LoadProjection(*m));
    }

    fn load_model_view(&mut self, m: &[f64; 16]) {
        self.calls.push(SurfaceCall::LoadModelView(*m));
    }

    fn translate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.calls.push(SurfaceCall::Translate([dx, dy, dz]));
    }

    fn push_transform(&mut self) {
        self.calls.push(SurfaceCall::PushTransform);
    }

    fn pop_transform(&mut self) {
        self.calls.push(SurfaceCall::PopTransform);
    }

    fn set_polygon_mode(&mut self, mode: PolygonMode) {
        self.calls.push(SurfaceCall::SetPolygonMode(mode));
    }

    fn set_color(&mut self, rgb: [f32; 3]) {
        self.calls.push(SurfaceCall::SetColor(rgb));
    }

    fn begin(&mut self, mode: DrawMode) {
        self.calls.push(SurfaceCall::Begin(mode));
    }

    fn normal(&mut self, n: [f32; 3]) {
        self.calls.push(SurfaceCall::Normal(n));
    }

    fn vertex(&mut self, v: [f32; 3]) {
        self.calls.push(SurfaceCall::Vertex(v));
    }

    fn end(&mut self) {
        self.calls.push(SurfaceCall::End);
    }
}
