use marker_overlay::{
    CameraModel, DetectedMarker, DrawMode, MarkerCatalog, Pose, RecordingSurface, RgbImage,
    SceneCompositor, ShapeKind, SurfaceCall,
};
use marker_overlay_core::IntrinsicsFile;
use nalgebra::{Rotation3, Vector3};

fn test_camera() -> CameraModel {
    CameraModel::from_document(&IntrinsicsFile {
        image_width: 640,
        image_height: 480,
        camera_matrix: [[500.0, 0.0, 320.0], [0.0, 500.0, 240.0], [0.0, 0.0, 1.0]],
        distortion: vec![0.0; 5],
    })
}

fn marker(id: u32) -> DetectedMarker {
    DetectedMarker::new(
        id,
        Pose::new(Rotation3::identity(), Vector3::new(0.0, 0.0, 1.0)),
    )
}

fn compositor() -> SceneCompositor {
    SceneCompositor::new(MarkerCatalog::default_layout(), 0.5)
}

fn count(surface: &RecordingSurface, pred: impl Fn(&SurfaceCall) -> bool) -> usize {
    surface.calls.iter().filter(|c| pred(c)).count()
}

#[test]
fn empty_display_issues_no_surface_calls() {
    let mut surface = RecordingSurface::new();
    compositor().render(&mut surface, &RgbImage::empty(), &[marker(85)], &test_camera());
    assert!(surface.calls.is_empty());
}

#[test]
fn frame_setup_follows_the_fixed_order() {
    let mut surface = RecordingSurface::new();
    compositor().render(&mut surface, &RgbImage::new(640, 480), &[], &test_camera());

    use SurfaceCall::*;
    assert!(matches!(
        &surface.calls[..],
        [
            ResetTransforms,
            Ortho2d { width, height },
            Viewport { width: 640, height: 480 },
            Texturing(false),
            Blit { width: 640, height: 480 },
            DepthTest(true),
            LoadProjection(_),
            DepthTest(false),
            DepthTest(false),
        ] if *width == 640.0 && *height == 480.0
    ));
}

#[test]
fn one_mapped_one_unknown_dispatches_exactly_once() {
    let mut surface = RecordingSurface::new();
    compositor().render(
        &mut surface,
        &RgbImage::new(640, 480),
        &[marker(85), marker(999)],
        &test_camera(),
    );

    // both markers pass through the transform chain...
    assert_eq!(count(&surface, |c| matches!(c, SurfaceCall::LoadModelView(_))), 2);
    assert_eq!(count(&surface, |c| matches!(c, SurfaceCall::Translate(_))), 2);
    assert_eq!(count(&surface, |c| matches!(c, SurfaceCall::PushTransform)), 2);
    assert_eq!(count(&surface, |c| matches!(c, SurfaceCall::PopTransform)), 2);
    // ...but only the catalogued one draws (a pyramid: 4 triangles x 2 passes)
    assert_eq!(
        count(&surface, |c| matches!(c, SurfaceCall::Begin(DrawMode::Triangles))),
        8
    );
    assert_eq!(count(&surface, |c| matches!(c, SurfaceCall::Begin(DrawMode::Quads))), 0);
    assert_eq!(
        count(&surface, |c| matches!(c, SurfaceCall::Begin(DrawMode::QuadStrip))),
        0
    );
}

#[test]
fn markers_render_in_detection_order_with_their_own_transforms() {
    let mut surface = RecordingSurface::new();
    let near = marker(144);
    let mut far = marker(166);
    far.pose.translation = Vector3::new(0.2, 0.0, 2.0);

    compositor().render(
        &mut surface,
        &RgbImage::new(640, 480),
        &[far.clone(), near.clone()],
        &test_camera(),
    );

    let loaded: Vec<[f64; 16]> = surface
        .calls
        .iter()
        .filter_map(|c| match c {
            SurfaceCall::LoadModelView(m) => Some(*m),
            _ => None,
        })
        .collect();
    // no sorting: estimator order is presentation order
    assert_eq!(loaded, vec![far.pose.model_view_matrix(), near.pose.model_view_matrix()]);
}

#[test]
fn objects_are_lifted_half_a_marker_above_the_plane() {
    let mut surface = RecordingSurface::new();
    compositor().render(
        &mut surface,
        &RgbImage::new(640, 480),
        &[marker(85)],
        &test_camera(),
    );

    let translates: Vec<[f64; 3]> = surface
        .calls
        .iter()
        .filter_map(|c| match c {
            SurfaceCall::Translate(t) => Some(*t),
            _ => None,
        })
        .collect();
    assert_eq!(translates, vec![[0.0, 0.0, 0.25]]);
}

#[test]
fn transform_state_is_restored_around_every_marker() {
    let mut surface = RecordingSurface::new();
    compositor().render(
        &mut surface,
        &RgbImage::new(640, 480),
        &[marker(85), marker(999), marker(214)],
        &test_camera(),
    );

    let mut depth = 0i32;
    for call in &surface.calls {
        match call {
            SurfaceCall::PushTransform => depth += 1,
            SurfaceCall::PopTransform => {
                depth -= 1;
                assert!(depth >= 0, "pop without matching push");
            }
            _ => {}
        }
    }
    assert_eq!(depth, 0, "unbalanced transform stack");
}

#[test]
fn depth_test_stays_off_for_the_marker_loop() {
    let mut surface = RecordingSurface::new();
    compositor().render(
        &mut surface,
        &RgbImage::new(640, 480),
        &[marker(85), marker(144)],
        &test_camera(),
    );

    // enabled once for the projection setup, off before the loop and again
    // (idempotently) after it; never re-enabled per marker
    assert_eq!(count(&surface, |c| matches!(c, SurfaceCall::DepthTest(true))), 1);
    assert_eq!(count(&surface, |c| matches!(c, SurfaceCall::DepthTest(false))), 2);
    assert!(matches!(surface.calls.last(), Some(SurfaceCall::DepthTest(false))));
}

#[test]
fn alternate_catalogs_redirect_dispatch() {
    let catalog = MarkerCatalog::from_pairs([(999, ShapeKind::Cylinder)]);
    let compositor = SceneCompositor::new(catalog, 0.5);

    let mut surface = RecordingSurface::new();
    compositor.render(
        &mut surface,
        &RgbImage::new(640, 480),
        &[marker(85), marker(999)],
        &test_camera(),
    );

    assert_eq!(
        count(&surface, |c| matches!(c, SurfaceCall::Begin(DrawMode::QuadStrip))),
        1,
        "999 now draws the cylinder wall"
    );
    assert_eq!(
        count(&surface, |c| matches!(c, SurfaceCall::Begin(DrawMode::Triangles))),
        0,
        "85 is unmapped in this catalog"
    );
}
