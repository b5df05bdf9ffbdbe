//! Image-space debug overlays.
//!
//! These draw directly into an RGB frame instead of going through a render
//! surface: model points are projected through the marker pose and the
//! camera intrinsics (pinhole, distortion unapplied, matching the
//! pipeline's identity undistortion) and rasterized as 2D segments. Useful
//! for checking registration without a graphics context.

use nalgebra::{Point2, Point3};

use marker_overlay_core::{CameraModel, DetectedMarker, RgbImage};

const AXIS_COLORS: [[u8; 3]; 3] = [[255, 0, 0], [0, 255, 0], [0, 0, 255]];
const CUBE_COLOR: [u8; 3] = [255, 0, 0];

// Projections of near-plane grazing points explode to coordinates far
// outside any real frame; segments reaching that far are dropped whole.
const MAX_OVERSHOOT: i64 = 4;

/// Draw the wire cube standing on marker `index` into `img`.
///
/// The cube's base ring lies in the marker plane, the top ring one marker
/// size above it. An out-of-range index is a guarded no-op, as is any edge
/// whose endpoints do not project in front of the camera.
pub fn draw_marker_cube(
    img: &mut RgbImage,
    markers: &[DetectedMarker],
    index: usize,
    camera: &CameraModel,
    marker_size: f32,
) {
    let Some(marker) = markers.get(index) else {
        return;
    };

    let h = f64::from(marker_size) / 2.0;
    let s = f64::from(marker_size);
    let corners = [
        [-h, -h, 0.0],
        [h, -h, 0.0],
        [h, h, 0.0],
        [-h, h, 0.0],
        [-h, -h, s],
        [h, -h, s],
        [h, h, s],
        [-h, h, s],
    ];
    const EDGES: [[usize; 2]; 12] = [
        [0, 1],
        [1, 2],
        [2, 3],
        [3, 0],
        [4, 5],
        [5, 6],
        [6, 7],
        [7, 4],
        [0, 4],
        [1, 5],
        [2, 6],
        [3, 7],
    ];

    let projected: Vec<Option<Point2<f32>>> = corners
        .iter()
        .map(|c| {
            let p = marker.pose.transform_point(&Point3::new(c[0], c[1], c[2]));
            camera.project(&p)
        })
        .collect();

    for [a, b] in EDGES {
        if let (Some(pa), Some(pb)) = (projected[a], projected[b]) {
            draw_segment(img, pa, pb, CUBE_COLOR);
        }
    }
}

/// Draw marker `index`'s coordinate axes (X red, Y green, Z blue) into
/// `img`. Out-of-range indices are a guarded no-op.
pub fn draw_marker_axis(
    img: &mut RgbImage,
    markers: &[DetectedMarker],
    index: usize,
    camera: &CameraModel,
    marker_size: f32,
) {
    let Some(marker) = markers.get(index) else {
        return;
    };

    let s = f64::from(marker_size);
    let tips = [[s, 0.0, 0.0], [0.0, s, 0.0], [0.0, 0.0, s]];

    let origin = camera.project(&marker.pose.transform_point(&Point3::origin()));
    for (tip, color) in tips.iter().zip(AXIS_COLORS.iter()) {
        let p = marker
            .pose
            .transform_point(&Point3::new(tip[0], tip[1], tip[2]));
        if let (Some(o), Some(t)) = (origin, camera.project(&p)) {
            draw_segment(img, o, t, *color);
        }
    }
}

fn draw_segment(img: &mut RgbImage, a: Point2<f32>, b: Point2<f32>, color: [u8; 3]) {
    if img.is_empty() {
        return;
    }
    let (w, h) = (img.width as i64, img.height as i64);
    let (mut x0, mut y0) = (a.x.round() as i64, a.y.round() as i64);
    let (x1, y1) = (b.x.round() as i64, b.y.round() as i64);
    for &(x, y) in &[(x0, y0), (x1, y1)] {
        if x < -MAX_OVERSHOOT * w || x > (MAX_OVERSHOOT + 1) * w {
            return;
        }
        if y < -MAX_OVERSHOOT * h || y > (MAX_OVERSHOOT + 1) * h {
            return;
        }
    }

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        if x0 >= 0 && y0 >= 0 && x0 < w && y0 < h {
            img.set_pixel(x0 as usize, y0 as usize, color);
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marker_overlay_core::{IntrinsicsFile, Pose};
    use nalgebra::{Rotation3, Vector3};

    fn camera() -> CameraModel {
        CameraModel::from_document(&IntrinsicsFile {
            image_width: 320,
            image_height: 240,
            camera_matrix: [[300.0, 0.0, 160.0], [0.0, 300.0, 120.0], [0.0, 0.0, 1.0]],
            distortion: Vec::new(),
        })
    }

    fn facing_marker() -> DetectedMarker {
        // marker one unit straight ahead, facing the camera
        DetectedMarker::new(
            85,
            Pose::new(Rotation3::identity(), Vector3::new(0.0, 0.0, 1.0)),
        )
    }

    #[test]
    fn out_of_range_index_is_a_no_op() {
        let mut img = RgbImage::new(320, 240);
        let before = img.clone();
        let markers = vec![facing_marker()];
        draw_marker_cube(&mut img, &markers, 5, &camera(), 0.1);
        draw_marker_axis(&mut img, &markers, 1, &camera(), 0.1);
        assert_eq!(img, before);
    }

    #[test]
    fn cube_edges_touch_the_frame() {
        let mut img = RgbImage::new(320, 240);
        let markers = vec![facing_marker()];
        draw_marker_cube(&mut img, &markers, 0, &camera(), 0.2);
        let painted = img
            .data
            .chunks_exact(3)
            .filter(|px| px.iter().any(|&b| b != 0))
            .count();
        assert!(painted > 0, "expected some cube pixels to be drawn");
    }

    #[test]
    fn axis_colors_land_in_the_frame() {
        let mut img = RgbImage::new(320, 240);
        let markers = vec![facing_marker()];
        draw_marker_axis(&mut img, &markers, 0, &camera(), 0.2);
        let mut seen = [false; 3];
        for px in img.data.chunks_exact(3) {
            for (i, c) in AXIS_COLORS.iter().enumerate() {
                if px == c.as_slice() {
                    seen[i] = true;
                }
            }
        }
        assert!(seen.iter().all(|s| *s), "expected all three axis colors");
    }
}
