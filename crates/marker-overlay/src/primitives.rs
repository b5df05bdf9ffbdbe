//! Solid primitives drawn in a marker's local frame.
//!
//! Every function here is a stateless, pure function of the target surface
//! and a size: geometry occupies roughly `[-size/2, size/2]` along each
//! axis of a right-handed frame centered at the origin, with `+z` pointing
//! away from the marker plane. The solid shapes use a two-pass protocol
//! (filled first, then a contrasting wireframe overlay) and always leave
//! the surface's polygon mode back at [`PolygonMode::Fill`].
//!
//! Vertex and face tables are immutable statics; nothing is allocated per
//! draw call, and repeated calls with the same size emit identical
//! sequences.

use crate::surface::{DrawMode, PolygonMode, RenderSurface};

/// Angular resolution of the cylinder caps and wall.
pub const CYLINDER_SLICES: usize = 20;

const RED: [f32; 3] = [1.0, 0.0, 0.0];
const GREEN: [f32; 3] = [0.0, 1.0, 0.0];
const BLUE: [f32; 3] = [0.0, 0.0, 1.0];
const BLACK: [f32; 3] = [0.0, 0.0, 0.0];

/// Three unit segments from the origin: X red, Y green, Z blue.
///
/// An orientation aid; handy when checking a new estimator's pose
/// conventions against a physical marker.
pub fn draw_axis<S: RenderSurface + ?Sized>(surface: &mut S, size: f32) {
    let axes: [([f32; 3], [f32; 3]); 3] = [
        (RED, [size, 0.0, 0.0]),
        (GREEN, [0.0, size, 0.0]),
        (BLUE, [0.0, 0.0, size]),
    ];
    for (color, tip) in axes {
        surface.set_color(color);
        surface.begin(DrawMode::Lines);
        surface.vertex([0.0, 0.0, 0.0]);
        surface.vertex(tip);
        surface.end();
    }
}

const PYRAMID_NORMALS: [[f32; 3]; 4] = [
    [0.0, 1.0, 1.0],
    [0.0, 1.0, -1.0],
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
];

const PYRAMID_FACES: [[usize; 3]; 4] = [[0, 1, 2], [0, 2, 3], [0, 3, 4], [0, 4, 1]];

fn pyramid_vertices(size: f32) -> [[f32; 3]; 5] {
    let h = size / 2.0;
    [
        [0.0, 0.0, h], // apex
        [-h, -h, -h],
        [h, -h, -h],
        [h, h, -h],
        [-h, h, -h],
    ]
}

fn emit_pyramid_faces<S: RenderSurface + ?Sized>(surface: &mut S, v: &[[f32; 3]; 5]) {
    for (face, normal) in PYRAMID_FACES.iter().zip(PYRAMID_NORMALS.iter()) {
        surface.begin(DrawMode::Triangles);
        surface.normal(*normal);
        for &i in face {
            surface.vertex(v[i]);
        }
        surface.end();
    }
}

/// Four-sided solid with its apex at `(0, 0, size/2)` and a square base in
/// the `z = -size/2` plane. Filled red, then outlined black.
pub fn draw_pyramid<S: RenderSurface + ?Sized>(surface: &mut S, size: f32) {
    let v = pyramid_vertices(size);

    surface.set_polygon_mode(PolygonMode::Fill);
    surface.set_color(RED);
    emit_pyramid_faces(surface, &v);

    surface.set_polygon_mode(PolygonMode::Line);
    surface.set_color(BLACK);
    emit_pyramid_faces(surface, &v);

    surface.set_polygon_mode(PolygonMode::Fill);
}

// The face in the z = -size/2 plane is intentionally absent: that side sits
// on the marker, which already occupies the plane.
const CUBE_FACES: [[usize; 4]; 5] = [
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [2, 3, 7, 6],
    [1, 2, 6, 5],
    [4, 7, 3, 0],
];

fn cube_vertices(size: f32) -> [[f32; 3]; 8] {
    let h = size / 2.0;
    [
        [-h, -h, -h],
        [h, -h, -h],
        [h, h, -h],
        [-h, h, -h],
        [-h, -h, h],
        [h, -h, h],
        [h, h, h],
        [-h, h, h],
    ]
}

fn emit_cube_faces<S: RenderSurface + ?Sized>(surface: &mut S, v: &[[f32; 3]; 8]) {
    surface.begin(DrawMode::Quads);
    for face in CUBE_FACES.iter() {
        for &i in face {
            surface.vertex(v[i]);
        }
    }
    surface.end();
}

/// Open-bottomed box of edge `size`: five faces, filled blue then outlined
/// black.
pub fn draw_cube<S: RenderSurface + ?Sized>(surface: &mut S, size: f32) {
    let v = cube_vertices(size);

    surface.set_polygon_mode(PolygonMode::Fill);
    surface.set_color(BLUE);
    emit_cube_faces(surface, &v);

    surface.set_polygon_mode(PolygonMode::Line);
    surface.set_color(BLACK);
    emit_cube_faces(surface, &v);

    surface.set_polygon_mode(PolygonMode::Fill);
}

const BOX_NORMALS: [[f32; 3]; 6] = [
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
];

const BOX_FACES: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [3, 2, 6, 7],
    [7, 6, 5, 4],
    [4, 5, 1, 0],
    [5, 6, 2, 1],
    [7, 4, 0, 3],
];

fn box_vertices(size: f32) -> [[f32; 3]; 8] {
    let h = size / 2.0;
    [
        [-h, -h, -h],
        [-h, -h, h],
        [-h, h, h],
        [-h, h, -h],
        [h, -h, -h],
        [h, -h, h],
        [h, h, h],
        [h, h, -h],
    ]
}

/// All six faces of a box with per-face normals, emitted in the caller's
/// topology of choice.
pub fn draw_box<S: RenderSurface + ?Sized>(surface: &mut S, size: f32, mode: DrawMode) {
    let v = box_vertices(size);
    for i in (0..6).rev() {
        surface.begin(mode);
        surface.normal(BOX_NORMALS[i]);
        for &j in &BOX_FACES[i] {
            surface.vertex(v[j]);
        }
        surface.end();
    }
}

/// Wireframe box of edge `size`.
pub fn draw_wire_cube<S: RenderSurface + ?Sized>(surface: &mut S, size: f32) {
    draw_box(surface, size, DrawMode::LineLoop);
}

fn emit_cap<S: RenderSurface + ?Sized>(surface: &mut S, radius: f32, z: f32) {
    let step = 2.0 * std::f32::consts::PI / CYLINDER_SLICES as f32;
    surface.begin(DrawMode::Polygon);
    for i in 0..CYLINDER_SLICES {
        let angle = i as f32 * step;
        surface.vertex([radius * angle.cos(), radius * angle.sin(), z]);
    }
    surface.end();
}

/// Cylinder of radius `size/2` and height `size` around the Z axis.
///
/// Each cap is drawn twice, once black wireframe and once filled green, in
/// the historical order (bottom outline, bottom+top fill, wall, top
/// outline). That double-draw in two colors is intentional visual style,
/// not an overdraw bug.
pub fn draw_cylinder<S: RenderSurface + ?Sized>(surface: &mut S, size: f32) {
    let radius = size / 2.0;
    let half = size / 2.0;
    let step = 2.0 * std::f32::consts::PI / CYLINDER_SLICES as f32;

    surface.set_polygon_mode(PolygonMode::Line);
    surface.set_color(BLACK);
    emit_cap(surface, radius, -half);

    surface.set_polygon_mode(PolygonMode::Fill);
    surface.set_color(GREEN);
    emit_cap(surface, radius, -half);
    emit_cap(surface, radius, half);

    // ruled wall: consecutive slices share analytically generated angles,
    // so adjacent quads meet exactly
    surface.begin(DrawMode::QuadStrip);
    for i in 0..CYLINDER_SLICES {
        let a0 = i as f32 * step;
        let a1 = (i + 1) as f32 * step;
        let (x0, y0) = (radius * a0.cos(), radius * a0.sin());
        let (x1, y1) = (radius * a1.cos(), radius * a1.sin());
        surface.vertex([x0, y0, -half]);
        surface.vertex([x0, y0, half]);
        surface.vertex([x1, y1, -half]);
        surface.vertex([x1, y1, half]);
    }
    surface.end();

    surface.set_polygon_mode(PolygonMode::Line);
    surface.set_color(BLACK);
    emit_cap(surface, radius, half);

    surface.set_polygon_mode(PolygonMode::Fill);
}
