//! # Primitive Shape Generation
//!
//! One generator per [`ShapeKind`](super::ShapeKind). Every generator emits a
//! flat triangle list (no index buffer) centered near the origin. Tints are
//! debug colors only and carry no transform or material meaning.

use super::{MeshData, TessellationLevel};
use crate::foundation::math::{constants::PI, constants::TAU, Vec3, Vec4};

const SPHERE_BASE_DIVISIONS: u32 = 6;
const ROUND_BASE_DIVISIONS: u32 = 8;
const RADIUS: f32 = 0.5;
const HALF_HEIGHT: f32 = 0.5;
const HALF_EXTENT: f32 = 0.5;

fn rgb(r: f32, g: f32, b: f32) -> Vec4 {
    Vec4::new(r, g, b, 1.0)
}

/// Point on the unit sphere at polar angle `phi` and azimuth `theta`
fn sphere_point(phi: f32, theta: f32) -> Vec3 {
    Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin())
}

/// Point on a ring of radius 0.5 at height `y`
fn ring_point(theta: f32, y: f32) -> Vec3 {
    Vec3::new(RADIUS * theta.cos(), y, RADIUS * theta.sin())
}

/// Angles bounding wedge `i` of a circle cut into `slices` wedges
fn wedge(i: u32, slices: u32) -> (f32, f32) {
    let step = TAU / slices as f32;
    (step * i as f32, step * (i + 1) as f32)
}

/// Generate a unit UV sphere
///
/// Uses `6 * 2^level` stacks and slices. Quads touching the poles collapse
/// into degenerate fans; pole vertices are not shared.
pub fn generate_sphere(level: TessellationLevel) -> MeshData {
    let stacks = level.divisions(SPHERE_BASE_DIVISIONS);
    let slices = stacks;
    let mut data = MeshData::with_capacity((stacks * slices * 6) as usize);

    let (red, green, blue, yellow) = (rgb(1.0, 0.0, 0.0), rgb(0.0, 1.0, 0.0), rgb(0.0, 0.0, 1.0), rgb(1.0, 1.0, 0.0));

    for i in 0..stacks {
        let phi1 = PI * i as f32 / stacks as f32;
        let phi2 = PI * (i + 1) as f32 / stacks as f32;

        for j in 0..slices {
            let (theta1, theta2) = wedge(j, slices);

            let p1 = sphere_point(phi1, theta1);
            let p2 = sphere_point(phi2, theta1);
            let p3 = sphere_point(phi2, theta2);
            let p4 = sphere_point(phi1, theta2);

            data.push_triangle([p1, p2, p3], [red, green, blue]);
            data.push_triangle([p1, p3, p4], [red, blue, yellow]);
        }
    }

    data
}

/// Generate a capped cylinder of radius 0.5 and height 1 along Y
///
/// Side quads come first, then one bottom and one top cap triangle per
/// slice, each fanning from its cap center.
pub fn generate_cylinder(level: TessellationLevel) -> MeshData {
    let slices = level.divisions(ROUND_BASE_DIVISIONS);
    let mut data = MeshData::with_capacity((slices * 12) as usize);

    let (red, green, blue, yellow) = (rgb(1.0, 0.0, 0.0), rgb(0.0, 1.0, 0.0), rgb(0.0, 0.0, 1.0), rgb(1.0, 1.0, 0.0));
    let (magenta, cyan, white) = (rgb(1.0, 0.0, 1.0), rgb(0.0, 1.0, 1.0), rgb(1.0, 1.0, 1.0));

    for i in 0..slices {
        let (theta1, theta2) = wedge(i, slices);
        let p1 = ring_point(theta1, -HALF_HEIGHT);
        let p2 = ring_point(theta2, -HALF_HEIGHT);
        let p3 = ring_point(theta2, HALF_HEIGHT);
        let p4 = ring_point(theta1, HALF_HEIGHT);

        data.push_triangle([p1, p2, p3], [red, green, blue]);
        data.push_triangle([p1, p3, p4], [red, blue, yellow]);
    }

    let center_bottom = Vec3::new(0.0, -HALF_HEIGHT, 0.0);
    let center_top = Vec3::new(0.0, HALF_HEIGHT, 0.0);
    for i in 0..slices {
        let (theta1, theta2) = wedge(i, slices);

        let b1 = ring_point(theta1, -HALF_HEIGHT);
        let b2 = ring_point(theta2, -HALF_HEIGHT);
        data.push_triangle([center_bottom, b1, b2], [magenta, cyan, white]);

        let t1 = ring_point(theta1, HALF_HEIGHT);
        let t2 = ring_point(theta2, HALF_HEIGHT);
        data.push_triangle([center_top, t2, t1], [magenta, cyan, white]);
    }

    data
}

/// Generate a unit cube of half-extent 0.5
///
/// Always 6 faces of 2 triangles; there is no level parameter because the
/// box does not subdivide.
pub fn generate_box() -> MeshData {
    let h = HALF_EXTENT;
    let corners = [
        Vec3::new(-h, -h, -h),
        Vec3::new(h, -h, -h),
        Vec3::new(h, h, -h),
        Vec3::new(-h, h, -h),
        Vec3::new(-h, -h, h),
        Vec3::new(h, -h, h),
        Vec3::new(h, h, h),
        Vec3::new(-h, h, h),
    ];
    // back, front, bottom, top, left, right
    let faces: [[usize; 4]; 6] = [
        [0, 1, 2, 3],
        [4, 7, 6, 5],
        [0, 4, 5, 1],
        [2, 6, 7, 3],
        [0, 3, 7, 4],
        [1, 5, 6, 2],
    ];
    let face_tints = [
        rgb(1.0, 0.0, 0.0),
        rgb(0.0, 1.0, 0.0),
        rgb(0.0, 0.0, 1.0),
        rgb(1.0, 1.0, 0.0),
        rgb(0.0, 1.0, 1.0),
        rgb(1.0, 0.0, 1.0),
    ];

    let mut data = MeshData::with_capacity(36);
    for (quad, tint) in faces.into_iter().zip(face_tints) {
        let [a, b, c, d] = quad.map(|i| corners[i]);
        data.push_triangle([a, b, c], [tint; 3]);
        data.push_triangle([a, c, d], [tint; 3]);
    }

    data
}

/// Generate a capped cone of radius 0.5 and height 1 along Y
///
/// The apex sits at `y = 0.5`, the base at `y = -0.5`. Each slice emits a
/// side triangle from the apex and a base triangle from the base center
/// with reversed winding.
pub fn generate_cone(level: TessellationLevel) -> MeshData {
    let slices = level.divisions(ROUND_BASE_DIVISIONS);
    let mut data = MeshData::with_capacity((slices * 6) as usize);

    let apex = Vec3::new(0.0, HALF_HEIGHT, 0.0);
    let center = Vec3::new(0.0, -HALF_HEIGHT, 0.0);

    for i in 0..slices {
        let (theta1, theta2) = wedge(i, slices);
        let b1 = ring_point(theta1, -HALF_HEIGHT);
        let b2 = ring_point(theta2, -HALF_HEIGHT);

        data.push_triangle([apex, b1, b2], [rgb(1.0, 0.0, 0.0), rgb(0.0, 1.0, 0.0), rgb(0.0, 0.0, 1.0)]);
        data.push_triangle([center, b2, b1], [rgb(1.0, 1.0, 0.0), rgb(0.0, 1.0, 1.0), rgb(1.0, 0.0, 1.0)]);
    }

    data
}
