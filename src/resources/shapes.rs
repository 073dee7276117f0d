//! Built-in procedural shapes.
//!
//! All shapes are centred on the origin (the teapot stands on it), wound
//! counter-clockwise when seen from outside, and use the interleaved
//! position/normal/uv layout of [`ModelVertex`]. Round shapes are lat-long
//! grids; see [`grid_indices`].

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::data_structures::model::{MeshData, ModelVertex};

/// Triangulates a grid of `outer × inner` vertices laid out row by row.
///
/// Stepping `inner` then `outer` must turn counter-clockwise around the
/// outward normal for the triangles to face outwards.
pub fn grid_indices(outer: u32, inner: u32) -> Vec<u32> {
    let mut indices = Vec::with_capacity(((outer - 1) * (inner - 1) * 6) as usize);
    for o in 0..outer - 1 {
        for i in 0..inner - 1 {
            let a = o * inner + i;
            let b = a + inner;
            indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }
    indices
}

/// Axis-aligned cube spanning `-half..=half`, with per-face normals.
pub fn cube(half: f32) -> MeshData {
    // (normal, tangent u, tangent v) per face; corners are normal ± u ± v.
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let base = vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = [
                half * (normal[0] + su * u[0] + sv * v[0]),
                half * (normal[1] + su * u[1] + sv * v[1]),
                half * (normal[2] + su * u[2] + sv * v[2]),
            ];
            let tex_coords = [(su + 1.0) / 2.0, (1.0 - sv) / 2.0];
            vertices.push(ModelVertex::new(position, normal, tex_coords));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    MeshData::indexed(vertices, indices)
}

/// UV sphere around the y axis.
pub fn sphere(radius: f32, rings: u32, sectors: u32) -> MeshData {
    let mut vertices = Vec::with_capacity(((rings + 1) * (sectors + 1)) as usize);
    for r in 0..=rings {
        let theta = PI * r as f32 / rings as f32;
        for s in 0..=sectors {
            let phi = TAU * s as f32 / sectors as f32;
            let normal = [theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin()];
            let position = normal.map(|c| c * radius);
            let tex_coords = [s as f32 / sectors as f32, r as f32 / rings as f32];
            vertices.push(ModelVertex::new(position, normal, tex_coords));
        }
    }
    MeshData::indexed(vertices, grid_indices(rings + 1, sectors + 1))
}

/// Torus lying in the xz plane, `major` from the y axis to the tube centre.
pub fn torus(major: f32, minor: f32, rings: u32, sides: u32) -> MeshData {
    let mut vertices = Vec::with_capacity(((rings + 1) * (sides + 1)) as usize);
    for i in 0..=rings {
        let u = TAU * i as f32 / rings as f32;
        for j in 0..=sides {
            let v = TAU * j as f32 / sides as f32;
            let normal = [v.cos() * u.cos(), v.sin(), v.cos() * u.sin()];
            let ring = major + minor * v.cos();
            let position = [ring * u.cos(), minor * v.sin(), ring * u.sin()];
            let tex_coords = [i as f32 / rings as f32, j as f32 / sides as f32];
            vertices.push(ModelVertex::new(position, normal, tex_coords));
        }
    }
    MeshData::indexed(vertices, grid_indices(rings + 1, sides + 1))
}

/// Closed cylinder along the y axis spanning `-half_height..=half_height`.
pub fn cylinder(radius: f32, half_height: f32, segments: u32) -> MeshData {
    let mut vertices = Vec::new();
    for i in 0..=segments {
        let phi = TAU * i as f32 / segments as f32;
        let normal = [phi.cos(), 0.0, phi.sin()];
        let u = i as f32 / segments as f32;
        for (y, v) in [(-half_height, 1.0), (half_height, 0.0)] {
            let position = [radius * normal[0], y, radius * normal[2]];
            vertices.push(ModelVertex::new(position, normal, [u, v]));
        }
    }
    let mut indices = grid_indices(segments + 1, 2);

    for (y, ny) in [(half_height, 1.0), (-half_height, -1.0)] {
        let normal = [0.0, ny, 0.0];
        let center = vertices.len() as u32;
        vertices.push(ModelVertex::new([0.0, y, 0.0], normal, [0.5, 0.5]));
        for i in 0..=segments {
            let phi = TAU * i as f32 / segments as f32;
            let (s, c) = phi.sin_cos();
            vertices.push(ModelVertex::new(
                [radius * c, y, radius * s],
                normal,
                [0.5 + 0.5 * c, 0.5 + 0.5 * s],
            ));
        }
        for i in 0..segments {
            let current = center + 1 + i;
            let next = current + 1;
            if ny > 0.0 {
                indices.extend_from_slice(&[center, next, current]);
            } else {
                indices.extend_from_slice(&[center, current, next]);
            }
        }
    }
    MeshData::indexed(vertices, indices)
}

/// Capsule along the y axis: a cylinder of `2 * half_body` capped by two
/// hemispheres of `radius`.
pub fn capsule(radius: f32, half_body: f32, rings: u32, sectors: u32) -> MeshData {
    // Top hemisphere rows, then bottom hemisphere rows. The two equator rows
    // are duplicated with different heights, the quads between them are the body.
    let rows: Vec<(f32, f32)> = (0..=rings)
        .map(|r| (FRAC_PI_2 * r as f32 / rings as f32, half_body))
        .chain((0..=rings).map(|r| (FRAC_PI_2 + FRAC_PI_2 * r as f32 / rings as f32, -half_body)))
        .collect();
    let last_row = (rows.len() - 1) as f32;

    let mut vertices = Vec::with_capacity(rows.len() * (sectors + 1) as usize);
    for (row, (theta, offset)) in rows.iter().enumerate() {
        for s in 0..=sectors {
            let phi = TAU * s as f32 / sectors as f32;
            let normal = [theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin()];
            let position = [radius * normal[0], radius * normal[1] + offset, radius * normal[2]];
            let tex_coords = [s as f32 / sectors as f32, row as f32 / last_row];
            vertices.push(ModelVertex::new(position, normal, tex_coords));
        }
    }
    MeshData::indexed(vertices, grid_indices(rows.len() as u32, sectors + 1))
}

/// Cubic Bézier control points in a plane, `[horizontal, height]`.
type Curve = [[f32; 2]; 4];

/// Newell's teapot outline, lid knob down to the centre of the bottom, as
/// `[radius, height]`. Revolved about the y axis.
const TEAPOT_PROFILE: [Curve; 6] = [
    [[0.0, 3.15], [0.8, 3.15], [0.0, 2.85], [0.2, 2.7]],
    [[0.2, 2.7], [0.4, 2.55], [1.3, 2.55], [1.3, 2.4]],
    [[1.4, 2.4], [1.3375, 2.53125], [1.4375, 2.53125], [1.5, 2.4]],
    [[1.5, 2.4], [1.75, 1.875], [2.0, 1.35], [2.0, 0.9]],
    [[2.0, 0.9], [2.0, 0.45], [1.5, 0.225], [1.5, 0.15]],
    [[1.5, 0.15], [1.5, 0.075], [1.425, 0.0], [0.0, 0.0]],
];

/// Centre line of the handle in the xy plane, body to body.
const TEAPOT_HANDLE: [Curve; 2] = [
    [[-1.55, 2.1375], [-2.4, 2.1375], [-2.85, 2.1375], [-2.85, 1.8]],
    [[-2.85, 1.8], [-2.85, 1.4625], [-2.575, 0.95625], [-1.95, 0.6]],
];

/// Centre line of the spout in the xy plane, body to tip.
const TEAPOT_SPOUT: [Curve; 1] = [[[1.7, 0.8625], [2.85, 0.975], [2.35, 1.9125], [3.0, 2.25]]];

/// Point and derivative of a cubic Bézier at `t`.
fn bezier(curve: &Curve, t: f32) -> ([f32; 2], [f32; 2]) {
    let s = 1.0 - t;
    let weights = [s * s * s, 3.0 * s * s * t, 3.0 * s * t * t, t * t * t];
    let slopes = [
        -3.0 * s * s,
        3.0 * s * s - 6.0 * s * t,
        6.0 * s * t - 3.0 * t * t,
        3.0 * t * t,
    ];
    let mut point = [0.0; 2];
    let mut tangent = [0.0; 2];
    for (i, control) in curve.iter().enumerate() {
        for k in 0..2 {
            point[k] += weights[i] * control[k];
            tangent[k] += slopes[i] * control[k];
        }
    }
    (point, tangent)
}

/// Samples every curve with `steps` segments. Rows at curve joints are
/// repeated so creases keep their own normals. Yields `(point, tangent, t)`
/// with `t` running from 0 to 1 over the whole chain.
fn sample_chain(curves: &[Curve], steps: u32) -> Vec<([f32; 2], [f32; 2], f32)> {
    let total = (curves.len() as u32 * steps) as f32;
    let mut samples = Vec::with_capacity(curves.len() * (steps + 1) as usize);
    for (c, curve) in curves.iter().enumerate() {
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let (point, tangent) = bezier(curve, t);
            samples.push((point, tangent, (c as u32 * steps + i) as f32 / total));
        }
    }
    samples
}

fn append_grid(mesh: &mut MeshData, vertices: Vec<ModelVertex>, outer: u32, inner: u32) {
    let base = mesh.vertices.len() as u32;
    mesh.vertices.extend(vertices);
    if let Some(indices) = mesh.indices.as_mut() {
        indices.extend(grid_indices(outer, inner).into_iter().map(|i| base + i));
    }
}

/// Tube of elliptical section around a centre line in the xy plane.
/// `half_axes(t)` gives the in-plane and the z half-width along the chain.
fn sweep(
    mesh: &mut MeshData,
    curves: &[Curve],
    half_axes: impl Fn(f32) -> (f32, f32),
    scale: f32,
    steps: u32,
    sides: u32,
) {
    let samples = sample_chain(curves, steps);
    let mut vertices = Vec::with_capacity(samples.len() * (sides + 1) as usize);
    for (point, tangent, t) in &samples {
        let length = tangent[0].hypot(tangent[1]).max(f32::EPSILON);
        // in-plane side of the centre line; z completes the frame
        let side = [-tangent[1] / length, tangent[0] / length];
        let (a, b) = half_axes(*t);
        for j in 0..=sides {
            let psi = TAU * j as f32 / sides as f32;
            let (sin, cos) = psi.sin_cos();
            let position = [
                (point[0] + a * cos * side[0]) * scale,
                (point[1] + a * cos * side[1]) * scale,
                b * sin * scale,
            ];
            let (nx, ny, nz) = (cos / a * side[0], cos / a * side[1], sin / b);
            let norm = (nx * nx + ny * ny + nz * nz).sqrt();
            let normal = [nx / norm, ny / norm, nz / norm];
            vertices.push(ModelVertex::new(position, normal, [j as f32 / sides as f32, *t]));
        }
    }
    append_grid(mesh, vertices, samples.len() as u32, sides + 1);
}

/// The Utah teapot, spout towards +x and standing on y = 0. At `scale` 1 it
/// is 3.15 high; `steps` segments per outline curve, `sectors` around.
pub fn teapot(scale: f32, steps: u32, sectors: u32) -> MeshData {
    let mut mesh = MeshData::indexed(Vec::new(), Vec::new());

    let samples = sample_chain(&TEAPOT_PROFILE, steps);
    let mut vertices = Vec::with_capacity(samples.len() * (sectors + 1) as usize);
    for (row, (point, tangent, _)) in samples.iter().enumerate() {
        // outward for an outline walked from the top down
        let length = tangent[0].hypot(tangent[1]);
        let profile_normal = if length > f32::EPSILON {
            [-tangent[1] / length, tangent[0] / length]
        } else {
            [0.0, 1.0]
        };
        for s in 0..=sectors {
            let phi = TAU * s as f32 / sectors as f32;
            let (sin, cos) = phi.sin_cos();
            let position = [point[0] * cos * scale, point[1] * scale, point[0] * sin * scale];
            let normal = [profile_normal[0] * cos, profile_normal[1], profile_normal[0] * sin];
            let tex_coords = [s as f32 / sectors as f32, row as f32 / (samples.len() - 1) as f32];
            vertices.push(ModelVertex::new(position, normal, tex_coords));
        }
    }
    append_grid(&mut mesh, vertices, samples.len() as u32, sectors + 1);

    sweep(&mut mesh, &TEAPOT_HANDLE, |_| (0.12, 0.3), scale, steps, sectors / 2);
    sweep(
        &mut mesh,
        &TEAPOT_SPOUT,
        |t| (0.4125 - 0.1125 * t, 0.66 - 0.41 * t),
        scale,
        steps * 2,
        sectors / 2,
    );
    mesh
}

/// Square pane in the xz plane facing +y, four vertices for a triangle strip.
pub fn glass_quad(half: f32) -> MeshData {
    let up = [0.0, 1.0, 0.0];
    MeshData::arrays(vec![
        ModelVertex::new([-half, 0.0, -half], up, [0.0, 1.0]),
        ModelVertex::new([-half, 0.0, half], up, [0.0, 0.0]),
        ModelVertex::new([half, 0.0, -half], up, [1.0, 1.0]),
        ModelVertex::new([half, 0.0, half], up, [1.0, 0.0]),
    ])
}
