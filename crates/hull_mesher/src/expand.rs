//! Quad expansion to vertex arrays.
//!
//! Converts merged quads into world-space vertices and triangle indices
//! suitable for GPU upload. Each quad gets four vertices of its own so
//! normals stay flat per face.

use glam::Vec3;

use crate::core::{Axis, OptimizedMesh, Quad, Vertex};

/// Sign of `cross(u_axis, v_axis)` along the slice axis.
///
/// Y×Z = +X, X×Z = -Y, X×Y = +Z.
#[inline]
const fn plane_handedness(axis: Axis) -> i32 {
    match axis {
        Axis::X | Axis::Z => 1,
        Axis::Y => -1,
    }
}

#[inline]
fn unit(axis: Axis) -> Vec3 {
    match axis {
        Axis::X => Vec3::X,
        Axis::Y => Vec3::Y,
        Axis::Z => Vec3::Z,
    }
}

/// World-space corners of a quad, ordered counter-clockwise as seen from
/// outside (along the face normal).
pub fn quad_corners(quad: &Quad, origin: Vec3, cell_size: f32) -> [[f32; 3]; 4] {
    let axis = quad.face.axis();
    let (u_axis, v_axis) = axis.plane();

    // Positive faces sit on the far side of their cell.
    let depth = quad.slice + u32::from(quad.face.is_positive());
    let mut cell = [0u32; 3];
    cell[axis.index()] = depth;
    cell[u_axis.index()] = quad.u;
    cell[v_axis.index()] = quad.v;

    let base = origin
        + Vec3::new(cell[0] as f32, cell[1] as f32, cell[2] as f32) * cell_size;
    let du = unit(u_axis) * (quad.width as f32 * cell_size);
    let dv = unit(v_axis) * (quad.height as f32 * cell_size);

    let c0 = base;
    let c1 = base + du;
    let c2 = base + du + dv;
    let c3 = base + dv;

    if quad.face.direction() * plane_handedness(axis) > 0 {
        [c0.to_array(), c1.to_array(), c2.to_array(), c3.to_array()]
    } else {
        [c0.to_array(), c3.to_array(), c2.to_array(), c1.to_array()]
    }
}

/// Emit a single quad as 4 vertices and 6 indices.
pub fn emit_quad(quad: &Quad, origin: Vec3, cell_size: f32, output: &mut OptimizedMesh) {
    let base_vertex = output.vertices.len() as u32;
    let normal = quad.face.normal();
    let color = quad.descriptor.color;

    for position in quad_corners(quad, origin, cell_size) {
        output.vertices.push(Vertex {
            position,
            normal,
            color,
        });
    }

    output.indices.extend_from_slice(&[
        base_vertex,
        base_vertex + 1,
        base_vertex + 2,
        base_vertex,
        base_vertex + 2,
        base_vertex + 3,
    ]);
}

/// Expand quads into `output`, in order.
pub fn expand_quads(quads: &[Quad], origin: Vec3, cell_size: f32, output: &mut OptimizedMesh) {
    output.vertices.reserve(quads.len() * 4);
    output.indices.reserve(quads.len() * 6);
    for quad in quads {
        emit_quad(quad, origin, cell_size, output);
    }
    output.sync_counts();
}
