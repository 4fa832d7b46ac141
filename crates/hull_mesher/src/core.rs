//! Core type definitions for the hull mesher.

use bytemuck::{Pod, Zeroable};

/// Compact material identifier.
///
/// Material names are interned into these per meshing call by
/// [`MaterialPalette`](crate::material::MaterialPalette), so the hot loops
/// compare integers instead of strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// Merge key for an exposed face.
///
/// Two faces may be merged into one quad iff their descriptors are equal:
/// same material and the exact same packed color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FaceDescriptor {
    pub material: MaterialId,
    /// Packed 0xRRGGBBAA color.
    pub color: u32,
}

impl FaceDescriptor {
    pub const fn new(material: MaterialId, color: u32) -> Self {
        Self { material, color }
    }
}

/// World axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The two in-plane axes `(u, v)` of a slice perpendicular to `self`.
    ///
    /// - X slices: width along Y, height along Z
    /// - Y slices: width along X, height along Z
    /// - Z slices: width along X, height along Y
    #[inline]
    pub const fn plane(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }

    /// Build grid coordinates from a slice depth and in-plane `(u, v)`.
    #[inline]
    pub const fn compose(self, d: usize, u: usize, v: usize) -> [usize; 3] {
        match self {
            Axis::X => [d, u, v],
            Axis::Y => [u, d, v],
            Axis::Z => [u, v, d],
        }
    }
}

/// One of the six face directions of a cube.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

/// Normal vectors for each face direction, indexed by [`Face::index`].
pub const FACE_NORMALS: [[f32; 3]; 6] = [
    [1.0, 0.0, 0.0],   // +X
    [-1.0, 0.0, 0.0],  // -X
    [0.0, 1.0, 0.0],   // +Y
    [0.0, -1.0, 0.0],  // -Y
    [0.0, 0.0, 1.0],   // +Z
    [0.0, 0.0, -1.0],  // -Z
];

impl Face {
    /// All faces in pass order.
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Face::PosX => 0,
            Face::NegX => 1,
            Face::PosY => 2,
            Face::NegY => 3,
            Face::PosZ => 4,
            Face::NegZ => 5,
        }
    }

    #[inline]
    pub const fn axis(self) -> Axis {
        match self {
            Face::PosX | Face::NegX => Axis::X,
            Face::PosY | Face::NegY => Axis::Y,
            Face::PosZ | Face::NegZ => Axis::Z,
        }
    }

    #[inline]
    pub const fn is_positive(self) -> bool {
        matches!(self, Face::PosX | Face::PosY | Face::PosZ)
    }

    /// +1 or -1 along [`Face::axis`].
    #[inline]
    pub const fn direction(self) -> i32 {
        if self.is_positive() { 1 } else { -1 }
    }

    #[inline]
    pub const fn normal(self) -> [f32; 3] {
        FACE_NORMALS[self.index()]
    }
}

/// A merged rectangle of exposed faces within one slice.
///
/// `u`/`v` and `width`/`height` are measured in cells along the slice's
/// in-plane axes (see [`Axis::plane`]); `slice` is the cell depth along
/// the face axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quad {
    pub face: Face,
    pub slice: u32,
    pub u: u32,
    pub v: u32,
    pub width: u32,
    pub height: u32,
    pub descriptor: FaceDescriptor,
}

impl Quad {
    /// Number of unit faces covered.
    #[inline]
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Grid cells whose faces this quad covers.
    pub fn cells(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        let axis = self.face.axis();
        let d = self.slice as usize;
        let (u0, v0) = (self.u as usize, self.v as usize);
        (0..self.height as usize).flat_map(move |dv| {
            (0..self.width as usize).map(move |du| axis.compose(d, u0 + du, v0 + dv))
        })
    }
}

/// A mesh vertex, laid out for direct upload as a vertex buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// Packed 0xRRGGBBAA color of the source material.
    pub color: u32,
}

/// Output mesh: a triangle list with flat per-quad normals.
///
/// Every quad owns its four vertices; indices never reference a vertex of
/// another quad.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OptimizedMesh {
    pub vertices: Vec<Vertex>,
    /// Triangle indices (6 per quad).
    pub indices: Vec<u32>,
    pub vertex_count: usize,
    pub index_count: usize,
    /// Number of blocks that contributed to the grid.
    pub source_block_count: usize,
}

impl OptimizedMesh {
    /// Pre-allocate capacity for an estimated quad count.
    pub fn with_capacity(estimated_quads: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(estimated_quads * 4),
            indices: Vec::with_capacity(estimated_quads * 6),
            ..Self::default()
        }
    }

    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Refresh the provenance counters from the buffers.
    pub(crate) fn sync_counts(&mut self) {
        self.vertex_count = self.vertices.len();
        self.index_count = self.indices.len();
    }

    /// Vertex buffer as raw bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
