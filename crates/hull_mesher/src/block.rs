//! Voxel block records consumed by the mesher.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::material::default_color;

/// Geometric shape of a block. Only [`BlockShape::Cube`] is meshed here;
/// the other shapes are rendered by a separate path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockShape {
    #[default]
    Cube,
    Wedge,
    Corner,
    InnerCorner,
    Tetrahedron,
    HalfBlock,
}

/// A rectangular structural block.
///
/// The mesher only ever reads blocks; callers hand it a snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoxelBlock {
    /// World-space center.
    pub position: Vec3,
    /// Extent along each axis.
    pub size: Vec3,
    pub material_id: String,
    /// Packed 0xRRGGBBAA color.
    pub color: u32,
    pub shape: BlockShape,
    pub is_active: bool,
}

impl VoxelBlock {
    /// Active cube block colored from the material catalogue.
    pub fn new(position: Vec3, size: Vec3, material: impl Into<String>) -> Self {
        let material_id = material.into();
        let color = default_color(&material_id);
        Self {
            position,
            size,
            material_id,
            color,
            shape: BlockShape::Cube,
            is_active: true,
        }
    }

    /// Unit cube centered at `position`.
    pub fn unit(position: Vec3, material: impl Into<String>) -> Self {
        Self::new(position, Vec3::ONE, material)
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    pub fn with_shape(mut self, shape: BlockShape) -> Self {
        self.shape = shape;
        self
    }

    /// Mark the block destroyed; it stops contributing geometry.
    pub fn destroyed(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Whether the greedy engine is responsible for this block.
    #[inline]
    pub fn is_meshable(&self) -> bool {
        self.is_active && self.shape == BlockShape::Cube
    }

    /// Non-positive or non-finite geometry.
    pub fn is_degenerate(&self) -> bool {
        !self.position.is_finite()
            || !self.size.is_finite()
            || self.size.min_element() <= 0.0
    }

    #[inline]
    pub fn min_corner(&self) -> Vec3 {
        self.position - self.size * 0.5
    }

    #[inline]
    pub fn max_corner(&self) -> Vec3 {
        self.position + self.size * 0.5
    }

    /// Whether the two blocks' volumes overlap (touching faces do not count).
    pub fn intersects(&self, other: &VoxelBlock) -> bool {
        let (a0, a1) = (self.min_corner(), self.max_corner());
        let (b0, b1) = (other.min_corner(), other.max_corner());
        a0.cmplt(b1).all() && a1.cmpgt(b0).all()
    }
}

/// Split blocks into the ones this engine meshes and the active non-cube
/// blocks the caller must render separately. Inactive blocks are dropped.
pub fn partition_blocks<'a, I>(blocks: I) -> (Vec<&'a VoxelBlock>, Vec<&'a VoxelBlock>)
where
    I: IntoIterator<Item = &'a VoxelBlock>,
{
    let mut cubes = Vec::new();
    let mut others = Vec::new();
    for block in blocks {
        if !block.is_active {
            continue;
        }
        if block.shape == BlockShape::Cube {
            cubes.push(block);
        } else {
            others.push(block);
        }
    }
    (cubes, others)
}
