//! Greedy hull meshing for block-built structures.
//!
//! Turns a snapshot of axis-aligned cube blocks into a compact triangle
//! mesh: hidden faces between touching blocks are culled, and coplanar
//! exposed faces sharing material and color are merged into maximal
//! rectangles.
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use hull_mesher::{mesh_blocks_with_stats, MesherConfig, VoxelBlock};
//!
//! // A 4x1x1 bar of unit blocks.
//! let blocks: Vec<VoxelBlock> = (0..4)
//!     .map(|x| VoxelBlock::unit(Vec3::new(x as f32, 0.0, 0.0), "Titanium"))
//!     .collect();
//!
//! let (mesh, stats) = mesh_blocks_with_stats(&blocks, &MesherConfig::default());
//! assert_eq!(stats.exposed_faces, 18);
//! assert_eq!(mesh.quad_count(), 6);
//! ```

pub mod block;
pub mod config;
pub mod core;
pub mod cull;
pub mod error;
pub mod expand;
pub mod grid;
pub mod material;
pub mod merge;
pub mod mesh;
pub mod naive;
pub mod structure;

// Re-export primary types
pub use crate::block::{partition_blocks, BlockShape, VoxelBlock};
pub use crate::config::{MesherConfig, MeshingMode, DEFAULT_MAX_GRID_DIM};
pub use crate::core::{
    Axis, Face, FaceDescriptor, MaterialId, OptimizedMesh, Quad, Vertex, FACE_NORMALS,
};
pub use crate::error::{ConfigError, GridError};
pub use crate::grid::{build_grid, GridBuild, VoxelGrid};
pub use crate::material::{MaterialPalette, MaterialTier};
pub use crate::structure::{BlockId, BlockStructure};

// Re-export main entry points
pub use crate::mesh::{mesh_blocks, mesh_blocks_with_stats, mesh_grid, MeshStats};
pub use crate::naive::mesh_naive;
