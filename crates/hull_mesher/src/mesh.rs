//! Main meshing pipeline.
//!
//! Orchestrates the complete meshing process:
//! 1. Grid building (snap blocks onto a dense lattice)
//! 2. Face culling and greedy merge, per direction and slice
//! 3. Quad expansion (convert quads to vertex arrays)
//!
//! If the grid would exceed its per-axis cap the pipeline degrades to the
//! sparse per-face mesher instead of allocating.

use crate::block::VoxelBlock;
use crate::config::{MesherConfig, MeshingMode};
use crate::core::{Face, OptimizedMesh, Quad};
use crate::error::GridError;
use crate::expand::expand_quads;
use crate::grid::{build_grid, GridBuild, VoxelGrid};
use crate::merge::greedy_merge_face;
use crate::naive::mesh_naive;

/// Statistics about a mesh result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshStats {
    /// Total number of quads generated
    pub quad_count: usize,
    /// Quads per face direction, indexed by [`Face::index`]
    pub quads_per_face: [usize; 6],
    /// Exposed unit faces (the quad count without merging)
    pub exposed_faces: usize,
    /// Merge efficiency (1.0 = perfect merging, 0.0 = no merging)
    pub merge_efficiency: f32,
    pub source_blocks: usize,
    /// Meshable blocks dropped as degenerate or unrepresentable
    pub skipped_blocks: usize,
    /// Cells claimed by more than one block
    pub overlapping_cells: usize,
    /// Whether the oversized-grid fallback produced this mesh
    pub used_fallback: bool,
    pub vertex_count: usize,
    pub triangle_count: usize,
}

/// Mesh a block snapshot into geometry.
///
/// This is the main entry point. Only active cube blocks contribute; the
/// call always returns a valid (possibly empty) mesh.
///
/// # Example
/// ```
/// use glam::Vec3;
/// use hull_mesher::{mesh_blocks, MesherConfig, VoxelBlock};
///
/// let blocks = vec![VoxelBlock::unit(Vec3::ZERO, "Iron")];
/// let mesh = mesh_blocks(&blocks, &MesherConfig::default());
/// assert_eq!(mesh.triangle_count(), 12); // Cube = 6 faces × 2 triangles
/// ```
pub fn mesh_blocks<'a, I>(blocks: I, config: &MesherConfig) -> OptimizedMesh
where
    I: IntoIterator<Item = &'a VoxelBlock>,
{
    mesh_blocks_with_stats(blocks, config).0
}

/// Mesh a block snapshot and return statistics along with the mesh.
pub fn mesh_blocks_with_stats<'a, I>(
    blocks: I,
    config: &MesherConfig,
) -> (OptimizedMesh, MeshStats)
where
    I: IntoIterator<Item = &'a VoxelBlock>,
{
    let blocks: Vec<&VoxelBlock> = blocks.into_iter().collect();

    // Early exit for empty input
    if blocks.is_empty() {
        return (OptimizedMesh::default(), MeshStats::default());
    }

    let config = config.sanitized();
    if config.mode == MeshingMode::Naive {
        return mesh_naive(blocks.iter().copied(), &config);
    }

    match build_grid(blocks.iter().copied(), &config) {
        Ok(build) => mesh_grid_build(&build),
        Err(GridError::Empty { skipped }) => {
            let stats = MeshStats {
                skipped_blocks: skipped,
                ..MeshStats::default()
            };
            (OptimizedMesh::default(), stats)
        }
        Err(err @ GridError::Oversized { .. }) => {
            log::warn!("{err}; meshing {} blocks without merging", blocks.len());
            let (mesh, mut stats) = mesh_naive(blocks.iter().copied(), &config);
            stats.used_fallback = true;
            (mesh, stats)
        }
    }
}

fn mesh_grid_build(build: &GridBuild) -> (OptimizedMesh, MeshStats) {
    let (mut mesh, mut stats) = mesh_grid(&build.grid);
    mesh.source_block_count = build.source_block_count;
    stats.source_blocks = build.source_block_count;
    stats.skipped_blocks = build.skipped_blocks;
    stats.overlapping_cells = build.overlapping_cells;
    (mesh, stats)
}

/// Greedy-mesh a prebuilt grid.
///
/// Runs the six passes in [`Face::ALL`] order. The returned mesh has
/// `source_block_count` 0; [`mesh_blocks`] fills it in.
pub fn mesh_grid(grid: &VoxelGrid) -> (OptimizedMesh, MeshStats) {
    let mut quads: Vec<Quad> = Vec::new();
    let mut quads_per_face = [0usize; 6];
    let mut exposed_faces = 0;

    for face in Face::ALL {
        let before = quads.len();
        exposed_faces += greedy_merge_face(grid, face, &mut quads);
        quads_per_face[face.index()] = quads.len() - before;
    }

    let mut mesh = OptimizedMesh::with_capacity(quads.len());
    expand_quads(&quads, grid.origin(), grid.cell_size(), &mut mesh);

    let quad_count = quads.len();
    let merge_efficiency = if exposed_faces > 0 {
        1.0 - (quad_count as f32 / exposed_faces as f32)
    } else {
        0.0
    };

    log::debug!(
        "greedy meshed {:?} grid: {} exposed faces -> {} quads",
        grid.dims(),
        exposed_faces,
        quad_count
    );

    let stats = MeshStats {
        quad_count,
        quads_per_face,
        exposed_faces,
        merge_efficiency,
        vertex_count: mesh.vertex_count,
        triangle_count: mesh.triangle_count(),
        ..MeshStats::default()
    };
    (mesh, stats)
}
