//! Per-face culling mesher without merging.
//!
//! Emits one quad per exposed unit face. Occupancy is sparse: blocks of
//! ordinary size are expanded into a hash map keyed by cell coordinate,
//! while large blocks ("slabs") are kept as boxes and queried by
//! containment. Memory therefore scales with the cells of ordinary blocks
//! plus the number of slabs, never with the bounding volume. This is the
//! fallback when the dense grid would exceed its cap, and the reference
//! the greedy path is checked against.

use std::collections::HashMap;

use crate::block::VoxelBlock;
use crate::config::MesherConfig;
use crate::core::{Face, OptimizedMesh, Quad};
use crate::error::GridError;
use crate::expand::emit_quad;
use crate::grid::{rasterize, CellSpan};
use crate::mesh::MeshStats;

/// Spans with more cells than this are queried as boxes.
const EXPANDED_SPAN_LIMIT: usize = 4096;

#[derive(Clone, Copy, Debug)]
struct Claim {
    /// First expanded span covering the cell.
    owner: usize,
    /// Expanded spans covering the cell.
    claims: usize,
}

/// Sparse occupancy over a list of spans. Earlier spans own shared cells.
struct SparseCells<'a> {
    spans: &'a [CellSpan],
    cells: HashMap<[usize; 3], Claim>,
    /// Indices of slab spans, ascending.
    slabs: Vec<usize>,
}

impl<'a> SparseCells<'a> {
    fn new(spans: &'a [CellSpan]) -> Self {
        let mut cells = HashMap::new();
        let mut slabs = Vec::new();
        for (index, span) in spans.iter().enumerate() {
            if span.volume() > EXPANDED_SPAN_LIMIT {
                slabs.push(index);
                continue;
            }
            for cell in span.cells() {
                cells
                    .entry(cell)
                    .and_modify(|c: &mut Claim| c.claims += 1)
                    .or_insert(Claim {
                        owner: index,
                        claims: 1,
                    });
            }
        }
        Self {
            spans,
            cells,
            slabs,
        }
    }

    fn slabs_containing(&self, cell: [usize; 3]) -> impl Iterator<Item = usize> + '_ {
        self.slabs
            .iter()
            .copied()
            .filter(move |&i| self.spans[i].contains(cell))
    }

    /// Index of the first span covering `cell`.
    fn owner(&self, cell: [usize; 3]) -> Option<usize> {
        let expanded = self.cells.get(&cell).map(|c| c.owner);
        let slab = self.slabs_containing(cell).next();
        match (expanded, slab) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn is_solid(&self, cell: [usize; 3]) -> bool {
        self.cells.contains_key(&cell) || self.slabs_containing(cell).next().is_some()
    }

    fn is_solid_neighbor(&self, cell: [usize; 3], face: Face) -> bool {
        let axis = face.axis().index();
        let mut n = cell;
        let stepped = if face.is_positive() {
            n[axis].checked_add(1)
        } else {
            n[axis].checked_sub(1)
        };
        match stepped {
            Some(coord) => {
                n[axis] = coord;
                self.is_solid(n)
            }
            None => false,
        }
    }

    /// Cells claimed more than once, counted as in the dense builder:
    /// every claim after the first is one overlap.
    fn overlapping(&self) -> usize {
        let slabs: Vec<&CellSpan> = self.slabs.iter().map(|&i| &self.spans[i]).collect();
        let slab_volume = slabs
            .iter()
            .fold(0usize, |acc, s| acc.saturating_add(s.volume()));
        let slab_overlap = slab_volume.saturating_sub(union_volume(&slabs));

        let expanded_overlap: usize = self
            .cells
            .iter()
            .map(|(&cell, claim)| {
                if self.slabs_containing(cell).next().is_some() {
                    claim.claims
                } else {
                    claim.claims - 1
                }
            })
            .sum();

        slab_overlap + expanded_overlap
    }
}

/// Sorted, deduplicated interval boundaries.
fn boundaries(bounds: impl Iterator<Item = (usize, usize)>) -> Vec<usize> {
    let mut edges: Vec<usize> = bounds.flat_map(|(lo, hi)| [lo, hi]).collect();
    edges.sort_unstable();
    edges.dedup();
    edges
}

/// Number of cells covered by at least one box.
fn union_volume(boxes: &[&CellSpan]) -> usize {
    let xs = boundaries(boxes.iter().map(|b| (b.min[0], b.end(0))));
    let mut volume = 0usize;
    for x in xs.windows(2) {
        let rects: Vec<[(usize, usize); 2]> = boxes
            .iter()
            .filter(|b| b.min[0] <= x[0] && b.end(0) >= x[1])
            .map(|b| [(b.min[1], b.end(1)), (b.min[2], b.end(2))])
            .collect();
        volume = volume.saturating_add(union_area(&rects).saturating_mul(x[1] - x[0]));
    }
    volume
}

/// Area covered by at least one rectangle, via a compressed coverage grid.
fn union_area(rects: &[[(usize, usize); 2]]) -> usize {
    let ys = boundaries(rects.iter().map(|r| r[0]));
    let zs = boundaries(rects.iter().map(|r| r[1]));
    if ys.len() < 2 || zs.len() < 2 {
        return 0;
    }

    let (ny, nz) = (ys.len() - 1, zs.len() - 1);
    let mut covered = vec![false; ny * nz];
    for [(y0, y1), (z0, z1)] in rects {
        let (ya, yb) = (ys.partition_point(|&y| y < *y0), ys.partition_point(|&y| y < *y1));
        let (za, zb) = (zs.partition_point(|&z| z < *z0), zs.partition_point(|&z| z < *z1));
        for yi in ya..yb {
            covered[yi * nz + za..yi * nz + zb].fill(true);
        }
    }

    let mut area = 0usize;
    for yi in 0..ny {
        for zi in 0..nz {
            if covered[yi * nz + zi] {
                area = area.saturating_add((ys[yi + 1] - ys[yi]) * (zs[zi + 1] - zs[zi]));
            }
        }
    }
    area
}

/// Mesh blocks with one quad per exposed face.
///
/// Walks the surface of every span and emits each exposed face from the
/// span that owns the cell, so shared and overlapping cells emit once.
pub fn mesh_naive<'a, I>(blocks: I, config: &MesherConfig) -> (OptimizedMesh, MeshStats)
where
    I: IntoIterator<Item = &'a VoxelBlock>,
{
    let raster = match rasterize(blocks, config) {
        Ok(raster) => raster,
        Err(GridError::Empty { skipped }) => {
            let stats = MeshStats {
                skipped_blocks: skipped,
                ..MeshStats::default()
            };
            return (OptimizedMesh::default(), stats);
        }
        Err(GridError::Oversized { .. }) => {
            return (OptimizedMesh::default(), MeshStats::default());
        }
    };

    let cells = SparseCells::new(&raster.spans);
    let mut quads_per_face = [0usize; 6];
    let mut mesh = OptimizedMesh::with_capacity(raster.spans.len() * 6);

    for (index, span) in raster.spans.iter().enumerate() {
        for face in Face::ALL {
            let axis = face.axis();
            let (u_axis, v_axis) = axis.plane();
            let (a, ua, va) = (axis.index(), u_axis.index(), v_axis.index());
            let depth = if face.is_positive() {
                span.end(a) - 1
            } else {
                span.min[a]
            };

            for v in span.min[va]..span.end(va) {
                for u in span.min[ua]..span.end(ua) {
                    let cell = axis.compose(depth, u, v);
                    if cells.owner(cell) != Some(index) || cells.is_solid_neighbor(cell, face) {
                        continue;
                    }
                    // Span ends fit in u32, so these casts are lossless.
                    let quad = Quad {
                        face,
                        slice: depth as u32,
                        u: u as u32,
                        v: v as u32,
                        width: 1,
                        height: 1,
                        descriptor: span.descriptor,
                    };
                    emit_quad(&quad, raster.origin, raster.cell_size, &mut mesh);
                    quads_per_face[face.index()] += 1;
                }
            }
        }
    }
    mesh.source_block_count = raster.source_block_count();
    mesh.sync_counts();

    let quad_count = quads_per_face.iter().sum();
    let stats = MeshStats {
        quad_count,
        quads_per_face,
        exposed_faces: quad_count,
        merge_efficiency: 0.0,
        source_blocks: raster.source_block_count(),
        skipped_blocks: raster.skipped_blocks,
        overlapping_cells: cells.overlapping(),
        used_fallback: false,
        vertex_count: mesh.vertex_count,
        triangle_count: mesh.triangle_count(),
    };

    (mesh, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn unit(x: f32, y: f32, z: f32) -> VoxelBlock {
        VoxelBlock::unit(Vec3::new(x, y, z), "Iron")
    }

    #[test]
    fn single_block_six_quads() {
        let blocks = vec![unit(0.0, 0.0, 0.0)];
        let (mesh, stats) = mesh_naive(&blocks, &MesherConfig::default());

        assert_eq!(stats.quad_count, 6);
        assert_eq!(stats.quads_per_face, [1; 6]);
        assert_eq!(mesh.vertex_count, 24);
        assert_eq!(mesh.index_count, 36);
        assert_eq!(mesh.source_block_count, 1);
    }

    #[test]
    fn shared_faces_are_culled() {
        let blocks = vec![unit(0.0, 0.0, 0.0), unit(1.0, 0.0, 0.0)];
        let (_, stats) = mesh_naive(&blocks, &MesherConfig::default());
        assert_eq!(stats.quad_count, 10);
    }

    #[test]
    fn far_apart_blocks_need_no_dense_grid() {
        let blocks = vec![unit(0.0, 0.0, 0.0), unit(5000.0, 0.0, 0.0)];
        let (mesh, stats) = mesh_naive(&blocks, &MesherConfig::default());

        assert_eq!(stats.quad_count, 12);
        assert_eq!(mesh.triangle_count(), 24);
    }

    #[test]
    fn overlapping_cells_emit_once() {
        let blocks = vec![unit(0.0, 0.0, 0.0), unit(0.0, 0.0, 0.0)];
        let (_, stats) = mesh_naive(&blocks, &MesherConfig::default());

        assert_eq!(stats.quad_count, 6);
        assert_eq!(stats.overlapping_cells, 1);
    }

    #[test]
    fn long_beam_keeps_every_face() {
        let blocks = vec![
            unit(0.5, 5.0, 0.0),
            VoxelBlock::new(Vec3::ZERO, Vec3::new(2000.0, 1.0, 1.0), "Iron"),
        ];
        let (mesh, stats) = mesh_naive(&blocks, &MesherConfig::default());

        assert_eq!(stats.skipped_blocks, 0);
        assert_eq!(stats.source_blocks, 2);
        assert_eq!(stats.quad_count, 6 + 4 * 2000 + 2);

        let max_x = mesh
            .vertices
            .iter()
            .map(|v| v.position[0])
            .fold(f32::MIN, f32::max);
        assert_eq!(max_x, 1000.0);
    }

    /// 100x100x1 deck, large enough to be queried as a box.
    fn deck() -> VoxelBlock {
        VoxelBlock::new(Vec3::new(49.5, 0.0, 49.5), Vec3::new(100.0, 1.0, 100.0), "Iron")
    }

    #[test]
    fn slab_culls_against_small_blocks() {
        let deck = deck();
        let on_top = unit(0.0, 1.0, 0.0);
        let blocks = vec![deck, on_top];
        let (_, stats) = mesh_naive(&blocks, &MesherConfig::with_cell_size(1.0));

        let deck_faces = 2 * 100 * 100 + 4 * 100;
        assert_eq!(stats.quad_count, deck_faces + 6 - 2);
        assert_eq!(stats.overlapping_cells, 0);
    }

    #[test]
    fn slab_overlaps_are_counted_once_per_claim() {
        let deck = deck();
        let inside = unit(10.0, 0.0, 10.0);
        let blocks = vec![deck.clone(), deck, inside];
        let (_, stats) = mesh_naive(&blocks, &MesherConfig::with_cell_size(1.0));

        assert_eq!(stats.quad_count, 2 * 100 * 100 + 4 * 100);
        assert_eq!(stats.overlapping_cells, 100 * 100 + 1);
    }

    #[test]
    fn union_volume_of_crossing_boxes() {
        let span = |min: [usize; 3], extent: [usize; 3]| CellSpan {
            min,
            extent,
            descriptor: crate::core::FaceDescriptor::new(crate::core::MaterialId(0), 0),
        };
        let a = span([0, 0, 0], [4, 4, 1]);
        let b = span([2, 2, 0], [4, 4, 1]);
        let c = span([10, 0, 0], [1, 1, 1]);

        assert_eq!(union_volume(&[&a, &b]), 16 + 16 - 4);
        assert_eq!(union_volume(&[&a, &b, &c]), 29);
        assert_eq!(union_volume(&[]), 0);
    }

    #[test]
    fn all_degenerate_reports_skips() {
        let blocks = vec![VoxelBlock::new(Vec3::ZERO, Vec3::ZERO, "Iron")];
        let (mesh, stats) = mesh_naive(&blocks, &MesherConfig::default());

        assert!(mesh.is_empty());
        assert_eq!(stats.skipped_blocks, 1);
    }

    #[test]
    fn empty_input_empty_mesh() {
        let blocks: Vec<VoxelBlock> = Vec::new();
        let (mesh, stats) = mesh_naive(&blocks, &MesherConfig::default());
        assert!(mesh.is_empty());
        assert_eq!(stats.quad_count, 0);
    }
}
