//! Grid builder: resolves a block snapshot onto a dense cell lattice.
//!
//! Blocks are filtered to active cubes, snapped to the lattice defined by the
//! cell size and the snapshot's minimum corner, and written into a dense
//! `Option<FaceDescriptor>` array. When the bounding volume exceeds the
//! per-axis cap the builder refuses to allocate and reports
//! [`GridError::Oversized`] instead.

use glam::Vec3;

use crate::block::VoxelBlock;
use crate::config::MesherConfig;
use crate::core::{Face, FaceDescriptor};
use crate::error::GridError;
use crate::material::MaterialPalette;

/// A block resolved onto the lattice: a box of cells sharing one descriptor.
///
/// Every cell index of a span, and its exclusive end, fits in `u32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CellSpan {
    pub min: [usize; 3],
    pub extent: [usize; 3],
    pub descriptor: FaceDescriptor,
}

impl CellSpan {
    /// Exclusive end along `axis`.
    #[inline]
    pub fn end(&self, axis: usize) -> usize {
        self.min[axis] + self.extent[axis]
    }

    #[inline]
    pub fn volume(&self) -> usize {
        self.extent
            .iter()
            .fold(1usize, |acc, &e| acc.saturating_mul(e))
    }

    #[inline]
    pub fn contains(&self, cell: [usize; 3]) -> bool {
        (0..3).all(|a| cell[a] >= self.min[a] && cell[a] < self.end(a))
    }

    /// All cells of the span, x fastest.
    pub fn cells(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        let [x0, y0, z0] = self.min;
        let [x1, y1, z1] = [self.end(0), self.end(1), self.end(2)];
        (z0..z1).flat_map(move |z| {
            (y0..y1).flat_map(move |y| (x0..x1).map(move |x| [x, y, z]))
        })
    }
}

/// Lattice-resolved snapshot shared by the dense and sparse paths.
#[derive(Debug)]
pub(crate) struct Rasterized {
    pub origin: Vec3,
    pub cell_size: f32,
    pub dims: [usize; 3],
    pub spans: Vec<CellSpan>,
    pub palette: MaterialPalette,
    pub skipped_blocks: usize,
}

impl Rasterized {
    pub fn source_block_count(&self) -> usize {
        self.spans.len()
    }
}

/// Largest exclusive cell end a quad can address.
const MAX_CELL_END: usize = u32::MAX as usize;

/// Snap a length measured in cells to the nearest whole cell count.
///
/// Float->int casts saturate, so absurd coordinates stay finite.
#[inline]
fn snap(cells: f32, min: f32) -> usize {
    cells.round().max(min) as usize
}

/// Resolve meshable blocks onto the lattice.
///
/// Blocks of any length are kept; the dense builder decides whether the
/// result fits. Degenerate blocks, blocks whose cells lie beyond the `u32`
/// range quads address, and blocks beyond the material id space are
/// skipped and counted.
pub(crate) fn rasterize<'a, I>(blocks: I, config: &MesherConfig) -> Result<Rasterized, GridError>
where
    I: IntoIterator<Item = &'a VoxelBlock>,
{
    let mut skipped_blocks = 0usize;
    let candidates: Vec<&VoxelBlock> = blocks
        .into_iter()
        .filter(|b| b.is_meshable())
        .filter(|b| {
            if b.is_degenerate() {
                log::debug!(
                    "skipping degenerate block at {:?} (size {:?})",
                    b.position,
                    b.size
                );
                skipped_blocks += 1;
                false
            } else {
                true
            }
        })
        .collect();

    if candidates.is_empty() {
        return Err(GridError::Empty {
            skipped: skipped_blocks,
        });
    }

    let cell_size = config.cell_size.unwrap_or_else(|| {
        candidates
            .iter()
            .map(|b| b.size.min_element())
            .fold(f32::INFINITY, f32::min)
    });

    let origin = candidates
        .iter()
        .map(|b| b.min_corner())
        .fold(Vec3::splat(f32::INFINITY), Vec3::min);

    let inv_cell = 1.0 / cell_size;
    let mut palette = MaterialPalette::new();
    let mut spans = Vec::with_capacity(candidates.len());
    let mut dims = [0usize; 3];

    for block in candidates {
        let min_cells = (block.min_corner() - origin) * inv_cell;
        let size_cells = block.size * inv_cell;

        let mut min = [0usize; 3];
        let mut extent = [0usize; 3];
        for axis in 0..3 {
            min[axis] = snap(min_cells[axis], 0.0);
            extent[axis] = snap(size_cells[axis], 1.0);
        }

        let addressable = (0..3).all(|a| {
            min[a]
                .checked_add(extent[a])
                .is_some_and(|end| end <= MAX_CELL_END)
        });
        if !addressable {
            log::debug!(
                "skipping block at {:?}: cells {:?}+{:?} exceed the u32 lattice",
                block.position,
                min,
                extent
            );
            skipped_blocks += 1;
            continue;
        }

        let Some(material) = palette.intern(&block.material_id) else {
            log::debug!("material palette full; skipping {:?}", block.material_id);
            skipped_blocks += 1;
            continue;
        };

        for axis in 0..3 {
            dims[axis] = dims[axis].max(min[axis] + extent[axis]);
        }
        spans.push(CellSpan {
            min,
            extent,
            descriptor: FaceDescriptor::new(material, block.color),
        });
    }

    if spans.is_empty() {
        return Err(GridError::Empty {
            skipped: skipped_blocks,
        });
    }

    Ok(Rasterized {
        origin,
        cell_size,
        dims,
        spans,
        palette,
        skipped_blocks,
    })
}

/// Dense 3D lookup grid. Cells outside `[0, dims)` are unoccupied.
#[derive(Clone, Debug)]
pub struct VoxelGrid {
    dims: [usize; 3],
    origin: Vec3,
    cell_size: f32,
    /// Layout: `cells[x + y * dx + z * dx * dy]`.
    cells: Vec<Option<FaceDescriptor>>,
}

impl VoxelGrid {
    /// Empty grid of the given dimensions.
    pub fn new(dims: [usize; 3], origin: Vec3, cell_size: f32) -> Self {
        Self {
            dims,
            origin,
            cell_size,
            cells: vec![None; dims[0] * dims[1] * dims[2]],
        }
    }

    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        let [dx, dy, dz] = self.dims;
        (x < dx && y < dy && z < dz).then(|| x + y * dx + z * dx * dy)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<FaceDescriptor> {
        self.index(x, y, z).and_then(|i| self.cells[i])
    }

    #[inline]
    pub fn is_solid(&self, x: usize, y: usize, z: usize) -> bool {
        self.get(x, y, z).is_some()
    }

    /// Write a cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: Option<FaceDescriptor>) {
        if let Some(i) = self.index(x, y, z) {
            self.cells[i] = value;
        }
    }

    /// The cell one step from `cell` in the direction of `face`.
    #[inline]
    pub fn neighbor(&self, cell: [usize; 3], face: Face) -> Option<FaceDescriptor> {
        let axis = face.axis().index();
        let mut n = cell;
        if face.is_positive() {
            n[axis] = n[axis].checked_add(1)?;
        } else {
            n[axis] = n[axis].checked_sub(1)?;
        }
        self.get(n[0], n[1], n[2])
    }

    /// World-space minimum corner of a cell.
    #[inline]
    pub fn cell_min_world(&self, cell: [usize; 3]) -> Vec3 {
        self.origin
            + Vec3::new(cell[0] as f32, cell[1] as f32, cell[2] as f32) * self.cell_size
    }

    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

/// A successfully built grid plus build provenance.
#[derive(Debug)]
pub struct GridBuild {
    pub grid: VoxelGrid,
    pub palette: MaterialPalette,
    /// Blocks written into the grid.
    pub source_block_count: usize,
    /// Meshable blocks rejected as degenerate or unrepresentable.
    pub skipped_blocks: usize,
    /// Cells claimed by more than one block (first claim wins).
    pub overlapping_cells: usize,
}

/// Build the dense grid for a block snapshot.
///
/// # Errors
/// - [`GridError::Empty`] when no block is meshable; carries the number of
///   blocks skipped on the way.
/// - [`GridError::Oversized`] when any grid dimension exceeds
///   `config.max_grid_dim`; nothing is allocated in that case.
pub fn build_grid<'a, I>(blocks: I, config: &MesherConfig) -> Result<GridBuild, GridError>
where
    I: IntoIterator<Item = &'a VoxelBlock>,
{
    let raster = rasterize(blocks, config)?;
    let cap = config.max_grid_dim;
    if raster.dims.iter().any(|&d| d > cap) {
        return Err(GridError::Oversized {
            dims: raster.dims,
            cap,
        });
    }

    let mut grid = VoxelGrid::new(raster.dims, raster.origin, raster.cell_size);
    let mut overlapping_cells = 0usize;
    for span in &raster.spans {
        for [x, y, z] in span.cells() {
            if grid.is_solid(x, y, z) {
                overlapping_cells += 1;
            } else {
                grid.set(x, y, z, Some(span.descriptor));
            }
        }
    }

    log::debug!(
        "built {:?} grid (cell {}) from {} blocks, {} skipped, {} overlapping cells",
        raster.dims,
        raster.cell_size,
        raster.spans.len(),
        raster.skipped_blocks,
        overlapping_cells
    );

    Ok(GridBuild {
        source_block_count: raster.source_block_count(),
        skipped_blocks: raster.skipped_blocks,
        overlapping_cells,
        palette: raster.palette,
        grid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockShape;
    use crate::core::MaterialId;

    fn unit(x: f32, y: f32, z: f32) -> VoxelBlock {
        VoxelBlock::unit(Vec3::new(x, y, z), "Iron")
    }

    #[test]
    fn empty_input_is_signalled() {
        let blocks: Vec<VoxelBlock> = Vec::new();
        let err = build_grid(&blocks, &MesherConfig::default()).unwrap_err();
        assert_eq!(err, GridError::Empty { skipped: 0 });
    }

    #[test]
    fn all_degenerate_reports_skips() {
        let blocks = vec![
            VoxelBlock::new(Vec3::ZERO, Vec3::ZERO, "Iron"),
            VoxelBlock::new(Vec3::X, Vec3::new(1.0, f32::NAN, 1.0), "Iron"),
        ];
        let err = build_grid(&blocks, &MesherConfig::default()).unwrap_err();
        assert_eq!(err, GridError::Empty { skipped: 2 });
    }

    #[test]
    fn non_cube_and_inactive_are_ignored() {
        let blocks = vec![
            unit(0.0, 0.0, 0.0).with_shape(BlockShape::Wedge),
            unit(1.0, 0.0, 0.0).destroyed(),
        ];
        let err = build_grid(&blocks, &MesherConfig::default()).unwrap_err();
        assert_eq!(err, GridError::Empty { skipped: 0 });
    }

    #[test]
    fn single_block_grid() {
        let blocks = vec![unit(5.0, 5.0, 5.0)];
        let build = build_grid(&blocks, &MesherConfig::default()).unwrap();

        assert_eq!(build.grid.dims(), [1, 1, 1]);
        assert_eq!(build.grid.origin(), Vec3::splat(4.5));
        assert_eq!(build.grid.cell_size(), 1.0);
        assert!(build.grid.is_solid(0, 0, 0));
        assert!(!build.grid.is_solid(1, 0, 0));
        assert_eq!(build.source_block_count, 1);
    }

    #[test]
    fn bounding_box_in_cells() {
        let blocks = vec![unit(0.0, 0.0, 0.0), unit(3.0, 1.0, 0.0)];
        let build = build_grid(&blocks, &MesherConfig::default()).unwrap();

        assert_eq!(build.grid.dims(), [4, 2, 1]);
        assert!(build.grid.is_solid(0, 0, 0));
        assert!(build.grid.is_solid(3, 1, 0));
        assert_eq!(build.grid.solid_count(), 2);
    }

    #[test]
    fn cell_size_derives_from_smallest_extent() {
        let blocks = vec![
            VoxelBlock::new(Vec3::new(0.25, 0.25, 0.25), Vec3::splat(0.5), "Iron"),
            VoxelBlock::new(Vec3::new(1.0, 0.5, 0.5), Vec3::splat(1.0), "Iron"),
        ];
        let build = build_grid(&blocks, &MesherConfig::default()).unwrap();

        assert_eq!(build.grid.cell_size(), 0.5);
        assert_eq!(build.grid.dims(), [3, 2, 2]);
        // Small block: one cell. Large block: 2x2x2 cells.
        assert_eq!(build.grid.solid_count(), 1 + 8);
    }

    #[test]
    fn stretched_block_fills_its_span() {
        let blocks = vec![VoxelBlock::new(Vec3::ZERO, Vec3::new(4.0, 1.0, 2.0), "Iron")];
        let build = build_grid(&blocks, &MesherConfig::with_cell_size(1.0)).unwrap();

        assert_eq!(build.grid.dims(), [4, 1, 2]);
        assert_eq!(build.grid.solid_count(), 8);
    }

    #[test]
    fn degenerate_blocks_are_skipped() {
        let blocks = vec![
            unit(0.0, 0.0, 0.0),
            VoxelBlock::new(Vec3::X, Vec3::new(0.0, 1.0, 1.0), "Iron"),
            VoxelBlock::new(Vec3::Y, Vec3::new(1.0, -1.0, 1.0), "Iron"),
        ];
        let build = build_grid(&blocks, &MesherConfig::default()).unwrap();

        assert_eq!(build.skipped_blocks, 2);
        assert_eq!(build.source_block_count, 1);
        assert_eq!(build.grid.solid_count(), 1);
    }

    #[test]
    fn oversized_grid_is_refused() {
        let blocks = vec![unit(0.0, 0.0, 0.0), unit(1999.0, 0.0, 0.0)];
        let err = build_grid(&blocks, &MesherConfig::default()).unwrap_err();

        assert_eq!(
            err,
            GridError::Oversized {
                dims: [2000, 1, 1],
                cap: 1000
            }
        );
    }

    #[test]
    fn long_block_is_oversized_not_skipped() {
        let blocks = vec![VoxelBlock::new(Vec3::ZERO, Vec3::new(2000.0, 1.0, 1.0), "Iron")];
        let err = build_grid(&blocks, &MesherConfig::with_cell_size(1.0)).unwrap_err();

        assert_eq!(
            err,
            GridError::Oversized {
                dims: [2000, 1, 1],
                cap: 1000
            }
        );
    }

    #[test]
    fn cells_beyond_u32_are_skipped() {
        let blocks = vec![unit(0.0, 0.0, 0.0), unit(6.0e9, 0.0, 0.0)];
        let raster = rasterize(&blocks, &MesherConfig::default()).unwrap();

        assert_eq!(raster.spans.len(), 1);
        assert_eq!(raster.skipped_blocks, 1);
        assert_eq!(raster.dims, [1, 1, 1]);
    }

    #[test]
    fn span_containment_and_volume() {
        let span = CellSpan {
            min: [2, 0, 1],
            extent: [3, 1, 2],
            descriptor: FaceDescriptor::new(MaterialId(0), 0),
        };
        assert_eq!(span.volume(), 6);
        assert_eq!(span.cells().count(), 6);
        assert!(span.contains([4, 0, 2]));
        assert!(!span.contains([5, 0, 2]));
        assert!(!span.contains([1, 0, 1]));
    }

    #[test]
    fn overlapping_blocks_first_wins() {
        let first = unit(0.0, 0.0, 0.0).with_color(1);
        let second = unit(0.0, 0.0, 0.0).with_color(2);
        let blocks = vec![first, second];
        let build = build_grid(&blocks, &MesherConfig::default()).unwrap();

        assert_eq!(build.overlapping_cells, 1);
        assert_eq!(build.grid.get(0, 0, 0).unwrap().color, 1);
    }

    #[test]
    fn descriptors_carry_material_and_color() {
        let blocks = vec![
            VoxelBlock::unit(Vec3::ZERO, "Titanium"),
            VoxelBlock::unit(Vec3::X, "Iron").with_color(7),
        ];
        let build = build_grid(&blocks, &MesherConfig::default()).unwrap();

        let a = build.grid.get(0, 0, 0).unwrap();
        let b = build.grid.get(1, 0, 0).unwrap();
        assert_eq!(a.material, MaterialId(0));
        assert_eq!(b.material, MaterialId(1));
        assert_eq!(b.color, 7);
        assert_eq!(build.palette.name(a.material), Some("Titanium"));
    }

    #[test]
    fn neighbor_lookup_respects_bounds() {
        let blocks = vec![unit(0.0, 0.0, 0.0), unit(1.0, 0.0, 0.0)];
        let build = build_grid(&blocks, &MesherConfig::default()).unwrap();
        let grid = &build.grid;

        assert!(grid.neighbor([0, 0, 0], Face::PosX).is_some());
        assert!(grid.neighbor([0, 0, 0], Face::NegX).is_none());
        assert!(grid.neighbor([1, 0, 0], Face::PosX).is_none());
        assert!(grid.neighbor([0, 0, 0], Face::PosY).is_none());
    }

    #[test]
    fn cell_world_position() {
        let blocks = vec![unit(0.0, 0.0, 0.0), unit(2.0, 0.0, 0.0)];
        let build = build_grid(&blocks, &MesherConfig::default()).unwrap();
        assert_eq!(build.grid.cell_min_world([2, 0, 0]), Vec3::new(1.5, -0.5, -0.5));
    }
}
