//! Face culling into per-slice masks.
//!
//! A face is exposed if its cell is solid AND the neighbor one step along
//! the face direction is empty or outside the grid. For each
//! (axis, direction) pass, every slice perpendicular to the axis yields a
//! 2D mask over the in-plane `(u, v)` axes holding the descriptor of each
//! exposed face.

use crate::core::{Face, FaceDescriptor};
use crate::grid::VoxelGrid;

/// Exposed faces of one slice. Cells are cleared as the merger consumes them.
#[derive(Clone, Debug, Default)]
pub struct SliceMask {
    u_len: usize,
    v_len: usize,
    /// Layout: `cells[u + v * u_len]`.
    cells: Vec<Option<FaceDescriptor>>,
}

impl SliceMask {
    pub fn new(u_len: usize, v_len: usize) -> Self {
        Self {
            u_len,
            v_len,
            cells: vec![None; u_len * v_len],
        }
    }

    /// Resize to `u_len × v_len` and clear every cell, keeping the allocation.
    pub fn reset(&mut self, u_len: usize, v_len: usize) {
        self.u_len = u_len;
        self.v_len = v_len;
        self.cells.clear();
        self.cells.resize(u_len * v_len, None);
    }

    #[inline]
    pub fn u_len(&self) -> usize {
        self.u_len
    }

    #[inline]
    pub fn v_len(&self) -> usize {
        self.v_len
    }

    /// Descriptor at `(u, v)`; `None` if empty, cleared or out of bounds.
    #[inline]
    pub fn get(&self, u: usize, v: usize) -> Option<FaceDescriptor> {
        if u < self.u_len && v < self.v_len {
            self.cells[u + v * self.u_len]
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, u: usize, v: usize, value: Option<FaceDescriptor>) {
        debug_assert!(u < self.u_len && v < self.v_len, "mask coordinates out of bounds");
        self.cells[u + v * self.u_len] = value;
    }

    /// Clear the rectangle `[u, u + width) × [v, v + height)`.
    pub fn clear_rect(&mut self, u: usize, v: usize, width: usize, height: usize) {
        for row in v..(v + height).min(self.v_len) {
            let start = row * self.u_len + u;
            let end = row * self.u_len + (u + width).min(self.u_len);
            self.cells[start..end].fill(None);
        }
    }

    /// Number of populated cells.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

/// In-plane extents `(u_len, v_len)` of slices for `face`.
#[inline]
pub fn slice_extent(grid: &VoxelGrid, face: Face) -> (usize, usize) {
    let dims = grid.dims();
    let (u_axis, v_axis) = face.axis().plane();
    (dims[u_axis.index()], dims[v_axis.index()])
}

/// Number of slices along the axis of `face`.
#[inline]
pub fn slice_count(grid: &VoxelGrid, face: Face) -> usize {
    grid.dims()[face.axis().index()]
}

/// Fill `mask` with the exposed faces of one slice.
///
/// Returns the number of exposed faces written.
pub fn build_slice_mask(grid: &VoxelGrid, face: Face, slice: usize, mask: &mut SliceMask) -> usize {
    let axis = face.axis();
    let (u_len, v_len) = slice_extent(grid, face);
    mask.reset(u_len, v_len);

    let mut exposed = 0;
    for v in 0..v_len {
        for u in 0..u_len {
            let cell = axis.compose(slice, u, v);
            let Some(descriptor) = grid.get(cell[0], cell[1], cell[2]) else {
                continue;
            };
            if grid.neighbor(cell, face).is_none() {
                mask.set(u, v, Some(descriptor));
                exposed += 1;
            }
        }
    }
    exposed
}

/// Count exposed faces per direction, indexed by [`Face::index`].
pub fn count_exposed_faces(grid: &VoxelGrid) -> [usize; 6] {
    let mut counts = [0usize; 6];
    let mut mask = SliceMask::default();
    for face in Face::ALL {
        for slice in 0..slice_count(grid, face) {
            counts[face.index()] += build_slice_mask(grid, face, slice, &mut mask);
        }
    }
    counts
}
