//! One (axis, direction) pass over every slice of a grid.

use crate::core::{Face, Quad};
use crate::cull::{build_slice_mask, slice_count, SliceMask};
use crate::grid::VoxelGrid;

use super::greedy_merge_slice;

/// Greedy merge for all slices of one face direction.
///
/// Returns the number of exposed faces the pass consumed.
pub fn greedy_merge_face(grid: &VoxelGrid, face: Face, output: &mut Vec<Quad>) -> usize {
    // Work buffer reused across slices
    let mut mask = SliceMask::default();
    let mut exposed = 0;

    for slice in 0..slice_count(grid, face) {
        let slice_exposed = build_slice_mask(grid, face, slice, &mut mask);
        if slice_exposed == 0 {
            continue;
        }
        exposed += slice_exposed;
        greedy_merge_slice(&mut mask, face, slice as u32, output);
    }

    exposed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FaceDescriptor, MaterialId};
    use glam::Vec3;

    const STONE: FaceDescriptor = FaceDescriptor::new(MaterialId(0), 1);

    fn filled(dims: [usize; 3]) -> VoxelGrid {
        let mut grid = VoxelGrid::new(dims, Vec3::ZERO, 1.0);
        for x in 0..dims[0] {
            for y in 0..dims[1] {
                for z in 0..dims[2] {
                    grid.set(x, y, z, Some(STONE));
                }
            }
        }
        grid
    }

    #[test]
    fn solid_box_one_quad_per_face() {
        let grid = filled([4, 3, 2]);
        for face in Face::ALL {
            let mut quads = Vec::new();
            greedy_merge_face(&grid, face, &mut quads);
            assert_eq!(quads.len(), 1, "face {face:?}");
        }
    }

    #[test]
    fn x_faces_span_y_then_z() {
        let grid = filled([1, 5, 2]);
        let mut quads = Vec::new();
        let exposed = greedy_merge_face(&grid, Face::PosX, &mut quads);

        assert_eq!(exposed, 10);
        assert_eq!(quads.len(), 1);
        assert_eq!((quads[0].width, quads[0].height), (5, 2));
    }

    #[test]
    fn column_merges_along_y() {
        // 5 voxels in a column along Y; +X faces merge into one 5x1 quad.
        let grid = filled([1, 5, 1]);
        let mut quads = Vec::new();
        greedy_merge_face(&grid, Face::PosX, &mut quads);

        assert_eq!(quads.len(), 1);
        assert_eq!((quads[0].width, quads[0].height), (5, 1));
    }

    #[test]
    fn separate_slices_never_merge() {
        // Two cells separated along X: two +X slices with one quad each.
        let mut grid = VoxelGrid::new([3, 1, 1], Vec3::ZERO, 1.0);
        grid.set(0, 0, 0, Some(STONE));
        grid.set(2, 0, 0, Some(STONE));

        let mut quads = Vec::new();
        greedy_merge_face(&grid, Face::PosX, &mut quads);

        assert_eq!(quads.len(), 2);
        assert_eq!(quads[0].slice, 0);
        assert_eq!(quads[1].slice, 2);
    }
}
