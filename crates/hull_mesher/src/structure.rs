//! Editable block container with rebuild tracking.
//!
//! Holds the blocks of one structure in insertion order. Every edit flags the
//! structure for a rebuild; [`BlockStructure::rebuild_mesh`] meshes a snapshot
//! only when flagged, so repeated edits between frames cost one rebuild.

use crate::block::{BlockShape, VoxelBlock};
use crate::config::MesherConfig;
use crate::core::OptimizedMesh;
use crate::mesh::mesh_blocks;

/// Stable handle to a block inside a [`BlockStructure`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub u64);

#[derive(Clone, Debug, Default)]
pub struct BlockStructure {
    /// Sorted by id: ids only grow and removal keeps order.
    blocks: Vec<(BlockId, VoxelBlock)>,
    next_id: u64,
    needs_rebuild: bool,
}

impl BlockStructure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block. Its position in the meshing order is after every
    /// block already present.
    pub fn add_block(&mut self, block: VoxelBlock) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        self.blocks.push((id, block));
        self.needs_rebuild = true;
        id
    }

    /// Remove a block, returning it if it was present.
    pub fn remove_block(&mut self, id: BlockId) -> Option<VoxelBlock> {
        let index = self.position(id)?;
        let (_, block) = self.blocks.remove(index);
        self.needs_rebuild = true;
        Some(block)
    }

    pub fn get_block(&self, id: BlockId) -> Option<&VoxelBlock> {
        self.position(id).map(|i| &self.blocks[i].1)
    }

    /// Mutable access flags the structure, since the caller may edit the block.
    pub fn get_block_mut(&mut self, id: BlockId) -> Option<&mut VoxelBlock> {
        let index = self.position(id)?;
        self.needs_rebuild = true;
        Some(&mut self.blocks[index].1)
    }

    #[inline]
    fn position(&self, id: BlockId) -> Option<usize> {
        self.blocks.binary_search_by_key(&id, |(bid, _)| *bid).ok()
    }

    /// Blocks with their ids, in insertion order.
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &VoxelBlock)> {
        self.blocks.iter().map(|(id, block)| (*id, block))
    }

    /// Remove all blocks. Ids are never reused.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.needs_rebuild = true;
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn needs_rebuild(&self) -> bool {
        self.needs_rebuild
    }

    pub fn mark_for_rebuild(&mut self) {
        self.needs_rebuild = true;
    }

    /// Owned copy of the blocks, safe to hand to another thread for meshing.
    pub fn snapshot(&self) -> Vec<VoxelBlock> {
        self.blocks.iter().map(|(_, block)| block.clone()).collect()
    }

    /// Active blocks the greedy path does not cover (non-cube shapes).
    pub fn non_greedy_blocks(&self) -> impl Iterator<Item = &VoxelBlock> {
        self.blocks
            .iter()
            .map(|(_, block)| block)
            .filter(|b| b.is_active && b.shape != BlockShape::Cube)
    }

    /// Mesh the current blocks if flagged, then clear the flag.
    ///
    /// Returns `None` when nothing changed since the last rebuild.
    pub fn rebuild_mesh(&mut self, config: &MesherConfig) -> Option<OptimizedMesh> {
        if !self.needs_rebuild {
            return None;
        }
        self.needs_rebuild = false;

        let mesh = mesh_blocks(self.blocks.iter().map(|(_, block)| block), config);
        log::debug!(
            "rebuilt structure: {} blocks -> {} triangles",
            self.blocks.len(),
            mesh.triangle_count()
        );
        Some(mesh)
    }
}
