use glam::IVec3;

use crate::world::block::BlockId;
use crate::world::chunk_coord::ChunkCoord;

/// A fixed-footprint column of voxels, the unit of streaming and meshing.
pub struct Chunk {
    coord: ChunkCoord,
    blocks: Vec<BlockId>,
    dirty: bool,
    empty: bool,
}

impl Chunk {
    pub const SIZE: i32 = 16;
    pub const HEIGHT: i32 = 128;
    pub const VOLUME: usize = (Self::SIZE * Self::HEIGHT * Self::SIZE) as usize;

    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            blocks: vec![BlockId::Air; Self::VOLUME],
            dirty: true,
            empty: false,
        }
    }

    fn index(x: i32, y: i32, z: i32) -> usize {
        (y * Self::SIZE * Self::SIZE + z * Self::SIZE + x) as usize
    }

    fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        (0..Self::SIZE).contains(&x) && (0..Self::HEIGHT).contains(&y) && (0..Self::SIZE).contains(&z)
    }

    /// Reads the block at local coordinates. Out-of-range reads return Air;
    /// the mesher leans on this when sampling past chunk edges.
    pub fn block(&self, x: i32, y: i32, z: i32) -> BlockId {
        if !Self::in_bounds(x, y, z) {
            return BlockId::Air;
        }
        self.blocks[Self::index(x, y, z)]
    }

    /// Writes a block and marks the chunk dirty. Out-of-range writes are
    /// silently dropped.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
        if !Self::in_bounds(x, y, z) {
            return;
        }
        self.blocks[Self::index(x, y, z)] = id;
        self.dirty = true;
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn world_origin(&self) -> IVec3 {
        self.coord.world_origin()
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// True when the last mesh build produced no geometry at all, letting the
    /// renderer skip the draw outright.
    pub fn empty(&self) -> bool {
        self.empty
    }

    pub fn set_empty(&mut self, empty: bool) {
        self.empty = empty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_reads_are_air() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        chunk.set_block(0, 0, 0, BlockId::Stone);
        assert_eq!(chunk.block(-1, 0, 0), BlockId::Air);
        assert_eq!(chunk.block(0, -1, 0), BlockId::Air);
        assert_eq!(chunk.block(0, 0, Chunk::SIZE), BlockId::Air);
        assert_eq!(chunk.block(0, Chunk::HEIGHT, 0), BlockId::Air);
        assert_eq!(chunk.block(Chunk::SIZE, 0, 0), BlockId::Air);
        assert_eq!(chunk.block(0, 0, 0), BlockId::Stone);
    }

    #[test]
    fn out_of_bounds_writes_are_dropped() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        chunk.clear_dirty();
        chunk.set_block(-1, 0, 0, BlockId::Stone);
        chunk.set_block(0, Chunk::HEIGHT, 0, BlockId::Stone);
        assert!(!chunk.dirty());
    }

    #[test]
    fn writes_mark_dirty() {
        let mut chunk = Chunk::new(ChunkCoord::new(2, -3));
        chunk.clear_dirty();
        chunk.set_block(3, 40, 9, BlockId::Dirt);
        assert!(chunk.dirty());
        assert_eq!(chunk.block(3, 40, 9), BlockId::Dirt);
    }

    #[test]
    fn world_origin_scales_by_size() {
        let chunk = Chunk::new(ChunkCoord::new(-2, 3));
        assert_eq!(chunk.world_origin(), IVec3::new(-32, 0, 48));
    }
}
