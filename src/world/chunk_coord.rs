use glam::IVec3;

use crate::world::chunk::Chunk;

/// Integer position of a chunk column on the chunk grid.
///
/// World block x/z map to chunk coordinates with floor division so negative
/// coordinates tile correctly (world x = -1 belongs to chunk -1, local 15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub fn from_world(world_x: i32, world_z: i32) -> Self {
        Self {
            x: world_x.div_euclid(Chunk::SIZE),
            z: world_z.div_euclid(Chunk::SIZE),
        }
    }

    /// World-space position of this chunk's minimum corner.
    pub fn world_origin(&self) -> IVec3 {
        IVec3::new(self.x * Chunk::SIZE, 0, self.z * Chunk::SIZE)
    }

    /// Converts a world position into coordinates local to this chunk.
    pub fn to_local(&self, world: IVec3) -> IVec3 {
        IVec3::new(
            world.x - self.x * Chunk::SIZE,
            world.y,
            world.z - self.z * Chunk::SIZE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_coordinates_floor() {
        assert_eq!(ChunkCoord::from_world(-1, -1), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_world(0, 0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_world(-16, 31), ChunkCoord::new(-1, 1));
        assert_eq!(ChunkCoord::from_world(-17, -32), ChunkCoord::new(-2, -2));
    }

    #[test]
    fn local_round_trip() {
        for world_x in [-33, -16, -1, 0, 7, 15, 16, 40] {
            for world_z in [-20, -1, 0, 31] {
                let coord = ChunkCoord::from_world(world_x, world_z);
                let local = coord.to_local(IVec3::new(world_x, 5, world_z));
                assert!((0..Chunk::SIZE).contains(&local.x), "x={world_x}");
                assert!((0..Chunk::SIZE).contains(&local.z), "z={world_z}");
                let origin = coord.world_origin();
                assert_eq!(origin.x + local.x, world_x);
                assert_eq!(origin.z + local.z, world_z);
            }
        }
    }

    #[test]
    fn world_minus_one_is_local_fifteen() {
        let coord = ChunkCoord::from_world(-1, 0);
        assert_eq!(coord.x, -1);
        let local = coord.to_local(IVec3::new(-1, 0, 0));
        assert_eq!(local.x, Chunk::SIZE - 1);
    }
}
