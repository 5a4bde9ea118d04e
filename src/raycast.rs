use glam::{IVec3, Vec3};

use crate::render::mesher::BlockSampler;
use crate::world::block::{BlockId, BlockRegistry};

/// First selectable block along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub block: IVec3,
    /// Outward normal of the face the ray entered through. Zero when the
    /// ray started inside the block.
    pub normal: IVec3,
    pub position: Vec3,
    pub id: BlockId,
}

const MAX_STEPS: i32 = 512;

fn safe_inverse(value: f32) -> f32 {
    if value.abs() < 1e-6 {
        1e6
    } else {
        1.0 / value
    }
}

/// Voxel traversal (DDA): walk the grid one cell at a time, always crossing
/// the nearest axis boundary next, until a selectable block or the distance
/// cap is reached.
pub fn raycast_blocks(
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    sampler: &impl BlockSampler,
    registry: &BlockRegistry,
) -> Option<RayHit> {
    let dir = direction.normalize();
    let mut block = origin.floor().as_ivec3();
    let mut last_normal = IVec3::ZERO;

    let delta = Vec3::new(
        safe_inverse(dir.x).abs(),
        safe_inverse(dir.y).abs(),
        safe_inverse(dir.z).abs(),
    );
    let step = IVec3::new(
        if dir.x >= 0.0 { 1 } else { -1 },
        if dir.y >= 0.0 { 1 } else { -1 },
        if dir.z >= 0.0 { 1 } else { -1 },
    );

    let mut side = Vec3::new(
        if dir.x >= 0.0 {
            (block.x as f32 + 1.0 - origin.x) * delta.x
        } else {
            (origin.x - block.x as f32) * delta.x
        },
        if dir.y >= 0.0 {
            (block.y as f32 + 1.0 - origin.y) * delta.y
        } else {
            (origin.y - block.y as f32) * delta.y
        },
        if dir.z >= 0.0 {
            (block.z as f32 + 1.0 - origin.z) * delta.z
        } else {
            (origin.z - block.z as f32) * delta.z
        },
    );

    let mut traveled = 0.0f32;
    for _ in 0..MAX_STEPS {
        if traveled > max_distance {
            break;
        }
        let current = sampler.block_at(block);
        if current != BlockId::Air && registry.info(current).selectable {
            return Some(RayHit {
                block,
                normal: last_normal,
                position: origin + dir * traveled,
                id: current,
            });
        }

        if side.x < side.y {
            if side.x < side.z {
                block.x += step.x;
                traveled = side.x;
                side.x += delta.x;
                last_normal = IVec3::new(-step.x, 0, 0);
            } else {
                block.z += step.z;
                traveled = side.z;
                side.z += delta.z;
                last_normal = IVec3::new(0, 0, -step.z);
            }
        } else if side.y < side.z {
            block.y += step.y;
            traveled = side.y;
            side.y += delta.y;
            last_normal = IVec3::new(0, -step.y, 0);
        } else {
            block.z += step.z;
            traveled = side.z;
            side.z += delta.z;
            last_normal = IVec3::new(0, 0, -step.z);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::TextureAtlas;

    fn registry() -> BlockRegistry {
        BlockRegistry::build(&TextureAtlas::with_default_tiles()).unwrap()
    }

    #[test]
    fn hits_entry_face_of_first_block() {
        let registry = registry();
        let sampler = |pos: IVec3| {
            if pos == IVec3::new(5, 10, 0) {
                BlockId::Stone
            } else {
                BlockId::Air
            }
        };
        let hit = raycast_blocks(
            Vec3::new(0.5, 10.5, 0.5),
            Vec3::X,
            16.0,
            &sampler,
            &registry,
        )
        .unwrap();
        assert_eq!(hit.block, IVec3::new(5, 10, 0));
        assert_eq!(hit.normal, IVec3::new(-1, 0, 0));
        assert_eq!(hit.id, BlockId::Stone);
        assert!((hit.position.x - 5.0).abs() < 1e-4);
    }

    #[test]
    fn empty_space_misses() {
        let registry = registry();
        let sampler = |_pos: IVec3| BlockId::Air;
        let hit = raycast_blocks(
            Vec3::new(0.0, 64.0, 0.0),
            Vec3::new(1.0, -0.3, 0.4),
            32.0,
            &sampler,
            &registry,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn is_deterministic() {
        let registry = registry();
        let sampler = |pos: IVec3| {
            if pos.y <= 10 {
                BlockId::Stone
            } else {
                BlockId::Air
            }
        };
        let origin = Vec3::new(3.2, 20.0, -7.9);
        let dir = Vec3::new(0.3, -1.0, 0.2);
        let first = raycast_blocks(origin, dir, 64.0, &sampler, &registry).unwrap();
        for _ in 0..8 {
            let again = raycast_blocks(origin, dir, 64.0, &sampler, &registry).unwrap();
            assert_eq!(again, first);
        }
        assert_eq!(first.normal, IVec3::new(0, 1, 0));
    }

    #[test]
    fn distance_cap_holds() {
        let registry = registry();
        let sampler = |pos: IVec3| {
            if pos.x >= 20 {
                BlockId::Stone
            } else {
                BlockId::Air
            }
        };
        let hit = raycast_blocks(
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::X,
            8.0,
            &sampler,
            &registry,
        );
        assert!(hit.is_none());
    }
}
