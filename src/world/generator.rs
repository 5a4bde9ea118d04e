use glam::Vec3;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

use crate::config::WorldGenConfig;
use crate::world::block::BlockId;
use crate::world::chunk::Chunk;

/// Procedural terrain: fbm heightmap with a ridge overlay, a water table,
/// beaches, snow caps, trees and scattered ground cover.
pub struct TerrainGenerator {
    seed: u32,
    water_level: i32,
    snow_line: i32,
    tree_threshold: f64,
    height_noise: Fbm<Perlin>,
    ridge_noise: Fbm<Perlin>,
    tree_noise: Perlin,
    flower_noise: Perlin,
    temperature_noise: Perlin,
    moisture_noise: Perlin,
}

impl TerrainGenerator {
    pub fn new(config: &WorldGenConfig) -> Self {
        let seed = config.seed;
        Self {
            seed,
            water_level: config.water_level,
            snow_line: config.snow_line,
            tree_threshold: config.tree_threshold,
            height_noise: Fbm::<Perlin>::new(seed)
                .set_octaves(4)
                .set_lacunarity(2.03)
                .set_persistence(0.55),
            ridge_noise: Fbm::<Perlin>::new(seed.wrapping_add(1))
                .set_octaves(3)
                .set_lacunarity(2.2)
                .set_persistence(0.52),
            tree_noise: Perlin::new(seed.wrapping_add(2)),
            flower_noise: Perlin::new(seed.wrapping_add(3)),
            temperature_noise: Perlin::new(seed.wrapping_add(4)),
            moisture_noise: Perlin::new(seed.wrapping_add(5)),
        }
    }

    pub fn water_level(&self) -> i32 {
        self.water_level
    }

    /// Fills a freshly created chunk column by column.
    pub fn generate(&self, chunk: &mut Chunk) {
        let origin = chunk.world_origin();
        for z in 0..Chunk::SIZE {
            for x in 0..Chunk::SIZE {
                let world_x = origin.x + x;
                let world_z = origin.z + z;
                let height = self.surface_height(world_x, world_z);

                for y in 0..Chunk::HEIGHT {
                    let id = if y <= height {
                        if y == height {
                            BlockId::Grass
                        } else if y >= height - 3 {
                            BlockId::Dirt
                        } else {
                            BlockId::Stone
                        }
                    } else if y <= self.water_level {
                        BlockId::Water
                    } else {
                        BlockId::Air
                    };
                    chunk.set_block(x, y, z, id);
                }

                // Submerged surfaces become beaches.
                if height <= self.water_level {
                    chunk.set_block(x, height, z, BlockId::Sand);
                }
                if height > self.snow_line {
                    chunk.set_block(x, height, z, BlockId::Snow);
                }

                let tree_mask = self.tree_noise.get([
                    world_x as f64 * 0.012,
                    world_z as f64 * 0.012,
                ]);
                let margin_ok =
                    x > 2 && x < Chunk::SIZE - 3 && z > 2 && z < Chunk::SIZE - 3;
                if tree_mask > self.tree_threshold
                    && height > self.water_level + 2
                    && margin_ok
                {
                    self.grow_tree(chunk, x, z, world_x, world_z, height);
                } else if height > self.water_level + 1 {
                    let flower = self.flower_noise.get([
                        world_x as f64 * 1.2 * 0.07,
                        world_z as f64 * 0.9 * 0.07,
                    ]);
                    if flower > 0.65 {
                        chunk.set_block(x, height + 1, z, BlockId::Poppy);
                    } else if flower > 0.3
                        && chunk.block(x, height + 1, z) == BlockId::Air
                    {
                        chunk.set_block(x, height + 1, z, BlockId::TallGrass);
                    }
                }
            }
        }
        chunk.set_empty(false);
    }

    /// Terrain height for a world column, before beach/snow overrides.
    pub fn surface_height(&self, world_x: i32, world_z: i32) -> i32 {
        let u = world_x as f64 * 0.0035;
        let v = world_z as f64 * 0.0035;
        let base = self.height_noise.get([u, v]);
        let ridges = self.ridge_noise.get([u * 1.7, v * 1.7]).abs();
        let height = (35.0 + base * 18.0 + ridges * 14.0) as i32;
        height.max(8)
    }

    /// Biome grass/leaf colour from temperature, moisture and elevation fields.
    pub fn biome_color(&self, world_pos: Vec3) -> Vec3 {
        let u = world_pos.x as f64 * 0.0022;
        let v = world_pos.z as f64 * 0.0022;
        let temperature = (self.temperature_noise.get([u * 0.8 + 13.7, v * 0.8 + 13.7])
            as f32
            * 0.5
            + 0.5)
            .clamp(0.0, 1.0);
        let moisture = (self.moisture_noise.get([u * 1.4 - 17.3, v * 1.4 - 17.3]) as f32
            * 0.5
            + 0.5)
            .clamp(0.0, 1.0);
        let elevation = (world_pos.y / 120.0).clamp(0.0, 1.0);

        let forest_low = Vec3::new(0.37, 0.72, 0.46);
        let forest_high = Vec3::new(0.38, 0.85, 0.62);
        let desert = Vec3::new(0.92, 0.88, 0.45);
        let swamp = Vec3::new(0.25, 0.48, 0.32);
        let mountain = Vec3::new(0.66, 0.8, 0.7);

        let mut color = forest_low.lerp(forest_high, moisture);
        if temperature > 0.65 && moisture < 0.35 {
            color = color.lerp(desert, temperature);
        } else if moisture > 0.7 {
            color = color.lerp(swamp, moisture - 0.5);
        }
        color = color.lerp(mountain, elevation * elevation);
        color.z += 0.05;
        color.clamp(Vec3::splat(0.1), Vec3::ONE)
    }

    fn position_rng(&self, world_x: i32, world_z: i32, salt: u64) -> ChaCha12Rng {
        let mixed = (self.seed as u64)
            .wrapping_mul(0x9e37_79b9_7f4a_7c15)
            ^ (world_x as i64 as u64).wrapping_mul(0xbf58_476d_1ce4_e5b9)
            ^ (world_z as i64 as u64).wrapping_mul(0x94d0_49bb_1331_11eb)
            ^ salt.wrapping_mul(0xd6e8_feb8_6659_fd93);
        ChaCha12Rng::seed_from_u64(mixed)
    }

    fn gaussian01(rng: &mut ChaCha12Rng) -> f32 {
        let u1: f32 = rng.gen::<f32>().max(1e-4);
        let u2: f32 = rng.gen();
        let z0 = (-2.0 * u1.ln()).sqrt() * (std::f32::consts::TAU * u2).cos();
        (z0 * 0.25 + 0.5).clamp(0.0, 1.0)
    }

    fn grow_tree(
        &self,
        chunk: &mut Chunk,
        local_x: i32,
        local_z: i32,
        world_x: i32,
        world_z: i32,
        ground_height: i32,
    ) {
        let base_y = ground_height + 1;
        if base_y + 10 >= Chunk::HEIGHT {
            return;
        }

        let mut rng = self.position_rng(world_x, world_z, 5);
        let mut trunk_height =
            (6 + (Self::gaussian01(&mut rng) * 3.0).round() as i32).clamp(6, 9);
        // Lower trunk stays straight, upper segments may drift sideways.
        const STRAIGHT_HEIGHT: i32 = 4;

        let mut current_x = local_x;
        let mut current_z = local_z;
        let mut top_x = local_x;
        let mut top_z = local_z;

        let mut i = 0;
        while i < trunk_height && base_y + i < Chunk::HEIGHT {
            if i >= STRAIGHT_HEIGHT && rng.gen::<f32>() > 0.5 {
                match rng.gen_range(0..4) {
                    0 => current_x -= 1,
                    1 => current_x += 1,
                    2 => current_z -= 1,
                    _ => current_z += 1,
                }
            }
            if current_x < 0
                || current_x >= Chunk::SIZE
                || current_z < 0
                || current_z >= Chunk::SIZE
            {
                trunk_height = i;
                break;
            }

            let target = chunk.block(current_x, base_y + i, current_z);
            match target {
                BlockId::Air
                | BlockId::TallGrass
                | BlockId::Poppy
                | BlockId::OakLeaves => {
                    chunk.set_block(current_x, base_y + i, current_z, BlockId::OakLog);
                    top_x = current_x;
                    top_z = current_z;
                }
                _ => {
                    trunk_height = i;
                    break;
                }
            }
            i += 1;
        }

        let crown_start = base_y + trunk_height - 2;
        let base_radius = 2.5 + Self::gaussian01(&mut rng) * 1.2;
        for dy in -2..=3 {
            let radius = (base_radius - (dy as f32).abs() * 0.6).max(1.0);
            let range = radius.ceil() as i32 + 1;
            for dx in -range..=range {
                for dz in -range..=range {
                    let lx = top_x + dx;
                    let lz = top_z + dz;
                    let ly = crown_start + dy;
                    if lx < 0
                        || lz < 0
                        || lx >= Chunk::SIZE
                        || lz >= Chunk::SIZE
                        || ly < 0
                        || ly >= Chunk::HEIGHT
                    {
                        continue;
                    }
                    let dist = ((dx * dx + dz * dz) as f32).sqrt();
                    let jitter = (rng.gen::<f32>() - 0.5) * 0.4;
                    if dist + jitter <= radius
                        && chunk.block(lx, ly, lz) == BlockId::Air
                    {
                        chunk.set_block(lx, ly, lz, BlockId::OakLeaves);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::chunk_coord::ChunkCoord;

    fn test_config() -> WorldGenConfig {
        WorldGenConfig {
            seed: 4242,
            water_level: 32,
            snow_line: 60,
            tree_threshold: 0.6,
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let config = test_config();
        let a = TerrainGenerator::new(&config);
        let b = TerrainGenerator::new(&config);
        let coord = ChunkCoord { x: -3, z: 7 };
        let mut chunk_a = Chunk::new(coord);
        let mut chunk_b = Chunk::new(coord);
        a.generate(&mut chunk_a);
        b.generate(&mut chunk_b);
        for y in 0..Chunk::HEIGHT {
            for z in 0..Chunk::SIZE {
                for x in 0..Chunk::SIZE {
                    assert_eq!(chunk_a.block(x, y, z), chunk_b.block(x, y, z));
                }
            }
        }
    }

    #[test]
    fn columns_follow_surface_rules() {
        let generator = TerrainGenerator::new(&test_config());
        let mut chunk = Chunk::new(ChunkCoord { x: 0, z: 0 });
        generator.generate(&mut chunk);
        for z in 0..Chunk::SIZE {
            for x in 0..Chunk::SIZE {
                let height = generator.surface_height(x, z);
                let surface = chunk.block(x, height, z);
                if height <= generator.water_level() {
                    assert_eq!(surface, BlockId::Sand);
                    // Water fills up to the table above a submerged column.
                    assert_eq!(chunk.block(x, generator.water_level(), z), BlockId::Water);
                } else {
                    assert!(matches!(surface, BlockId::Grass | BlockId::Snow));
                }
                assert_eq!(chunk.block(x, 0, z), BlockId::Stone);
            }
        }
    }

    #[test]
    fn biome_color_stays_in_range() {
        let generator = TerrainGenerator::new(&test_config());
        for i in 0..32 {
            let pos = Vec3::new(i as f32 * 57.0, 40.0, i as f32 * -33.0);
            let color = generator.biome_color(pos);
            assert!(color.min_element() >= 0.1);
            assert!(color.max_element() <= 1.0);
        }
    }
}
