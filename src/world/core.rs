use std::collections::{HashMap, VecDeque};

use glam::{IVec3, Vec3};
use log::{debug, trace};

use crate::config::EngineConfig;
use crate::raycast::{self, RayHit};
use crate::render::mesh::{MeshBucket, RenderSink};
use crate::render::mesher::build_chunk_mesh;
use crate::world::block::{BlockId, BlockRegistry};
use crate::world::chunk::Chunk;
use crate::world::chunk_coord::ChunkCoord;
use crate::world::generator::TerrainGenerator;
use crate::world::sky::DayCycle;

/// Owns all chunks and drives the streaming lifecycle: generate chunks
/// around the viewpoint, remesh a bounded number per frame, evict far ones.
pub struct World {
    chunks: HashMap<ChunkCoord, Chunk>,
    mesh_queue: VecDeque<ChunkCoord>,
    registry: BlockRegistry,
    generator: TerrainGenerator,
    sky: DayCycle,
    render_distance: i32,
    evict_margin: i32,
    remesh_budget: usize,
}

impl World {
    pub fn new(config: &EngineConfig, registry: BlockRegistry) -> Self {
        Self {
            chunks: HashMap::new(),
            mesh_queue: VecDeque::new(),
            registry,
            generator: TerrainGenerator::new(&config.worldgen),
            sky: DayCycle::new(&config.sky),
            render_distance: config.streaming.render_distance,
            evict_margin: config.streaming.evict_margin,
            remesh_budget: config.streaming.remesh_budget,
        }
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    pub fn sky(&self) -> &DayCycle {
        &self.sky
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn pending_remeshes(&self) -> usize {
        self.mesh_queue.len()
    }

    /// One simulation step: day cycle, stream-in, bounded remeshing,
    /// eviction.
    pub fn update(&mut self, sink: &mut impl RenderSink, viewpoint: Vec3, dt: f32) {
        self.sky.advance(dt);
        self.ensure_chunks_around(viewpoint);
        self.rebuild_meshes(sink);
        self.cleanup_chunks(sink, viewpoint);
    }

    /// Generates every missing chunk within render distance (square radius)
    /// of the viewpoint and queues it for meshing.
    pub fn ensure_chunks_around(&mut self, viewpoint: Vec3) {
        let center = ChunkCoord::from_world(
            viewpoint.x.floor() as i32,
            viewpoint.z.floor() as i32,
        );
        let mut created = 0usize;
        for dz in -self.render_distance..=self.render_distance {
            for dx in -self.render_distance..=self.render_distance {
                let coord = ChunkCoord::new(center.x + dx, center.z + dz);
                if self.chunks.contains_key(&coord) {
                    continue;
                }
                let mut chunk = Chunk::new(coord);
                self.generator.generate(&mut chunk);
                self.mesh_queue.push_back(coord);
                self.chunks.insert(coord, chunk);
                created += 1;
            }
        }
        if created > 0 {
            debug!(
                "generated {} chunks around ({}, {})",
                created, center.x, center.z
            );
        }
    }

    /// Drains up to the per-frame budget from the mesh queue. Entries whose
    /// chunk was evicted or already remeshed are dropped silently.
    pub fn rebuild_meshes(&mut self, sink: &mut impl RenderSink) {
        let mut built = 0usize;
        while built < self.remesh_budget {
            let Some(coord) = self.mesh_queue.pop_front() else {
                break;
            };
            let meshes = {
                let chunk = match self.chunks.get(&coord) {
                    Some(chunk) if chunk.dirty() => chunk,
                    _ => continue,
                };
                let sampler = |pos: IVec3| self.block_at(pos);
                let tints =
                    |pos: Vec3, id: BlockId, _face: usize| self.sample_tint(pos, id);
                build_chunk_mesh(chunk, &self.registry, &sampler, &tints)
            };
            if let Some(chunk) = self.chunks.get_mut(&coord) {
                chunk.set_empty(meshes.is_empty());
                chunk.clear_dirty();
            }
            trace!(
                "remeshed chunk ({}, {}): {} opaque / {} translucent indices",
                coord.x,
                coord.z,
                meshes.opaque.indices.len(),
                meshes.translucent.indices.len()
            );
            sink.upload(coord, MeshBucket::Opaque, meshes.opaque);
            sink.upload(coord, MeshBucket::Translucent, meshes.translucent);
            built += 1;
        }
    }

    /// Evicts chunks beyond render distance plus a hysteresis margin, so a
    /// viewpoint oscillating at the boundary does not thrash generation.
    pub fn cleanup_chunks(&mut self, sink: &mut impl RenderSink, viewpoint: Vec3) {
        let center = ChunkCoord::from_world(
            viewpoint.x.floor() as i32,
            viewpoint.z.floor() as i32,
        );
        let limit = self.render_distance + self.evict_margin;
        let stale: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .filter(|coord| {
                (coord.x - center.x).abs() > limit || (coord.z - center.z).abs() > limit
            })
            .copied()
            .collect();
        for coord in stale {
            self.chunks.remove(&coord);
            sink.release(coord);
            trace!("evicted chunk ({}, {})", coord.x, coord.z);
        }
    }

    /// Block at a world position; Air for unloaded chunks and out-of-range y.
    pub fn block_at(&self, pos: IVec3) -> BlockId {
        let coord = ChunkCoord::from_world(pos.x, pos.z);
        let Some(chunk) = self.chunks.get(&coord) else {
            return BlockId::Air;
        };
        let local = coord.to_local(pos);
        chunk.block(local.x, local.y, local.z)
    }

    pub fn place_block(&mut self, pos: IVec3, id: BlockId) -> bool {
        self.set_block_internal(pos, id)
    }

    pub fn remove_block(&mut self, pos: IVec3) -> bool {
        self.set_block_internal(pos, BlockId::Air)
    }

    /// First selectable block within reach of the ray.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let sampler = |pos: IVec3| self.block_at(pos);
        raycast::raycast_blocks(origin, direction, max_distance, &sampler, &self.registry)
    }

    /// Block tint at a world position, biome-modulated for grass and leaves.
    pub fn sample_tint(&self, world_pos: Vec3, id: BlockId) -> Vec3 {
        let info = self.registry.info(id);
        let mut tint = info.tint;
        if info.biome_tint {
            tint *= self.generator.biome_color(world_pos);
        }
        tint
    }

    fn set_block_internal(&mut self, pos: IVec3, id: BlockId) -> bool {
        if pos.y < 0 || pos.y >= Chunk::HEIGHT {
            return false;
        }
        let coord = ChunkCoord::from_world(pos.x, pos.z);
        let local = coord.to_local(pos);
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return false;
        };
        if chunk.block(local.x, local.y, local.z) == id {
            return false;
        }
        chunk.set_block(local.x, local.y, local.z, id);
        self.mesh_queue.push_back(coord);
        self.mark_neighbors_dirty(pos);
        true
    }

    /// An edit on a chunk edge invalidates the neighbour's cached
    /// cross-boundary visibility, so it must remesh too.
    fn mark_neighbors_dirty(&mut self, pos: IVec3) {
        let coord = ChunkCoord::from_world(pos.x, pos.z);
        let local = coord.to_local(pos);
        let candidates = [
            (local.x == 0, ChunkCoord::new(coord.x - 1, coord.z)),
            (
                local.x == Chunk::SIZE - 1,
                ChunkCoord::new(coord.x + 1, coord.z),
            ),
            (local.z == 0, ChunkCoord::new(coord.x, coord.z - 1)),
            (
                local.z == Chunk::SIZE - 1,
                ChunkCoord::new(coord.x, coord.z + 1),
            ),
        ];
        for (on_edge, neighbor) in candidates {
            if !on_edge {
                continue;
            }
            if let Some(chunk) = self.chunks.get_mut(&neighbor) {
                chunk.mark_dirty();
                self.mesh_queue.push_back(neighbor);
            }
        }
    }
}
