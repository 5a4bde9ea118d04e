use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::world::chunk::Chunk;
use crate::world::chunk_coord::ChunkCoord;

/// Interleaved vertex as the shading stage consumes it. `material` selects
/// the shader path (0 default, 1 water, 1.1 glass, 3 debug lines), `anim`
/// carries the atlas animation as (start tile, frame count, speed).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct RenderVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 3],
    pub light: f32,
    pub material: f32,
    pub anim: [f32; 3],
}

/// CPU-side geometry for one chunk bucket.
#[derive(Debug, Default, Clone)]
pub struct MeshData {
    pub vertices: Vec<RenderVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Appends four vertices as two triangles wound 0,1,2 / 2,3,0.
    pub fn push_quad(&mut self, corners: [RenderVertex; 4]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&corners);
        self.indices.extend_from_slice(&[
            base,
            base + 1,
            base + 2,
            base + 2,
            base + 3,
            base,
        ]);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshBucket {
    Opaque,
    Translucent,
}

/// Receives finished chunk geometry. The engine core only ever talks to this
/// trait so a GPU uploader and the in-memory store used in tests are
/// interchangeable.
pub trait RenderSink {
    fn upload(&mut self, coord: ChunkCoord, bucket: MeshBucket, mesh: MeshData);
    fn release(&mut self, coord: ChunkCoord);
}

/// In-memory sink: keeps the latest geometry per chunk and answers draw-order
/// queries for the translucent pass.
#[derive(Default)]
pub struct BufferStore {
    meshes: HashMap<(ChunkCoord, MeshBucket), MeshData>,
}

impl BufferStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mesh(&self, coord: ChunkCoord, bucket: MeshBucket) -> Option<&MeshData> {
        self.meshes.get(&(coord, bucket))
    }

    pub fn chunk_count(&self) -> usize {
        let mut coords: Vec<ChunkCoord> =
            self.meshes.keys().map(|(coord, _)| *coord).collect();
        coords.sort_by_key(|c| (c.x, c.z));
        coords.dedup();
        coords.len()
    }

    pub fn total_indices(&self) -> usize {
        self.meshes.values().map(|mesh| mesh.indices.len()).sum()
    }

    /// Translucent chunks sorted far to near from the viewpoint, the order the
    /// alpha pass must draw them in.
    pub fn translucent_draw_order(&self, viewpoint: Vec3) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self
            .meshes
            .iter()
            .filter(|((_, bucket), mesh)| {
                *bucket == MeshBucket::Translucent && !mesh.is_empty()
            })
            .map(|((coord, _), _)| *coord)
            .collect();
        coords.sort_by(|a, b| {
            let da = chunk_center(*a).distance_squared(viewpoint);
            let db = chunk_center(*b).distance_squared(viewpoint);
            db.total_cmp(&da)
        });
        coords
    }

    /// The twelve edges of every resident chunk's bounding box as line
    /// segments, two vertices per line, for the debug overlay.
    pub fn chunk_bounds_lines(&self) -> Vec<RenderVertex> {
        let mut coords: Vec<ChunkCoord> =
            self.meshes.keys().map(|(coord, _)| *coord).collect();
        coords.sort_by_key(|c| (c.x, c.z));
        coords.dedup();

        let mut lines = Vec::with_capacity(coords.len() * 24);
        for coord in coords {
            let min = Vec3::new(
                (coord.x * Chunk::SIZE) as f32,
                0.0,
                (coord.z * Chunk::SIZE) as f32,
            );
            let max = min + Vec3::new(Chunk::SIZE as f32, Chunk::HEIGHT as f32, Chunk::SIZE as f32);
            let corners = [
                Vec3::new(min.x, min.y, min.z),
                Vec3::new(max.x, min.y, min.z),
                Vec3::new(max.x, min.y, max.z),
                Vec3::new(min.x, min.y, max.z),
                Vec3::new(min.x, max.y, min.z),
                Vec3::new(max.x, max.y, min.z),
                Vec3::new(max.x, max.y, max.z),
                Vec3::new(min.x, max.y, max.z),
            ];
            const EDGES: [(usize, usize); 12] = [
                (0, 1),
                (1, 2),
                (2, 3),
                (3, 0),
                (4, 5),
                (5, 6),
                (6, 7),
                (7, 4),
                (0, 4),
                (1, 5),
                (2, 6),
                (3, 7),
            ];
            for (a, b) in EDGES {
                lines.push(line_vertex(corners[a]));
                lines.push(line_vertex(corners[b]));
            }
        }
        lines
    }
}

impl RenderSink for BufferStore {
    fn upload(&mut self, coord: ChunkCoord, bucket: MeshBucket, mesh: MeshData) {
        if mesh.is_empty() {
            self.meshes.remove(&(coord, bucket));
        } else {
            self.meshes.insert((coord, bucket), mesh);
        }
    }

    fn release(&mut self, coord: ChunkCoord) {
        self.meshes.remove(&(coord, MeshBucket::Opaque));
        self.meshes.remove(&(coord, MeshBucket::Translucent));
    }
}

fn chunk_center(coord: ChunkCoord) -> Vec3 {
    Vec3::new(
        (coord.x * Chunk::SIZE) as f32 + Chunk::SIZE as f32 * 0.5,
        Chunk::HEIGHT as f32 * 0.5,
        (coord.z * Chunk::SIZE) as f32 + Chunk::SIZE as f32 * 0.5,
    )
}

fn line_vertex(position: Vec3) -> RenderVertex {
    RenderVertex {
        position: position.to_array(),
        normal: [0.0, 1.0, 0.0],
        uv: [0.0, 0.0],
        color: [1.0, 0.4, 0.1],
        light: 1.0,
        material: 3.0,
        anim: [0.0, 0.0, 0.0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_at(x: f32) -> MeshData {
        let mut mesh = MeshData::default();
        let vertex = |px: f32| RenderVertex {
            position: [px, 0.0, 0.0],
            normal: [0.0, 1.0, 0.0],
            uv: [0.0, 0.0],
            color: [1.0; 3],
            light: 1.0,
            material: 1.0,
            anim: [0.0; 3],
        };
        mesh.push_quad([vertex(x), vertex(x), vertex(x), vertex(x)]);
        mesh
    }

    #[test]
    fn quad_winding() {
        let mesh = quad_at(0.0);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 2, 3, 0]);
    }

    #[test]
    fn empty_upload_clears_slot() {
        let mut store = BufferStore::new();
        let coord = ChunkCoord { x: 0, z: 0 };
        store.upload(coord, MeshBucket::Opaque, quad_at(0.0));
        assert_eq!(store.total_indices(), 6);
        store.upload(coord, MeshBucket::Opaque, MeshData::default());
        assert_eq!(store.total_indices(), 0);
    }

    #[test]
    fn translucent_sorted_far_to_near() {
        let mut store = BufferStore::new();
        let near = ChunkCoord { x: 0, z: 0 };
        let far = ChunkCoord { x: 8, z: 0 };
        store.upload(near, MeshBucket::Translucent, quad_at(0.0));
        store.upload(far, MeshBucket::Translucent, quad_at(128.0));
        let order = store.translucent_draw_order(Vec3::new(8.0, 64.0, 8.0));
        assert_eq!(order, vec![far, near]);
    }

    #[test]
    fn bounds_lines_cover_all_edges() {
        let mut store = BufferStore::new();
        store.upload(ChunkCoord { x: 0, z: 0 }, MeshBucket::Opaque, quad_at(0.0));
        store.upload(ChunkCoord { x: 1, z: 0 }, MeshBucket::Translucent, quad_at(16.0));
        let lines = store.chunk_bounds_lines();
        assert_eq!(lines.len(), 2 * 12 * 2);
        assert!(lines.iter().all(|v| v.material == 3.0));
    }
}
