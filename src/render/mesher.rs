use bytemuck::Zeroable;
use glam::{IVec3, Vec3};

use crate::render::mesh::{MeshData, RenderVertex};
use crate::world::block::{BlockId, BlockInfo, BlockRegistry};
use crate::world::chunk::Chunk;

/// World-space block lookup used while meshing. Implemented by closures so a
/// chunk under test and the live world can both feed the mesher.
pub trait BlockSampler {
    fn block_at(&self, pos: IVec3) -> BlockId;
}

impl<F> BlockSampler for F
where
    F: Fn(IVec3) -> BlockId,
{
    fn block_at(&self, pos: IVec3) -> BlockId {
        self(pos)
    }
}

/// Per-quad colour lookup, position is the centre of the anchor block.
pub trait TintSampler {
    fn tint_at(&self, pos: Vec3, id: BlockId, face: usize) -> Vec3;
}

impl<F> TintSampler for F
where
    F: Fn(Vec3, BlockId, usize) -> Vec3,
{
    fn tint_at(&self, pos: Vec3, id: BlockId, face: usize) -> Vec3 {
        self(pos, id, face)
    }
}

struct FaceDesc {
    offset: IVec3,
    normal: [f32; 3],
    // Unit-quad corners for a block at the origin, wound so that
    // corner k carries BASE_UV[k].
    corners: [[f32; 3]; 4],
    d_axis: usize,
    u_axis: usize,
    v_axis: usize,
    base_light: f32,
}

// Order: +X, -X, +Y, -Y, +Z, -Z. Top faces are lit harder than bottoms.
const FACES: [FaceDesc; 6] = [
    FaceDesc {
        offset: IVec3::new(1, 0, 0),
        normal: [1.0, 0.0, 0.0],
        corners: [
            [1.0, 0.0, 1.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [1.0, 1.0, 1.0],
        ],
        d_axis: 0,
        u_axis: 2,
        v_axis: 1,
        base_light: 0.92,
    },
    FaceDesc {
        offset: IVec3::new(-1, 0, 0),
        normal: [-1.0, 0.0, 0.0],
        corners: [
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 1.0, 1.0],
            [0.0, 1.0, 0.0],
        ],
        d_axis: 0,
        u_axis: 2,
        v_axis: 1,
        base_light: 0.92,
    },
    FaceDesc {
        offset: IVec3::new(0, 1, 0),
        normal: [0.0, 1.0, 0.0],
        corners: [
            [0.0, 1.0, 1.0],
            [1.0, 1.0, 1.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ],
        d_axis: 1,
        u_axis: 0,
        v_axis: 2,
        base_light: 1.2,
    },
    FaceDesc {
        offset: IVec3::new(0, -1, 0),
        normal: [0.0, -1.0, 0.0],
        corners: [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 0.0, 1.0],
            [0.0, 0.0, 1.0],
        ],
        d_axis: 1,
        u_axis: 0,
        v_axis: 2,
        base_light: 0.7,
    },
    FaceDesc {
        offset: IVec3::new(0, 0, 1),
        normal: [0.0, 0.0, 1.0],
        corners: [
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
            [0.0, 1.0, 1.0],
        ],
        d_axis: 2,
        u_axis: 0,
        v_axis: 1,
        base_light: 1.0,
    },
    FaceDesc {
        offset: IVec3::new(0, 0, -1),
        normal: [0.0, 0.0, -1.0],
        corners: [
            [1.0, 0.0, 0.0],
            [0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
        ],
        d_axis: 2,
        u_axis: 0,
        v_axis: 1,
        base_light: 1.0,
    },
];

const BASE_UV: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

fn axis_size(axis: usize) -> i32 {
    if axis == 1 {
        Chunk::HEIGHT
    } else {
        Chunk::SIZE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct MaskEntry {
    id: BlockId,
    visible: bool,
}

/// Smooth per-vertex occlusion: the two edge neighbours and the diagonal of
/// the corner, sampled one step out along the face normal. Two occluding
/// edges darken fully no matter what the diagonal holds.
fn vertex_ao(
    block_pos: IVec3,
    face: usize,
    corner: usize,
    registry: &BlockRegistry,
    sampler: &impl BlockSampler,
) -> f32 {
    let desc = &FACES[face];
    let c = desc.corners[corner];
    let sx = if c[0] > 0.5 { 1 } else { -1 };
    let sy = if c[1] > 0.5 { 1 } else { -1 };
    let sz = if c[2] > 0.5 { 1 } else { -1 };

    let (side1, side2) = match face {
        0 | 1 => (IVec3::new(0, sy, 0), IVec3::new(0, 0, sz)),
        2 | 3 => (IVec3::new(sx, 0, 0), IVec3::new(0, 0, sz)),
        _ => (IVec3::new(sx, 0, 0), IVec3::new(0, sy, 0)),
    };

    let base = block_pos + desc.offset;
    let edge1 = registry.occludes(sampler.block_at(base + side1));
    let edge2 = registry.occludes(sampler.block_at(base + side2));
    let diagonal = registry.occludes(sampler.block_at(base + side1 + side2));

    let mut occlusion = edge1 as i32 + edge2 as i32 + diagonal as i32;
    if edge1 && edge2 {
        occlusion = 3;
    }
    1.0 - occlusion as f32 * 0.25
}

fn anim_data(info: &BlockInfo, tile: u32) -> [f32; 3] {
    let frames = info.animation.frames.max(1) as f32;
    let speed = if info.animation.frames > 1 {
        info.animation.speed
    } else {
        0.0
    };
    [tile as f32, frames, speed]
}

/// Geometry for one chunk, split into the two draw passes.
#[derive(Debug, Default)]
pub struct ChunkMeshes {
    pub opaque: MeshData,
    pub translucent: MeshData,
}

impl ChunkMeshes {
    pub fn is_empty(&self) -> bool {
        self.opaque.is_empty() && self.translucent.is_empty()
    }
}

/// Greedy-meshes a chunk: per face direction, sweep slices along the face
/// normal, collect a visibility mask, merge equal runs into maximal
/// rectangles and emit one quad each. Billboards are skipped by the mask and
/// emitted as crossed quads afterwards.
pub fn build_chunk_mesh(
    chunk: &Chunk,
    registry: &BlockRegistry,
    sampler: &impl BlockSampler,
    tints: &impl TintSampler,
) -> ChunkMeshes {
    let mut meshes = ChunkMeshes::default();
    let origin = chunk.world_origin();

    for (face_index, face) in FACES.iter().enumerate() {
        let d_size = axis_size(face.d_axis);
        let u_size = axis_size(face.u_axis);
        let v_size = axis_size(face.v_axis);
        let mut mask = vec![MaskEntry::default(); (u_size * v_size) as usize];

        for i in 0..d_size {
            let mut q = [0i32; 3];
            q[face.d_axis] = i;

            let mut n = 0usize;
            for v in 0..v_size {
                q[face.v_axis] = v;
                for u in 0..u_size {
                    q[face.u_axis] = u;
                    let id = chunk.block(q[0], q[1], q[2]);
                    let mut visible = false;
                    if id != BlockId::Air {
                        let info = registry.info(id);
                        if !info.billboard {
                            let neighbor = sampler.block_at(
                                IVec3::new(origin.x + q[0], q[1], origin.z + q[2])
                                    + face.offset,
                            );
                            // Liquids render their surface even against
                            // occluders so submerged geometry stays visible.
                            visible = !(registry.occludes(neighbor) && !info.liquid);
                        }
                    }
                    mask[n] = MaskEntry { id, visible };
                    n += 1;
                }
            }

            let mut n = 0usize;
            for v in 0..v_size {
                for u in 0..u_size {
                    if !mask[n].visible {
                        n += 1;
                        continue;
                    }
                    let entry = mask[n];

                    let mut width = 1i32;
                    while u + width < u_size && mask[n + width as usize] == entry {
                        width += 1;
                    }

                    let mut height = 1i32;
                    'grow: while v + height < v_size {
                        for k in 0..width {
                            let idx = n + k as usize + (height * u_size) as usize;
                            if mask[idx] != entry {
                                break 'grow;
                            }
                        }
                        height += 1;
                    }

                    let id = entry.id;
                    let info = registry.info(id);
                    let mut anchor = [0i32; 3];
                    anchor[face.d_axis] = i;
                    anchor[face.u_axis] = u;
                    anchor[face.v_axis] = v;
                    let base = Vec3::new(
                        (origin.x + anchor[0]) as f32,
                        anchor[1] as f32,
                        (origin.z + anchor[2]) as f32,
                    );
                    let tint = tints.tint_at(base + Vec3::splat(0.5), id, face_index);
                    let color = (tint + Vec3::splat(info.emission)).to_array();
                    let anim = anim_data(info, info.faces[face_index]);

                    let mut corners = [RenderVertex::zeroed(); 4];
                    for k in 0..4 {
                        let template = face.corners[k];
                        // Corners on the far side of the rectangle follow the
                        // expansion, anchor-side corners stay put.
                        let mut position = [
                            base.x + template[0],
                            base.y + template[1],
                            base.z + template[2],
                        ];
                        if template[face.u_axis] > 0.5 {
                            position[face.u_axis] += (width - 1) as f32;
                        }
                        if template[face.v_axis] > 0.5 {
                            position[face.v_axis] += (height - 1) as f32;
                        }

                        let mut ao_block = anchor;
                        if template[face.u_axis] > 0.5 {
                            ao_block[face.u_axis] += width - 1;
                        }
                        if template[face.v_axis] > 0.5 {
                            ao_block[face.v_axis] += height - 1;
                        }
                        let world_block = IVec3::new(
                            origin.x + ao_block[0],
                            ao_block[1],
                            origin.z + ao_block[2],
                        );
                        let ao = vertex_ao(world_block, face_index, k, registry, sampler);
                        let light =
                            (face.base_light * ao + info.emission).clamp(0.2, 1.0);

                        // UVs tile across the merged rectangle.
                        let mut uv = BASE_UV[k];
                        if uv[0] > 0.5 {
                            uv[0] = width as f32;
                        }
                        if uv[1] > 0.5 {
                            uv[1] = height as f32;
                        }

                        corners[k] = RenderVertex {
                            position,
                            normal: face.normal,
                            uv,
                            color,
                            light,
                            material: info.material,
                            anim,
                        };
                    }

                    let target = if info.transparent || info.liquid {
                        &mut meshes.translucent
                    } else {
                        &mut meshes.opaque
                    };
                    target.push_quad(corners);

                    for h in 0..height {
                        for w in 0..width {
                            mask[n + w as usize + (h * u_size) as usize].visible = false;
                        }
                    }
                    n += 1;
                }
            }
        }
    }

    build_billboards(chunk, registry, tints, &mut meshes.translucent);

    meshes
}

// Cross-quad pass for flowers and grass tufts, which the greedy mask skips.
fn build_billboards(
    chunk: &Chunk,
    registry: &BlockRegistry,
    tints: &impl TintSampler,
    target: &mut MeshData,
) {
    const CROSS_A: [[f32; 3]; 4] = [
        [-0.5, 0.0, 0.0],
        [0.5, 0.0, 0.0],
        [0.5, 1.0, 0.0],
        [-0.5, 1.0, 0.0],
    ];
    const CROSS_B: [[f32; 3]; 4] = [
        [0.0, 0.0, -0.5],
        [0.0, 0.0, 0.5],
        [0.0, 1.0, 0.5],
        [0.0, 1.0, -0.5],
    ];

    let origin = chunk.world_origin();
    for y in 0..Chunk::HEIGHT {
        for z in 0..Chunk::SIZE {
            for x in 0..Chunk::SIZE {
                let id = chunk.block(x, y, z);
                if id == BlockId::Air {
                    continue;
                }
                let info = registry.info(id);
                if !info.billboard {
                    continue;
                }

                let base = Vec3::new(
                    (origin.x + x) as f32,
                    y as f32,
                    (origin.z + z) as f32,
                );
                // Top-face tile so the tint matches surrounding foliage.
                let tint = tints.tint_at(base + Vec3::splat(0.5), id, 2);
                let color = (tint + Vec3::splat(info.emission)).to_array();
                let anim = anim_data(info, info.faces[2]);
                let center = base + Vec3::new(0.5, 0.0, 0.5);

                for offsets in [CROSS_A, CROSS_B] {
                    let mut corners = [RenderVertex::zeroed(); 4];
                    for k in 0..4 {
                        corners[k] = RenderVertex {
                            position: (center
                                + Vec3::from_array(offsets[k]))
                            .to_array(),
                            normal: [0.0, 1.0, 0.0],
                            uv: BASE_UV[k],
                            color,
                            light: 1.0,
                            material: info.material,
                            anim,
                        };
                    }
                    target.push_quad(corners);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::TextureAtlas;
    use crate::world::chunk_coord::ChunkCoord;

    fn registry() -> BlockRegistry {
        BlockRegistry::build(&TextureAtlas::with_default_tiles()).unwrap()
    }

    fn mesh(chunk: &Chunk, registry: &BlockRegistry) -> ChunkMeshes {
        let sampler = |pos: IVec3| chunk.block(pos.x, pos.y, pos.z);
        let tints = |_pos: Vec3, _id: BlockId, _face: usize| Vec3::ONE;
        build_chunk_mesh(chunk, registry, &sampler, &tints)
    }

    #[test]
    fn solid_cube_merges_to_six_quads() {
        let registry = registry();
        let mut chunk = Chunk::new(ChunkCoord { x: 0, z: 0 });
        for y in 10..13 {
            for z in 6..9 {
                for x in 6..9 {
                    chunk.set_block(x, y, z, BlockId::Stone);
                }
            }
        }
        let meshes = mesh(&chunk, &registry);
        assert_eq!(meshes.opaque.vertices.len(), 24);
        assert_eq!(meshes.opaque.indices.len(), 36);
        assert!(meshes.translucent.is_empty());
    }

    #[test]
    fn row_merges_along_its_axis() {
        let registry = registry();
        let mut chunk = Chunk::new(ChunkCoord { x: 0, z: 0 });
        for x in 5..8 {
            chunk.set_block(x, 10, 5, BlockId::Stone);
        }
        let meshes = mesh(&chunk, &registry);
        // 4 long faces merged to one quad each, plus the two 1x1 caps.
        assert_eq!(meshes.opaque.vertices.len(), 24);
        let max_u = meshes
            .opaque
            .vertices
            .iter()
            .map(|v| v.uv[0])
            .fold(0.0f32, f32::max);
        assert_eq!(max_u, 3.0);
    }

    #[test]
    fn different_ids_do_not_merge() {
        let registry = registry();
        let mut chunk = Chunk::new(ChunkCoord { x: 0, z: 0 });
        chunk.set_block(5, 10, 5, BlockId::Stone);
        chunk.set_block(6, 10, 5, BlockId::Sand);
        let meshes = mesh(&chunk, &registry);
        // 5 exposed faces each, none shared across the id boundary.
        assert_eq!(meshes.opaque.vertices.len(), 40);
    }

    #[test]
    fn billboard_becomes_crossed_quads() {
        let registry = registry();
        let mut chunk = Chunk::new(ChunkCoord { x: 0, z: 0 });
        chunk.set_block(5, 10, 5, BlockId::Poppy);
        let meshes = mesh(&chunk, &registry);
        assert!(meshes.opaque.is_empty());
        assert_eq!(meshes.translucent.vertices.len(), 8);
        assert_eq!(meshes.translucent.indices.len(), 12);
        assert!(meshes
            .translucent
            .vertices
            .iter()
            .all(|v| v.light == 1.0));
    }

    #[test]
    fn liquid_faces_survive_solid_neighbors() {
        let registry = registry();
        let mut chunk = Chunk::new(ChunkCoord { x: 0, z: 0 });
        chunk.set_block(5, 10, 5, BlockId::Water);
        chunk.set_block(6, 10, 5, BlockId::Stone);
        let meshes = mesh(&chunk, &registry);
        // All six water faces emit, including the one against the stone.
        assert_eq!(meshes.translucent.vertices.len(), 24);
        assert!(meshes
            .translucent
            .vertices
            .iter()
            .all(|v| v.anim[1] == 32.0 && v.material == 1.0));
    }

    #[test]
    fn diagonal_neighbor_darkens_one_corner() {
        let registry = registry();
        let mut chunk = Chunk::new(ChunkCoord { x: 0, z: 0 });
        chunk.set_block(8, 10, 8, BlockId::Stone);
        chunk.set_block(9, 11, 9, BlockId::Stone);
        let meshes = mesh(&chunk, &registry);
        let mut lights: Vec<f32> = meshes
            .opaque
            .vertices
            .iter()
            .filter(|v| {
                v.normal == [0.0, 1.0, 0.0]
                    && v.position[1] == 11.0
                    && v.position[0] >= 8.0
                    && v.position[0] <= 9.0
                    && v.position[2] >= 8.0
                    && v.position[2] <= 9.0
            })
            .map(|v| v.light)
            .collect();
        lights.sort_by(f32::total_cmp);
        assert_eq!(lights.len(), 4);
        assert!((lights[0] - 0.9).abs() < 1e-5);
        assert!(lights[1..].iter().all(|&l| (l - 1.0).abs() < 1e-5));
    }
}
