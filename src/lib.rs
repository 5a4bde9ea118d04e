//! Voxel world engine: chunked procedural terrain, greedy surface meshing
//! with per-vertex ambient occlusion, chunk streaming around a viewpoint and
//! DDA block picking. Rendering proper is left to a [`render::RenderSink`]
//! implementation; this crate produces the vertex and index data it draws.

pub mod atlas;
pub mod config;
pub mod raycast;
pub mod render;
pub mod world;

pub use atlas::TextureAtlas;
pub use config::EngineConfig;
pub use raycast::RayHit;
pub use render::{BufferStore, MeshBucket, RenderSink};
pub use world::{BlockId, BlockRegistry, Chunk, ChunkCoord, World};
