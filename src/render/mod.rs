pub mod mesh;
pub mod mesher;

pub use mesh::{BufferStore, MeshBucket, MeshData, RenderSink, RenderVertex};
pub use mesher::{build_chunk_mesh, BlockSampler, ChunkMeshes, TintSampler};
