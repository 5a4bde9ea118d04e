pub mod block;
pub mod chunk;
pub mod chunk_coord;
pub mod core;
pub mod generator;
pub mod sky;

pub use block::{BlockAnimation, BlockId, BlockInfo, BlockRegistry, RegistryError};
pub use chunk::Chunk;
pub use chunk_coord::ChunkCoord;
pub use core::World;
pub use generator::TerrainGenerator;
pub use sky::DayCycle;
