pub mod core;
pub mod sky;
pub mod streaming;
pub mod worldgen;

pub use core::{ConfigError, EngineConfig};
pub use sky::SkyConfig;
pub use streaming::StreamingConfig;
pub use worldgen::WorldGenConfig;
