use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldGenConfig {
    pub seed: u32,
    /// Highest y still filled with water when the terrain dips below it.
    pub water_level: i32,
    /// Surface height above which the top block becomes snow.
    pub snow_line: i32,
    /// Tree-mask noise threshold; lower values grow denser forests.
    pub tree_threshold: f64,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            water_level: 32,
            snow_line: 60,
            tree_threshold: 0.6,
        }
    }
}
