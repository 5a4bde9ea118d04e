use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingConfig {
    /// Radius, in chunks, that must stay loaded around the viewpoint.
    pub render_distance: i32,
    /// Extra chunks beyond `render_distance` kept alive before eviction.
    pub evict_margin: i32,
    /// Maximum number of chunk meshes rebuilt per frame.
    pub remesh_budget: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            render_distance: 8,
            evict_margin: 2,
            remesh_budget: 2,
        }
    }
}
