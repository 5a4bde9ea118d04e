use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkyConfig {
    /// Time of day at startup, wrapped into [0, 1).
    pub start_time: f32,
    /// Fraction of a full day advanced per simulated second.
    pub day_speed: f32,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            start_time: 0.3,
            day_speed: 0.0033,
        }
    }
}
