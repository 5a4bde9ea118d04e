use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::config::SkyConfig;

// Cloud texture drift in uv units per second.
const CLOUD_WIND: Vec2 = Vec2::new(0.008, 0.003);

/// Day/night state advanced once per frame. Produces the sun direction, the
/// colour/fog parameters and the cloud-layer animation state a shading stage
/// consumes.
pub struct DayCycle {
    time_of_day: f32,
    speed: f32,
    sun_dir: Vec3,
    sun_color: Vec3,
    ambient_color: Vec3,
    sky_color: Vec3,
    fog_density: f32,
    cloud_offset: Vec2,
    cloud_time: f32,
}

impl DayCycle {
    pub fn new(config: &SkyConfig) -> Self {
        let mut cycle = Self {
            time_of_day: config.start_time.rem_euclid(1.0),
            speed: config.day_speed,
            sun_dir: Vec3::new(0.5, 0.8, 0.2).normalize(),
            sun_color: Vec3::ONE,
            ambient_color: Vec3::splat(0.2),
            sky_color: Vec3::new(0.55, 0.72, 0.92),
            fog_density: 0.002,
            cloud_offset: Vec2::ZERO,
            cloud_time: 0.0,
        };
        cycle.advance(0.0);
        cycle
    }

    pub fn advance(&mut self, dt: f32) {
        self.cloud_time += dt;
        self.cloud_offset += CLOUD_WIND * dt;
        self.time_of_day = (self.time_of_day + dt * self.speed).rem_euclid(1.0);
        let angle = self.time_of_day * TAU;
        self.sun_dir = Vec3::new(
            angle.cos() * 0.8,
            angle.sin(),
            (angle * 0.7).sin(),
        )
        .normalize();

        let sun_amount = (self.sun_dir.y * 0.5 + 0.5).clamp(0.05, 1.0);
        self.sun_color = Vec3::new(0.9, 0.65, 0.4).lerp(Vec3::new(1.0, 0.98, 0.92), sun_amount);
        self.ambient_color =
            Vec3::new(0.1, 0.12, 0.2).lerp(Vec3::new(0.38, 0.45, 0.55), sun_amount);
        self.sky_color = Vec3::new(0.05, 0.05, 0.1).lerp(Vec3::new(0.55, 0.72, 0.92), sun_amount);
        // Thicker fog at night.
        self.fog_density = 0.0032 + (0.0015 - 0.0032) * sun_amount;
    }

    pub fn time_of_day(&self) -> f32 {
        self.time_of_day
    }

    pub fn sun_direction(&self) -> Vec3 {
        self.sun_dir
    }

    pub fn sun_color(&self) -> Vec3 {
        self.sun_color
    }

    pub fn ambient_color(&self) -> Vec3 {
        self.ambient_color
    }

    pub fn sky_color(&self) -> Vec3 {
        self.sky_color
    }

    pub fn fog_density(&self) -> f32 {
        self.fog_density
    }

    /// Current uv offset of the cloud layer.
    pub fn cloud_offset(&self) -> Vec2 {
        self.cloud_offset
    }

    /// Accumulated cloud animation time in seconds.
    pub fn cloud_time(&self) -> f32 {
        self.cloud_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_wraps() {
        let mut cycle = DayCycle::new(&SkyConfig {
            start_time: 0.9,
            day_speed: 0.5,
        });
        cycle.advance(1.0);
        assert!(cycle.time_of_day() < 1.0);
        assert!(cycle.time_of_day() >= 0.0);
    }

    #[test]
    fn clouds_drift_with_wind() {
        let mut cycle = DayCycle::new(&SkyConfig::default());
        assert_eq!(cycle.cloud_offset(), Vec2::ZERO);
        for _ in 0..10 {
            cycle.advance(0.5);
        }
        assert!((cycle.cloud_time() - 5.0).abs() < 1e-5);
        let expected = CLOUD_WIND * 5.0;
        assert!((cycle.cloud_offset() - expected).length() < 1e-5);
    }

    #[test]
    fn noon_is_brighter_than_midnight() {
        let config = SkyConfig {
            start_time: 0.25, // sun overhead
            day_speed: 0.0,
        };
        let noon = DayCycle::new(&config);
        let midnight = DayCycle::new(&SkyConfig {
            start_time: 0.75,
            day_speed: 0.0,
        });
        assert!(noon.sun_direction().y > 0.0);
        assert!(midnight.sun_direction().y < 0.0);
        assert!(noon.sky_color().length() > midnight.sky_color().length());
        assert!(noon.fog_density() < midnight.fog_density());
    }
}
