// Simulation tuning shared by the physics pipeline and the tile world

use glam::Vec2;

/// Physics and world configuration for a scene
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsConfig {
    // Integration
    /// Vertical acceleration applied to gravity-affected bodies (units/second²)
    pub gravity: f32,
    /// Largest time step a single frame may integrate (seconds)
    pub max_dt: f32,

    // World
    /// Edge length of one tile cell in world units
    pub tile_size: f32,
    /// World-space position of the bottom-left corner of the tile grid
    pub world_origin: Vec2,
    /// Health every destructible tile starts with
    pub tile_health: f32,
    /// Number of debris bodies spawned when a tile is destroyed
    pub debris_per_tile: usize,

    // Collision
    /// Distance sensor points are pulled in from the corners of a physics frame
    pub sensor_inset: f32,

    // Housekeeping
    /// Running frames between two cleanup passes
    pub cleanup_interval: u32,
    /// Distance outside the visible area after which bodies are purged
    pub remove_distance: f32,
}

/// Default configuration used by scenes unless overridden
pub const DEFAULT_CONFIG: PhysicsConfig = PhysicsConfig {
    gravity: -800.0,
    max_dt: 1.0 / 30.0,

    tile_size: 64.0,
    world_origin: Vec2::ZERO,
    tile_health: 100.0,
    debris_per_tile: 4,

    sensor_inset: 1.0,

    cleanup_interval: 60,
    remove_distance: 500.0,
};

impl Default for PhysicsConfig {
    fn default() -> Self {
        DEFAULT_CONFIG
    }
}

impl PhysicsConfig {
    /// Check the configuration for values the simulation cannot run with
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(format!("tile_size must be positive, got {}", self.tile_size));
        }
        if !(self.max_dt.is_finite() && self.max_dt > 0.0) {
            return Err(format!("max_dt must be positive, got {}", self.max_dt));
        }
        if !self.gravity.is_finite() {
            return Err("gravity must be finite".to_string());
        }
        if self.tile_health.is_nan() || self.tile_health <= 0.0 {
            return Err(format!("tile_health must be positive, got {}", self.tile_health));
        }
        if self.cleanup_interval == 0 {
            return Err("cleanup_interval must be at least one frame".to_string());
        }
        if self.sensor_inset < 0.0 || self.sensor_inset * 2.0 >= self.tile_size {
            return Err(format!(
                "sensor_inset must be in [0, tile_size / 2), got {}",
                self.sensor_inset
            ));
        }
        Ok(())
    }

    /// Return a copy with a different maximum time step
    pub fn with_max_dt(mut self, max_dt: f32) -> Self {
        self.max_dt = max_dt;
        self
    }

    /// Return a copy with a different debris count per destroyed tile
    pub fn with_debris_per_tile(mut self, count: usize) -> Self {
        self.debris_per_tile = count;
        self
    }

    /// Return a copy with the tile grid anchored at `origin`
    pub fn with_world_origin(mut self, origin: Vec2) -> Self {
        self.world_origin = origin;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PhysicsConfig::default().validate().is_ok());
        assert_eq!(PhysicsConfig::default(), DEFAULT_CONFIG);
    }

    #[test]
    fn test_rejects_non_positive_tile_size() {
        let config = PhysicsConfig {
            tile_size: 0.0,
            ..DEFAULT_CONFIG
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_positive_max_dt() {
        let config = PhysicsConfig::default().with_max_dt(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_cleanup_interval() {
        let config = PhysicsConfig {
            cleanup_interval: 0,
            ..DEFAULT_CONFIG
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder_helpers() {
        let config = PhysicsConfig::default()
            .with_debris_per_tile(7)
            .with_world_origin(Vec2::new(0.0, 120.0));
        assert_eq!(config.debris_per_tile, 7);
        assert_eq!(config.world_origin, Vec2::new(0.0, 120.0));
    }
}
