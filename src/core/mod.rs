// Core utilities shared by the engine and the game layer

pub mod config;
pub mod math;

pub use config::{PhysicsConfig, DEFAULT_CONFIG};
pub use math::Rect;
