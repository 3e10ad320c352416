// Gameplay tuning constants
//
// World-level physics values (gravity, tile size, max dt) live in
// `PhysicsConfig`; everything here only shapes the bodies the game adds.

use glam::Vec2;

use crate::engine::tiles::DamageSource;

// Runner
/// Size of the runner sprite
pub const RUNNER_SIZE: Vec2 = Vec2::new(180.0, 180.0);
/// Part of the sprite used for the physics frame
pub const RUNNER_FRAME_SCALE: Vec2 = Vec2::new(0.4, 0.8);
/// Horizontal speed, matching the camera scroll speed
pub const RUNNER_SPEED: f32 = 400.0;
pub const RUNNER_JUMP_SPEED: f32 = 800.0;
/// Where bullets leave the runner, as a fraction of its size from the center
pub const RUNNER_MUZZLE_OFFSET: Vec2 = Vec2::new(0.22, 0.0);

// Bullets
pub const BULLET_SIZE: Vec2 = Vec2::new(50.0, 50.0);
pub const BULLET_FRAME_SCALE: Vec2 = Vec2::new(0.8, 0.8);
pub const BULLET_SPEED: f32 = 1500.0;
/// A bullet breaks a full-health tile in two hits and chips its neighbours
pub const BULLET_DAMAGE: DamageSource =
    DamageSource::flat(60.0).with_area(20.0, Vec2::new(64.0, 64.0));

// Targets
pub const TARGET_SIZE: Vec2 = Vec2::new(100.0, 140.0);
pub const TARGET_HEALTH: f32 = 100.0;

// Debris
pub const DEBRIS_SIZE: Vec2 = Vec2::new(16.0, 16.0);
/// Debris falls slower than the rest of the world
pub const DEBRIS_GRAVITY: f32 = 0.6;
/// Horizontal launch speed range (units/second)
pub const DEBRIS_SCATTER_X: f32 = 250.0;
/// Vertical launch speed range (units/second)
pub const DEBRIS_LAUNCH_Y: (f32, f32) = (150.0, 450.0);
/// Spin rate range (radians/second)
pub const DEBRIS_SPIN_RATE: f32 = 10.0;
pub const DEBRIS_SPIN_DURATION: f32 = 1.5;

// Timed effects (seconds)
pub const SMOKE_SIZE: Vec2 = Vec2::new(128.0, 128.0);
pub const SMOKE_HOLD: f32 = 0.4;
pub const SMOKE_FADE: f32 = 1.0;
pub const DUST_SIZE: Vec2 = Vec2::new(96.0, 96.0);
pub const DUST_HOLD: f32 = 0.0;
pub const DUST_FADE: f32 = 0.8;

// Pool preload amounts
pub const PRELOAD_DEBRIS: usize = 20;
pub const PRELOAD_DUST: usize = 8;
pub const PRELOAD_SMOKE: usize = 8;
