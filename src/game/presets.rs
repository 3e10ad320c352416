// Preset body configurations for common game objects

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::actors::{Runner, RunnerStats, Target};
use super::constants::*;
use super::effects::{Debris, TimedEffect};
use super::projectile::Projectile;
use crate::engine::effects::{EffectKind, RecyclingPool, DEFAULT_POOL_CAPACITY};
use crate::engine::physics::{Body, BodyBuilder, BodyTag};

/// The player: runs right, survives cleanup
pub fn runner(x: f32, y: f32, stats: RunnerStats) -> Body {
    BodyBuilder::new(BodyTag::Actor)
        .position(x, y)
        .size(RUNNER_SIZE.x, RUNNER_SIZE.y)
        .frame_scale(RUNNER_FRAME_SCALE.x, RUNNER_FRAME_SCALE.y)
        .persistent()
        .behavior(Runner::new(stats))
        .build()
}

/// Bullet fired from `from` toward `toward`, exploding on enemies and tiles
pub fn bullet(from: Vec2, toward: Vec2) -> Body {
    let direction = (toward - from).try_normalize().unwrap_or(Vec2::X);
    let velocity = direction * BULLET_SPEED;
    BodyBuilder::new(BodyTag::Projectile)
        .position(from.x, from.y)
        .velocity(velocity.x, velocity.y)
        .rotation(direction.y.atan2(direction.x))
        .size(BULLET_SIZE.x, BULLET_SIZE.y)
        .frame_scale(BULLET_FRAME_SCALE.x, BULLET_FRAME_SCALE.y)
        .gravity(0.0)
        .damage(BULLET_DAMAGE)
        .behavior(Projectile::new(BodyTag::Enemy))
        .build()
}

/// Muzzle position of a runner centered at `runner_center`
pub fn muzzle(runner_center: Vec2) -> Vec2 {
    runner_center + RUNNER_SIZE * RUNNER_MUZZLE_OFFSET
}

/// Enemy standing on the ground until shot down
pub fn target(x: f32, y: f32) -> Body {
    BodyBuilder::new(BodyTag::Enemy)
        .position(x, y)
        .size(TARGET_SIZE.x, TARGET_SIZE.y)
        .behavior(Target::new(TARGET_HEALTH))
        .build()
}

/// Tile fragment; thrown on every reuse
pub fn debris(seed: u64) -> Body {
    BodyBuilder::new(BodyTag::Debris)
        .size(DEBRIS_SIZE.x, DEBRIS_SIZE.y)
        .gravity(DEBRIS_GRAVITY)
        .world_collision(false)
        .body_collision(false)
        .effect(EffectKind::Debris)
        .behavior(Debris::new(seed))
        .build()
}

fn timed_effect(kind: EffectKind, size: Vec2, behavior: TimedEffect) -> Body {
    BodyBuilder::new(BodyTag::Effect)
        .size(size.x, size.y)
        .gravity(0.0)
        .world_collision(false)
        .body_collision(false)
        .effect(kind)
        .behavior(behavior)
        .build()
}

pub fn dust() -> Body {
    timed_effect(EffectKind::Dust, DUST_SIZE, TimedEffect::dust())
}

pub fn smoke() -> Body {
    timed_effect(EffectKind::Smoke, SMOKE_SIZE, TimedEffect::smoke())
}

/// Effect pool with every kind registered and preloaded
///
/// Debris scatter is driven by `seed`, so the same seed replays the same
/// fragments.
pub fn effect_pool(seed: u64) -> RecyclingPool {
    let mut pool = RecyclingPool::new(DEFAULT_POOL_CAPACITY);

    let mut seeds = StdRng::seed_from_u64(seed);
    pool.register(EffectKind::Debris, move || Some(debris(seeds.random())));
    pool.register(EffectKind::Dust, || Some(dust()));
    pool.register(EffectKind::Smoke, || Some(smoke()));

    pool.preload(EffectKind::Debris, PRELOAD_DEBRIS);
    pool.preload(EffectKind::Dust, PRELOAD_DUST);
    pool.preload(EffectKind::Smoke, PRELOAD_SMOKE);
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::effects::EffectPool;

    #[test]
    fn test_bullet_flies_toward_target() {
        let body = bullet(Vec2::new(0.0, 0.0), Vec2::new(0.0, 10.0));
        assert_eq!(body.state.velocity, Vec2::new(0.0, BULLET_SPEED));
        assert!(!body.state.capabilities.gravity);
        assert_eq!(body.state.damage, Some(BULLET_DAMAGE));
        assert!((body.state.rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_bullet_without_direction_fires_right() {
        let body = bullet(Vec2::ONE, Vec2::ONE);
        assert_eq!(body.state.velocity, Vec2::new(BULLET_SPEED, 0.0));
    }

    #[test]
    fn test_runner_physics_frame() {
        let body = runner(100.0, 100.0, RunnerStats::default());
        let frame = body.state.physics_frame();
        assert_eq!(frame.width(), 72.0);
        assert_eq!(frame.height(), 144.0);
        assert!(body.state.persistent);
    }

    #[test]
    fn test_effects_skip_collisions() {
        for body in [debris(1), dust(), smoke()] {
            assert!(!body.state.capabilities.world_collision);
            assert!(!body.state.capabilities.body_collision);
            assert!(body.state.effect.is_some());
        }
        assert!(debris(1).state.capabilities.gravity);
        assert!(!smoke().state.capabilities.gravity);
    }

    #[test]
    fn test_effect_pool_is_preloaded() {
        let mut pool = effect_pool(3);
        assert_eq!(pool.available(EffectKind::Debris), PRELOAD_DEBRIS);
        assert_eq!(pool.available(EffectKind::Dust), PRELOAD_DUST);
        assert_eq!(pool.available(EffectKind::Smoke), PRELOAD_SMOKE);

        let debris = pool.acquire(EffectKind::Debris).unwrap();
        assert!(debris.state.velocity.y > 0.0, "Reused debris is thrown upward");
        assert!(debris.state.spin.is_some());
    }
}
