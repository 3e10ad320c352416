// Actors: the auto-running player body and shootable targets

use glam::Vec2;

use super::constants::*;
use crate::engine::physics::{BodyBehavior, BodySnapshot, BodyState, BodyTag, Direction, FrameContext};

/// Runner movement properties
#[derive(Debug, Clone)]
pub struct RunnerStats {
    /// Horizontal speed (units/second)
    pub speed: f32,
    /// Upward speed given by a jump
    pub jump_speed: f32,
    /// Jump automatically when running into a wall
    pub auto_jump: bool,
}

pub const BASE_RUNNER: RunnerStats = RunnerStats {
    speed: RUNNER_SPEED,
    jump_speed: RUNNER_JUMP_SPEED,
    auto_jump: true,
};

impl Default for RunnerStats {
    fn default() -> Self {
        BASE_RUNNER
    }
}

/// Player body that keeps running right and hops over walls
#[derive(Debug, Clone)]
pub struct Runner {
    stats: RunnerStats,
    grounded: bool,
    blocked: bool,
}

impl Runner {
    pub fn new(stats: RunnerStats) -> Self {
        Self {
            stats,
            grounded: false,
            blocked: false,
        }
    }
}

impl BodyBehavior for Runner {
    fn on_pre_frame(&mut self, body: &mut BodyState, _ctx: &mut FrameContext<'_>) {
        body.velocity.x = self.stats.speed;
        if self.grounded && self.blocked && self.stats.auto_jump {
            body.velocity.y = self.stats.jump_speed;
        }
        // Hits of this frame set them again
        self.grounded = false;
        self.blocked = false;
    }

    fn on_world_hit(
        &mut self,
        body: &mut BodyState,
        direction: Direction,
        _point: Vec2,
        _ctx: &mut FrameContext<'_>,
    ) {
        match direction {
            Direction::Down => {
                self.grounded = true;
                body.velocity.y = 0.0;
            }
            Direction::Up => body.velocity.y = body.velocity.y.min(0.0),
            Direction::Left | Direction::Right => {
                self.blocked = true;
                body.velocity.x = 0.0;
            }
        }
    }
}

/// Standing enemy that loses health when hit by projectiles
#[derive(Debug, Clone, Copy)]
pub struct Target {
    health: f32,
}

impl Target {
    pub fn new(health: f32) -> Self {
        Self { health }
    }

    pub fn health(&self) -> f32 {
        self.health
    }
}

impl BodyBehavior for Target {
    fn on_world_hit(
        &mut self,
        body: &mut BodyState,
        direction: Direction,
        _point: Vec2,
        _ctx: &mut FrameContext<'_>,
    ) {
        if direction == Direction::Down {
            body.velocity = Vec2::ZERO;
        }
    }

    fn on_body_collision(
        &mut self,
        body: &mut BodyState,
        other: &BodySnapshot,
        _ctx: &mut FrameContext<'_>,
    ) {
        if other.tag != BodyTag::Projectile {
            return;
        }
        let Some(source) = other.damage else {
            return;
        };
        self.health -= source.damage;
        if self.health <= 0.0 {
            log::debug!("Target {:?} destroyed", body.id());
            body.remove_from_world();
        }
    }
}
