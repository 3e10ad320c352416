// Projectile behavior: damage the world where the shot lands

use glam::Vec2;

use crate::engine::effects::EffectKind;
use crate::engine::physics::{BodyBehavior, BodySnapshot, BodyState, BodyTag, Direction, FrameContext};

/// Bullet that explodes on the first solid tile or target it touches
#[derive(Debug, Clone, Copy)]
pub struct Projectile {
    /// Bodies with this tag make the projectile explode on contact
    target: BodyTag,
    exploded: bool,
}

impl Projectile {
    pub fn new(target: BodyTag) -> Self {
        Self {
            target,
            exploded: false,
        }
    }

    pub fn has_exploded(&self) -> bool {
        self.exploded
    }

    /// Damage the grid at `at`, leave smoke and take the body out of the world
    fn explode(&mut self, body: &mut BodyState, at: Vec2, ctx: &mut FrameContext<'_>) {
        if self.exploded {
            return;
        }
        self.exploded = true;

        if let Some(source) = body.damage {
            let report = ctx.apply_damage(at, &source);
            if !report.destroyed.is_empty() {
                log::debug!(
                    "Projectile {:?} destroyed {} tiles",
                    body.id(),
                    report.destroyed.len()
                );
            }
        }
        ctx.spawn_effect(EffectKind::Smoke, at);
        body.remove_from_world();
    }
}

impl BodyBehavior for Projectile {
    fn on_world_hit(
        &mut self,
        body: &mut BodyState,
        _direction: Direction,
        point: Vec2,
        ctx: &mut FrameContext<'_>,
    ) {
        self.explode(body, point, ctx);
    }

    fn on_body_collision(
        &mut self,
        body: &mut BodyState,
        other: &BodySnapshot,
        ctx: &mut FrameContext<'_>,
    ) {
        if other.tag == self.target {
            let at = body.position;
            self.explode(body, at, ctx);
        }
    }
}
