// Behaviors of pooled effect bodies

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::constants::*;
use crate::engine::physics::{BodyBehavior, BodyState, FrameContext, Spin};

/// Tile fragment thrown out of a destroyed tile
///
/// Each reuse picks a new launch velocity and spin. Debris never collides;
/// it falls out of view and is purged by the scene cleanup.
pub struct Debris {
    rng: StdRng,
}

impl Debris {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Throw the fragment in a random upward direction
    fn scatter(&mut self, body: &mut BodyState) {
        let (min_y, max_y) = DEBRIS_LAUNCH_Y;
        body.velocity = Vec2::new(
            self.rng.random_range(-DEBRIS_SCATTER_X..=DEBRIS_SCATTER_X),
            self.rng.random_range(min_y..=max_y),
        );
        body.rotation = 0.0;
        body.spin = Some(Spin {
            rate: self.rng.random_range(-DEBRIS_SPIN_RATE..=DEBRIS_SPIN_RATE),
            remaining: DEBRIS_SPIN_DURATION,
        });
    }
}

impl BodyBehavior for Debris {
    fn on_reuse(&mut self, body: &mut BodyState) {
        self.scatter(body);
    }
}

/// Effect that stays for `hold` seconds, fades for `fade` seconds, then leaves
#[derive(Debug, Clone, Copy)]
pub struct TimedEffect {
    hold: f32,
    fade: f32,
    elapsed: f32,
}

impl TimedEffect {
    pub fn new(hold: f32, fade: f32) -> Self {
        Self {
            hold,
            fade,
            elapsed: 0.0,
        }
    }

    pub fn smoke() -> Self {
        Self::new(SMOKE_HOLD, SMOKE_FADE)
    }

    pub fn dust() -> Self {
        Self::new(DUST_HOLD, DUST_FADE)
    }

    pub fn lifetime(&self) -> f32 {
        self.hold + self.fade
    }

    /// 1.0 while holding, then linearly down to 0.0
    pub fn opacity(&self) -> f32 {
        if self.elapsed <= self.hold {
            return 1.0;
        }
        if self.fade <= 0.0 {
            return 0.0;
        }
        (1.0 - (self.elapsed - self.hold) / self.fade).clamp(0.0, 1.0)
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed >= self.lifetime()
    }
}

impl BodyBehavior for TimedEffect {
    fn on_pre_frame(&mut self, body: &mut BodyState, ctx: &mut FrameContext<'_>) {
        self.elapsed += ctx.dt;
        if self.is_expired() {
            body.remove_from_world();
        }
    }

    fn on_reuse(&mut self, _body: &mut BodyState) {
        self.elapsed = 0.0;
    }
}
