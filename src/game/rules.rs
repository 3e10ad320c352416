// Win and lose conditions checked after every simulated frame

use crate::engine::game_loop::Outcome;
use crate::engine::physics::{BodyId, PhysicsWorld};
use crate::engine::tiles::TileGrid;

/// Decides whether a running scene is over
pub trait OutcomeRule {
    /// Called after physics on every simulated frame; `None` keeps playing
    fn evaluate(&mut self, world: &PhysicsWorld, grid: &TileGrid) -> Option<Outcome>;
}

/// Scene that never ends on its own
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOutcome;

impl OutcomeRule for NoOutcome {
    fn evaluate(&mut self, _world: &PhysicsWorld, _grid: &TileGrid) -> Option<Outcome> {
        None
    }
}

/// Follows one body: it wins by reaching `finish_x`, loses by falling below
/// `death_y` or leaving the world
#[derive(Debug, Clone, Copy)]
pub struct TrackedBodyRule {
    body: BodyId,
    finish_x: f32,
    death_y: f32,
}

impl TrackedBodyRule {
    pub fn new(body: BodyId, finish_x: f32, death_y: f32) -> Self {
        Self {
            body,
            finish_x,
            death_y,
        }
    }

    /// Finish at the right edge of the grid, die below its bottom edge
    pub fn across(body: BodyId, grid: &TileGrid) -> Self {
        let bounds = grid.bounds();
        Self::new(body, bounds.max.x, bounds.min.y)
    }
}

impl OutcomeRule for TrackedBodyRule {
    fn evaluate(&mut self, world: &PhysicsWorld, _grid: &TileGrid) -> Option<Outcome> {
        let Some(body) = world.body(self.body) else {
            return Some(Outcome::Lost);
        };
        let frame = body.physics_frame();
        if frame.max.y < self.death_y {
            Some(Outcome::Lost)
        } else if frame.min.x >= self.finish_x {
            Some(Outcome::Won)
        } else {
            None
        }
    }
}
