// World collision: sub-stepped sweep of a body's movement against solid tiles
//
// The movement is split into steps no longer than one world unit on either
// axis, so a sensor point can never skip over a solid cell. Each axis stops
// independently at its first solid sample and rests flush against that cell;
// Y is resolved before X. A step of one axis may not push the leading
// sensors of the other axis into a tile.

use glam::Vec2;

use super::body::{BodyState, Direction};
use crate::engine::tiles::TileGrid;

/// A solid tile met by one axis of a sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldHit {
    pub direction: Direction,
    /// Sensor point that landed on the solid cell
    pub point: Vec2,
}

/// Movement left after sweeping, plus at most one hit per axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SweepResult {
    pub movement: Vec2,
    pub vertical_hit: Option<WorldHit>,
    pub horizontal_hit: Option<WorldHit>,
}

impl SweepResult {
    fn unobstructed(movement: Vec2) -> Self {
        Self {
            movement,
            ..Self::default()
        }
    }

    /// Hits in callback order (vertical first)
    pub fn hits(&self) -> impl Iterator<Item = WorldHit> {
        self.vertical_hit.into_iter().chain(self.horizontal_hit)
    }
}

/// Sweep state of one axis: accumulated movement and whether it stopped
struct AxisSweep {
    direction: Direction,
    sensors: Vec<Vec2>,
    /// Leading edge coordinate before moving
    edge: f32,
    total: f32,
    step: f32,
    moved: f32,
    /// The sensors started clear; moves of the other axis must keep them clear
    guarded: bool,
    hit: Option<WorldHit>,
}

impl AxisSweep {
    fn new(direction: Direction, sensors: Vec<Vec2>, edge: f32, total: f32, step: f32, grid: &TileGrid) -> Self {
        let mut axis = Self {
            direction,
            sensors,
            edge,
            total,
            step,
            moved: 0.0,
            guarded: false,
            hit: None,
        };
        axis.guarded = step != 0.0 && axis.blocked(grid, Vec2::ZERO).is_none();
        axis
    }

    // Axes without movement never advance or sense
    fn active(&self) -> bool {
        self.hit.is_none() && self.step != 0.0
    }

    /// Axis movement after `count` of `steps` sub-steps
    fn target(&self, count: u64, steps: u64) -> f32 {
        if count == steps {
            self.total
        } else {
            self.step * count as f32
        }
    }

    /// First sensor sample on a solid cell with the body displaced by `offset`
    fn blocked(&self, grid: &TileGrid, offset: Vec2) -> Option<Vec2> {
        self.sensors
            .iter()
            .map(|sensor| *sensor + offset)
            .find(|point| grid.is_solid_at(*point))
    }

    /// Axis movement that leaves the leading edge against the cell holding `point`
    ///
    /// Rounded toward zero: an edge moving down or left may touch the cell
    /// boundary, an edge moving up or right stops short of it.
    fn flush(&self, grid: &TileGrid, point: Vec2) -> Option<f32> {
        let cell = grid.cell_bounds_at(point)?;
        let room = match self.direction {
            Direction::Down => cell.max.y - self.edge,
            Direction::Up => cell.min.y - self.edge,
            Direction::Left => cell.max.x - self.edge,
            Direction::Right => cell.min.x - self.edge,
        };
        let moved = if self.step < 0.0 {
            room.ceil().min(0.0)
        } else {
            (room.ceil() - 1.0).max(0.0)
        };
        Some(moved)
    }
}

/// Solid sample met by `axis` at `offset`, including the guarded sensors of `other`
fn obstruction(axis: &AxisSweep, other: &AxisSweep, grid: &TileGrid, offset: Vec2) -> Option<Vec2> {
    axis.blocked(grid, offset).or_else(|| {
        if other.guarded {
            other.blocked(grid, offset)
        } else {
            None
        }
    })
}

/// Move `axis` to `target`, or latch it flush against whatever it ran into
///
/// `offset` maps (axis movement, other axis movement) to a 2D offset.
fn advance(
    axis: &mut AxisSweep,
    other: &AxisSweep,
    target: f32,
    grid: &TileGrid,
    offset: impl Fn(f32, f32) -> Vec2,
) {
    let Some(point) = obstruction(axis, other, grid, offset(target, other.moved)) else {
        axis.moved = target;
        return;
    };

    // The flush position is taken only if it is clear as well; otherwise the
    // axis stays where the previous sub-step left it.
    if let Some(flush) = axis.flush(grid, point) {
        if obstruction(axis, other, grid, offset(flush, other.moved)).is_none() {
            axis.moved = flush;
        }
    }
    axis.hit = Some(WorldHit {
        direction: axis.direction,
        point,
    });
}

/// Sweep `movement` for `body` against the solid cells of `grid`
///
/// Returns the adjusted movement. The body itself is not modified.
pub fn sweep(body: &BodyState, movement: Vec2, grid: &TileGrid, sensor_inset: f32) -> SweepResult {
    if movement == Vec2::ZERO {
        return SweepResult::unobstructed(movement);
    }
    if !movement.is_finite() {
        log::warn!("Ignoring non-finite movement {:?} for body {:?}", movement, body.id());
        return SweepResult::unobstructed(Vec2::ZERO);
    }

    let steps = movement.x.abs().max(movement.y.abs()).ceil().max(1.0);
    let step = movement / steps;
    let steps = steps as u64;
    let spacing = grid.cell_size();
    let frame = body.physics_frame();

    let vertical_direction = Direction::vertical(movement.y);
    let horizontal_direction = Direction::horizontal(movement.x);
    let mut vertical = AxisSweep::new(
        vertical_direction,
        body.sensor_points(vertical_direction, spacing, sensor_inset),
        if movement.y < 0.0 { frame.min.y } else { frame.max.y },
        movement.y,
        step.y,
        grid,
    );
    let mut horizontal = AxisSweep::new(
        horizontal_direction,
        body.sensor_points(horizontal_direction, spacing, sensor_inset),
        if movement.x < 0.0 { frame.min.x } else { frame.max.x },
        movement.x,
        step.x,
        grid,
    );

    for count in 1..=steps {
        if vertical.active() {
            let target = vertical.target(count, steps);
            advance(&mut vertical, &horizontal, target, grid, |moved_y, moved_x| {
                Vec2::new(moved_x, moved_y)
            });
        }
        if horizontal.active() {
            let target = horizontal.target(count, steps);
            advance(&mut horizontal, &vertical, target, grid, |moved_x, moved_y| {
                Vec2::new(moved_x, moved_y)
            });
        }
        if !vertical.active() && !horizontal.active() {
            break;
        }
    }

    SweepResult {
        movement: Vec2::new(horizontal.moved, vertical.moved),
        vertical_hit: vertical.hit,
        horizontal_hit: horizontal.hit,
    }
}
