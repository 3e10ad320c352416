// Tile damage and destruction
//
// Damage is applied to the cell under the impact point and, for area
// damage, to every cell of the rectangle `impact ± half_extent`. The area is
// a rectangle: cells are not weighted by their distance from the impact.

use glam::Vec2;

use super::grid::{CellIndex, TileGrid};
use crate::engine::effects::{EffectKind, EffectPool};
use crate::engine::events::{WorldEvent, WorldEventQueue};
use crate::engine::physics::Body;

/// Damage dealt by a projectile or explosion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageSource {
    /// Damage to the tile under the impact point
    pub damage: f32,
    /// Damage to every tile in the area
    pub aoe_damage: f32,
    /// Half-size of the area rectangle; zero means no area damage
    pub aoe_extent: Vec2,
}

impl DamageSource {
    /// Single-tile damage only
    pub const fn flat(damage: f32) -> Self {
        Self {
            damage,
            aoe_damage: 0.0,
            aoe_extent: Vec2::ZERO,
        }
    }

    /// Add area damage over a rectangle of the given half-size
    pub const fn with_area(self, aoe_damage: f32, aoe_extent: Vec2) -> Self {
        Self {
            damage: self.damage,
            aoe_damage,
            aoe_extent,
        }
    }

    pub fn has_area(&self) -> bool {
        self.aoe_extent.x > 0.0 || self.aoe_extent.y > 0.0
    }
}

/// Outcome of a damage application
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DamageReport {
    /// Number of times a cell had health subtracted
    pub hits: usize,
    /// Cells destroyed, in destruction order
    pub destroyed: Vec<CellIndex>,
}

impl DamageReport {
    pub fn is_empty(&self) -> bool {
        self.hits == 0
    }
}

/// Applies damage to the grid and spawns the effects of destroyed tiles
pub struct DamageEngine<'a> {
    grid: &'a mut TileGrid,
    effects: &'a mut dyn EffectPool,
    spawns: &'a mut Vec<Body>,
    events: &'a mut WorldEventQueue,
    debris_per_tile: usize,
}

impl<'a> DamageEngine<'a> {
    pub fn new(
        grid: &'a mut TileGrid,
        effects: &'a mut dyn EffectPool,
        spawns: &'a mut Vec<Body>,
        events: &'a mut WorldEventQueue,
        debris_per_tile: usize,
    ) -> Self {
        Self {
            grid,
            effects,
            spawns,
            events,
            debris_per_tile,
        }
    }

    /// Damage the tile at a world position, plus the area around it
    ///
    /// Positions outside the grid have no effect.
    pub fn apply_damage(&mut self, at: Vec2, source: &DamageSource) -> DamageReport {
        let mut report = DamageReport::default();
        let Some(cell) = self.grid.cell_at(at) else {
            return report;
        };

        self.damage_cell(cell.row, cell.column, source.damage, &mut report);
        if source.has_area() {
            self.damage_area(at - self.grid.origin(), source, &mut report);
        }
        report
    }

    /// Area pass over the inclusive cell rectangle around a grid-local point
    fn damage_area(&mut self, local: Vec2, source: &DamageSource, report: &mut DamageReport) {
        let last_row = self.grid.rows() as i64 - 1;
        let last_column = self.grid.columns() as i64 - 1;

        let left = self.grid.column_of_local(local.x - source.aoe_extent.x).max(0);
        let right = self
            .grid
            .column_of_local(local.x + source.aoe_extent.x)
            .min(last_column);
        let bottom = self.grid.row_of_local(local.y - source.aoe_extent.y).max(0);
        let top = self.grid.row_of_local(local.y + source.aoe_extent.y).min(last_row);

        for column in left..=right {
            for row in bottom..=top {
                self.damage_cell(row as usize, column as usize, source.aoe_damage, report);
            }
        }
    }

    /// Subtract damage from one cell and destroy it when its health runs out
    fn damage_cell(&mut self, row: usize, column: usize, amount: f32, report: &mut DamageReport) {
        if !self.grid.is_solid(row, column) || !self.grid.is_destructible(row, column) {
            return;
        }
        if !self.grid.health(row, column).map_or(false, |health| health > 0.0) {
            return;
        }
        let Some(health) = self.grid.subtract_health(row, column, amount) else {
            return;
        };
        report.hits += 1;

        if health <= 0.0 {
            self.destroy(row, column);
            report.destroyed.push(CellIndex { row, column });
        } else {
            self.events.push(WorldEvent::TileDamaged {
                row,
                column,
                health,
            });
        }
    }

    /// Destroy a tile and scatter its debris
    ///
    /// Callers are expected to have checked the cell is still solid.
    /// Returns `false` for cells outside the grid.
    pub fn destroy(&mut self, row: usize, column: usize) -> bool {
        let Some(center) = self.grid.cell_center(row, column) else {
            return false;
        };
        debug_assert!(self.grid.is_solid(row, column), "destroying a non-solid tile");

        self.grid.clear_solid(row, column);
        self.events.push(WorldEvent::TileDestroyed {
            row,
            column,
            center,
        });
        log::debug!("Tile ({}, {}) destroyed", row, column);

        for _ in 0..self.debris_per_tile {
            self.spawn_effect(EffectKind::Debris, center);
        }
        self.spawn_effect(EffectKind::Dust, center);
        true
    }

    /// Destroy the tile containing a world position
    pub fn destroy_at(&mut self, point: Vec2) -> bool {
        match self.grid.cell_at(point) {
            Some(cell) if self.grid.is_solid(cell.row, cell.column) => {
                self.destroy(cell.row, cell.column)
            }
            _ => false,
        }
    }

    fn spawn_effect(&mut self, kind: EffectKind, at: Vec2) {
        match self.effects.acquire(kind) {
            Some(mut body) => {
                body.state.position = at;
                self.spawns.push(body);
            }
            None => log::debug!("No {:?} effect available, skipping", kind),
        }
    }
}
