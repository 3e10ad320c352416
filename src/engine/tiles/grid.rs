// Tile grid: solidity, destructibility and health per cell
//
// Every world-space lookup goes through `TileGrid::index_of`, which floors
// `(coordinate - origin) / cell_size`. Sensor sampling, damage targeting and
// solidity queries all share it, so a point on a cell boundary always belongs
// to the cell above / to the right of that boundary.

use glam::Vec2;

use super::tile_map::TileSource;
use super::WorldError;
use crate::core::math::Rect;

/// Row/column of a grid cell (row 0 is the bottom row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellIndex {
    pub row: usize,
    pub column: usize,
}

/// Mutable grid derived from the authored world layer
#[derive(Debug, Clone)]
pub struct TileGrid {
    origin: Vec2,
    cell_size: f32,
    rows: usize,
    columns: usize,
    solid: Vec<bool>,
    destructible: Vec<bool>,
    health: Vec<f32>,
}

impl TileGrid {
    /// Build the grid from a tile source
    ///
    /// Every cell starts with `initial_health`; it only matters for solid,
    /// destructible cells.
    pub fn build(
        source: &dyn TileSource,
        origin: Vec2,
        cell_size: f32,
        initial_health: f32,
    ) -> Result<Self, WorldError> {
        let rows = source.rows();
        let columns = source.columns();
        if rows == 0 || columns == 0 {
            return Err(WorldError::EmptyTileMap { rows, columns });
        }
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(WorldError::InvalidConfig(format!(
                "cell size must be positive, got {}",
                cell_size
            )));
        }

        let mut solid = vec![false; rows * columns];
        let mut destructible = vec![false; rows * columns];
        for row in 0..rows {
            for column in 0..columns {
                if let Some(definition) = source.tile_definition(row, column) {
                    let index = row * columns + column;
                    solid[index] = definition.solid();
                    destructible[index] = definition.destructible_flag();
                }
            }
        }

        let grid = Self {
            origin,
            cell_size,
            rows,
            columns,
            solid,
            destructible,
            health: vec![initial_health; rows * columns],
        };
        log::debug!(
            "Built {}x{} tile grid with {} solid cells",
            rows,
            columns,
            grid.solid_count()
        );
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// World-space area covered by the grid
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(
            self.origin,
            Vec2::new(self.columns as f32, self.rows as f32) * self.cell_size,
        )
    }

    /// Signed (row, column) for a world position, possibly outside the grid
    pub fn index_of(&self, point: Vec2) -> (i64, i64) {
        let local = (point - self.origin) / self.cell_size;
        (local.y.floor() as i64, local.x.floor() as i64)
    }

    /// Column index for a local x coordinate, possibly outside the grid
    pub(crate) fn column_of_local(&self, x: f32) -> i64 {
        (x / self.cell_size).floor() as i64
    }

    /// Row index for a local y coordinate, possibly outside the grid
    pub(crate) fn row_of_local(&self, y: f32) -> i64 {
        (y / self.cell_size).floor() as i64
    }

    /// Cell containing a world position, `None` outside the grid
    pub fn cell_at(&self, point: Vec2) -> Option<CellIndex> {
        let (row, column) = self.index_of(point);
        self.checked(row, column)
    }

    /// Validate signed indices against the grid dimensions
    pub fn checked(&self, row: i64, column: i64) -> Option<CellIndex> {
        if row < 0 || column < 0 || row >= self.rows as i64 || column >= self.columns as i64 {
            return None;
        }
        Some(CellIndex {
            row: row as usize,
            column: column as usize,
        })
    }

    fn offset(&self, row: usize, column: usize) -> Option<usize> {
        (row < self.rows && column < self.columns).then(|| row * self.columns + column)
    }

    /// Whether the cell is solid; out-of-range cells never are
    pub fn is_solid(&self, row: usize, column: usize) -> bool {
        self.offset(row, column).map_or(false, |i| self.solid[i])
    }

    /// Whether the cell containing `point` is solid
    pub fn is_solid_at(&self, point: Vec2) -> bool {
        self.cell_at(point)
            .map_or(false, |cell| self.is_solid(cell.row, cell.column))
    }

    /// Whether the cell was authored as destructible
    pub fn is_destructible(&self, row: usize, column: usize) -> bool {
        self.offset(row, column).map_or(false, |i| self.destructible[i])
    }

    /// Remaining health of a cell
    pub fn health(&self, row: usize, column: usize) -> Option<f32> {
        self.offset(row, column).map(|i| self.health[i])
    }

    /// Subtract damage from a cell and return the new health
    pub(crate) fn subtract_health(&mut self, row: usize, column: usize, amount: f32) -> Option<f32> {
        let index = self.offset(row, column)?;
        self.health[index] -= amount;
        Some(self.health[index])
    }

    /// Mark a cell as no longer solid
    pub(crate) fn clear_solid(&mut self, row: usize, column: usize) {
        if let Some(index) = self.offset(row, column) {
            self.solid[index] = false;
        }
    }

    /// World-space bounds of a cell
    pub fn cell_bounds(&self, row: usize, column: usize) -> Option<Rect> {
        self.offset(row, column)?;
        let min = self.origin + Vec2::new(column as f32, row as f32) * self.cell_size;
        Some(Rect::from_origin_size(min, Vec2::splat(self.cell_size)))
    }

    /// World-space center of a cell
    pub fn cell_center(&self, row: usize, column: usize) -> Option<Vec2> {
        self.cell_bounds(row, column).map(|bounds| bounds.center())
    }

    /// Bounds of the cell containing `point`
    pub fn cell_bounds_at(&self, point: Vec2) -> Option<Rect> {
        let cell = self.cell_at(point)?;
        self.cell_bounds(cell.row, cell.column)
    }

    /// Number of solid cells left in the grid
    pub fn solid_count(&self) -> usize {
        self.solid.iter().filter(|solid| **solid).count()
    }
}
