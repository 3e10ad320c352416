// Tile world: authored tile maps, the mutable tile grid and destruction
//
// The grid is built once from the "World" tile layer and afterwards only
// changes through the damage engine.

mod damage;
mod grid;
mod tile_map;

pub use damage::{DamageEngine, DamageReport, DamageSource};
pub use grid::{CellIndex, TileGrid};
pub use tile_map::{MapLayers, TileDefinition, TileMap, TileSource, WORLD_LAYER};

/// World setup errors
///
/// These are fatal: a scene cannot start without a valid world.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("Tile map layer not found: {0}")]
    MissingTileMap(String),

    #[error("Tile map is empty ({rows} rows x {columns} columns)")]
    EmptyTileMap { rows: usize, columns: usize },

    #[error("Invalid tile '{symbol}' at line {line}, column {column}")]
    InvalidTile {
        symbol: char,
        line: usize,
        column: usize,
    },

    #[error("Tile map rows differ in width: expected {expected}, line {line} has {actual}")]
    RaggedRow {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
