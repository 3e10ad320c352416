// Authored tile maps and the layers a scene is built from

use std::collections::HashMap;

use super::WorldError;

/// Name of the tile layer holding the solid world
pub const WORLD_LAYER: &str = "World";

/// Attributes attached to a tile by the level author
///
/// Missing attributes are treated as `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileDefinition {
    pub is_solid: Option<bool>,
    pub is_destructible: Option<bool>,
}

impl TileDefinition {
    /// Solid tile that projectiles can destroy
    pub const fn destructible() -> Self {
        Self {
            is_solid: Some(true),
            is_destructible: Some(true),
        }
    }

    /// Solid tile that cannot be damaged
    pub const fn indestructible() -> Self {
        Self {
            is_solid: Some(true),
            is_destructible: Some(false),
        }
    }

    /// Tile with no authored attributes (background decoration)
    pub const fn decoration() -> Self {
        Self {
            is_solid: None,
            is_destructible: None,
        }
    }

    pub fn solid(&self) -> bool {
        self.is_solid.unwrap_or(false)
    }

    pub fn destructible_flag(&self) -> bool {
        self.is_destructible.unwrap_or(false)
    }
}

/// Row/column indexed source of tile definitions
///
/// Row 0 is the bottom row of the map.
pub trait TileSource {
    fn rows(&self) -> usize;
    fn columns(&self) -> usize;
    /// Definition of the tile at a cell, `None` when the cell is empty
    fn tile_definition(&self, row: usize, column: usize) -> Option<TileDefinition>;
}

/// In-memory tile map
#[derive(Debug, Clone, PartialEq)]
pub struct TileMap {
    rows: usize,
    columns: usize,
    cells: Vec<Option<TileDefinition>>,
}

impl TileMap {
    /// Create an empty map
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![None; rows * columns],
        }
    }

    /// Build a map from text, first line being the top row
    ///
    /// `#` destructible solid, `=` indestructible solid, `~` decoration,
    /// `.` or space empty.
    pub fn from_ascii(lines: &[&str]) -> Result<Self, WorldError> {
        let rows = lines.len();
        let columns = lines.first().map(|line| line.chars().count()).unwrap_or(0);
        let mut map = Self::new(rows, columns);

        for (line_index, line) in lines.iter().enumerate() {
            let width = line.chars().count();
            if width != columns {
                return Err(WorldError::RaggedRow {
                    line: line_index,
                    expected: columns,
                    actual: width,
                });
            }

            let row = rows - 1 - line_index;
            for (column, symbol) in line.chars().enumerate() {
                let definition = match symbol {
                    '#' => Some(TileDefinition::destructible()),
                    '=' => Some(TileDefinition::indestructible()),
                    '~' => Some(TileDefinition::decoration()),
                    '.' | ' ' => None,
                    _ => {
                        return Err(WorldError::InvalidTile {
                            symbol,
                            line: line_index,
                            column,
                        })
                    }
                };
                map.set(row, column, definition);
            }
        }

        Ok(map)
    }

    /// Place (or clear) a tile; out-of-range cells are ignored
    pub fn set(&mut self, row: usize, column: usize, definition: Option<TileDefinition>) {
        if row < self.rows && column < self.columns {
            self.cells[row * self.columns + column] = definition;
        }
    }
}

impl TileSource for TileMap {
    fn rows(&self) -> usize {
        self.rows
    }

    fn columns(&self) -> usize {
        self.columns
    }

    fn tile_definition(&self, row: usize, column: usize) -> Option<TileDefinition> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.cells[row * self.columns + column]
    }
}

/// Named tile layers of a level
#[derive(Debug, Default)]
pub struct MapLayers {
    layers: HashMap<String, TileMap>,
}

impl MapLayers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a layer
    pub fn insert(&mut self, name: &str, map: TileMap) {
        self.layers.insert(name.to_string(), map);
    }

    /// Builder-style variant of [`MapLayers::insert`]
    pub fn with_layer(mut self, name: &str, map: TileMap) -> Self {
        self.insert(name, map);
        self
    }

    pub fn get(&self, name: &str) -> Option<&TileMap> {
        self.layers.get(name)
    }

    /// The layer holding the solid world
    pub fn world(&self) -> Result<&TileMap, WorldError> {
        self.get(WORLD_LAYER)
            .ok_or_else(|| WorldError::MissingTileMap(WORLD_LAYER.to_string()))
    }
}
