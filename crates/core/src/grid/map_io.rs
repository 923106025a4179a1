//! Map document round-trip (JSON)
//!
//! A map is a row-major list of record rows, each record carrying the
//! left/top pixel offset of its rectangle and the painted terrain kind.
//! Offsets are multiples of [`CELL_SIZE`]; grid coordinates are derived by
//! dividing them out, so the on-disk shape matches what the map editor
//! produces.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core_types::TerrainKind;
use crate::error::{PersistenceError, SimulationError};
use crate::grid::Grid;

/// Size of one map rectangle in pixels
pub const CELL_SIZE: u32 = 10;

/// One painted rectangle of the map document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MapRecord {
    /// Horizontal pixel offset (multiple of [`CELL_SIZE`])
    pub left: u32,
    /// Vertical pixel offset (multiple of [`CELL_SIZE`])
    pub top: u32,
    /// Painted terrain kind
    pub terrain: TerrainKind,
}

/// Project a grid into its serializable map document
pub fn to_records(grid: &Grid) -> Vec<Vec<MapRecord>> {
    let mut rows = Vec::with_capacity(grid.height() as usize);
    for y in 0..grid.height() {
        let mut row = Vec::with_capacity(grid.width() as usize);
        for x in 0..grid.width() {
            row.push(MapRecord {
                left: x * CELL_SIZE,
                top: y * CELL_SIZE,
                terrain: grid.cell(x, y).terrain,
            });
        }
        rows.push(row);
    }
    rows
}

/// Build a grid from a deserialized map document
///
/// # Errors
/// Returns `EmptyMap` or `DimensionMismatch` when the record table is not
/// a non-empty rectangle.
pub fn from_records(rows: &[Vec<MapRecord>]) -> Result<Grid, SimulationError> {
    let terrain_rows: Vec<Vec<TerrainKind>> = rows
        .iter()
        .map(|row| row.iter().map(|record| record.terrain).collect())
        .collect();
    Grid::from_terrain_rows(&terrain_rows)
}

/// Load a map file into a grid
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or if the record
/// table fails rectangularity validation.
pub fn load_map<P: AsRef<Path>>(path: P) -> Result<Grid, PersistenceError> {
    let contents =
        fs::read_to_string(path).map_err(|e| PersistenceError::LoadFailed(e.to_string()))?;

    let rows: Vec<Vec<MapRecord>> =
        serde_json::from_str(&contents).map_err(|e| PersistenceError::ParseFailed(e.to_string()))?;

    Ok(from_records(&rows)?)
}

/// Save a grid as a map file
///
/// # Errors
/// Returns an error if the document cannot be serialized or written.
pub fn save_map<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<(), PersistenceError> {
    let contents = serde_json::to_string(&to_records(grid))
        .map_err(|e| PersistenceError::SerializeFailed(e.to_string()))?;

    fs::write(path, contents).map_err(|e| PersistenceError::SaveFailed(e.to_string()))?;

    Ok(())
}
