//! Grid cell with terrain and dynamic burn state

use serde::{Deserialize, Serialize};

use super::terrain::TerrainKind;

/// Burning state of a single cell
///
/// `Burned` is terminal: once a cell has burned out it never transitions
/// again for the remainder of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BurnState {
    /// Fire has not reached this cell
    Unburned,
    /// Cell is on fire and counting down its burn duration
    Burning,
    /// Cell has exhausted its fuel (terminal)
    Burned,
}

/// One grid unit with a terrain type, a position and a burning state
///
/// Coordinates are grid-cell indices with the origin at the top-left corner;
/// y grows southward. Terrain is fixed at map-authoring time, only the step
/// engine mutates the burn state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Column index
    pub x: u32,
    /// Row index
    pub y: u32,
    /// Terrain type, immutable during a run
    pub terrain: TerrainKind,
    /// Current burning state
    pub state: BurnState,
    /// Ticks since ignition; meaningless unless `state` is `Burning`
    pub burning_time: u32,
}

impl Cell {
    /// Create an unburned cell
    pub fn new(x: u32, y: u32, terrain: TerrainKind) -> Self {
        Cell {
            x,
            y,
            terrain,
            state: BurnState::Unburned,
            burning_time: 0,
        }
    }

    /// Maximum burn duration for this cell's terrain
    pub fn maximum_burning_time(&self) -> u32 {
        self.terrain.maximum_burning_time()
    }

    /// Whether the cell is currently on fire
    pub fn is_burning(&self) -> bool {
        self.state == BurnState::Burning
    }
}
