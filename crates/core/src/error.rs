//! Error types for simulation validation and persistence
//!
//! Validation errors are explicit rejections surfaced to the caller;
//! the engine never silently proceeds past them. Persistence errors wrap
//! file and format failures when loading or saving maps and parameters.

use std::fmt;

/// Validation and control-surface errors
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Starting a run with no burning cell seeded
    NoBurningCells,
    /// Wind direction string is not one of the 8 compass names
    InvalidWindDirection(String),
    /// Wind speed outside the supported range (0-67 m/s) or non-finite
    InvalidWindSpeed(f64),
    /// Map rows have inconsistent lengths
    DimensionMismatch {
        /// Row index with the unexpected length
        row: usize,
        /// Length of the first row
        expected: usize,
        /// Length of the offending row
        actual: usize,
    },
    /// Map contains no cells
    EmptyMap,
    /// Coordinates outside the grid
    OutOfBounds {
        /// X coordinate (column)
        x: u32,
        /// Y coordinate (row)
        y: u32,
    },
    /// Attempt to ignite terrain that cannot burn
    NotFlammable {
        /// X coordinate (column)
        x: u32,
        /// Y coordinate (row)
        y: u32,
    },
    /// Attempt to ignite or extinguish a cell that has already burned out
    AlreadyBurned {
        /// X coordinate (column)
        x: u32,
        /// Y coordinate (row)
        y: u32,
    },
    /// Control operation invalid in the current run state
    InvalidTransition {
        /// State the simulation was in
        state: &'static str,
        /// Operation that was rejected
        action: &'static str,
    },
    /// Grid edits are only permitted while the simulation is not running
    EditWhileRunning,
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::NoBurningCells => {
                write!(f, "at least one burning cell is required to start a run")
            }
            SimulationError::InvalidWindDirection(name) => {
                write!(f, "unrecognized wind direction: {name}")
            }
            SimulationError::InvalidWindSpeed(speed) => {
                write!(f, "wind speed {speed} outside supported range 0-67 m/s")
            }
            SimulationError::DimensionMismatch {
                row,
                expected,
                actual,
            } => write!(
                f,
                "map row {row} has {actual} cells, expected {expected}"
            ),
            SimulationError::EmptyMap => write!(f, "map contains no cells"),
            SimulationError::OutOfBounds { x, y } => {
                write!(f, "coordinates ({x}, {y}) are outside the grid")
            }
            SimulationError::NotFlammable { x, y } => {
                write!(f, "cell ({x}, {y}) has non-flammable terrain")
            }
            SimulationError::AlreadyBurned { x, y } => {
                write!(f, "cell ({x}, {y}) has already burned out")
            }
            SimulationError::InvalidTransition { state, action } => {
                write!(f, "cannot {action} while {state}")
            }
            SimulationError::EditWhileRunning => {
                write!(f, "grid edits are not permitted while the simulation is running")
            }
        }
    }
}

impl std::error::Error for SimulationError {}

/// Errors that can occur with persistence operations
#[derive(Debug)]
pub enum PersistenceError {
    /// Failed to load file
    LoadFailed(String),
    /// Failed to parse file contents
    ParseFailed(String),
    /// Failed to serialize state
    SerializeFailed(String),
    /// Failed to save file
    SaveFailed(String),
    /// File contents parsed but failed validation
    Validation(SimulationError),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::LoadFailed(msg) => write!(f, "Failed to load: {msg}"),
            PersistenceError::ParseFailed(msg) => write!(f, "Failed to parse: {msg}"),
            PersistenceError::SerializeFailed(msg) => write!(f, "Failed to serialize: {msg}"),
            PersistenceError::SaveFailed(msg) => write!(f, "Failed to save: {msg}"),
            PersistenceError::Validation(err) => write!(f, "Invalid contents: {err}"),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SimulationError> for PersistenceError {
    fn from(err: SimulationError) -> Self {
        PersistenceError::Validation(err)
    }
}
