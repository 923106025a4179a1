//! Wildfire Spread Simulation Core Library
//!
//! A probabilistic cellular automaton for wildfire spread over a painted
//! terrain grid. Fire propagates to neighboring cells based on terrain
//! flammability, wind direction and speed, and per-terrain burn durations,
//! while per-tick metrics are aggregated for later charting or CSV export.
//!
//! The crate is UI-agnostic: map authoring, chart rendering and window
//! plumbing are external collaborators. They hand the engine a terrain
//! grid, parameters and ignition seeds, and read back grid snapshots and
//! the metrics series.

// Core value types
pub mod core_types;

// Terrain grid and map persistence
pub mod grid;

// Step engine and ignition probability model
pub mod engine;

// Controller and cancellation
pub mod simulation;

// Metrics aggregation
pub mod metrics;

// Validation and persistence errors
pub mod error;

// Re-export core types
pub use core_types::{BurnState, Cell, TerrainKind, WindDirection};
pub use core_types::{SimulationParameters, SimulationSpeed, MAX_WIND_SPEED};

// Re-export grid and persistence types
pub use grid::{load_map, save_map, Grid, MapRecord, CELL_SIZE};

// Re-export engine types
pub use engine::{apply_transitions, compute_tick, ignition_probability, Transition};

// Re-export controller and metrics types
pub use error::{PersistenceError, SimulationError};
pub use metrics::{MetricsEntry, SimulationMetrics};
pub use simulation::{CancelHandle, RunState, Simulation};
