//! Core value types shared across the simulation

pub mod cell;
pub mod params;
pub mod terrain;
pub mod wind;

// Re-export main types
pub use cell::{BurnState, Cell};
pub use params::{SimulationParameters, SimulationSpeed, MAX_WIND_SPEED};
pub use terrain::TerrainKind;
pub use wind::WindDirection;
