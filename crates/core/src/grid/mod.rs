//! Terrain grid and map persistence

pub mod map_io;
pub mod simulation_grid;

// Re-export main types
pub use map_io::{load_map, save_map, MapRecord, CELL_SIZE};
pub use simulation_grid::Grid;
