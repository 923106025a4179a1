//! Rectangular terrain grid addressed by (column, row)
//!
//! The grid has a fixed shape for the lifetime of a run and stores cells in
//! row-major order (`y * width + x`). Only burn state and burn time mutate
//! during a run; terrain is fixed when the grid is built.

use serde::{Deserialize, Serialize};

use crate::core_types::{BurnState, Cell, TerrainKind};
use crate::error::SimulationError;

/// Fixed-shape rectangular grid of cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Number of columns
    width: u32,
    /// Number of rows
    height: u32,
    /// Cells in row-major order (`y * width + x`)
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid from row-major terrain rows
    ///
    /// # Errors
    /// Returns `EmptyMap` for zero rows or columns and `DimensionMismatch`
    /// when rows have differing lengths.
    pub fn from_terrain_rows(rows: &[Vec<TerrainKind>]) -> Result<Self, SimulationError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(SimulationError::EmptyMap);
        }
        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(SimulationError::DimensionMismatch {
                    row: row_index,
                    expected: width,
                    actual: row.len(),
                });
            }
        }

        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            for (x, terrain) in row.iter().enumerate() {
                cells.push(Cell::new(x as u32, y as u32, *terrain));
            }
        }

        Ok(Grid {
            width: width as u32,
            height: height as u32,
            cells,
        })
    }

    /// Build a grid of uniform terrain
    ///
    /// # Errors
    /// Returns `EmptyMap` if either dimension is zero.
    pub fn uniform(width: u32, height: u32, terrain: TerrainKind) -> Result<Self, SimulationError> {
        if width == 0 || height == 0 {
            return Err(SimulationError::EmptyMap);
        }
        let rows = vec![vec![terrain; width as usize]; height as usize];
        Grid::from_terrain_rows(&rows)
    }

    /// Number of columns
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows
    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }

    /// Cell at (`x`, `y`), if the coordinates are inside the grid
    pub fn get(&self, x: u32, y: u32) -> Option<&Cell> {
        if x < self.width && y < self.height {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Cell at (`x`, `y`)
    ///
    /// # Panics
    /// Panics if the coordinates are outside the grid; callers are expected
    /// to have validated them.
    pub fn cell(&self, x: u32, y: u32) -> &Cell {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        &self.cells[self.index(x, y)]
    }

    pub(crate) fn cell_mut(&mut self, x: u32, y: u32) -> &mut Cell {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        let index = self.index(x, y);
        &mut self.cells[index]
    }

    /// Iterate over all cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// The up-to-8 compass-adjacent cells of (`x`, `y`), clipped at edges
    ///
    /// The order is fixed (orthogonals north/south/west/east, then the four
    /// diagonals) so a tick's wind classification is deterministic.
    ///
    /// # Panics
    /// Panics if the coordinates are outside the grid.
    pub fn neighbors(&self, x: u32, y: u32) -> Vec<&Cell> {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );

        const OFFSETS: [(i64, i64); 8] = [
            (0, -1),
            (0, 1),
            (-1, 0),
            (1, 0),
            (-1, -1),
            (1, -1),
            (-1, 1),
            (1, 1),
        ];

        let mut neighbors = Vec::with_capacity(8);
        for (dx, dy) in OFFSETS {
            let nx = i64::from(x) + dx;
            let ny = i64::from(y) + dy;
            if nx >= 0 && ny >= 0 && nx < i64::from(self.width) && ny < i64::from(self.height) {
                neighbors.push(&self.cells[self.index(nx as u32, ny as u32)]);
            }
        }
        neighbors
    }

    /// Count of cells currently burning
    pub fn burning_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_burning()).count()
    }

    /// Count of vegetation cells (forest, grassland, plain)
    pub fn vegetation_count(&self) -> u32 {
        self.cells
            .iter()
            .filter(|cell| cell.terrain.is_vegetation())
            .count() as u32
    }

    /// Count of cells that can burn at all
    pub fn flammable_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.terrain.is_flammable())
            .count()
    }

    /// Manually set a cell on fire (user seeding before a run)
    ///
    /// # Errors
    /// Returns `OutOfBounds` for coordinates outside the grid,
    /// `NotFlammable` for terrain that cannot burn, and `AlreadyBurned` for
    /// a burned-out cell.
    pub fn ignite(&mut self, x: u32, y: u32) -> Result<(), SimulationError> {
        if x >= self.width || y >= self.height {
            return Err(SimulationError::OutOfBounds { x, y });
        }
        let cell = self.cell_mut(x, y);
        if !cell.terrain.is_flammable() {
            return Err(SimulationError::NotFlammable { x, y });
        }
        if cell.state == BurnState::Burned {
            return Err(SimulationError::AlreadyBurned { x, y });
        }
        cell.state = BurnState::Burning;
        cell.burning_time = 0;
        Ok(())
    }

    /// Manually put out a burning cell, returning it to unburned
    ///
    /// # Errors
    /// Returns `OutOfBounds` for coordinates outside the grid and
    /// `AlreadyBurned` for a burned-out cell.
    pub fn extinguish(&mut self, x: u32, y: u32) -> Result<(), SimulationError> {
        if x >= self.width || y >= self.height {
            return Err(SimulationError::OutOfBounds { x, y });
        }
        let cell = self.cell_mut(x, y);
        if cell.state == BurnState::Burned {
            return Err(SimulationError::AlreadyBurned { x, y });
        }
        cell.state = BurnState::Unburned;
        cell.burning_time = 0;
        Ok(())
    }
}
