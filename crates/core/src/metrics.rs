//! Time-series metrics derived from each tick's transition set
//!
//! Four append-only series share a common tick index: burning area, burned
//! area, burning speed (newly ignited cells per tick) and the cumulative
//! percentage of damaged vegetation. Index 0 is seeded from the pre-run
//! grid; every applied tick appends exactly one entry to each series.

use serde::{Deserialize, Serialize};

use crate::core_types::BurnState;
use crate::engine::Transition;
use crate::grid::Grid;

/// One tick's snapshot across all four series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsEntry {
    /// Tick index this entry belongs to
    pub tick: usize,
    /// Cells burning at the end of the tick
    pub burning_area: u32,
    /// Cells burned out so far (non-decreasing)
    pub burned_area: u32,
    /// Cells newly ignited during the tick
    pub burning_speed: u32,
    /// Cumulative damaged vegetation as a percentage of `total_vegetation`
    pub damaged_vegetation: f64,
}

/// Metrics collected over one simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationMetrics {
    /// Vegetation cells on the map at run start, fixed for the run
    total_vegetation: u32,
    burning_area: Vec<u32>,
    burned_area: Vec<u32>,
    burning_speed: Vec<u32>,
    damaged_vegetation: Vec<f64>,
}

impl SimulationMetrics {
    /// Seed the index-0 entries from the pre-tick grid state
    pub fn seeded_from(grid: &Grid) -> Self {
        let total_vegetation = grid.vegetation_count();
        let initially_burning = grid.burning_count() as u32;
        let burning_vegetation = grid
            .cells()
            .filter(|cell| cell.is_burning() && cell.terrain.is_vegetation())
            .count() as u32;

        SimulationMetrics {
            total_vegetation,
            burning_area: vec![initially_burning],
            burned_area: vec![0],
            burning_speed: vec![initially_burning],
            damaged_vegetation: vec![percentage(burning_vegetation, total_vegetation)],
        }
    }

    /// Append one entry per series from a tick's applied transition set
    ///
    /// `grid` must be the post-apply grid for the same tick. The burning
    /// area is read from it directly: cells seeded or extinguished by hand
    /// between ticks never appear in a transition set, so deriving the
    /// count from the previous entry would drift (and underflow once those
    /// cells burn out).
    pub fn record_tick(&mut self, grid: &Grid, transitions: &[Transition]) {
        let newly_burning = transitions
            .iter()
            .filter(|t| t.to == BurnState::Burning)
            .count() as u32;
        let newly_burned = transitions
            .iter()
            .filter(|t| t.to == BurnState::Burned)
            .count() as u32;
        let newly_burning_vegetation = transitions
            .iter()
            .filter(|t| t.to == BurnState::Burning && t.terrain.is_vegetation())
            .count() as u32;

        let previous_burned = *self.burned_area.last().unwrap_or(&0);
        let previous_damaged = *self.damaged_vegetation.last().unwrap_or(&0.0);

        self.burning_area.push(grid.burning_count() as u32);
        self.burned_area.push(previous_burned + newly_burned);
        self.burning_speed.push(newly_burning);
        self.damaged_vegetation.push(
            previous_damaged + percentage(newly_burning_vegetation, self.total_vegetation),
        );
    }

    /// Vegetation cell count the percentages are relative to
    pub fn total_vegetation(&self) -> u32 {
        self.total_vegetation
    }

    /// Number of recorded ticks, including the seeded index 0
    pub fn len(&self) -> usize {
        self.burning_area.len()
    }

    /// Whether no entries have been recorded
    pub fn is_empty(&self) -> bool {
        self.burning_area.is_empty()
    }

    /// Entry at a given tick index
    pub fn entry(&self, tick: usize) -> Option<MetricsEntry> {
        Some(MetricsEntry {
            tick,
            burning_area: *self.burning_area.get(tick)?,
            burned_area: *self.burned_area.get(tick)?,
            burning_speed: *self.burning_speed.get(tick)?,
            damaged_vegetation: *self.damaged_vegetation.get(tick)?,
        })
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<MetricsEntry> {
        self.len().checked_sub(1).and_then(|tick| self.entry(tick))
    }

    /// Burning-area series
    pub fn burning_area(&self) -> &[u32] {
        &self.burning_area
    }

    /// Burned-area series (non-decreasing)
    pub fn burned_area(&self) -> &[u32] {
        &self.burned_area
    }

    /// Burning-speed series
    pub fn burning_speed(&self) -> &[u32] {
        &self.burning_speed
    }

    /// Damaged-vegetation percentage series
    pub fn damaged_vegetation(&self) -> &[f64] {
        &self.damaged_vegetation
    }

    /// Render the series as semicolon-separated rows, one per tick
    pub fn to_csv(&self) -> String {
        use std::fmt::Write;

        let mut csv = String::from("Time;BurningArea;BurnedArea;BurningSpeed;DamagedVegetation\n");
        let rows = self
            .burning_area
            .iter()
            .zip(&self.burned_area)
            .zip(&self.burning_speed)
            .zip(&self.damaged_vegetation);
        for (tick, (((burning, burned), speed), damaged)) in rows.enumerate() {
            let _ = writeln!(csv, "{tick};{burning};{burned};{speed};{damaged}");
        }
        csv
    }
}

/// Percentage of `part` over `total`, 0.0 when `total` is zero
fn percentage(part: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(total) * 100.0
    }
}
