//! Discrete-time state transitions for one simulation tick
//!
//! `compute_tick` is a pure scan over the pre-tick grid snapshot: every
//! neighbor lookup observes the same state, so the update is synchronous in
//! the cellular-automaton sense and reproducible under a fixed RNG seed.
//! The transitions it emits are applied atomically by `apply_transitions`;
//! no partial-tick state is ever observable.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core_types::{BurnState, Cell, SimulationParameters, TerrainKind};
use crate::engine::probability::ignition_probability;
use crate::grid::Grid;

/// A computed, not yet applied, change to one cell's burning state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Column of the affected cell
    pub x: u32,
    /// Row of the affected cell
    pub y: u32,
    /// State the cell moves to (`Burning` or `Burned`)
    pub to: BurnState,
    /// Terrain of the affected cell, carried for metrics classification
    pub terrain: TerrainKind,
}

impl Transition {
    fn ignite(cell: &Cell) -> Self {
        Transition {
            x: cell.x,
            y: cell.y,
            to: BurnState::Burning,
            terrain: cell.terrain,
        }
    }

    fn burn_out(cell: &Cell) -> Self {
        Transition {
            x: cell.x,
            y: cell.y,
            to: BurnState::Burned,
            terrain: cell.terrain,
        }
    }
}

/// Compute the full transition set for one tick over the current snapshot
///
/// Cells are visited in grid-scan order. Burning cells whose incremented
/// burn time would exceed their terrain's maximum emit a burn-out; unburned
/// flammable cells draw one uniform sample against their ignition
/// probability and emit an ignition on success. The grid is not mutated.
pub fn compute_tick<R: Rng>(
    grid: &Grid,
    params: &SimulationParameters,
    rng: &mut R,
) -> Vec<Transition> {
    let mut transitions = Vec::new();

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let cell = grid.cell(x, y);
            if !cell.terrain.is_flammable() {
                continue;
            }

            match cell.state {
                BurnState::Burned => {}
                BurnState::Burning => {
                    if cell.burning_time + 1 > cell.maximum_burning_time() {
                        transitions.push(Transition::burn_out(cell));
                    }
                }
                BurnState::Unburned => {
                    let neighbors = grid.neighbors(x, y);
                    let probability = ignition_probability(cell, &neighbors, params);
                    if rng.random::<f64>() < probability {
                        transitions.push(Transition::ignite(cell));
                    }
                }
            }
        }
    }

    transitions
}

/// Atomically apply one tick's transitions and advance burn timers
///
/// Every cell still burning after this tick has its burn time incremented;
/// newly ignited cells start at zero. Transition order does not matter, all
/// were derived from the same pre-tick snapshot.
pub fn apply_transitions(grid: &mut Grid, transitions: &[Transition]) {
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let cell = grid.cell_mut(x, y);
            if cell.state == BurnState::Burning {
                cell.burning_time += 1;
            }
        }
    }

    for transition in transitions {
        let cell = grid.cell_mut(transition.x, transition.y);
        match transition.to {
            BurnState::Burning => {
                cell.state = BurnState::Burning;
                cell.burning_time = 0;
            }
            BurnState::Burned => {
                cell.state = BurnState::Burned;
            }
            BurnState::Unburned => {
                // The step engine never emits a transition back to unburned
                debug_assert!(false, "unburned transition emitted by step engine");
            }
        }
    }
}

/// Whether the run is finished: nothing changed and nothing is burning
///
/// Zero transitions with cells still burning is not completion; those cells
/// are waiting out their burn duration and the tick is still consumed.
pub fn is_run_complete(grid: &Grid, transitions: &[Transition]) -> bool {
    transitions.is_empty() && grid.burning_count() == 0
}
