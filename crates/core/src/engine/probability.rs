//! Per-cell, per-tick ignition probability model
//!
//! Combines the burning-neighbor count, a wind factor and the terrain
//! flammability into one probability, capped at 1.0:
//!
//! ```text
//! p = min(1.0, burning_neighbors * wind_factor * terrain_factor)
//! wind_factor = neighbors_burning_in_wind_direction + wind_speed / 20
//! ```
//!
//! Fire spreads preferentially in the direction the wind blows toward:
//! burning neighbors whose bearing from the candidate cell matches the
//! configured wind direction count into the wind factor.

use crate::core_types::{Cell, SimulationParameters};

/// Divisor converting wind speed (m/s) into its baseline contribution
const WIND_SPEED_DIVISOR: f64 = 20.0;

/// Probability in `[0, 1]` that `cell` ignites this tick
///
/// `neighbors` must be the cell's compass-adjacent cells as returned by
/// [`crate::grid::Grid::neighbors`]. Non-flammable terrain always yields 0.
pub fn ignition_probability(
    cell: &Cell,
    neighbors: &[&Cell],
    params: &SimulationParameters,
) -> f64 {
    let burning_neighbors = neighbors.iter().filter(|n| n.is_burning()).count();
    if burning_neighbors == 0 {
        return 0.0;
    }

    let wind = wind_factor(cell, neighbors, params);
    let terrain = cell.terrain.flammability();

    (burning_neighbors as f64 * wind * terrain).min(1.0)
}

/// Wind contribution: burning neighbors lying in the configured wind
/// direction, plus the wind-speed baseline
fn wind_factor(cell: &Cell, neighbors: &[&Cell], params: &SimulationParameters) -> f64 {
    let matching = neighbors
        .iter()
        .filter(|n| n.is_burning())
        .filter(|n| {
            params.wind_direction.matches_bearing(
                i64::from(n.x) - i64::from(cell.x),
                i64::from(n.y) - i64::from(cell.y),
            )
        })
        .count();

    matching as f64 + params.wind_speed / WIND_SPEED_DIVISOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{BurnState, SimulationSpeed, TerrainKind, WindDirection};
    use approx::assert_relative_eq;

    fn burning(x: u32, y: u32) -> Cell {
        let mut cell = Cell::new(x, y, TerrainKind::Forest);
        cell.state = BurnState::Burning;
        cell
    }

    fn params(direction: WindDirection, wind_speed: f64) -> SimulationParameters {
        SimulationParameters::new(SimulationSpeed::X1, direction, wind_speed).unwrap()
    }

    #[test]
    fn no_burning_neighbors_means_zero() {
        let cell = Cell::new(1, 1, TerrainKind::Forest);
        let idle = Cell::new(0, 1, TerrainKind::Forest);
        let neighbors = [&idle];
        let p = ignition_probability(&cell, &neighbors, &params(WindDirection::North, 30.0));
        assert_eq!(p, 0.0);
    }

    #[test]
    fn non_flammable_terrain_never_ignites() {
        let cell = Cell::new(1, 1, TerrainKind::Water);
        let fires: Vec<Cell> = (0..3).map(|x| burning(x, 0)).collect();
        let neighbors: Vec<&Cell> = fires.iter().collect();
        let p = ignition_probability(&cell, &neighbors, &params(WindDirection::North, 67.0));
        assert_eq!(p, 0.0);
    }

    #[test]
    fn single_upwind_neighbor_calm_air() {
        // One burning neighbor to the south of the cell, wind blowing north:
        // the neighbor's bearing (south) does not match, so the wind factor
        // is just the zero speed baseline.
        let cell = Cell::new(1, 1, TerrainKind::Forest);
        let fire = burning(1, 2);
        let neighbors = [&fire];
        let p = ignition_probability(&cell, &neighbors, &params(WindDirection::North, 0.0));
        assert_eq!(p, 0.0);

        // Wind blowing south: the burning neighbor lies south, so it counts.
        let p = ignition_probability(&cell, &neighbors, &params(WindDirection::South, 0.0));
        assert_relative_eq!(p, 1.0 * 1.0 * 0.7);
    }

    #[test]
    fn wind_speed_baseline_applies_without_directional_match() {
        let cell = Cell::new(1, 1, TerrainKind::Grassland);
        let fire = burning(1, 0); // north of the cell
        let neighbors = [&fire];
        // Wind blows south, bearing does not match; baseline 20/20 = 1.0
        let p = ignition_probability(&cell, &neighbors, &params(WindDirection::South, 20.0));
        assert_relative_eq!(p, 1.0 * 1.0 * 0.45);
    }

    #[test]
    fn monotone_in_burning_neighbor_count_and_wind_speed() {
        let cell = Cell::new(1, 1, TerrainKind::Plain);
        let fires: Vec<Cell> = vec![burning(0, 0), burning(1, 0), burning(2, 0)];

        let mut previous = 0.0;
        for count in 1..=fires.len() {
            let neighbors: Vec<&Cell> = fires[..count].iter().collect();
            let p = ignition_probability(&cell, &neighbors, &params(WindDirection::North, 10.0));
            assert!(p >= previous, "probability decreased at {count} neighbors");
            previous = p;
        }

        let neighbors: Vec<&Cell> = fires.iter().collect();
        let mut previous = 0.0;
        for speed in 0..=67 {
            let p = ignition_probability(
                &cell,
                &neighbors,
                &params(WindDirection::South, f64::from(speed)),
            );
            assert!(p >= previous, "probability decreased at wind speed {speed}");
            assert!((0.0..=1.0).contains(&p));
            previous = p;
        }
    }

    #[test]
    fn probability_is_capped_at_one() {
        let cell = Cell::new(1, 1, TerrainKind::Forest);
        let fires: Vec<Cell> = vec![
            burning(0, 0),
            burning(1, 0),
            burning(2, 0),
            burning(0, 1),
            burning(2, 1),
            burning(0, 2),
            burning(1, 2),
            burning(2, 2),
        ];
        let neighbors: Vec<&Cell> = fires.iter().collect();
        let p = ignition_probability(&cell, &neighbors, &params(WindDirection::North, 67.0));
        assert_eq!(p, 1.0);
    }

    #[test]
    fn cardinal_wind_counts_diagonal_neighbors_in_half_plane() {
        let cell = Cell::new(1, 1, TerrainKind::Plain);
        // Burning neighbors at NW, N, NE - all in the northern half-plane
        let fires: Vec<Cell> = vec![burning(0, 0), burning(1, 0), burning(2, 0)];
        let neighbors: Vec<&Cell> = fires.iter().collect();

        // North matches all three
        let p = ignition_probability(&cell, &neighbors, &params(WindDirection::North, 0.0));
        assert_relative_eq!(p, 3.0 * 3.0 * 0.1);

        // North-East only matches the strict quadrant (the NE neighbor)
        let p_ne = ignition_probability(&cell, &neighbors, &params(WindDirection::NorthEast, 0.0));
        assert_relative_eq!(p_ne, 3.0 * 1.0 * 0.1);
    }
}
