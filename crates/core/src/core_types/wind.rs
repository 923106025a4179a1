//! Wind direction handling for the ignition probability model
//!
//! Wind is configured as one of the 8 compass points. The spread bias
//! classifies each burning neighbor by its relative bearing from the
//! candidate cell: cardinal directions match a half-plane (any neighbor on
//! that side, diagonals included), intercardinal directions match a strict
//! quadrant. The grid origin is top-left, so north means a smaller y.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// One of the 8 compass points the wind can blow toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindDirection {
    /// Toward smaller y
    North,
    /// Toward smaller y, larger x
    #[serde(rename = "North-East")]
    NorthEast,
    /// Toward larger x
    East,
    /// Toward larger y, larger x
    #[serde(rename = "South-East")]
    SouthEast,
    /// Toward larger y
    South,
    /// Toward larger y, smaller x
    #[serde(rename = "South-West")]
    SouthWest,
    /// Toward smaller x
    West,
    /// Toward smaller y, smaller x
    #[serde(rename = "North-West")]
    NorthWest,
}

impl WindDirection {
    /// All directions, clockwise from north
    pub const ALL: [WindDirection; 8] = [
        WindDirection::North,
        WindDirection::NorthEast,
        WindDirection::East,
        WindDirection::SouthEast,
        WindDirection::South,
        WindDirection::SouthWest,
        WindDirection::West,
        WindDirection::NorthWest,
    ];

    /// Compass name with hyphenated intercardinals ("South-East")
    pub fn name(self) -> &'static str {
        match self {
            WindDirection::North => "North",
            WindDirection::NorthEast => "North-East",
            WindDirection::East => "East",
            WindDirection::SouthEast => "South-East",
            WindDirection::South => "South",
            WindDirection::SouthWest => "South-West",
            WindDirection::West => "West",
            WindDirection::NorthWest => "North-West",
        }
    }

    /// Whether a neighbor at offset (`dx`, `dy`) from a cell lies in this
    /// direction
    ///
    /// Cardinals accept the whole half-plane, intercardinals the strict
    /// quadrant, matching the spread model's bearing convention.
    pub fn matches_bearing(self, dx: i64, dy: i64) -> bool {
        match self {
            WindDirection::North => dy < 0,
            WindDirection::NorthEast => dy < 0 && dx > 0,
            WindDirection::East => dx > 0,
            WindDirection::SouthEast => dy > 0 && dx > 0,
            WindDirection::South => dy > 0,
            WindDirection::SouthWest => dy > 0 && dx < 0,
            WindDirection::West => dx < 0,
            WindDirection::NorthWest => dy < 0 && dx < 0,
        }
    }
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindDirection {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WindDirection::ALL
            .iter()
            .copied()
            .find(|direction| direction.name() == s)
            .ok_or_else(|| SimulationError::InvalidWindDirection(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_matches_half_plane() {
        // A neighbor to the north-west still counts for a north wind
        assert!(WindDirection::North.matches_bearing(-1, -1));
        assert!(WindDirection::North.matches_bearing(0, -1));
        assert!(WindDirection::North.matches_bearing(1, -1));
        assert!(!WindDirection::North.matches_bearing(0, 1));
        assert!(!WindDirection::North.matches_bearing(1, 0));
    }

    #[test]
    fn intercardinal_matches_strict_quadrant() {
        assert!(WindDirection::SouthEast.matches_bearing(1, 1));
        assert!(!WindDirection::SouthEast.matches_bearing(0, 1));
        assert!(!WindDirection::SouthEast.matches_bearing(1, 0));
        assert!(!WindDirection::SouthEast.matches_bearing(-1, 1));
    }

    #[test]
    fn parse_round_trips_all_names() {
        for direction in WindDirection::ALL {
            assert_eq!(direction.name().parse::<WindDirection>(), Ok(direction));
        }
    }

    #[test]
    fn parse_rejects_unknown_name() {
        assert_eq!(
            "Northish".parse::<WindDirection>(),
            Err(SimulationError::InvalidWindDirection("Northish".to_string()))
        );
    }
}
