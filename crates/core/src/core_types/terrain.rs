//! Terrain classification with per-terrain burn constants
//!
//! Each terrain kind carries a fixed flammability coefficient and a maximum
//! burn duration in ticks. Clear ground, water and mountains never ignite.

use serde::{Deserialize, Serialize};

/// Terrain type painted onto a map cell, fixed for the lifetime of a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Bare ground, never burns
    Clear,
    /// Dense tree cover, burns longest and spreads fastest
    Forest,
    /// Grass cover
    Grassland,
    /// Sparse low vegetation
    Plain,
    /// Rock, never burns
    Mountain,
    /// Open water, never burns
    Water,
    /// Dense urban development
    HighDensityUrban,
    /// Sparse urban development
    LowDensityUrban,
}

impl TerrainKind {
    /// All terrain kinds, in map-legend order
    pub const ALL: [TerrainKind; 8] = [
        TerrainKind::Clear,
        TerrainKind::Forest,
        TerrainKind::Grassland,
        TerrainKind::Plain,
        TerrainKind::Mountain,
        TerrainKind::Water,
        TerrainKind::HighDensityUrban,
        TerrainKind::LowDensityUrban,
    ];

    /// Fixed flammability coefficient used by the ignition probability model
    pub fn flammability(self) -> f64 {
        match self {
            TerrainKind::Forest => 0.7,
            TerrainKind::Grassland => 0.45,
            TerrainKind::Plain | TerrainKind::LowDensityUrban => 0.1,
            TerrainKind::HighDensityUrban => 0.05,
            TerrainKind::Clear | TerrainKind::Mountain | TerrainKind::Water => 0.0,
        }
    }

    /// Number of ticks a cell of this terrain burns before burning out
    pub fn maximum_burning_time(self) -> u32 {
        match self {
            TerrainKind::Forest => 5,
            TerrainKind::Grassland => 3,
            TerrainKind::Plain => 2,
            TerrainKind::HighDensityUrban | TerrainKind::LowDensityUrban => 1,
            TerrainKind::Clear | TerrainKind::Mountain | TerrainKind::Water => 0,
        }
    }

    /// Whether fire can exist on this terrain at all
    pub fn is_flammable(self) -> bool {
        !matches!(
            self,
            TerrainKind::Clear | TerrainKind::Mountain | TerrainKind::Water
        )
    }

    /// Whether this terrain counts toward damaged-vegetation metrics
    pub fn is_vegetation(self) -> bool {
        matches!(
            self,
            TerrainKind::Forest | TerrainKind::Grassland | TerrainKind::Plain
        )
    }
}
