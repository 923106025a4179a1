//! Simulation parameters with JSON round-trip persistence
//!
//! Parameters are an immutable snapshot of the run configuration: wind
//! direction, wind speed and a speed multiplier for the tick delay. The
//! on-disk form keeps the original capitalized member names so existing
//! parameter files keep loading.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PersistenceError, SimulationError};

use super::wind::WindDirection;

/// Upper bound of the configurable wind speed (m/s)
pub const MAX_WIND_SPEED: f64 = 67.0;

/// Simulation speed multiplier applied to the inter-tick delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimulationSpeed {
    /// One tick per second
    #[serde(rename = "x1")]
    X1,
    /// Two ticks per second
    #[serde(rename = "x2")]
    X2,
    /// Four ticks per second
    #[serde(rename = "x4")]
    X4,
    /// Eight ticks per second
    #[serde(rename = "x8")]
    X8,
}

impl SimulationSpeed {
    /// Numeric multiplier for this speed setting
    pub fn multiplier(self) -> u64 {
        match self {
            SimulationSpeed::X1 => 1,
            SimulationSpeed::X2 => 2,
            SimulationSpeed::X4 => 4,
            SimulationSpeed::X8 => 8,
        }
    }

    /// Delay between ticks at this speed (1000 ms divided by the multiplier)
    pub fn tick_delay(self) -> Duration {
        Duration::from_millis(1000 / self.multiplier())
    }
}

/// Immutable run-configuration snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Speed multiplier for tick scheduling
    #[serde(rename = "SimulationSpeed")]
    pub speed: SimulationSpeed,
    /// Compass point the wind blows toward
    #[serde(rename = "WindDirection")]
    pub wind_direction: WindDirection,
    /// Wind speed in meters per second (0-67)
    #[serde(rename = "WindSpeed")]
    pub wind_speed: f64,
}

impl SimulationParameters {
    /// Create a validated parameter set
    ///
    /// # Errors
    /// Returns `InvalidWindSpeed` if the wind speed is non-finite or outside
    /// 0-67 m/s.
    pub fn new(
        speed: SimulationSpeed,
        wind_direction: WindDirection,
        wind_speed: f64,
    ) -> Result<Self, SimulationError> {
        let params = SimulationParameters {
            speed,
            wind_direction,
            wind_speed,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check the wind speed bounds
    ///
    /// # Errors
    /// Returns `InvalidWindSpeed` if the wind speed is non-finite or outside
    /// 0-67 m/s.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.wind_speed.is_finite()
            || self.wind_speed < 0.0
            || self.wind_speed > MAX_WIND_SPEED
        {
            return Err(SimulationError::InvalidWindSpeed(self.wind_speed));
        }
        Ok(())
    }

    /// Load parameters from a JSON file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or fails
    /// wind-speed validation.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let contents =
            fs::read_to_string(path).map_err(|e| PersistenceError::LoadFailed(e.to_string()))?;

        let params: Self = serde_json::from_str(&contents)
            .map_err(|e| PersistenceError::ParseFailed(e.to_string()))?;
        params.validate()?;

        Ok(params)
    }

    /// Save parameters to a JSON file
    ///
    /// # Errors
    /// Returns an error if the parameters cannot be serialized or written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PersistenceError> {
        let contents = serde_json::to_string(self)
            .map_err(|e| PersistenceError::SerializeFailed(e.to_string()))?;

        fs::write(path, contents).map_err(|e| PersistenceError::SaveFailed(e.to_string()))?;

        Ok(())
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        SimulationParameters {
            speed: SimulationSpeed::X1,
            wind_direction: WindDirection::North,
            wind_speed: 0.0,
        }
    }
}
