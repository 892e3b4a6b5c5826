//! Simulation tunables.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::Position;

pub const DEFAULT_POINT_COUNT: usize = 500;
pub const DEFAULT_CELL_SIZE: f64 = 20.0;
/// Travel speed in area units per second of supplied wall-clock time.
pub const DEFAULT_VELOCITY: f64 = 24.0;
pub const DEFAULT_SCATTERING_DISTANCE: f64 = 100.0;
/// Candidate headings in degrees: straight ahead first, then growing
/// deviations alternating sign, ending in a full reversal.
pub const DEFAULT_ROTATIONS: [f64; 8] = [0.0, 45.0, -45.0, 90.0, -90.0, 135.0, -135.0, 180.0];
pub const DEFAULT_AREA_WIDTH: f64 = 1280.0;
pub const DEFAULT_AREA_HEIGHT: f64 = 720.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cell_size must be finite and positive, got {0}")]
    CellSize(f64),
    #[error("velocity must be finite and non-negative, got {0}")]
    Velocity(f64),
    #[error("scattering_distance must be finite, got {0}")]
    ScatteringDistance(f64),
    #[error("available_rotations must be non-empty and finite")]
    Rotations,
    #[error("area dimensions must be finite and positive, got {width}x{height}")]
    Area { width: f64, height: f64 },
}

/// Tunables for a simulation world. Every knob the engine reads lives here;
/// the constants above are only the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub initial_point_count: usize,
    pub cell_size: f64,
    pub velocity: f64,
    pub scattering_distance: f64,
    /// Candidate headings in degrees, tried in order each tick.
    pub available_rotations: Vec<f64>,
    pub area_width: f64,
    pub area_height: f64,
    /// Shared target; defaults to the area center when absent.
    pub target: Option<Position>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_point_count: DEFAULT_POINT_COUNT,
            cell_size: DEFAULT_CELL_SIZE,
            velocity: DEFAULT_VELOCITY,
            scattering_distance: DEFAULT_SCATTERING_DISTANCE,
            available_rotations: DEFAULT_ROTATIONS.to_vec(),
            area_width: DEFAULT_AREA_WIDTH,
            area_height: DEFAULT_AREA_HEIGHT,
            target: None,
        }
    }
}

impl SimulationConfig {
    /// Fail fast on values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::CellSize(self.cell_size));
        }
        if !self.velocity.is_finite() || self.velocity < 0.0 {
            return Err(ConfigError::Velocity(self.velocity));
        }
        if !self.scattering_distance.is_finite() {
            return Err(ConfigError::ScatteringDistance(self.scattering_distance));
        }
        if self.available_rotations.is_empty()
            || self.available_rotations.iter().any(|r| !r.is_finite())
        {
            return Err(ConfigError::Rotations);
        }
        if !self.area_width.is_finite()
            || self.area_width <= 0.0
            || !self.area_height.is_finite()
            || self.area_height <= 0.0
        {
            return Err(ConfigError::Area {
                width: self.area_width,
                height: self.area_height,
            });
        }
        Ok(())
    }

    /// Target all points drift toward.
    pub fn resolved_target(&self) -> Position {
        self.target
            .unwrap_or_else(|| Position::new(self.area_width / 2.0, self.area_height / 2.0))
    }

    /// Load and validate a config from a JSON file. Missing fields fall back
    /// to the defaults.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }
}
