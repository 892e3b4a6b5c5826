//! Swarm Simulation Engine
//!
//! Point swarm that drifts toward a shared target while avoiding overlap
//! with nearby neighbors, backed by a uniform spatial hash for proximity
//! queries. Rendering, input, and timing live outside the crate; the engine
//! consumes timestamps and positions and produces positions and touch
//! counts.

pub mod components;
pub mod config;
pub mod grid;
pub mod render;
pub mod runner;
pub mod systems;
pub mod world;

pub use components::{PointId, Position, TouchCount, TouchLevel};
pub use config::SimulationConfig;
pub use grid::SpatialIndex;
pub use render::{PointRenderer, PointState};
pub use runner::SimulationRunner;
pub use world::{SimulationWorld, TickMode, TickResult};
