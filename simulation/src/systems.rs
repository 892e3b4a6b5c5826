//! Per-tick systems over the point swarm.

pub mod movement;
pub mod scatter;

pub use movement::movement_system;
pub use scatter::scatter_system;
