//! Rendering-facing boundary.
//!
//! The engine only hands out data: per-point position and crowding level.
//! Whatever draws the swarm implements [`PointRenderer`]; the core never
//! references a UI primitive.

use serde::Serialize;

use crate::components::{PointId, Position, TouchLevel};

/// Committed per-point state, as reported after a tick.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PointState {
    pub id: PointId,
    pub position: Position,
    pub touch_count: u32,
}

/// Sink for per-frame point updates.
pub trait PointRenderer {
    fn update_point(&mut self, id: PointId, position: Position, level: TouchLevel);
}
