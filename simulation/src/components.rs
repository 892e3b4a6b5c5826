//! ECS components for swarm points, plus the geometry they share.

use serde::{Deserialize, Serialize};

/// Stable identifier assigned to a point at creation, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointId(pub u64);

/// 2D position in area units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Quadrant-unaware bearing toward `target`, in radians.
    ///
    /// Computed as atan(|dx| / |dy|), so it is always non-negative and
    /// directionality is supplied separately, per axis, by
    /// [`Position::with_offset`]. Vertical alignment (dy == 0) flows through
    /// IEEE division (|dx| / 0.0 == inf) and lands on pi / 2; no special case.
    pub fn bearing_to(&self, target: Position) -> f64 {
        ((target.x - self.x).abs() / (target.y - self.y).abs()).atan()
    }

    /// Position after travelling `offset` units at the bearing to `target`
    /// rotated by `rotation_degrees`.
    ///
    /// The movement sign on each axis comes from the sign of (target -
    /// current) on that axis alone, so a rotated heading can point away from
    /// the target on one axis while the unrotated bearing assumed motion
    /// toward it. A negative `offset` moves directly away along the same
    /// angle, which is what the scatter pass relies on.
    pub fn with_offset(&self, target: Position, offset: f64, rotation_degrees: f64) -> Position {
        let angle = self.bearing_to(target) + rotation_degrees.to_radians();
        let sign_x = if target.x > self.x { 1.0 } else { -1.0 };
        let sign_y = if target.y > self.y { 1.0 } else { -1.0 };

        Position {
            x: self.x + sign_x * offset * angle.sin(),
            y: self.y + sign_y * offset * angle.cos(),
        }
    }
}

/// Number of neighbors within one cell size of the point, as of its last
/// committed update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchCount(pub u32);

/// Discrete crowding classification derived from a touch count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchLevel {
    None,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl TouchLevel {
    pub fn from_count(count: u32) -> Self {
        match count {
            0 => TouchLevel::None,
            1 => TouchLevel::Low,
            2 => TouchLevel::Medium,
            3 => TouchLevel::High,
            _ => TouchLevel::VeryHigh,
        }
    }
}
