//! Spatial hash index over point positions.
//!
//! Points are bucketed into a uniform grid of square cells keyed by integer
//! coordinates, so a neighbor lookup only touches the 3x3 block of cells
//! around a point instead of scanning the whole swarm. With the cell size
//! equal to the interaction radius, every point within that radius is
//! guaranteed to sit inside the block.

use std::collections::HashMap;

use thiserror::Error;

use crate::components::{PointId, Position};

/// Integer cell coordinate: floor(position / cell_size) per axis.
pub type CellCoord = (i32, i32);

/// Errors from spatial index construction.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("invalid cell size {0}: must be finite and positive")]
    InvalidCellSize(f64),
}

/// Uniform grid index with a forward map (cell -> point ids) and a reverse
/// map (point id -> cell).
///
/// [`SpatialIndex::upsert`] keeps the two maps mutually consistent: an id is
/// in a bucket iff the reverse map records that bucket's key for it. Buckets
/// are created lazily and tolerated when they drain empty.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cell_size: f64,
    cell_to_points: HashMap<CellCoord, Vec<PointId>>,
    point_to_cell: HashMap<PointId, CellCoord>,
}

impl SpatialIndex {
    pub fn new(cell_size: f64) -> Result<Self, GridError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GridError::InvalidCellSize(cell_size));
        }

        Ok(Self {
            cell_size,
            cell_to_points: HashMap::new(),
            point_to_cell: HashMap::new(),
        })
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Cell containing `position`.
    pub fn cell_of(&self, position: Position) -> CellCoord {
        (
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
        )
    }

    /// Record `position` as the current location of `id`, moving the id
    /// between buckets when it crossed a cell boundary.
    ///
    /// A no-op on the index when the cell is unchanged. Handles the first
    /// insertion of an id (no previous cell recorded).
    pub fn upsert(&mut self, id: PointId, position: Position) {
        debug_assert!(
            position.x.is_finite() && position.y.is_finite(),
            "non-finite position for {id:?}"
        );

        let next = self.cell_of(position);
        let prev = self.point_to_cell.get(&id).copied();

        if prev == Some(next) {
            return;
        }

        if let Some(prev) = prev {
            if let Some(bucket) = self.cell_to_points.get_mut(&prev) {
                bucket.retain(|&other| other != id);
            }
        }

        self.cell_to_points.entry(next).or_default().push(id);
        self.point_to_cell.insert(id, next);
    }

    /// Recorded cell of `id`, if it has ever been upserted.
    pub fn cell_for(&self, id: PointId) -> Option<CellCoord> {
        self.point_to_cell.get(&id).copied()
    }

    /// Ids in the 3x3 block of cells centered on `id`'s recorded cell,
    /// excluding `id` itself. Empty when `id` has no recorded cell.
    ///
    /// Duplicates are impossible since every id lives in exactly one bucket.
    pub fn neighbors_of(&self, id: PointId) -> Vec<PointId> {
        let Some((cx, cy)) = self.cell_for(id) else {
            return Vec::new();
        };

        let mut neighbors = Vec::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(bucket) = self.cell_to_points.get(&(cx + dx, cy + dy)) {
                    neighbors.extend(bucket.iter().copied().filter(|&other| other != id));
                }
            }
        }

        neighbors
    }

    /// Number of tracked points.
    pub fn point_count(&self) -> usize {
        self.point_to_cell.len()
    }

    /// Number of buckets currently holding at least one point.
    pub fn occupied_cells(&self) -> usize {
        self.cell_to_points
            .values()
            .filter(|bucket| !bucket.is_empty())
            .count()
    }
}
