//! Movement system: collision-avoiding drift toward the shared target.
//!
//! Each point tries a fixed ordered list of headings relative to its bearing
//! to the target and commits the first one that does not move it strictly
//! closer to any neighbor already within one cell size.

use std::collections::BTreeMap;

use hecs::{Entity, World};

use crate::components::{PointId, Position, TouchCount};
use crate::grid::SpatialIndex;

/// Advance every point by `distance` units, in ascending id order.
///
/// Each move is committed (position, touch count, index) before the next
/// point is processed, so points later in the order observe the post-move
/// positions of earlier ones within the same tick.
pub fn movement_system(
    world: &mut World,
    index: &mut SpatialIndex,
    points: &BTreeMap<PointId, Entity>,
    target: Position,
    distance: f64,
    rotations: &[f64],
) {
    let radius = index.cell_size();

    for (&id, &entity) in points {
        let Ok(position) = world.get::<&Position>(entity).map(|p| *p) else {
            continue;
        };

        let neighbor_ids = index.neighbors_of(id);
        let neighbor_positions: Vec<Position> = neighbor_ids
            .iter()
            .filter_map(|other| points.get(other))
            .filter_map(|&other_entity| world.get::<&Position>(other_entity).ok().map(|p| *p))
            .collect();

        let mut next_position = position;
        let mut touches = touch_count(position, &neighbor_positions, radius);

        for &rotation in rotations {
            let candidate = position.with_offset(target, distance, rotation);
            if is_move_allowed(position, candidate, &neighbor_positions, radius) {
                touches = touch_count(candidate, &neighbor_positions, radius);
                next_position = candidate;
                break;
            }
        }

        if let Ok(mut stored) = world.get::<&mut Position>(entity) {
            *stored = next_position;
        }
        if let Ok(mut stored) = world.get::<&mut TouchCount>(entity) {
            stored.0 = touches;
        }
        index.upsert(id, next_position);
    }
}

/// Neighbors at or inside `radius` of `position`.
fn touch_count(position: Position, neighbors: &[Position], radius: f64) -> u32 {
    neighbors
        .iter()
        .filter(|&&neighbor| position.distance_to(neighbor) <= radius)
        .count() as u32
}

/// A candidate is allowed when every neighbor is either already farther than
/// `radius` away, or would end up no closer than it is now.
fn is_move_allowed(
    current: Position,
    candidate: Position,
    neighbors: &[Position],
    radius: f64,
) -> bool {
    neighbors.iter().all(|&neighbor| {
        let current_distance = current.distance_to(neighbor);
        current_distance > radius || candidate.distance_to(neighbor) >= current_distance
    })
}
