//! Scatter system: one-shot outward displacement away from the target.

use std::collections::BTreeMap;

use hecs::{Entity, World};

use crate::components::{PointId, Position, TouchCount};
use crate::grid::SpatialIndex;

/// Push every point `scattering_distance` units directly away from `target`,
/// ignoring the collision gate. Touch counts reset to zero until the next
/// move pass recomputes them.
pub fn scatter_system(
    world: &mut World,
    index: &mut SpatialIndex,
    points: &BTreeMap<PointId, Entity>,
    target: Position,
    scattering_distance: f64,
) {
    for (&id, &entity) in points {
        let Ok(position) = world.get::<&Position>(entity).map(|p| *p) else {
            continue;
        };

        let next = position.with_offset(target, -scattering_distance, 0.0);

        if let Ok(mut stored) = world.get::<&mut Position>(entity) {
            *stored = next;
        }
        if let Ok(mut stored) = world.get::<&mut TouchCount>(entity) {
            stored.0 = 0;
        }
        index.upsert(id, next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scatter_pushes_points_outward_ignoring_the_gate() {
        let mut world = World::new();
        let mut index = SpatialIndex::new(20.0).unwrap();
        let mut points = BTreeMap::new();
        let target = Position::new(200.0, 200.0);

        // A tight cluster the movement gate would pin in place
        let starts = [
            Position::new(100.0, 100.0),
            Position::new(103.0, 100.0),
            Position::new(100.0, 104.0),
        ];
        for (i, &position) in starts.iter().enumerate() {
            let id = PointId(i as u64 + 1);
            let entity = world.spawn((position, TouchCount(2)));
            points.insert(id, entity);
            index.upsert(id, position);
        }

        scatter_system(&mut world, &mut index, &points, target, 100.0);

        for (i, (_, &entity)) in points.iter().enumerate() {
            let position = *world.get::<&Position>(entity).unwrap();
            let before = starts[i].distance_to(target);
            let after = position.distance_to(target);
            assert!(
                (after - (before + 100.0)).abs() < 1e-9,
                "each point ends exactly 100 units farther out"
            );
            assert_eq!(world.get::<&TouchCount>(entity).unwrap().0, 0);
        }
    }
}
