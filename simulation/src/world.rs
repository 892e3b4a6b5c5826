//! Simulation world - main orchestrator.

use std::collections::BTreeMap;

use hecs::{Entity, World};
use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::components::{PointId, Position, TouchCount, TouchLevel};
use crate::config::{ConfigError, SimulationConfig};
use crate::grid::{CellCoord, GridError, SpatialIndex};
use crate::render::{PointRenderer, PointState};
use crate::systems;

/// Errors from world construction.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Which pass a call to [`SimulationWorld::advance`] ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TickMode {
    Move,
    Scatter,
}

/// Summary of one tick, for reporting to an embedding layer.
#[derive(Debug, Clone, Serialize)]
pub struct TickResult {
    pub tick: u64,
    pub mode: TickMode,
    pub distance: f64,
    pub population: usize,
}

/// Owns the ECS world, the spatial index, and the tick state machine.
///
/// Ticks run in one of two modes: the default move pass converts elapsed
/// wall-clock time into a travel distance and runs the collision-avoiding
/// movement system; a pending scatter flag (set by [`SimulationWorld::scatter_now`],
/// consumed exactly once) replaces the next tick with an outward scatter pass.
pub struct SimulationWorld {
    pub world: World,
    pub index: SpatialIndex,
    pub config: SimulationConfig,
    target: Position,
    points: BTreeMap<PointId, Entity>,
    next_point_id: u64,
    last_moving_time_ms: f64,
    scatter_pending: bool,
    tick: u64,
}

impl SimulationWorld {
    pub fn new(config: SimulationConfig) -> Result<Self, WorldError> {
        config.validate()?;
        let index = SpatialIndex::new(config.cell_size)?;
        let target = config.resolved_target();

        Ok(Self {
            world: World::new(),
            index,
            target,
            config,
            points: BTreeMap::new(),
            next_point_id: 0,
            last_moving_time_ms: 0.0,
            scatter_pending: false,
            tick: 0,
        })
    }

    /// Seed `count` points at the centers of distinct randomly chosen cells
    /// of the area grid (sampling without replacement).
    pub fn seed_points(&mut self, count: usize) {
        let cols = (self.config.area_width / self.config.cell_size).ceil() as i64;
        let rows = (self.config.area_height / self.config.cell_size).ceil() as i64;
        let mut free_cells: Vec<(i64, i64)> = (0..cols)
            .flat_map(|col| (0..rows).map(move |row| (col, row)))
            .collect();

        let seeded = count.min(free_cells.len());
        if seeded < count {
            warn!(
                requested = count,
                available = free_cells.len(),
                "not enough free cells, clamping seed count"
            );
        }

        let mut rng = rand::thread_rng();
        for _ in 0..seeded {
            let idx = rng.gen_range(0..free_cells.len());
            let (col, row) = free_cells.swap_remove(idx);
            let position = Position::new(
                self.config.cell_size * (col as f64 + 0.5),
                self.config.cell_size * (row as f64 + 0.5),
            );
            self.add_point(position);
        }

        info!(points = seeded, "seeded initial swarm");
    }

    /// Insert one point at `position`, returning its id.
    pub fn add_point(&mut self, position: Position) -> PointId {
        self.next_point_id += 1;
        let id = PointId(self.next_point_id);

        let entity = self.world.spawn((position, TouchCount::default()));
        self.points.insert(id, entity);
        self.index.upsert(id, position);

        debug!(?id, x = position.x, y = position.y, "point added");
        id
    }

    /// Ask the next [`SimulationWorld::advance`] call to run a scatter pass
    /// instead of a move pass. One-shot.
    pub fn scatter_now(&mut self) {
        self.scatter_pending = true;
    }

    /// Advance the simulation one tick. `now_ms` must be monotonically
    /// non-decreasing across calls; equal timestamps yield a zero-distance
    /// move pass that leaves every position unchanged.
    pub fn advance(&mut self, now_ms: f64) -> TickResult {
        self.tick += 1;

        let (mode, distance) = if self.scatter_pending {
            systems::scatter_system(
                &mut self.world,
                &mut self.index,
                &self.points,
                self.target,
                self.config.scattering_distance,
            );
            self.scatter_pending = false;
            // last_moving_time_ms stays untouched: the next move pass spans
            // the wall-clock time the scatter tick consumed as well.
            (TickMode::Scatter, self.config.scattering_distance)
        } else {
            let elapsed_ms = now_ms - self.last_moving_time_ms;
            let distance = elapsed_ms / 1000.0 * self.config.velocity;
            systems::movement_system(
                &mut self.world,
                &mut self.index,
                &self.points,
                self.target,
                distance,
                &self.config.available_rotations,
            );
            self.last_moving_time_ms = now_ms;
            (TickMode::Move, distance)
        };

        TickResult {
            tick: self.tick,
            mode,
            distance,
            population: self.points.len(),
        }
    }

    /// Shared target position.
    pub fn target(&self) -> Position {
        self.target
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Recorded grid cell for `id`.
    pub fn current_cell(&self, id: PointId) -> Option<CellCoord> {
        self.index.cell_for(id)
    }

    /// Committed state of every point, ascending by id.
    pub fn point_states(&self) -> Vec<PointState> {
        self.points
            .iter()
            .filter_map(|(&id, &entity)| {
                let position = self.world.get::<&Position>(entity).ok()?;
                let touch = self.world.get::<&TouchCount>(entity).ok()?;
                Some(PointState {
                    id,
                    position: *position,
                    touch_count: touch.0,
                })
            })
            .collect()
    }

    /// Push the current frame to a renderer, ascending by id.
    pub fn emit_frame<R: PointRenderer>(&self, renderer: &mut R) {
        for state in self.point_states() {
            renderer.update_point(
                state.id,
                state.position,
                TouchLevel::from_count(state.touch_count),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            initial_point_count: 10,
            area_width: 100.0,
            area_height: 100.0,
            // Off the cell-center lattice so no seeded point lands on it
            target: Some(Position::new(53.0, 53.0)),
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SimulationConfig {
            cell_size: 0.0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            SimulationWorld::new(config),
            Err(WorldError::Config(_))
        ));
    }

    #[test]
    fn test_seeding_uses_distinct_cells() {
        let mut world = SimulationWorld::new(small_config()).unwrap();
        world.seed_points(10);
        assert_eq!(world.point_count(), 10);

        let cells: HashSet<_> = world
            .point_states()
            .iter()
            .map(|state| world.current_cell(state.id).unwrap())
            .collect();
        assert_eq!(cells.len(), 10, "every point seeds into its own cell");
    }

    #[test]
    fn test_seeding_clamps_to_available_cells() {
        // 100x100 area at cell size 20 has 25 cells
        let mut world = SimulationWorld::new(small_config()).unwrap();
        world.seed_points(40);
        assert_eq!(world.point_count(), 25);
    }

    #[test]
    fn test_point_ids_start_at_one_and_increment() {
        let mut world = SimulationWorld::new(small_config()).unwrap();
        assert_eq!(world.add_point(Position::new(10.0, 10.0)), PointId(1));
        assert_eq!(world.add_point(Position::new(30.0, 10.0)), PointId(2));
        assert_eq!(world.add_point(Position::new(50.0, 10.0)), PointId(3));
    }

    #[test]
    fn test_scatter_flag_is_one_shot() {
        let mut world = SimulationWorld::new(small_config()).unwrap();
        world.seed_points(5);

        world.scatter_now();
        let first = world.advance(100.0);
        assert_eq!(first.mode, TickMode::Scatter);
        assert_eq!(first.distance, 100.0);

        let second = world.advance(100.0);
        assert_eq!(second.mode, TickMode::Move);
    }

    #[test]
    fn test_scatter_moves_every_point_outward() {
        let mut world = SimulationWorld::new(small_config()).unwrap();
        world.seed_points(10);
        let target = world.target();

        let before: Vec<f64> = world
            .point_states()
            .iter()
            .map(|state| state.position.distance_to(target))
            .collect();

        world.scatter_now();
        world.advance(0.0);

        for (state, before) in world.point_states().iter().zip(&before) {
            let after = state.position.distance_to(target);
            assert!((after - (before + 100.0)).abs() < 1e-9);
            assert_eq!(state.touch_count, 0);
        }
    }

    #[test]
    fn test_equal_timestamps_are_idempotent() {
        let mut world = SimulationWorld::new(small_config()).unwrap();
        world.seed_points(10);

        let first = world.advance(1000.0);
        assert_eq!(first.mode, TickMode::Move);
        assert!((first.distance - 24.0).abs() < 1e-9);
        let snapshot = world.point_states();

        let second = world.advance(1000.0);
        assert_eq!(second.distance, 0.0);
        let unchanged = world.point_states();

        assert_eq!(snapshot.len(), unchanged.len());
        for (a, b) in snapshot.iter().zip(&unchanged) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.position, b.position);
        }
    }

    #[test]
    fn test_index_stays_consistent_across_ticks() {
        let mut world = SimulationWorld::new(small_config()).unwrap();
        world.seed_points(20);

        for tick in 1..=30 {
            world.advance(tick as f64 * 16.0);
        }
        world.scatter_now();
        world.advance(500.0);

        assert_eq!(world.index.point_count(), 20);
        for state in world.point_states() {
            let cell = world.current_cell(state.id).expect("point is tracked");
            assert_eq!(world.index.cell_of(state.position), cell);
            assert!(!world.index.neighbors_of(state.id).contains(&state.id));
        }
    }

    #[test]
    fn test_emit_frame_reports_levels_in_id_order() {
        struct Collector(Vec<(PointId, TouchLevel)>);
        impl PointRenderer for Collector {
            fn update_point(&mut self, id: PointId, _position: Position, level: TouchLevel) {
                self.0.push((id, level));
            }
        }

        let mut world = SimulationWorld::new(small_config()).unwrap();
        let a = world.add_point(Position::new(10.0, 10.0));
        let b = world.add_point(Position::new(15.0, 10.0));
        world.advance(0.0); // zero-distance tick refreshes touch counts

        let mut collector = Collector(Vec::new());
        world.emit_frame(&mut collector);

        assert_eq!(collector.0.len(), 2);
        assert_eq!(collector.0[0], (a, TouchLevel::Low));
        assert_eq!(collector.0[1], (b, TouchLevel::Low));
    }
}
