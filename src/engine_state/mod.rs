//! # Engine State Module
//!
//! The terrain engine: generation, meshing and the worker pool behind them.
//!
//! ## Key Components
//!
//! * `TerrainManager` - The main state container, ticked once per frame
//! * `rendering` - Mesh generation, vertex layout and the renderer seam
//! * `task_management` - Worker threads executing fill and mesh tasks
//! * `voxels` - Blocks, chunks, zones, noise and the terrain map
//!
//! ## Architecture
//!
//! The main thread owns the [`Terrain`] and is the only thread that mutates the
//! chunk map. Each tick the manager diffs the zones bordering the observer
//! against those of the previous tick, submits fill tasks for new zones,
//! retires zones that left, collects finished task results and submits mesh
//! tasks for every chunk that became ready. Nothing on the main thread waits
//! on a worker.

use std::fmt;

use cgmath::{Point3, Vector3};
use log::{debug, info};
use task_management::TaskManager;
use voxels::{
    block::block_type::BlockType,
    coordinates::ZoneKey,
    terrain::Terrain,
    zones::{zones_bordering, ZoneState},
};

use crate::{config::TerrainConfig, error::TerrainError};
use rendering::meshing::ChunkRenderer;

pub mod rendering;
pub mod task_management;
pub mod voxels;

/// A snapshot of what the terrain and its workers are doing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TerrainStats {
    /// Chunks instantiated in the terrain map.
    pub chunks: usize,
    /// Chunks with both mesh streams installed.
    pub meshed_chunks: usize,
    /// Zones waiting on a fill task.
    pub filling_zones: usize,
    /// Zones filled and inside the border.
    pub filled_zones: usize,
    /// Zones outside the border whose blocks are kept.
    pub retired_zones: usize,
    /// Chunks waiting for a mesh task to be submitted.
    pub ready_for_meshing: usize,
    /// Tasks waiting for a free worker.
    pub queued_tasks: usize,
    /// Tasks running on workers.
    pub tasks_in_flight: usize,
}

impl fmt::Display for TerrainStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "chunks {} (meshed {}), zones {}/{}/{} filling/filled/retired, tasks {} queued {} running",
            self.chunks,
            self.meshed_chunks,
            self.filling_zones,
            self.filled_zones,
            self.retired_zones,
            self.queued_tasks,
            self.tasks_in_flight
        )
    }
}

/// Drives terrain generation around a moving observer.
///
/// # Examples
///
/// ```rust,ignore
/// let mut manager = TerrainManager::new(TerrainConfig::default());
///
/// // Main loop
/// loop {
///     manager.tick(observer_position);
///     manager.draw(&mut renderer);
/// }
/// ```
pub struct TerrainManager {
    config: TerrainConfig,
    terrain: Terrain,
    task_manager: TaskManager,
    /// Zone of the observer on the previous tick, `None` before the first tick
    previous_zone: Option<ZoneKey>,
    observer: Point3<f32>,
}

impl TerrainManager {
    /// Creates a manager and starts its worker pool.
    pub fn new(config: TerrainConfig) -> Self {
        let task_manager = TaskManager::new(config.resolved_worker_count());
        info!(
            "Terrain manager created: seed {}, generation radius {} zones, render radius {} blocks",
            config.seed, config.generation_radius, config.render_radius
        );
        TerrainManager {
            terrain: Terrain::new(config.seed),
            config,
            task_manager,
            previous_zone: None,
            observer: Point3::new(0.0, 0.0, 0.0),
        }
    }

    /// Runs one tick: expands the terrain around `observer`, then applies
    /// finished work and submits new work.
    pub fn tick(&mut self, observer: Point3<f32>) {
        self.observer = observer;
        let current = ZoneKey::containing_point(observer);
        if self.previous_zone != Some(current) {
            self.try_expand(current, self.previous_zone);
            self.previous_zone = Some(current);
        }
        self.process_tasks();
    }

    /// Diffs the border sets of the current and previous observer zones.
    ///
    /// Zones that left the border are retired. Zones that entered it are
    /// submitted for filling when new, or revived when they already exist.
    pub fn try_expand(&mut self, current: ZoneKey, previous: Option<ZoneKey>) {
        let radius = self.config.generation_radius;
        let current_border = zones_bordering(current, radius, false);
        let previous_border = previous
            .map(|zone| zones_bordering(zone, radius, false))
            .unwrap_or_default();

        for zone in previous_border.difference(&current_border) {
            self.terrain.retire_zone(*zone);
        }

        let mut requested = 0;
        for zone in current_border.difference(&previous_border) {
            match self.terrain.request_zone(*zone) {
                Some(task) => {
                    self.task_manager.publish_task(Box::new(task));
                    requested += 1;
                }
                None => {
                    self.terrain.revive_zone(*zone);
                }
            }
        }
        if requested > 0 {
            debug!("Submitted {} zone fills around {:?}", requested, current);
        }
    }

    /// Applies finished task results, submits mesh tasks for every chunk that
    /// became ready, and hands queued tasks to idle workers.
    pub fn process_tasks(&mut self) {
        self.task_manager.process_completed_tasks(&mut self.terrain);

        for key in self.terrain.take_ready_for_meshing() {
            if let Some(task) = self.terrain.request_mesh(key) {
                self.task_manager.publish_task(Box::new(task));
            }
        }

        self.task_manager.process_queued_tasks();
    }

    /// Draws the chunks within the render radius of the last observer position.
    pub fn draw(&self, renderer: &mut impl ChunkRenderer) {
        self.terrain
            .draw(renderer, self.observer, self.config.render_radius);
    }

    /// Writes a block; the affected chunks are remeshed on the next tick.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockType) -> Result<(), TerrainError> {
        self.terrain.set_block_at(x, y, z, block)
    }

    /// Clears the first solid block along the ray.
    ///
    /// # Returns
    /// The cleared cell, or `None` if the ray hit nothing.
    pub fn break_block(
        &mut self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
    ) -> Result<Option<Point3<i32>>, TerrainError> {
        let Some(hit) = self.terrain.grid_march(origin, direction)? else {
            return Ok(None);
        };
        self.terrain
            .set_block_at(hit.cell.x, hit.cell.y, hit.cell.z, BlockType::EMPTY)?;
        Ok(Some(hit.cell))
    }

    /// Places `block` against the face the ray hits first.
    ///
    /// # Returns
    /// The filled cell, or `None` if the ray hit nothing.
    pub fn place_block(
        &mut self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        block: BlockType,
    ) -> Result<Option<Point3<i32>>, TerrainError> {
        let Some(hit) = self.terrain.grid_march(origin, direction)? else {
            return Ok(None);
        };
        let cell = hit.adjacent_cell();
        self.terrain.set_block_at(cell.x, cell.y, cell.z, block)?;
        Ok(Some(cell))
    }

    /// Current counters of the terrain and the worker pool.
    pub fn stats(&self) -> TerrainStats {
        let mut stats = TerrainStats {
            chunks: self.terrain.chunk_count(),
            meshed_chunks: self.terrain.chunks().filter(|c| c.is_meshed()).count(),
            ready_for_meshing: self.terrain.ready_for_meshing_count(),
            queued_tasks: self.task_manager.queued_task_count(),
            tasks_in_flight: self.task_manager.tasks_in_flight(),
            ..TerrainStats::default()
        };
        for (_, state) in self.terrain.zones() {
            match state {
                ZoneState::Filling => stats.filling_zones += 1,
                ZoneState::Filled => stats.filled_zones += 1,
                ZoneState::Retired => stats.retired_zones += 1,
            }
        }
        stats
    }

    /// The terrain map.
    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    /// The active configuration.
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Whether no task is queued, running, or waiting to be submitted.
    pub fn is_idle(&self) -> bool {
        self.task_manager.is_idle() && self.terrain.ready_for_meshing_count() == 0
    }
}
