//! # Task System Core Traits
//!
//! This module defines the fundamental building blocks of the task system.
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task is moved to a worker thread and consumed by `process()`
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` is called on the main thread with the terrain
//! 5. The result can apply its output to the terrain and spawn follow-up tasks
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred to a worker
//! - `TaskResult` must be `Send` to be transferred back to the main thread
//! - Tasks own everything they read; the terrain itself never leaves the main thread

use crate::engine_state::voxels::terrain::Terrain;

/// A unit of work executed on a worker thread.
///
/// Tasks should be self-contained: they own snapshots of the data they need,
/// so nothing the main thread does can race with them.
pub trait Task: Send {
    /// Runs the task on a worker thread, consuming it.
    ///
    /// # Returns
    /// A boxed `TaskResult` that will be handled on the main thread.
    fn process(self: Box<Self>) -> Box<dyn TaskResult + Send>;
}

/// The output of a `Task`, applied on the main thread.
pub trait TaskResult: Send {
    /// Applies the result to the terrain.
    ///
    /// Runs on the main thread between ticks; keep it cheap.
    ///
    /// # Returns
    /// Follow-up tasks to schedule (can be empty).
    fn handle_result(self: Box<Self>, terrain: &mut Terrain) -> Vec<Box<dyn Task + Send>>;
}
