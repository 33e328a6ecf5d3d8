//! # Task Management System
//!
//! A pool of worker threads executing terrain fill and mesh tasks off the main
//! thread.
//!
//! ## Architecture Overview
//! - `TaskManager`: distributes tasks to workers and collects their results
//! - `Task`: a unit of work that owns its inputs and runs on a worker
//! - `TaskResult`: the output of a task, applied to the terrain on the main thread
//! - `TaskChannel`: the pair of channels connecting the main thread to one worker
//!
//! ## Task Lifecycle
//! 1. Tasks are published via `TaskManager::publish_task()`
//! 2. The manager hands them to idle workers round-robin, queueing the rest
//! 3. Workers process tasks and send their results back
//! 4. `process_completed_tasks()` applies results on the main thread
//! 5. Results can spawn follow-up tasks, which are published in turn
//!
//! The main thread never blocks on a worker: submission and collection are
//! both non-blocking, and a busy pool only grows the local queue.
//!
//! ## Example Usage
//! ```rust,ignore
//! let mut task_manager = TaskManager::new(num_workers);
//! task_manager.publish_task(Box::new(MyTask::new(...)));
//!
//! // In your main loop:
//! task_manager.process_completed_tasks(&mut terrain);
//! task_manager.process_queued_tasks();
//! ```

pub mod task;

use log::{debug, error, info};
use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};
use task::{Task, TaskResult};

use super::voxels::terrain::Terrain;

/// A communication channel between the main thread and a worker thread.
///
/// # Fields
/// - `task_sender`: Sends tasks from main thread to worker
/// - `result_receiver`: Receives task results from worker
/// - `num_tasks_in_flight`: Tracks number of tasks currently being processed
/// - `worker`: Handle to the worker thread, joined when the manager is dropped
#[derive(Debug)]
pub struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    num_tasks_in_flight: usize,
    worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// # Fields
/// - `channels`: Set of active worker channels
/// - `queued_tasks`: Tasks waiting for an available worker
/// - `current_channel`: Index for round-robin scheduling
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
///
/// Keeping this at 1 leaves every other task in the local queue, where it is
/// handed to whichever worker frees up first.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl TaskManager {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// # Panics
    /// Panics if the underlying thread creation fails.
    pub fn new(num_workers: usize) -> Self {
        info!(
            "Starting {} terrain workers (available parallelism: {:?})",
            num_workers,
            thread::available_parallelism()
        );

        let mut channels = Vec::with_capacity(num_workers);

        for _ in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

            let worker = thread::spawn(move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            });

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                worker,
            });
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// - `Ok(())` if the task was successfully sent to the worker
    /// - `Err(task)` if the send failed (worker disconnected)
    fn try_send_task(
        &mut self,
        task: Box<dyn Task + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task + Send>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(_) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(task) => Err(task.0),
        }
    }

    /// Finds a worker channel that can accept a new task, round-robin from the last one used.
    fn find_available_channel(&self) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }

        let start_channel = self.current_channel % self.channels.len();
        let mut current = start_channel;

        loop {
            if self.channels[current].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT {
                return Some(current);
            }
            current = (current + 1) % self.channels.len();
            if current == start_channel {
                return None;
            }
        }
    }

    /// Publishes a new task for execution.
    ///
    /// # Returns
    /// - `true` if the task was immediately handed to a worker
    /// - `false` if the task was queued because all workers are busy
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        let Some(channel_idx) = self.find_available_channel() else {
            self.queued_tasks.push_back(task);
            return false;
        };

        match self.try_send_task(task, channel_idx) {
            Ok(_) => {
                self.current_channel = (channel_idx + 1) % self.channels.len();
                true
            }
            Err(task) => {
                error!("Worker {} disconnected; queueing task", channel_idx);
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Hands queued tasks to idle workers, oldest first, until either runs out.
    pub fn process_queued_tasks(&mut self) {
        while let Some(channel_idx) = self.find_available_channel() {
            let Some(task) = self.queued_tasks.pop_front() else {
                return;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => {
                    // Channel is disconnected, put task back and stop processing
                    self.queued_tasks.push_front(task);
                    return;
                }
            }
        }
    }

    /// Applies every result workers have produced so far.
    ///
    /// Must be called on the main thread. Follow-up tasks returned by the
    /// results are published before returning.
    ///
    /// # Returns
    /// The number of results handled.
    pub fn process_completed_tasks(&mut self, terrain: &mut Terrain) -> usize {
        let mut tasks_to_queue = Vec::new();
        let mut handled = 0;
        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                handled += 1;
                tasks_to_queue.extend(result.handle_result(terrain));
            }
        }

        if !tasks_to_queue.is_empty() {
            debug!("Publishing {} follow-up tasks", tasks_to_queue.len());
        }
        for task in tasks_to_queue {
            self.publish_task(task);
        }
        handled
    }

    /// Tasks currently executing on workers.
    pub fn tasks_in_flight(&self) -> usize {
        self.channels.iter().map(|c| c.num_tasks_in_flight).sum()
    }

    /// Tasks waiting for a free worker.
    pub fn queued_task_count(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Whether no task is queued or running.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty() && self.tasks_in_flight() == 0
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.channels.len()
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        for (idx, channel) in self.channels.drain(..).enumerate() {
            let TaskChannel {
                task_sender,
                worker,
                ..
            } = channel;
            // Closing the sender ends the worker's receive loop.
            drop(task_sender);
            if worker.join().is_err() {
                error!("Terrain worker {} panicked", idx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    struct RecordTask {
        id: usize,
        spawn_child: bool,
        log: Arc<Mutex<Vec<usize>>>,
    }

    struct RecordResult {
        id: usize,
        spawn_child: bool,
        log: Arc<Mutex<Vec<usize>>>,
    }

    impl Task for RecordTask {
        fn process(self: Box<Self>) -> Box<dyn TaskResult + Send> {
            thread::sleep(Duration::from_millis(1));
            Box::new(RecordResult {
                id: self.id,
                spawn_child: self.spawn_child,
                log: self.log,
            })
        }
    }

    impl TaskResult for RecordResult {
        fn handle_result(self: Box<Self>, _terrain: &mut Terrain) -> Vec<Box<dyn Task + Send>> {
            self.log.lock().unwrap().push(self.id);
            if self.spawn_child {
                vec![Box::new(RecordTask {
                    id: self.id + 1000,
                    spawn_child: false,
                    log: self.log,
                })]
            } else {
                Vec::new()
            }
        }
    }

    fn drain(manager: &mut TaskManager, terrain: &mut Terrain) {
        let deadline = Instant::now() + Duration::from_secs(30);
        while !manager.is_idle() {
            assert!(Instant::now() < deadline, "task pool did not drain");
            manager.process_completed_tasks(terrain);
            manager.process_queued_tasks();
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn every_task_result_is_handled_exactly_once() {
        let mut manager = TaskManager::new(3);
        let mut terrain = Terrain::new(0);
        let log = Arc::new(Mutex::new(Vec::new()));

        let mut immediate = 0;
        for id in 0..40 {
            let task = RecordTask {
                id,
                spawn_child: id % 4 == 0,
                log: Arc::clone(&log),
            };
            if manager.publish_task(Box::new(task)) {
                immediate += 1;
            }
        }
        assert_eq!(immediate, 3, "one task per idle worker, the rest queued");
        assert_eq!(manager.queued_task_count(), 37);

        drain(&mut manager, &mut terrain);

        let mut seen = log.lock().unwrap().clone();
        seen.sort_unstable();
        let mut expected: Vec<usize> = (0..40).collect();
        expected.extend((0..40).filter(|id| id % 4 == 0).map(|id| id + 1000));
        expected.sort_unstable();
        assert_eq!(seen, expected);
    }

    #[test]
    fn pool_without_workers_only_queues() {
        let mut manager = TaskManager::new(0);
        let log = Arc::new(Mutex::new(Vec::new()));
        assert!(!manager.publish_task(Box::new(RecordTask {
            id: 1,
            spawn_child: false,
            log,
        })));
        manager.process_queued_tasks();
        assert_eq!(manager.queued_task_count(), 1);
        assert!(!manager.is_idle());
    }
}
