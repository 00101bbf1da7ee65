//! # Task Management System
//!
//! This module provides the worker pool the engine runs meshing work on.
//!
//! ## Architecture Overview
//!
//! - `TaskManager`: Owns the worker threads and the shared queue
//! - `Task`: A unit of work executed on a worker
//! - `TaskResult`: The result of a completed task, folded into a `BatchSummary`
//!
//! Workers share one bounded FIFO queue guarded by a mutex and two condition
//! variables (not empty / not full). A completion counter, incremented when a
//! task is published and decremented when its result is stored, lets the
//! producer block until a whole batch is done without polling.
//!
//! ## Task Lifecycle
//! 1. Tasks are queued via `TaskManager::publish_task()`, waiting while the queue is full
//! 2. An idle worker wakes up, dequeues the task and processes it
//! 3. The result is stored and the completion counter decremented
//! 4. `wait_idle()` blocks until the counter reaches zero and handles the results
//!
//! ## Shutdown
//! Dropping the manager sets the shutdown flag and wakes every worker. Workers
//! observe the flag at their next queue wait and exit; tasks still queued are
//! discarded.
//!
//! ## Example Usage
//! ```ignore
//! let task_manager = TaskManager::new(4, 4)?;
//! for partition in partitions {
//!     task_manager.publish_task(Box::new(MeshPartitionTask::new(...)));
//! }
//! let summary = task_manager.wait_idle();
//! ```

pub mod task;

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use log::{error, info, warn};
use task::{BatchSummary, Task, TaskResult};

use crate::core::{EngineError, Result};

/// Counts published-but-unfinished tasks and holds finished results.
#[derive(Default)]
struct Completion {
    outstanding: usize,
    results: Vec<Box<dyn TaskResult + Send>>,
    panicked: usize,
}

/// State shared between the manager and its workers.
struct Shared {
    queue: Mutex<VecDeque<Box<dyn Task + Send>>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: usize,
    completion: Mutex<Completion>,
    all_done: Condvar,
    shutdown: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
    fn worker_loop(&self, worker_index: usize) {
        loop {
            let task = {
                let mut queue = lock(&self.queue);
                loop {
                    if self.shutdown.load(Ordering::Acquire) {
                        info!("Worker {} shutting down", worker_index);
                        return;
                    }
                    if let Some(task) = queue.pop_front() {
                        break task;
                    }
                    queue = self
                        .not_empty
                        .wait(queue)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            };
            self.not_full.notify_one();

            let result = catch_unwind(AssertUnwindSafe(|| task.process()));

            let mut completion = lock(&self.completion);
            match result {
                Ok(result) => completion.results.push(result),
                Err(_) => {
                    error!("Task panicked on worker {}", worker_index);
                    completion.panicked += 1;
                }
            }
            completion.outstanding -= 1;
            if completion.outstanding == 0 {
                self.all_done.notify_all();
            }
        }
    }
}

/// Manages a pool of worker threads and coordinates task execution.
pub struct TaskManager {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl TaskManager {
    /// Creates a new `TaskManager` with `num_workers` threads and a queue holding
    /// at most `queue_capacity` tasks.
    ///
    /// # Errors
    /// `EngineError::WorkerSpawn` if a thread cannot be created. Threads spawned
    /// before the failure are shut down again.
    pub fn new(num_workers: usize, queue_capacity: usize) -> Result<Self> {
        let shared = Arc::new(Shared {
            queue: Mutex::new(VecDeque::with_capacity(queue_capacity)),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity: queue_capacity.max(1),
            completion: Mutex::new(Completion::default()),
            all_done: Condvar::new(),
            shutdown: AtomicBool::new(false),
        });

        let mut manager = TaskManager {
            shared,
            workers: Vec::with_capacity(num_workers),
        };

        info!(
            "Starting {} workers (available parallelism: {:?})",
            num_workers,
            thread::available_parallelism()
        );

        for worker_index in 0..num_workers {
            let shared = Arc::clone(&manager.shared);
            let worker = thread::Builder::new()
                .name(format!("mesh-worker-{}", worker_index))
                .spawn(move || shared.worker_loop(worker_index))
                .map_err(|err| EngineError::WorkerSpawn(err.to_string()))?;
            manager.workers.push(worker);
        }

        Ok(manager)
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Queues a task, waiting for room if the queue is full.
    ///
    /// Returns `false` and drops the task if the manager is shutting down or has
    /// no workers to run it.
    pub fn publish_task(&self, task: Box<dyn Task + Send>) -> bool {
        if self.workers.is_empty() || self.shared.shutdown.load(Ordering::Acquire) {
            warn!("Dropping task: no running workers");
            return false;
        }

        let mut queue = lock(&self.shared.queue);
        while queue.len() >= self.shared.capacity {
            if self.shared.shutdown.load(Ordering::Acquire) {
                return false;
            }
            queue = self
                .shared
                .not_full
                .wait(queue)
                .unwrap_or_else(PoisonError::into_inner);
        }

        lock(&self.shared.completion).outstanding += 1;
        queue.push_back(task);
        drop(queue);
        self.shared.not_empty.notify_one();
        true
    }

    /// Handles every result that is already available, without waiting.
    pub fn process_completed_tasks(&self) -> BatchSummary {
        let (results, panicked) = {
            let mut completion = lock(&self.shared.completion);
            (
                std::mem::take(&mut completion.results),
                std::mem::take(&mut completion.panicked),
            )
        };
        Self::summarize(results, panicked)
    }

    /// Blocks until every published task has finished, then handles the results.
    pub fn wait_idle(&self) -> BatchSummary {
        let (results, panicked) = {
            let mut completion = lock(&self.shared.completion);
            while completion.outstanding > 0 {
                completion = self
                    .shared
                    .all_done
                    .wait(completion)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            (
                std::mem::take(&mut completion.results),
                std::mem::take(&mut completion.panicked),
            )
        };
        Self::summarize(results, panicked)
    }

    fn summarize(results: Vec<Box<dyn TaskResult + Send>>, panicked: usize) -> BatchSummary {
        let mut summary = BatchSummary {
            failures: panicked,
            ..BatchSummary::default()
        };
        for result in results {
            summary.tasks_completed += 1;
            result.handle_result(&mut summary);
        }
        summary
    }

    /// Stops all workers and waits for them to exit. Queued tasks are discarded.
    pub fn shutdown(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        self.shared.shutdown.store(true, Ordering::Release);
        {
            // Wake waiters while holding the lock so none can miss the flag.
            let _queue = lock(&self.shared.queue);
            self.shared.not_empty.notify_all();
            self.shared.not_full.notify_all();
        }
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                error!("Worker thread panicked during shutdown");
            }
        }

        let discarded = {
            let mut queue = lock(&self.shared.queue);
            let discarded = queue.len();
            queue.clear();
            discarded
        };
        let mut completion = lock(&self.shared.completion);
        completion.outstanding = completion.outstanding.saturating_sub(discarded);
        self.shared.all_done.notify_all();
        info!("Task manager stopped, {} queued tasks discarded", discarded);
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}
