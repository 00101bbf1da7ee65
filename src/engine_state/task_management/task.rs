//! # Task System Core Traits
//!
//! This module defines the fundamental building blocks of the task system,
//! which runs work on the worker pool owned by `TaskManager`.
//!
//! ## Core Components
//! - `Task`: Represents a unit of work that can be executed on a worker
//! - `TaskResult`: Represents the result of a completed task
//! - `BatchSummary`: What a batch of tasks accomplished, accumulated from results
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and queued via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` is called on the thread that waits for the batch
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred between threads
//! - `TaskResult` must be `Send` to be transferred back to the waiting thread
//! - All shared state must be properly synchronized

/// A trait representing a unit of work that can be executed on a worker.
///
/// Tasks should own (or share through a synchronized handle) all the data they
/// need, and be coarse-grained enough to amortize scheduling overhead.
pub trait Task: Send {
    /// Processes the task and returns a result.
    ///
    /// Runs on a worker thread. Errors are handled inside the task and
    /// reported through the result; a panicking task is caught by the worker
    /// and counted as a failure.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// A trait representing the result of processing a `Task`.
pub trait TaskResult: Send {
    /// Folds this result into the summary of its batch.
    fn handle_result(self: Box<Self>, summary: &mut BatchSummary);
}

/// Accumulated outcome of every task completed since the last wait.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Tasks whose results were handled.
    pub tasks_completed: usize,
    /// Chunks whose mesh buckets were regenerated.
    pub chunks_meshed: usize,
    /// Work items that failed and were skipped.
    pub failures: usize,
}

impl BatchSummary {
    /// Whether any chunk changed, i.e. the combined meshes are stale.
    pub fn any_updated(&self) -> bool {
        self.chunks_meshed > 0
    }
}
