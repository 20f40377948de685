//! Worker Pool
//!
//! Fixed set of threads servicing queued sessions.

use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};

use crate::error::{Result, SearchError};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Bounded pool of worker threads
///
/// ## Concurrency:
/// - At most `size` jobs run at once
/// - Extra jobs wait in an unbounded queue; nothing is ever rejected
/// - A job that panics is logged and its worker keeps going
pub struct WorkerPool {
    /// Job queue; `None` once the pool has been closed
    sender: Option<Sender<Job>>,

    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `size` workers
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(SearchError::Config(
                "worker pool needs at least one worker".to_string(),
            ));
        }

        let (sender, receiver) = channel::unbounded::<Job>();
        let mut workers = Vec::with_capacity(size);

        for id in 0..size {
            let receiver = receiver.clone();
            let handle = thread::Builder::new()
                .name(format!("wordsearch-worker-{}", id))
                .spawn(move || worker_loop(id, receiver))?;
            workers.push(handle);
        }

        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    /// Number of worker threads
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Number of jobs waiting for a free worker
    pub fn queued(&self) -> usize {
        self.sender.as_ref().map_or(0, Sender::len)
    }

    /// Queue a job
    pub fn execute<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| SearchError::Config("worker pool is closed".to_string()))?;
        sender
            .send(Box::new(job))
            .map_err(|_| SearchError::Config("worker pool is closed".to_string()))
    }

    /// Stop taking jobs and wait for queued and running ones to finish
    pub fn join(mut self) {
        self.close_and_wait();
    }

    fn close_and_wait(&mut self) {
        // Dropping the sender ends each worker's recv loop once the queue drains
        drop(self.sender.take());

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::error!("Worker thread terminated abnormally");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.close_and_wait();
    }
}

fn worker_loop(id: usize, receiver: Receiver<Job>) {
    tracing::trace!("Worker {} started", id);

    while let Ok(job) = receiver.recv() {
        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            tracing::error!("Worker {} recovered from a panicking job", id);
        }
    }

    tracing::trace!("Worker {} stopped", id);
}
