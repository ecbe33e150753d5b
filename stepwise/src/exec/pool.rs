//! The bounded worker pool shared by a whole invocation.
//!
//! Both executors are fan-out/join schedulers on top of one rayon pool. Fan-out
//! goes through `scope_fifo`: a worker that blocks on a join keeps draining
//! queued work, so nested fan-out cannot starve the pool, and with a single
//! worker units complete in the order they were submitted.

use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result, bail};
use rayon::{ScopeFifo, ThreadPool, ThreadPoolBuilder};
use tracing::debug;

/// Fixed-size pool servicing every unit of work in one run.
pub struct WorkerPool {
    pool: ThreadPool,
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            bail!("workers must be > 0");
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("stepwise-worker-{index}"))
            .build()
            .context("build worker pool")?;
        debug!(workers, "worker pool started");
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Submit every unit produced by `submit` and hand results to `sink` as
    /// each unit completes.
    ///
    /// Blocks until every submitted unit has finished.
    pub fn stream<'scope, T, S, F>(&self, submit: S, mut sink: F) -> Result<()>
    where
        T: Send + 'scope,
        S: FnOnce(&ScopeFifo<'scope>, Submitter<T>) + Send,
        F: FnMut(T) -> Result<()>,
    {
        let (tx, rx) = mpsc::channel();
        thread::scope(|threads| {
            threads.spawn(move || {
                self.pool
                    .scope_fifo(|scope| submit(scope, Submitter { tx }));
            });
            for item in rx {
                sink(item)?;
            }
            Ok(())
        })
    }
}

/// Sending half handed to submitted units; one clone per unit.
pub struct Submitter<T> {
    tx: mpsc::Sender<T>,
}

impl<T> Clone for Submitter<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> Submitter<T> {
    /// Deliver a finished unit's result. A closed receiver drops it.
    pub fn send(&self, item: T) {
        let _ = self.tx.send(item);
    }
}

/// Run `unit` once per item on the current pool and collect results in
/// completion order. Must be called from inside a pool worker.
pub fn fan_out<I, T, F>(items: I, unit: F) -> Vec<T>
where
    I: IntoIterator + Send,
    I::Item: Send,
    T: Send,
    F: Fn(I::Item) -> T + Sync,
{
    let (tx, rx) = mpsc::channel();
    let unit = &unit;
    rayon::scope_fifo(|scope| {
        for item in items {
            let tx = tx.clone();
            scope.spawn_fifo(move |_| {
                let _ = tx.send(unit(item));
            });
        }
    });
    drop(tx);
    rx.iter().collect()
}
