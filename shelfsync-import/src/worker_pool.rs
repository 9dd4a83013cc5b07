//! Worker pool for CPU-bound image conversion.
//!
//! Spawns N persistent tokio tasks that pull work items from a bounded
//! async-channel and run each one on the blocking thread pool. Results are
//! sent to an unbounded channel for consumption by the caller, in completion
//! order.
//!
//! `async-channel` is used for work distribution because its `Receiver` is
//! `Clone`, so each worker gets its own handle with no `Mutex` needed.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A pool of worker tasks that process items concurrently.
///
/// # Example
///
/// ```ignore
/// let mut pool = WorkerPool::start(4, jobs, |job| convert(&job));
///
/// while let Some(result) = pool.recv().await {
///     handle(result);
/// }
/// ```
pub struct WorkerPool<R: Send + 'static> {
    result_rx: mpsc::UnboundedReceiver<R>,
    _handles: Vec<JoinHandle<()>>,
}

impl<R: Send + 'static> WorkerPool<R> {
    /// Spawn `n` workers, submit all items, and return a pool for receiving results.
    ///
    /// Must be called from within a tokio runtime. A `process_fn` call that
    /// panics produces no result; the worker logs it and moves on.
    pub fn start<W, F>(n: usize, items: Vec<W>, process_fn: F) -> Self
    where
        W: Send + 'static,
        F: Fn(W) -> R + Send + Sync + 'static,
    {
        let n = n.max(1);
        let (work_tx, work_rx) = async_channel::bounded::<W>(n);
        let (result_tx, result_rx) = mpsc::unbounded_channel::<R>();
        let process_fn = Arc::new(process_fn);

        let handles: Vec<JoinHandle<()>> = (0..n)
            .map(|_| {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                let process_fn = process_fn.clone();
                tokio::spawn(async move {
                    while let Ok(item) = work_rx.recv().await {
                        let process_fn = process_fn.clone();
                        match tokio::task::spawn_blocking(move || process_fn(item)).await {
                            Ok(r) => {
                                if result_tx.send(r).is_err() {
                                    break; // Receiver dropped
                                }
                            }
                            Err(e) => log::error!("Worker pool: job failed to complete: {e}"),
                        }
                    }
                })
            })
            .collect();

        // Channel closes once every worker has exited.
        drop(result_tx);

        tokio::spawn(async move {
            for item in items {
                if work_tx.send(item).await.is_err() {
                    break;
                }
            }
        });

        Self {
            result_rx,
            _handles: handles,
        }
    }

    /// Receive the next result. Returns `None` when all items have been
    /// processed and all workers have shut down.
    pub async fn recv(&mut self) -> Option<R> {
        self.result_rx.recv().await
    }
}

/// Number of workers to use when the configuration says 0.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
