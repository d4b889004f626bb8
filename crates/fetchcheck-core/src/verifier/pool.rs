//! Bounded pool of OS threads running workers.
//!
//! Up to `max_concurrent` threads pull worker indices from a shared counter;
//! each finished worker sends its result over a channel, so the caller sees
//! results in completion order, not index order.

use super::worker::{worker_run, WorkerContext, WorkerResult};
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Workers in flight. Iterate to receive results as they finish.
pub struct RunningWorkers {
    rx: mpsc::Receiver<WorkerResult>,
    handles: Vec<JoinHandle<()>>,
    remaining: usize,
}

impl Iterator for RunningWorkers {
    type Item = WorkerResult;

    fn next(&mut self) -> Option<WorkerResult> {
        if self.remaining == 0 {
            return None;
        }
        // Err only if every thread exited early (panicked) before sending.
        let res = self.rx.recv().ok()?;
        self.remaining -= 1;
        Some(res)
    }
}

impl RunningWorkers {
    /// Drain remaining results and join every thread.
    pub fn join(mut self) -> Vec<WorkerResult> {
        let results: Vec<WorkerResult> = self.by_ref().collect();
        for h in self.handles.drain(..) {
            if let Err(e) = h.join() {
                tracing::error!("worker thread panicked: {:?}", e);
            }
        }
        results
    }
}

/// Starts `count` workers sharing `ctx`, at most `max_concurrent` at a time
/// (`None` = one thread per worker).
pub fn spawn_workers(
    count: usize,
    ctx: Arc<WorkerContext>,
    max_concurrent: Option<usize>,
) -> Result<RunningWorkers> {
    let (tx, rx) = mpsc::channel();
    let threads = max_concurrent.unwrap_or(count).max(1).min(count);
    let next = Arc::new(AtomicUsize::new(0));
    let mut handles = Vec::with_capacity(threads);

    for t in 0..threads {
        let ctx = Arc::clone(&ctx);
        let next = Arc::clone(&next);
        let tx = tx.clone();
        let handle = std::thread::Builder::new()
            .name(format!("fetchcheck-worker-{}", t))
            .spawn(move || loop {
                let index = next.fetch_add(1, Ordering::Relaxed);
                if index >= count {
                    break;
                }
                let res = worker_run(index, &ctx);
                if tx.send(res).is_err() {
                    break;
                }
            })
            .with_context(|| format!("spawn worker thread {}", t))?;
        handles.push(handle);
    }
    drop(tx);

    tracing::debug!(count, threads, "workers started");
    Ok(RunningWorkers {
        rx,
        handles,
        remaining: count,
    })
}
