// THEORY:
// The `parallel_pipeline` module is the throughput-oriented variant of the
// engine. Decoding and alpha-scanning are pure per-file work and dominate the
// run time, so they fan out to a fixed worker pool; everything order-sensitive
// (candidate scanning, name assignment, clustering) stays sequential.
//
// Key architectural principles:
// 1.  **Workers Compute, the Submitter Orders**: Each task carries a `oneshot`
//     sender for its result. The submitting side keeps the receivers in
//     traversal order and awaits them in that order, so the catalog that
//     comes out is byte-identical to the sequential pipeline's no matter
//     which worker finished first.
// 2.  **Dispatcher + Fixed Pool**: A single dispatcher task round-robins
//     work to the workers. The pool is sized from the machine's core count,
//     capped by the number of candidates.
// 3.  **Failure Stays Per-File**: A worker that cannot decode its file sends
//     the classified error back like any other result; the catalog records
//     the skip and the run continues.

use crate::core_modules::catalog::{self, Extraction};
use crate::core_modules::run_context::RunContext;
use crate::core_modules::zone_clusterer;
use crate::error::{ArchitectError, Result};
use crate::pipeline::{ArchitectReport, PipelineConfig};
use futures::future::join_all;
use std::path::{Path, PathBuf};
use tokio::sync::{mpsc, oneshot};

struct ExtractionTask {
    path: PathBuf,
    result_sender: oneshot::Sender<Result<Extraction>>,
}

struct ExtractorPool {
    task_sender: mpsc::UnboundedSender<ExtractionTask>,
    workers: Vec<tokio::task::JoinHandle<()>>,
}

impl ExtractorPool {
    fn new(alpha_threshold: u8, pool_size: usize) -> Self {
        let (task_sender, mut task_receiver) = mpsc::unbounded_channel::<ExtractionTask>();

        // Create a single dispatcher that distributes tasks to workers.
        let (worker_senders, worker_receivers): (Vec<_>, Vec<_>) = (0..pool_size)
            .map(|_| mpsc::unbounded_channel::<ExtractionTask>())
            .unzip();

        tokio::spawn(async move {
            let mut worker_idx = 0;
            while let Some(task) = task_receiver.recv().await {
                let _ = worker_senders[worker_idx].send(task);
                worker_idx = (worker_idx + 1) % pool_size;
            }
        });

        let mut workers = Vec::new();
        for mut worker_receiver in worker_receivers {
            let worker = tokio::spawn(async move {
                while let Some(task) = worker_receiver.recv().await {
                    let outcome = catalog::extract(&task.path, alpha_threshold);
                    let _ = task.result_sender.send(outcome);
                }
            });
            workers.push(worker);
        }

        Self {
            task_sender,
            workers,
        }
    }

    /// Queues one file for extraction and returns the receiver its result
    /// will arrive on.
    fn submit(&self, path: PathBuf) -> oneshot::Receiver<Result<Extraction>> {
        let (result_sender, result_receiver) = oneshot::channel();
        let _ = self.task_sender.send(ExtractionTask {
            path,
            result_sender,
        });
        result_receiver
    }
}

/// The multi-worker counterpart of `ArchitectPipeline`. Same inputs, same
/// deterministic outputs; only the extraction stage runs concurrently.
pub struct ParallelArchitectPipeline {
    config: PipelineConfig,
}

impl ParallelArchitectPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self, root: &Path) -> Result<ArchitectReport> {
        let mut ctx = RunContext::new();

        // Stage 1: Candidate Scan (sequential, fixes traversal order)
        let candidates = catalog::scan_candidates(root, &self.config, &mut ctx)?;

        // Stage 2: Parallel Extraction
        let pool_size = num_cpus::get().min(candidates.len()).max(1);
        let pool = ExtractorPool::new(self.config.alpha_threshold, pool_size);
        let receivers: Vec<_> = candidates
            .iter()
            .map(|path| pool.submit(path.clone()))
            .collect();

        // Receivers are awaited in submission order, which restores the
        // traversal order regardless of worker completion order.
        let results = join_all(receivers).await;
        drop(pool);

        let extracted = candidates
            .into_iter()
            .zip(results)
            .map(|(path, received)| {
                let outcome = received.unwrap_or_else(|_| {
                    Err(ArchitectError::CorruptImage {
                        path: path.clone(),
                        detail: "extraction worker terminated".to_string(),
                    })
                });
                (path, outcome)
            })
            .collect();

        // Stage 3: Name Assignment (sequential, traversal order)
        let masks = catalog::finalize_catalog(root, extracted, &mut ctx)?;

        // Stage 4: Zone Clustering
        let zones = zone_clusterer::cluster(&masks, self.config.proximity_tolerance, &mut ctx)?;

        Ok(ArchitectReport {
            masks,
            zones,
            events: ctx.into_events(),
        })
    }
}
