//! The batch driver.
//!
//! Discovery and dispatch run on the calling thread; a fixed-size `rayon`
//! pool drains a bounded `crossbeam-channel` queue, each worker reading a
//! voxel file and computing its descriptor against a basis table built
//! once and shared by reference across the pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossbeam_channel::bounded;
use log::{info, warn};
use rayon::ThreadPoolBuilder;
use zernike3d::{descriptor_compute_with_basis, BasisTables, Error as EngineError};

use crate::binvox::{discover, read_binvox};
use crate::hash::compute_sha256;
use crate::store::ResultStore;

/// Summary statistics for one run of the driver, logged at completion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Number of `.binvox` files found under the input directory.
    pub discovered: usize,
    /// Files whose stored result was already current and were skipped.
    pub skipped_up_to_date: usize,
    /// Files for which a descriptor was computed and written.
    pub computed: usize,
    /// Files skipped after a per-grid failure (logged as a warning).
    pub warnings: usize,
}

struct WorkItem {
    path: PathBuf,
    relative_path: PathBuf,
    hash: String,
}

/// Runs the batch driver: discovers `.binvox` files under `dir`, skips
/// ones already computed at `max_order` for their current content hash,
/// and dispatches the rest across `threads` workers with a dispatch
/// queue bounded to `queue_size`, writing results through `store`.
///
/// # Errors
///
/// Fails if the worker thread pool cannot be built, or if the engine
/// signals a driver bug (`Uninitialised` or `InvalidIndex`) rather than a
/// per-grid failure; the latter aborts the run rather than being logged
/// and skipped, since it indicates the basis tables or moment indexing
/// were set up incorrectly rather than that one input grid was bad.
pub fn run(
    dir: &Path,
    max_order: usize,
    threads: usize,
    queue_size: usize,
    store: &ResultStore,
) -> anyhow::Result<Summary> {
    let candidates = discover(dir);
    let mut summary = Summary {
        discovered: candidates.len(),
        ..Summary::default()
    };
    info!("discovered {} candidate file(s) under {}", candidates.len(), dir.display());

    let mut pending = Vec::new();
    for path in candidates {
        let relative_path = path.strip_prefix(dir).unwrap_or(&path).to_path_buf();
        let hash = match compute_sha256(&path) {
            Ok(hash) => hash,
            Err(e) => {
                warn!("skipping {}: {e}", path.display());
                summary.warnings += 1;
                continue;
            }
        };
        if store.is_up_to_date(&relative_path, &hash, max_order) {
            summary.skipped_up_to_date += 1;
            continue;
        }
        pending.push(WorkItem {
            path,
            relative_path,
            hash,
        });
    }

    let basis = Arc::new(BasisTables::new(max_order));
    let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;
    let (sender, receiver) = bounded::<WorkItem>(queue_size);

    let outcome: anyhow::Result<Vec<WorkerResult>> = pool.scope(move |scope| {
        for item in pending {
            let sender = sender.clone();
            scope.spawn(move |_| {
                let _ = sender.send(item);
            });
        }
        drop(sender);

        let mut results = Vec::new();
        let mut handles = Vec::new();
        for _ in 0..threads.max(1) {
            let receiver = receiver.clone();
            let basis = Arc::clone(&basis);
            handles.push(scope.spawn(move |_| process_worker(receiver, &basis, max_order)));
        }
        drop(receiver);

        for handle in handles {
            results.extend(handle.join()??);
        }
        Ok(results)
    })
    .map_err(|e: Box<dyn std::error::Error + Send + Sync>| anyhow::anyhow!(e))
    .and_then(|r| r);

    for result in outcome? {
        match result {
            WorkerResult::Computed { relative_path, hash, invariants } => {
                store.persist(&relative_path, &hash, max_order, &invariants)?;
                summary.computed += 1;
            }
            WorkerResult::Warned { path, message } => {
                warn!("skipping {}: {message}", path.display());
                summary.warnings += 1;
            }
        }
    }

    info!(
        "done: {} computed, {} skipped (up to date), {} warning(s), {} discovered",
        summary.computed, summary.skipped_up_to_date, summary.warnings, summary.discovered
    );
    Ok(summary)
}

enum WorkerResult {
    Computed {
        relative_path: PathBuf,
        hash: String,
        invariants: Vec<f64>,
    },
    Warned {
        path: PathBuf,
        message: String,
    },
}

fn process_worker(
    receiver: crossbeam_channel::Receiver<WorkItem>,
    basis: &BasisTables,
    max_order: usize,
) -> anyhow::Result<Vec<WorkerResult>> {
    let mut out = Vec::new();
    for item in receiver.iter() {
        let grid = match read_binvox(&item.path) {
            Ok(grid) => grid,
            Err(e) => {
                out.push(WorkerResult::Warned {
                    path: item.path,
                    message: e.to_string(),
                });
                continue;
            }
        };

        let side = grid.side();
        match descriptor_compute_with_basis(&grid, side, basis) {
            Ok(descriptor) => out.push(WorkerResult::Computed {
                relative_path: item.relative_path,
                hash: item.hash,
                invariants: descriptor.invariants,
            }),
            Err(EngineError::NoContent | EngineError::NumericalFailure) => {
                out.push(WorkerResult::Warned {
                    path: item.path,
                    message: "empty or degenerate voxel grid".to_owned(),
                });
            }
            Err(e @ (EngineError::InvalidIndex { .. } | EngineError::Uninitialised)) => {
                anyhow::bail!("driver bug computing descriptor for {}: {e}", item.path.display());
            }
        }
    }
    Ok(out)
}
