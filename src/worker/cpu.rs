//! CPU-based worker for batch wallet generation.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use tracing::{debug, error};

use crate::error::Result;
use crate::wallet::WalletGenerator;

use super::GeneratedWallet;

/// Statistics shared by all workers in a pool.
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Wallets successfully generated
    pub wallets_generated: AtomicU64,
    /// Generations that ended in an error
    pub failures: AtomicU64,
    /// Next job index to hand out
    next_job: AtomicU64,
}

impl WorkerStats {
    /// Creates new worker stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total wallets generated.
    pub fn total_wallets(&self) -> u64 {
        self.wallets_generated.load(Ordering::Relaxed)
    }

    /// Returns the total failures.
    pub fn total_failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Claims the next job index, or `None` once `target` jobs are handed out.
    fn claim_job(&self, target: u64) -> Option<u64> {
        self.next_job
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                (n < target).then_some(n + 1)
            })
            .ok()
    }
}

/// A CPU worker that runs complete, independent pipelines.
pub struct CpuWorker {
    /// Worker ID
    id: usize,
    /// Pipeline shared with the other workers (read-only wordlist)
    generator: WalletGenerator,
    /// Entropy size per wallet
    bits: usize,
    /// Number of wallets the whole pool should produce
    target: u64,
    /// Channel to send results
    result_tx: Sender<Result<GeneratedWallet>>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Worker statistics
    stats: Arc<WorkerStats>,
}

impl CpuWorker {
    /// Creates a new CPU worker.
    pub fn new(
        id: usize,
        generator: WalletGenerator,
        bits: usize,
        target: u64,
        result_tx: Sender<Result<GeneratedWallet>>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<WorkerStats>,
    ) -> Self {
        Self {
            id,
            generator,
            bits,
            target,
            result_tx,
            stop_flag,
            stats,
        }
    }

    /// Runs the worker loop.
    ///
    /// Claims jobs and generates one wallet per job until:
    /// - All jobs are claimed
    /// - Stop flag is set
    /// - Channel is closed
    /// - A generation fails (the error is forwarded and the pool is stopped)
    pub fn run(&self) {
        while !self.stop_flag.load(Ordering::Relaxed) {
            let Some(index) = self.stats.claim_job(self.target) else {
                break;
            };

            match self.generator.generate(self.bits) {
                Ok(wallet) => {
                    self.stats.wallets_generated.fetch_add(1, Ordering::Relaxed);
                    let result = GeneratedWallet {
                        wallet,
                        index,
                        worker_id: self.id,
                    };
                    if self.result_tx.send(Ok(result)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    self.stats.failures.fetch_add(1, Ordering::Relaxed);
                    error!(worker = self.id, error = %e, "wallet generation failed");
                    self.stop_flag.store(true, Ordering::Relaxed);
                    let _ = self.result_tx.send(Err(e));
                    break;
                }
            }
        }

        debug!(worker = self.id, "worker finished");
    }

    /// Returns the worker ID.
    pub fn id(&self) -> usize {
        self.id
    }
}
