//! Worker pool management.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use tracing::info;

use crate::error::{Result, WalletError};
use crate::wallet::{Wallet, WalletGenerator};

use super::cpu::{CpuWorker, WorkerStats};

/// Upper bound on the up-front allocation in [`WalletPool::collect`].
const COLLECT_CAPACITY_HINT: u64 = 1024;

/// A wallet produced by the pool.
#[derive(Debug, Clone)]
pub struct GeneratedWallet {
    /// The generated wallet
    pub wallet: Wallet,
    /// Job index in `0..count`
    pub index: u64,
    /// The ID of the worker that produced it
    pub worker_id: usize,
}

/// What the pool reported while waiting.
#[derive(Debug)]
pub enum PoolEvent {
    /// A wallet arrived
    Generated(GeneratedWallet),
    /// A worker failed; the pool has been told to stop
    Failed(WalletError),
    /// Nothing arrived within the timeout
    Timeout,
    /// Every worker has exited and all results were drained
    Finished,
}

/// Manages a pool of workers for parallel wallet generation.
pub struct WalletPool {
    /// Number of workers
    num_workers: usize,
    /// Number of wallets requested
    count: u64,
    /// Worker thread handles (Option to allow taking during join)
    handles: Option<Vec<JoinHandle<()>>>,
    /// Channel receiver for results
    result_rx: Receiver<Result<GeneratedWallet>>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Shared statistics
    stats: Arc<WorkerStats>,
    /// Start time
    start_time: Instant,
}

impl WalletPool {
    /// Starts `num_workers` threads that together produce `count` wallets.
    pub fn new(
        num_workers: usize,
        generator: WalletGenerator,
        bits: usize,
        count: u64,
    ) -> Result<Self> {
        if num_workers == 0 {
            return Err(WalletError::InvalidParameter(
                "worker pool needs at least one worker".into(),
            ));
        }

        let (result_tx, result_rx) = bounded(100);
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(WorkerStats::new());

        // Never spawn more threads than there are wallets to make.
        let num_workers = num_workers.min(count.max(1) as usize);

        let handles = Self::spawn_workers(
            num_workers,
            generator,
            bits,
            count,
            result_tx,
            stop_flag.clone(),
            stats.clone(),
        );
        let handles = match handles {
            Ok(handles) => handles,
            Err(e) => {
                stop_flag.store(true, Ordering::Relaxed);
                return Err(e);
            }
        };

        info!(workers = num_workers, count, bits, "worker pool started");

        Ok(Self {
            num_workers,
            count,
            handles: Some(handles),
            result_rx,
            stop_flag,
            stats,
            start_time: Instant::now(),
        })
    }

    /// Spawns worker threads.
    fn spawn_workers(
        num_workers: usize,
        generator: WalletGenerator,
        bits: usize,
        count: u64,
        result_tx: Sender<Result<GeneratedWallet>>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<WorkerStats>,
    ) -> Result<Vec<JoinHandle<()>>> {
        (0..num_workers)
            .map(|id| {
                let generator = generator.clone();
                let result_tx = result_tx.clone();
                let stop_flag = stop_flag.clone();
                let stats = stats.clone();

                thread::Builder::new()
                    .name(format!("wallet-worker-{}", id))
                    .spawn(move || {
                        let worker =
                            CpuWorker::new(id, generator, bits, count, result_tx, stop_flag, stats);
                        worker.run();
                    })
                    .map_err(WalletError::from)
            })
            .collect()
    }

    /// Waits up to `timeout` for the next event.
    pub fn wait_for_event(&self, timeout: Duration) -> PoolEvent {
        match self.result_rx.recv_timeout(timeout) {
            Ok(Ok(generated)) => PoolEvent::Generated(generated),
            Ok(Err(e)) => PoolEvent::Failed(e),
            Err(RecvTimeoutError::Timeout) => PoolEvent::Timeout,
            Err(RecvTimeoutError::Disconnected) => PoolEvent::Finished,
        }
    }

    /// Returns an iterator over results (blocking) that ends when all
    /// workers have exited.
    pub fn results(&self) -> impl Iterator<Item = Result<GeneratedWallet>> + '_ {
        self.result_rx.iter()
    }

    /// Collects every wallet, failing on the first error.
    pub fn collect(self) -> Result<Vec<GeneratedWallet>> {
        let mut wallets = Vec::with_capacity(self.count.min(COLLECT_CAPACITY_HINT) as usize);
        for result in self.results() {
            wallets.push(result?);
        }
        wallets.sort_by_key(|w| w.index);
        Ok(wallets)
    }

    /// Signals all workers to stop.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Waits for all workers to complete.
    pub fn join(mut self) {
        self.stop();
        self.join_handles();
    }

    fn join_handles(&mut self) {
        if let Some(handles) = self.handles.take() {
            for handle in handles {
                let _ = handle.join();
            }
            info!(
                wallets = self.total_wallets(),
                failures = self.total_failures(),
                "worker pool finished"
            );
        }
    }

    /// Returns the number of workers.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Returns the number of wallets requested.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the total wallets generated across all workers.
    pub fn total_wallets(&self) -> u64 {
        self.stats.total_wallets()
    }

    /// Returns the total failed generations.
    pub fn total_failures(&self) -> u64 {
        self.stats.total_failures()
    }

    /// Returns the elapsed time since the pool was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the current generation rate (wallets per second).
    pub fn wallets_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_wallets() as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Returns a clone of the stop flag for external use (e.g., signal handlers).
    pub fn stop_flag_clone(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Returns true if the pool has been signaled to stop.
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }
}

impl Drop for WalletPool {
    fn drop(&mut self) {
        self.stop();
        // Unblock workers waiting on a full channel before joining them.
        while self.result_rx.try_recv().is_ok() {}
        self.join_handles();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_pool_generates_exact_count() {
        let generator = WalletGenerator::english().unwrap();
        let pool = WalletPool::new(4, generator, 128, 6).unwrap();
        let wallets = pool.collect().unwrap();

        assert_eq!(wallets.len(), 6);
        let indices: Vec<u64> = wallets.iter().map(|w| w.index).collect();
        assert_eq!(indices, (0..6).collect::<Vec<_>>());

        let addresses: HashSet<String> = wallets
            .iter()
            .map(|w| w.wallet.address().to_hex())
            .collect();
        assert_eq!(addresses.len(), 6);
    }

    #[test]
    fn test_pool_caps_workers_to_count() {
        let generator = WalletGenerator::english().unwrap();
        let pool = WalletPool::new(8, generator, 128, 2).unwrap();
        assert_eq!(pool.num_workers(), 2);
        assert_eq!(pool.collect().unwrap().len(), 2);
    }

    #[test]
    fn test_pool_reports_failure() {
        let generator = WalletGenerator::english().unwrap();
        let pool = WalletPool::new(2, generator, 99, 4).unwrap();

        let mut failed = false;
        loop {
            match pool.wait_for_event(Duration::from_secs(10)) {
                PoolEvent::Failed(e) => {
                    assert!(matches!(e, WalletError::InvalidParameter(_)));
                    failed = true;
                }
                PoolEvent::Finished => break,
                PoolEvent::Generated(_) => panic!("no wallet should be produced"),
                PoolEvent::Timeout => panic!("pool hung"),
            }
        }
        assert!(failed);
        assert!(pool.is_stopped());
        assert_eq!(pool.total_wallets(), 0);
    }

    #[test]
    fn test_collect_with_huge_count_after_stop() {
        let generator = WalletGenerator::english().unwrap();
        let pool = WalletPool::new(1, generator, 128, u64::MAX).unwrap();
        pool.stop();

        let wallets = pool.collect().unwrap();
        assert!(wallets.len() < 16);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let generator = WalletGenerator::english().unwrap();
        assert!(WalletPool::new(0, generator, 128, 1).is_err());
    }
}
