//! Worker pool for parallel wallet generation.
//!
//! This module provides:
//! - Multi-threaded CPU workers, each running an independent pipeline
//! - Exact work distribution through a shared job counter
//! - Progress tracking and early shutdown

mod cpu;
mod pool;

pub use cpu::{CpuWorker, WorkerStats};
pub use pool::{GeneratedWallet, PoolEvent, WalletPool};
