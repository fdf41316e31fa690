//! Ethereum Wallet Generator CLI
//!
//! Usage:
//!   wallet_gen                          # One wallet, 12-word mnemonic
//!   wallet_gen -b 256 -n 10             # Ten wallets with 24-word mnemonics
//!   wallet_gen --entropy 00000000000000000000000000000000
//!   wallet_gen --mnemonic "legal winner thank year wave sausage worth useful legal winner thank yellow"

use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use eth_wallet::{
    Config, Entropy, PoolEvent, Result, Wallet, WalletGenerator, WalletPool, Wordlist,
};

fn main() {
    let config = Config::parse();
    init_logging(&config);

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }

    let generator = match build_generator(&config) {
        Ok(generator) => generator,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    let outcome = if config.is_deterministic() {
        run_single(&config, &generator)
    } else {
        run_batch(&config, generator)
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise `-v` raises the level from `warn`.
fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the wordlist once; every worker shares it.
fn build_generator(config: &Config) -> Result<WalletGenerator> {
    let generator = match &config.wordlist {
        Some(path) => {
            let wordlist = Wordlist::from_file(path)?;
            info!(path = %path.display(), "loaded wordlist");
            WalletGenerator::new(Arc::new(wordlist))
        }
        None => WalletGenerator::english()?,
    };

    Ok(generator.with_passphrase(config.passphrase.clone()))
}

fn run_single(config: &Config, generator: &WalletGenerator) -> Result<()> {
    let wallet = match (&config.entropy, &config.mnemonic) {
        (Some(hex_str), _) => generator.from_entropy(&Entropy::from_hex(hex_str)?)?,
        (None, Some(phrase)) => generator.recover(phrase)?,
        (None, None) => generator.generate(config.bits)?,
    };

    print_wallet(&wallet, 1, config.checksum);
    Ok(())
}

fn run_batch(config: &Config, generator: WalletGenerator) -> Result<()> {
    let workers = config.worker_count();

    // Print startup info
    eprintln!("Ethereum Wallet Generator");
    eprintln!("=========================");
    eprintln!("Entropy:    {} bits ({} words)", config.bits, config.bits * 3 / 32);
    eprintln!("Workers:    {}", workers);
    eprintln!("Target:     {} wallet(s)", config.count);
    eprintln!();

    let pool = WalletPool::new(workers, generator, config.bits, config.count)?;

    // Set up ctrl-c handler
    ctrlc_handler(pool.stop_flag_clone());

    let report_interval = Duration::from_secs(config.report_interval);
    let mut produced = 0u64;
    let mut failure = None;

    loop {
        match pool.wait_for_event(report_interval) {
            PoolEvent::Generated(generated) => {
                produced += 1;
                print_wallet(&generated.wallet, produced, config.checksum);
            }
            PoolEvent::Failed(e) => {
                // Keep draining; the first error is the one reported.
                if failure.is_none() {
                    failure = Some(e);
                }
            }
            PoolEvent::Timeout => print_progress(&pool),
            PoolEvent::Finished => break,
        }
    }

    if failure.is_none() && produced < config.count {
        eprintln!("\nStopped by user.");
    }

    // Print final stats
    eprintln!("\n--- Final Statistics ---");
    eprintln!("Wallets generated: {}", format_number(pool.total_wallets()));
    eprintln!("Failures:          {}", pool.total_failures());
    eprintln!("Time elapsed:      {:.2}s", pool.elapsed().as_secs_f64());
    eprintln!("Average speed:     {:.2}/s", pool.wallets_per_second());

    pool.join();

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn print_wallet(wallet: &Wallet, index: u64, show_checksum: bool) {
    let record = wallet.to_record();

    println!("=== Wallet #{} ===", index);
    println!("Mnemonic:    {}", record.mnemonic);
    println!("Private Key: {}", record.private_key);
    println!("Public Key:  {}", record.public_key);
    println!("Address:     {}", record.address);
    if show_checksum {
        println!("EIP-55:      {}", wallet.address().to_checksum());
    }
    println!();
}

fn print_progress(pool: &WalletPool) {
    eprintln!(
        "[{:>4}s] Generated {} of {} wallets ({:.2}/s)",
        pool.elapsed().as_secs(),
        format_number(pool.total_wallets()),
        format_number(pool.count()),
        pool.wallets_per_second()
    );
}

fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

fn ctrlc_handler(stop_flag: Arc<AtomicBool>) {
    let handler = ctrlc::set_handler(move || {
        stop_flag.store(true, Ordering::Relaxed);
    });
    if let Err(e) = handler {
        warn!(error = %e, "could not install Ctrl-C handler");
    }
}
