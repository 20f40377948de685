//! wordsearch Server Binary
//!
//! Loads the wordlist and starts the TCP server.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use wordsearch::network::{Server, ShutdownHandle};
use wordsearch::{Config, Corpus};

/// wordsearch Server
#[derive(Parser, Debug)]
#[command(name = "wordsearch-server")]
#[command(about = "Concurrent wildcard word query server")]
#[command(version)]
struct Args {
    /// Wordlist file, one word per line
    #[arg(short, long, default_value = "./wordlist.txt")]
    wordlist: PathBuf,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:50007")]
    listen: String,

    /// Sessions serviced concurrently (1 serializes all clients)
    #[arg(short = 'n', long, default_value = "1")]
    workers: usize,

    /// Accept poll / shutdown check interval in milliseconds
    #[arg(long, default_value = "100")]
    poll_ms: u64,

    /// Per-session read buffer size in bytes
    #[arg(long, default_value = "1024")]
    read_buffer: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,wordsearch=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("wordsearch server v{}", wordsearch::VERSION);
    tracing::info!("Wordlist: {}", args.wordlist.display());
    tracing::info!("Listen address: {}", args.listen);

    let config = Config::builder()
        .wordlist_path(&args.wordlist)
        .listen_addr(&args.listen)
        .worker_count(args.workers)
        .accept_poll_ms(args.poll_ms)
        .read_buffer_size(args.read_buffer)
        .build();

    let corpus = match Corpus::load(&config.wordlist_path) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            tracing::error!("Failed to load wordlist: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Corpus loaded: {} words", corpus.len());

    let mut server = Server::new(config, corpus);
    if let Err(e) = server.bind() {
        tracing::error!("Error starting server: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = install_shutdown_handler(server.shutdown_handle()) {
        tracing::warn!("Could not install signal handlers: {}", e);
    }

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}

/// Trigger a graceful shutdown on SIGINT/SIGTERM
#[cfg(unix)]
fn install_shutdown_handler(handle: ShutdownHandle) -> std::io::Result<()> {
    use signal_hook::consts::signal::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    std::thread::Builder::new()
        .name("wordsearch-signals".to_string())
        .spawn(move || {
            if let Some(signal) = signals.forever().next() {
                tracing::info!(signal, "Received shutdown signal, waiting for sessions to finish");
                handle.shutdown();
            }
        })?;
    Ok(())
}

#[cfg(not(unix))]
fn install_shutdown_handler(_handle: ShutdownHandle) -> std::io::Result<()> {
    tracing::warn!("Signal-driven shutdown is only supported on unix");
    Ok(())
}
