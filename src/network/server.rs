//! TCP Server
//!
//! Accepts connections and dispatches them to the worker pool.
//!
//! The listener runs in non-blocking mode: when no connection is pending the
//! acceptor sleeps for the configured poll interval and then re-checks the
//! shutdown flag, so shutdown never waits on a blocked `accept`.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use crate::config::Config;
use crate::corpus::Corpus;
use crate::error::{Result, SearchError};

use super::connection::Connection;
use super::pool::WorkerPool;

/// Cloneable handle that asks a running server to stop
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Stop accepting; in-flight sessions are allowed to finish
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Session counters, updated by the acceptor and the workers
#[derive(Debug, Default)]
pub struct ServerStats {
    accepted: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

impl ServerStats {
    /// Connections accepted
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    /// Sessions that ended normally (including peer disconnects)
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Sessions that ended with an I/O or setup error
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

/// TCP server for wordsearch
pub struct Server {
    config: Config,
    corpus: Arc<Corpus>,
    listener: Option<TcpListener>,
    shutdown: ShutdownHandle,
    stats: Arc<ServerStats>,
}

impl Server {
    /// Create a new server with the given config and corpus
    pub fn new(config: Config, corpus: Arc<Corpus>) -> Self {
        Self {
            config,
            corpus,
            listener: None,
            shutdown: ShutdownHandle {
                flag: Arc::new(AtomicBool::new(false)),
            },
            stats: Arc::new(ServerStats::default()),
        }
    }

    /// Bind the listening socket.
    ///
    /// Failures here are fatal startup errors. Returns the bound address,
    /// which differs from the configured one when port 0 was requested.
    pub fn bind(&mut self) -> Result<SocketAddr> {
        if let Some(listener) = &self.listener {
            return Ok(listener.local_addr()?);
        }

        self.config.validate()?;

        let listener = TcpListener::bind(&self.config.listen_addr).map_err(|source| {
            SearchError::Bind {
                addr: self.config.listen_addr.clone(),
                source,
            }
        })?;
        listener.set_nonblocking(true)?;

        let addr = listener.local_addr()?;
        tracing::info!("Server bound to {}", addr);

        self.listener = Some(listener);
        Ok(addr)
    }

    /// Address the server is bound to, if bound
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Handle for stopping the server from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    pub fn stats(&self) -> Arc<ServerStats> {
        Arc::clone(&self.stats)
    }

    /// Start the server (blocking)
    ///
    /// Accepts until shutdown is signalled, then closes the listener and
    /// waits for every queued and running session to finish.
    pub fn run(&mut self) -> Result<()> {
        self.bind()?;
        let listener = self
            .listener
            .take()
            .ok_or_else(|| SearchError::Config("listener missing after bind".to_string()))?;

        let pool = WorkerPool::new(self.config.worker_count)?;
        let poll_interval = self.config.accept_poll_interval();

        tracing::info!(
            "Accepting connections on {} with {} worker(s)",
            listener.local_addr()?,
            pool.size()
        );

        while !self.shutdown.is_shutdown() {
            match listener.accept() {
                Ok((stream, addr)) => self.dispatch(&pool, stream, addr),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(poll_interval);
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    // e.g. the peer reset before accept completed, or fd exhaustion
                    tracing::warn!("Failed to accept connection: {}", e);
                    thread::sleep(poll_interval);
                }
            }
        }

        tracing::info!("Shutdown requested, no longer accepting connections");
        drop(listener);

        pool.join();
        tracing::info!(
            "All sessions drained ({} accepted, {} failed)",
            self.stats.accepted(),
            self.stats.failed()
        );
        Ok(())
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.shutdown();
    }

    /// Queue a session for an accepted connection
    fn dispatch(&self, pool: &WorkerPool, stream: TcpStream, addr: SocketAddr) {
        self.stats.accepted.fetch_add(1, Ordering::Relaxed);
        tracing::info!("Accepted connection from {}", addr);

        let waiting = pool.queued();
        if waiting > 0 {
            tracing::debug!("{} session(s) already waiting for a worker", waiting);
        }

        let corpus = Arc::clone(&self.corpus);
        let stats = Arc::clone(&self.stats);
        let read_buffer_size = self.config.read_buffer_size;

        let job = move || {
            let result = Connection::new(stream, corpus, read_buffer_size)
                .and_then(|mut connection| connection.handle());

            match result {
                Ok(()) => {
                    stats.completed.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    stats.failed.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!("Session with {} failed: {}", addr, e);
                }
            }
            tracing::info!("Client at {} disconnected", addr);
        };

        if let Err(e) = pool.execute(job) {
            tracing::error!("Could not queue session for {}: {}", addr, e);
        }
    }
}
