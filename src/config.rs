//! Configuration for wordsearch
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, SearchError};

/// Main configuration for a wordsearch server
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Corpus Configuration
    // -------------------------------------------------------------------------
    /// Wordlist file, one word per line. Only read by the server binary;
    /// library callers hand a ready `Corpus` to the server.
    pub wordlist_path: PathBuf,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address (host:port)
    pub listen_addr: String,

    /// Number of sessions serviced concurrently.
    ///
    /// `1` serializes every client onto a single worker; further clients
    /// wait in the queue until the current session ends.
    pub worker_count: usize,

    /// How often the acceptor re-polls the listener and checks for shutdown
    /// (milliseconds)
    pub accept_poll_ms: u64,

    /// Size of the per-session read buffer. A single query must fit in one read.
    pub read_buffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wordlist_path: PathBuf::from("./wordlist.txt"),
            listen_addr: "127.0.0.1:50007".to_string(),
            worker_count: 1,
            accept_poll_ms: 100,
            read_buffer_size: 1024,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that every value is usable before the server starts
    pub fn validate(&self) -> Result<()> {
        if self.listen_addr.trim().is_empty() {
            return Err(SearchError::Config("listen address is empty".to_string()));
        }
        if self.worker_count == 0 {
            return Err(SearchError::Config(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.accept_poll_ms == 0 {
            return Err(SearchError::Config(
                "accept poll interval must be greater than zero".to_string(),
            ));
        }
        if self.read_buffer_size == 0 {
            return Err(SearchError::Config(
                "read buffer size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Accept poll interval as a `Duration`
    pub fn accept_poll_interval(&self) -> Duration {
        Duration::from_millis(self.accept_poll_ms)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the wordlist file path
    pub fn wordlist_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.wordlist_path = path.into();
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the number of concurrent session workers
    pub fn worker_count(mut self, count: usize) -> Self {
        self.config.worker_count = count;
        self
    }

    /// Set the accept poll interval (in milliseconds)
    pub fn accept_poll_ms(mut self, ms: u64) -> Self {
        self.config.accept_poll_ms = ms;
        self
    }

    /// Set the per-session read buffer size (in bytes)
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.config.read_buffer_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
