//! # wordsearch
//!
//! A small concurrent query service for fixed-length wildcard patterns:
//! - Clients keep a TCP connection open and send patterns such as `c?t`
//! - Each reply carries the match count and the matching dictionary words
//! - The dictionary is loaded once and shared read-only by every session
//! - Sessions run on a bounded worker pool with cooperative shutdown
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │          (non-blocking accept, shutdown polling)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Worker Pool                               │
//! │               (N workers, queued sessions)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ one Connection per client
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Protocol   │          │   Matcher   │
//!   │ (handshake, │          │   (scan)    │
//!   │   replies)  │          └──────┬──────┘
//!   └─────────────┘                 │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │   Corpus    │
//!                           │ (Arc, r/o)  │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod corpus;
pub mod matcher;
pub mod network;
pub mod protocol;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{SearchError, Result};
pub use config::Config;
pub use corpus::Corpus;
pub use matcher::{matches, scan, QueryResult};
pub use network::{Client, Server};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of wordsearch
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
