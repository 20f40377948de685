//! Network Module
//!
//! TCP server, session handling and client.
//!
//! ## Architecture
//! - Single acceptor thread polling a non-blocking listener
//! - Fixed-size worker pool; each worker runs one session at a time
//! - Sessions share the corpus through an `Arc`, nothing else is shared

mod server;
mod connection;
mod pool;
mod client;

pub use server::{Server, ServerStats, ShutdownHandle};
pub use connection::{Connection, SessionState};
pub use pool::WorkerPool;
pub use client::Client;
