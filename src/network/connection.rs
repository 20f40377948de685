//! Connection Handler
//!
//! Runs the session protocol for one client connection.
//!
//! ## Session States
//! ```text
//! Connecting ─▶ HandshakeSent ─▶ AwaitingRequest ◀─▶ Processing
//!                     │                 │                 │
//!                     └─────────────────┴────────┬────────┘
//!                                                ▼
//!                                             Closed
//! ```
//! Any disconnect or I/O error moves straight to `Closed`.

use std::net::{Shutdown, TcpStream};
use std::sync::Arc;

use crate::corpus::Corpus;
use crate::error::{Result, SearchError};
use crate::matcher;
use crate::protocol::{read_query, write_handshake, write_reply, Query, Reply};

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    HandshakeSent,
    AwaitingRequest,
    Processing,
    Closed,
}

/// Handles a single client connection
pub struct Connection {
    /// Underlying stream; taken on close so it is released exactly once
    stream: Option<TcpStream>,

    /// Shared, read-only word collection
    corpus: Arc<Corpus>,

    /// One read's worth of request bytes
    read_buf: Vec<u8>,

    state: SessionState,

    /// Replies sent so far
    queries_served: u64,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream, corpus: Arc<Corpus>, read_buffer_size: usize) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Accepted sockets may inherit the listener's non-blocking mode
        stream.set_nonblocking(false)?;

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        Ok(Self {
            stream: Some(stream),
            corpus,
            read_buf: vec![0u8; read_buffer_size.max(1)],
            state: SessionState::Connecting,
            queries_served: 0,
            peer_addr,
        })
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Sends the handshake, then answers queries one at a time until the
    /// client disconnects or an error occurs. The stream is closed on every
    /// exit path. A peer hanging up is not an error.
    pub fn handle(&mut self) -> Result<()> {
        let result = self.serve();
        self.close();
        result
    }

    fn serve(&mut self) -> Result<()> {
        tracing::debug!("Session started for {}", self.peer_addr);

        let stream = self.stream.as_mut().ok_or(SearchError::ConnectionClosed)?;
        if let Err(e) = write_handshake(stream) {
            return self.finish_on_error("sending handshake", e);
        }
        self.state = SessionState::HandshakeSent;

        loop {
            self.state = SessionState::AwaitingRequest;

            let stream = self.stream.as_mut().ok_or(SearchError::ConnectionClosed)?;
            let query = match read_query(stream, &mut self.read_buf) {
                Ok(Some(query)) => query,
                Ok(None) => {
                    tracing::debug!(
                        "Client {} disconnected after {} queries",
                        self.peer_addr,
                        self.queries_served
                    );
                    return Ok(());
                }
                Err(SearchError::Io(ref e)) if e.kind() == std::io::ErrorKind::Interrupted => {
                    continue;
                }
                Err(e) => return self.finish_on_error("reading query", e),
            };

            self.state = SessionState::Processing;
            let reply = self.process(&query);

            let stream = self.stream.as_mut().ok_or(SearchError::ConnectionClosed)?;
            if let Err(e) = write_reply(stream, &reply) {
                return self.finish_on_error("sending reply", e);
            }
            self.queries_served += 1;
        }
    }

    /// Run one query against the corpus
    fn process(&self, query: &Query) -> Reply {
        let result = matcher::scan(&self.corpus, query.pattern());
        tracing::trace!(
            "Query {:?} from {} matched {} words",
            query.pattern(),
            self.peer_addr,
            result.count()
        );
        Reply::from(result)
    }

    /// Disconnects end the session quietly; anything else is logged and returned
    fn finish_on_error(&self, during: &str, e: SearchError) -> Result<()> {
        if e.is_disconnect() {
            tracing::debug!("Client {} went away while {}: {}", self.peer_addr, during, e);
            return Ok(());
        }
        tracing::warn!("Error {} for {}: {}", during, self.peer_addr, e);
        Err(e)
    }

    /// Release the connection. Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            tracing::debug!("Closing connection to {}", self.peer_addr);
            // The peer may already be gone; dropping the stream closes it either way
            let _ = stream.shutdown(Shutdown::Both);
        }
        self.state = SessionState::Closed;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    /// Number of replies sent on this connection
    pub fn queries_served(&self) -> u64 {
        self.queries_served
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}
