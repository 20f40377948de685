//! Client
//!
//! Blocking client for the query protocol.

use std::net::{Shutdown, TcpStream};

use bytes::BytesMut;

use crate::error::{Result, SearchError};
use crate::protocol::{read_handshake, read_reply, write_query, Query, Reply};

/// A client connection to a wordsearch server
///
/// The server never answers an empty query, so empty and whitespace-only
/// patterns are rejected here before anything is sent.
pub struct Client {
    /// Server address (host:port)
    addr: String,

    /// Live connection, if any
    stream: Option<TcpStream>,

    /// Reply bytes received but not yet decoded
    buf: BytesMut,
}

impl Client {
    /// Create a client; does not connect yet
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            stream: None,
            buf: BytesMut::new(),
        }
    }

    /// Connect and wait for the handshake.
    ///
    /// Blocks while the server has no free worker. Does nothing when
    /// already connected.
    pub fn connect(&mut self) -> Result<()> {
        if self.stream.is_some() {
            tracing::debug!("Already connected to {}", self.addr);
            return Ok(());
        }

        let mut stream = TcpStream::connect(&self.addr)?;
        stream.set_nodelay(true)?;
        tracing::debug!("Connected to {}, waiting for handshake", self.addr);

        read_handshake(&mut stream)?;
        tracing::debug!("Server {} ready", self.addr);

        self.buf.clear();
        self.stream = Some(stream);
        Ok(())
    }

    /// Drop any current connection and connect again
    pub fn reconnect(&mut self) -> Result<()> {
        self.close();
        self.connect()
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Send one pattern and wait for its complete reply
    pub fn query(&mut self, pattern: &str) -> Result<Reply> {
        if pattern.trim().is_empty() {
            return Err(SearchError::InvalidPattern(
                "pattern must not be empty".to_string(),
            ));
        }

        let stream = self.stream.as_mut().ok_or(SearchError::NotConnected)?;
        let result = write_query(stream, &Query::new(pattern))
            .and_then(|()| read_reply(stream, &mut self.buf));

        match result {
            Err(e) if e.is_disconnect() => {
                tracing::debug!("Connection to {} lost: {}", self.addr, e);
                self.stream = None;
                self.buf.clear();
                Err(SearchError::ConnectionClosed)
            }
            other => other,
        }
    }

    /// Close the connection. Returns false if there was none.
    pub fn close(&mut self) -> bool {
        match self.stream.take() {
            Some(stream) => {
                let _ = stream.shutdown(Shutdown::Both);
                self.buf.clear();
                true
            }
            None => false,
        }
    }

    /// Server address this client targets
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.close();
    }
}
