//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Handshake (server → client, once)
//! ```text
//! 200 OK
//! ```
//!
//! ### Request (client → server)
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ pattern bytes (no length, no delimiter) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ### Reply (server → client)
//! ```text
//! ┌──────────────────────────┬───────────────────────┬──────┐
//! │ " (Total matches: N)\n"  │ "w1, w2, ..." or ""   │ "\n" │
//! └──────────────────────────┴───────────────────────┴──────┘
//! ```
//!
//! Words never contain a newline (the corpus drops any that do), so a reply
//! is complete once two `\n` bytes have arrived. The word line is otherwise
//! opaque: it is not split or checked against the count when decoding.

use std::io::{Read, Write};

use bytes::BytesMut;

use crate::error::{Result, SearchError};
use super::{Query, Reply};

/// Readiness payload sent right after accept
pub const HANDSHAKE: &[u8] = b"200 OK";

/// Text preceding the match count in every reply
pub const REPLY_HEADER_PREFIX: &str = " (Total matches: ";

/// Text following the match count
const REPLY_HEADER_SUFFIX: &str = ")\n";

/// Separator between matched words
pub const WORD_SEPARATOR: &str = ", ";

/// Chunk size used when accumulating a reply
const READ_CHUNK_SIZE: usize = 1024;

// =============================================================================
// Reply Encoding/Decoding
// =============================================================================

/// Encode a reply to bytes
pub fn encode_reply(reply: &Reply) -> Vec<u8> {
    reply.to_string().into_bytes()
}

/// Length of the first complete reply in `bytes`, if one has fully arrived
pub fn reply_frame_len(bytes: &[u8]) -> Option<usize> {
    let header_end = bytes.iter().position(|&b| b == b'\n')?;
    let body = &bytes[header_end + 1..];
    let body_end = body.iter().position(|&b| b == b'\n')?;
    Some(header_end + 1 + body_end + 1)
}

/// Decode exactly one reply
pub fn decode_reply(bytes: &[u8]) -> Result<Reply> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| SearchError::Protocol(format!("Reply is not valid UTF-8: {}", e)))?;

    let rest = text.strip_prefix(REPLY_HEADER_PREFIX).ok_or_else(|| {
        SearchError::Protocol(format!("Malformed reply header: {:?}", truncate(text)))
    })?;

    let (count_str, rest) = rest.split_once(REPLY_HEADER_SUFFIX).ok_or_else(|| {
        SearchError::Protocol(format!("Unterminated reply header: {:?}", truncate(text)))
    })?;

    let count: usize = count_str.parse().map_err(|_| {
        SearchError::Protocol(format!("Invalid match count: {:?}", count_str))
    })?;

    let body = rest.strip_suffix('\n').ok_or_else(|| {
        SearchError::Protocol("Reply is missing its terminator".to_string())
    })?;

    if body.contains('\n') {
        return Err(SearchError::Protocol(
            "Reply body spans more than one line".to_string(),
        ));
    }

    Ok(Reply::from_parts(count, body.to_string()))
}

fn truncate(text: &str) -> &str {
    match text.char_indices().nth(32) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Send the handshake payload
pub fn write_handshake<W: Write>(writer: &mut W) -> Result<()> {
    writer.write_all(HANDSHAKE)?;
    writer.flush()?;
    Ok(())
}

/// Wait for the handshake payload
pub fn read_handshake<R: Read>(reader: &mut R) -> Result<()> {
    let mut buf = [0u8; HANDSHAKE.len()];
    reader.read_exact(&mut buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            SearchError::ConnectionClosed
        } else {
            SearchError::Io(e)
        }
    })?;

    if &buf[..] != HANDSHAKE {
        return Err(SearchError::Protocol(format!(
            "Unexpected handshake: {:?}",
            String::from_utf8_lossy(&buf)
        )));
    }
    Ok(())
}

/// Read one query with a single read call.
///
/// Returns `None` when the peer has closed its side.
pub fn read_query<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<Option<Query>> {
    let n = reader.read(buf)?;
    if n == 0 {
        return Ok(None);
    }
    Ok(Some(Query::decode(&buf[..n])))
}

/// Send a query
pub fn write_query<W: Write>(writer: &mut W, query: &Query) -> Result<()> {
    writer.write_all(query.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Read a complete reply from a stream.
///
/// Keeps reading until a whole reply is buffered, so a reply split over any
/// number of reads is handled. Bytes past the reply stay in `buf`.
pub fn read_reply<R: Read>(reader: &mut R, buf: &mut BytesMut) -> Result<Reply> {
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    loop {
        if let Some(len) = reply_frame_len(buf) {
            let frame = buf.split_to(len);
            return decode_reply(&frame);
        }

        let n = match reader.read(&mut chunk) {
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        if n == 0 {
            return Err(SearchError::ConnectionClosed);
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

/// Write a reply to a stream
pub fn write_reply<W: Write>(writer: &mut W, reply: &Reply) -> Result<()> {
    let bytes = encode_reply(reply);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
