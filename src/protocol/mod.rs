//! Protocol Module
//!
//! Defines the text wire protocol between clients and the server.
//!
//! ## Session Flow
//! ```text
//!  client                               server
//!    │ ──────────── connect ────────────▶ │
//!    │ ◀─────────── "200 OK" ──────────── │   handshake, once, no terminator
//!    │ ──────────── "c?t" ──────────────▶ │   raw pattern bytes, one read
//!    │ ◀── " (Total matches: 2)\n" ────── │
//!    │ ◀── "cat, cot\n" ───────────────── │   same message
//!    │              ...                   │
//!    │ ──────────── close ──────────────▶ │
//! ```
//!
//! ### Reply Format
//! - Header: ` (Total matches: N)\n` (note the leading space)
//! - Body: matched words joined with `, ` (empty when N is 0)
//! - Terminator: `\n`, always present
//!
//! Requests carry no framing at all: whatever a single read returns is
//! decoded as one pattern.

mod query;
mod reply;
mod codec;

pub use query::Query;
pub use reply::Reply;
pub use codec::{
    HANDSHAKE, REPLY_HEADER_PREFIX, WORD_SEPARATOR,
    encode_reply, decode_reply, reply_frame_len,
    read_query, write_query,
    read_handshake, write_handshake,
    read_reply, write_reply,
};
