//! Client Tests
//!
//! Tests verify:
//! - Connect / handshake handling, including unreachable servers
//! - Local rejection of empty patterns before any I/O
//! - Query round trips against a real server
//! - Reply reassembly when the server writes in fragments
//! - Close and reconnect without restarting the client

mod common;

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use common::{TestServer, WORDS};
use wordsearch::{Client, SearchError};

/// Address of a port nobody is listening on
fn unused_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}

/// One-connection fake server driven by `script`
fn fake_server<F>(script: F) -> (String, thread::JoinHandle<()>)
where
    F: FnOnce(TcpStream) + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        script(stream);
    });
    (addr, handle)
}

fn read_some(stream: &mut TcpStream) -> Vec<u8> {
    let mut buf = [0u8; 1024];
    let n = stream.read(&mut buf).unwrap();
    buf[..n].to_vec()
}

// =============================================================================
// Connection Tests
// =============================================================================

#[test]
fn test_connect_unreachable_server_fails_cleanly() {
    let mut client = Client::new(unused_addr());

    let result = client.connect();

    assert!(matches!(result, Err(SearchError::Io(_))));
    assert!(!client.is_connected());
}

#[test]
fn test_connect_waits_for_handshake() {
    let server = TestServer::start(WORDS, 1);
    let mut client = Client::new(server.addr_string());

    client.connect().unwrap();

    assert!(client.is_connected());
    assert_eq!(client.addr(), server.addr_string());
}

#[test]
fn test_connect_twice_is_a_no_op() {
    let server = TestServer::start(WORDS, 1);
    let mut client = Client::new(server.addr_string());

    client.connect().unwrap();
    client.connect().unwrap();

    // with one worker a second real connection would block; the query proves
    // the original session is still the one in use
    assert_eq!(client.query("cat").unwrap().count(), 1);
    assert_eq!(server.stats.accepted(), 1);
}

#[test]
fn test_bad_handshake_is_protocol_error() {
    let (addr, fake) = fake_server(|mut stream| {
        stream.write_all(b"HELLO!").unwrap();
    });
    let mut client = Client::new(addr);

    let result = client.connect();

    assert!(matches!(result, Err(SearchError::Protocol(_))));
    assert!(!client.is_connected());
    fake.join().unwrap();
}

// =============================================================================
// Pattern Validation Tests
// =============================================================================

#[test]
fn test_empty_pattern_rejected_without_connection() {
    let mut client = Client::new(unused_addr());

    assert!(matches!(client.query(""), Err(SearchError::InvalidPattern(_))));
    assert!(matches!(client.query("   "), Err(SearchError::InvalidPattern(_))));
}

#[test]
fn test_empty_pattern_sends_nothing() {
    let server = TestServer::start(WORDS, 1);
    let mut client = Client::new(server.addr_string());
    client.connect().unwrap();

    assert!(matches!(client.query(""), Err(SearchError::InvalidPattern(_))));

    // the session is not stalled: the next real query is answered
    assert_eq!(client.query("dog").unwrap().words(), vec!["dog"]);
}

#[test]
fn test_query_without_connection() {
    let mut client = Client::new(unused_addr());
    assert!(matches!(client.query("cat"), Err(SearchError::NotConnected)));
}

// =============================================================================
// Query Tests
// =============================================================================

#[test]
fn test_query_exact_match() {
    let server = TestServer::start(WORDS, 1);
    let mut client = Client::new(server.addr_string());
    client.connect().unwrap();

    let reply = client.query("cat").unwrap();

    assert_eq!(reply.count(), 1);
    assert_eq!(reply.words(), vec!["cat"]);
}

#[test]
fn test_query_no_match() {
    let server = TestServer::start(WORDS, 1);
    let mut client = Client::new(server.addr_string());
    client.connect().unwrap();

    let reply = client.query("3422").unwrap();

    assert_eq!(reply.count(), 0);
    assert!(reply.words().is_empty());
    assert_eq!(reply.to_string(), " (Total matches: 0)\n\n");
}

#[test]
fn test_query_wildcards() {
    let server = TestServer::start(WORDS, 1);
    let mut client = Client::new(server.addr_string());
    client.connect().unwrap();

    let reply = client.query("??????????").unwrap();

    assert_eq!(reply.count(), 3);
    assert_eq!(reply.words(), vec!["abcdefghij", "strawberry", "blackberry"]);
    assert!(reply.words().iter().all(|w| w.len() == 10));
}

#[test]
fn test_query_word_containing_separator() {
    let server = TestServer::start(&["a, b", "xyzw"], 1);
    let mut client = Client::new(server.addr_string());
    client.connect().unwrap();

    let reply = client.query("a??b").unwrap();

    assert_eq!(reply.count(), 1);
    assert_eq!(reply.body(), "a, b");
    assert_eq!(reply.to_string(), " (Total matches: 1)\na, b\n");

    // session is still usable afterwards
    assert_eq!(client.query("xyzw").unwrap().body(), "xyzw");
}

#[test]
fn test_fragmented_reply_is_reassembled() {
    let (addr, fake) = fake_server(|mut stream| {
        stream.set_nodelay(true).unwrap();
        stream.write_all(b"200 OK").unwrap();
        assert_eq!(read_some(&mut stream), b"c?t");
        let pieces: [&[u8]; 5] = [b" (Total", b" matches: 2)\n", b"cat, ", b"cot", b"\n"];
        for piece in pieces {
            stream.write_all(piece).unwrap();
            stream.flush().unwrap();
            thread::sleep(Duration::from_millis(20));
        }
    });
    let mut client = Client::new(addr);
    client.connect().unwrap();

    let reply = client.query("c?t").unwrap();

    assert_eq!(reply.words(), vec!["cat", "cot"]);
    fake.join().unwrap();
}

#[test]
fn test_server_closing_mid_session() {
    let (addr, fake) = fake_server(|mut stream| {
        stream.write_all(b"200 OK").unwrap();
        read_some(&mut stream);
        // close without replying
    });
    let mut client = Client::new(addr);
    client.connect().unwrap();

    let result = client.query("cat");

    assert!(matches!(result, Err(SearchError::ConnectionClosed)));
    assert!(!client.is_connected());
    fake.join().unwrap();
}

// =============================================================================
// Close / Reconnect Tests
// =============================================================================

#[test]
fn test_close_is_idempotent() {
    let server = TestServer::start(WORDS, 1);
    let mut client = Client::new(server.addr_string());
    client.connect().unwrap();

    assert!(client.close());
    assert!(!client.close());
    assert!(matches!(client.query("cat"), Err(SearchError::NotConnected)));
}

#[test]
fn test_reconnect_after_close() {
    let server = TestServer::start(WORDS, 1);
    let mut client = Client::new(server.addr_string());
    client.connect().unwrap();
    client.close();

    // single worker: this only succeeds once the first session has ended
    client.reconnect().unwrap();

    assert_eq!(client.query("bat").unwrap().words(), vec!["bat"]);
    assert_eq!(server.stats.accepted(), 2);
}

#[test]
fn test_reconnect_after_server_dropped_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let fake = thread::spawn(move || {
        // first session: close right after the query arrives
        let (mut stream, _) = listener.accept().unwrap();
        stream.write_all(b"200 OK").unwrap();
        read_some(&mut stream);
        drop(stream);

        // second session: answer properly
        let (mut stream, _) = listener.accept().unwrap();
        stream.write_all(b"200 OK").unwrap();
        read_some(&mut stream);
        stream.write_all(b" (Total matches: 1)\ncat\n").unwrap();
        read_some(&mut stream);
    });

    let mut client = Client::new(addr);
    client.connect().unwrap();
    assert!(matches!(client.query("cat"), Err(SearchError::ConnectionClosed)));

    client.reconnect().unwrap();
    assert_eq!(client.query("cat").unwrap().words(), vec!["cat"]);

    client.close();
    fake.join().unwrap();
}
