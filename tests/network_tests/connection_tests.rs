//! Connection Tests
//!
//! Tests verify, by driving a single `Connection` over a loopback pair:
//! - Every way a session ends leaves it `Closed`
//! - Peer hang-ups (before the handshake, between queries, mid-reply) are not errors
//! - `close()` is idempotent, before and after `handle()`

mod common;

use std::io::Write;
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use common::{raw_query, read_handshake_bytes};
use wordsearch::network::{Connection, SessionState};
use wordsearch::{Corpus, SearchError};

/// Connected (server side, client side) sockets
fn loopback_pair() -> (TcpStream, TcpStream) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let client = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
    let (server, _) = listener.accept().unwrap();
    (server, client)
}

fn connection(stream: TcpStream, words: &[&str]) -> Connection {
    let corpus = Corpus::from_words(words.iter().copied());
    Connection::new(stream, Arc::new(corpus), 1024).unwrap()
}

/// Run `handle()` on its own thread, handing the connection back afterwards
fn spawn_handle(mut conn: Connection) -> JoinHandle<(Connection, wordsearch::Result<()>)> {
    thread::spawn(move || {
        let result = conn.handle();
        (conn, result)
    })
}

fn assert_closed_twice(conn: &mut Connection) {
    assert_eq!(conn.state(), SessionState::Closed);
    assert!(conn.is_closed());

    conn.close();

    assert_eq!(conn.state(), SessionState::Closed);
    assert!(conn.is_closed());
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_new_connection_is_connecting() {
    let (server, _client) = loopback_pair();
    let conn = connection(server, &["cat"]);

    assert_eq!(conn.state(), SessionState::Connecting);
    assert!(!conn.is_closed());
    assert_eq!(conn.queries_served(), 0);
    assert!(conn.peer_addr().starts_with("127.0.0.1:"));
}

#[test]
fn test_close_before_handle() {
    let (server, _client) = loopback_pair();
    let mut conn = connection(server, &["cat"]);

    conn.close();
    assert_closed_twice(&mut conn);

    let result = conn.handle();

    assert!(matches!(result, Err(SearchError::ConnectionClosed)));
    assert_eq!(conn.state(), SessionState::Closed);
}

// =============================================================================
// Session Exit Paths
// =============================================================================

#[test]
fn test_peer_disconnect_after_queries() {
    let (server, mut client) = loopback_pair();
    let session = spawn_handle(connection(server, &["cat", "bat", "dog"]));

    assert_eq!(read_handshake_bytes(&mut client), b"200 OK");
    assert_eq!(raw_query(&mut client, b"?at"), b" (Total matches: 2)\ncat, bat\n");
    assert_eq!(raw_query(&mut client, b"dog"), b" (Total matches: 1)\ndog\n");
    drop(client);

    let (mut conn, result) = session.join().unwrap();

    assert!(result.is_ok());
    assert_eq!(conn.queries_served(), 2);
    assert_closed_twice(&mut conn);
}

#[test]
fn test_peer_gone_before_handshake() {
    let (server, client) = loopback_pair();
    drop(client);

    let (mut conn, result) = spawn_handle(connection(server, &["cat"])).join().unwrap();

    assert!(result.is_ok());
    assert_eq!(conn.queries_served(), 0);
    assert_closed_twice(&mut conn);
}

#[test]
fn test_peer_gone_while_reply_is_sent() {
    // every word matches, so the reply is far larger than the socket buffers
    let words: Vec<String> = (0..500_000).map(|i| format!("{:032}", i)).collect();
    let pattern = "?".repeat(32);

    let (server, mut client) = loopback_pair();
    let corpus = Corpus::from_words(words);
    let conn = Connection::new(server, Arc::new(corpus), 1024).unwrap();
    let session = spawn_handle(conn);

    read_handshake_bytes(&mut client);
    client.write_all(pattern.as_bytes()).unwrap();
    drop(client);

    let (mut conn, result) = session.join().unwrap();

    assert!(result.is_ok());
    assert_eq!(conn.queries_served(), 0);
    assert_closed_twice(&mut conn);
}
