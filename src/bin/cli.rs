//! wordsearch CLI Client
//!
//! Command-line interface for querying a wordsearch server.

use std::io::{self, BufRead, Write};

use clap::Parser;
use wordsearch::{Client, SearchError};

/// wordsearch CLI
#[derive(Parser, Debug)]
#[command(name = "wordsearch-cli")]
#[command(about = "CLI for the wordsearch wildcard query server")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:50007")]
    server: String,

    /// Patterns to query and exit (interactive mode when omitted)
    patterns: Vec<String>,
}

const PROMPT: &str = "Enter pattern (\"exit()\" to quit, \"reconnect()\" to reconnect): ";

fn main() {
    let args = Args::parse();
    let mut client = Client::new(&args.server);

    println!("Connecting to {}, waiting in queue...", args.server);
    match client.connect() {
        Ok(()) => println!("Server ready."),
        Err(e) => {
            eprintln!("Error connecting to server: {}", e);
            std::process::exit(1);
        }
    }

    if !args.patterns.is_empty() {
        for pattern in &args.patterns {
            if let Err(e) = run_query(&mut client, pattern) {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = interactive(&mut client) {
        eprintln!("Input error: {}", e);
    }

    if client.close() {
        println!("Connection closed");
    }
}

fn interactive(client: &mut Client) -> io::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}", PROMPT);
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;

        match line.trim().to_lowercase().as_str() {
            "exit()" => return Ok(()),
            "reconnect()" => {
                match client.reconnect() {
                    Ok(()) => println!("Server ready."),
                    Err(e) => println!("Reconnection failed ({}). Try again or exit.", e),
                }
                continue;
            }
            _ => {}
        }

        if !client.is_connected() {
            println!("No connection to server. Use \"reconnect()\" to reconnect or \"exit()\" to quit.");
            continue;
        }

        match run_query(client, &line) {
            Ok(()) => {}
            Err(SearchError::InvalidPattern(_)) => println!("Please enter a non-empty pattern."),
            Err(SearchError::ConnectionClosed) => {
                println!("Server closed the connection. Use \"reconnect()\" to reconnect.")
            }
            Err(e) => println!("Error querying server: {}", e),
        }
    }
}

fn run_query(client: &mut Client, pattern: &str) -> wordsearch::Result<()> {
    let reply = client.query(pattern)?;
    println!("Server reply:\n{}", reply);
    Ok(())
}
