//! Tsudoi chat server.
//!
//! Accepts WebSocket connections per room and delivers every message to all
//! members of the room. Message history is served over HTTP.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tsudoi-server
//! cargo run --bin tsudoi-server -- --host 0.0.0.0 --port 3000 --users alice,bob
//! ```

use std::sync::Arc;

use clap::Parser;
use tsudoi_server::{
    domain::{DEFAULT_RECENT_MESSAGE_LIMIT, UserId},
    ui::{AppState, InMemoryOptions, Server},
    usecase::{DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT},
};
use tsudoi_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "tsudoi-server")]
#[command(about = "WebSocket room chat server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Number of recent messages kept in memory per room
    #[arg(long, default_value_t = DEFAULT_RECENT_MESSAGE_LIMIT)]
    cache_capacity: usize,

    /// Default page size of the message history endpoint
    #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
    history_limit: usize,

    /// Comma-separated user ids allowed to connect
    #[arg(long, value_delimiter = ',', default_value = "alice,bob,charlie")]
    users: Vec<String>,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(&[env!("CARGO_CRATE_NAME"), "tower_http"], &args.log_level);

    if args.cache_capacity == 0 {
        tracing::error!("--cache-capacity must be at least 1");
        std::process::exit(1);
    }
    if args.history_limit == 0 || args.history_limit > MAX_HISTORY_LIMIT {
        tracing::error!("--history-limit must be between 1 and {}", MAX_HISTORY_LIMIT);
        std::process::exit(1);
    }

    let users = match args
        .users
        .into_iter()
        .map(UserId::new)
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(users) => users,
        Err(e) => {
            tracing::error!("Invalid --users: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Accepting {} users", users.len());

    let state = AppState::in_memory(
        InMemoryOptions {
            users,
            cache_capacity: args.cache_capacity,
            history_default_limit: args.history_limit,
        },
        Arc::new(SystemClock::new()),
    );

    // Run the server
    if let Err(e) = Server::new(Arc::new(state)).run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
