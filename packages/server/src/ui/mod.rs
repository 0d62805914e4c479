//! WebSocket chat server implementation.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
pub use state::{AppState, InMemoryOptions};
