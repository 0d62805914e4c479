//! Connection の実装
//!
//! - `websocket`: axum の WebSocket を使った実装

pub mod websocket;

pub use websocket::{OutboundFrame, PusherChannel, WebSocketConnection, pusher_loop};
