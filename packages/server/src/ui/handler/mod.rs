//! Request handlers.

mod http;
mod websocket;

pub use http::{get_message_history, get_room_clients, health_check};
pub use websocket::websocket_handler;
