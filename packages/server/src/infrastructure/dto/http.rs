//! HTTP API DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::MessageDto;

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub user_id: String,
}

/// Query parameters for the message history endpoint
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
    /// RFC 3339, exclusive upper bound
    pub before_sent_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHistoryDto {
    pub messages: Vec<MessageDto>,
    pub next_before_sent_at: String,
    pub has_next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDto {
    pub client_id: String,
    pub user_id: String,
    pub room_id: String,
}
