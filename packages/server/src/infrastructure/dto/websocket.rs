//! WebSocket frame DTOs.

use serde::{Deserialize, Serialize};

/// Frame sent by a client: `{"content": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessageDto {
    pub content: String,
}

/// Chat message pushed to room members and returned by the history API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: String,
    pub room_id: String,
    pub user_id: String,
    pub content: String,
    /// RFC 3339 (JST)
    pub sent_at: String,
}
