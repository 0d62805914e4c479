//! Conversion logic between DTOs and domain entities.

use tsudoi_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::{Client, HistoryPage, IncomingMessage, Message};

use super::{
    http::{ClientDto, MessageHistoryDto},
    websocket::{IncomingMessageDto, MessageDto},
};

// ========================================
// DTO → Domain
// ========================================

impl From<IncomingMessageDto> for IncomingMessage {
    fn from(dto: IncomingMessageDto) -> Self {
        Self {
            content: dto.content,
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id().to_string(),
            room_id: message.room_id().to_string(),
            user_id: message.user_id().to_string(),
            content: message.content().as_str().to_string(),
            sent_at: timestamp_to_jst_rfc3339(message.sent_at().value()),
        }
    }
}

impl From<&Client> for ClientDto {
    fn from(client: &Client) -> Self {
        Self {
            client_id: client.id().to_string(),
            user_id: client.user_id().to_string(),
            room_id: client.room_id().to_string(),
        }
    }
}

impl From<HistoryPage> for MessageHistoryDto {
    fn from(page: HistoryPage) -> Self {
        Self {
            messages: page.messages.iter().map(MessageDto::from).collect(),
            next_before_sent_at: timestamp_to_jst_rfc3339(page.next_before_sent_at.value()),
            has_next: page.has_next,
        }
    }
}
