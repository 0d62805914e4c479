//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tsudoi_shared::time::{Clock, parse_rfc3339_to_nanos};

use crate::{
    domain::{RoomId, Timestamp},
    infrastructure::dto::http::{ClientDto, HistoryQuery, MessageHistoryDto},
    ui::state::AppState,
};

fn parse_room_id(room_id: String) -> Result<RoomId, StatusCode> {
    RoomId::try_from(room_id).map_err(|e| {
        tracing::warn!("Invalid room_id: {}", e);
        StatusCode::BAD_REQUEST
    })
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get message history of a room (newest messages before `before_sent_at`)
pub async fn get_message_history(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<MessageHistoryDto>, StatusCode> {
    let room_id = parse_room_id(room_id)?;
    let limit = query.limit.unwrap_or(state.history_default_limit);
    let before_sent_at = match query.before_sent_at.as_deref() {
        Some(value) => parse_rfc3339_to_nanos(value).map_err(|e| {
            tracing::warn!("Invalid before_sent_at '{}': {}", value, e);
            StatusCode::BAD_REQUEST
        })?,
        None => state.clock.now_nanos(),
    };

    match state
        .get_message_history_usecase
        .execute(room_id, limit, Timestamp::new(before_sent_at))
        .await
    {
        // Domain Model から DTO への変換
        Ok(page) => Ok(Json(MessageHistoryDto::from(page))),
        Err(e) if e.is_invalid_input() => {
            tracing::warn!("Rejected history request: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
        Err(e) if e.is_not_found() => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to get message history: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get clients connected to a room
pub async fn get_room_clients(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<Vec<ClientDto>>, StatusCode> {
    let room_id = parse_room_id(room_id)?;

    match state.get_room_clients_usecase.execute(room_id).await {
        Ok(clients) => Ok(Json(clients.iter().map(ClientDto::from).collect())),
        Err(e) => {
            tracing::error!("Failed to get room clients: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
