//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Path, Query, State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::stream::StreamExt;
use tokio::sync::mpsc;

use crate::{
    domain::{Connection, ConnectionError, MessageContent, RoomId, UserId},
    infrastructure::{
        connection::{WebSocketConnection, pusher_loop},
        dto::http::ConnectQuery,
    },
    ui::state::AppState,
    usecase::SessionEnd,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert String -> Domain Models
    let room_id = RoomId::try_from(room_id).map_err(|e| {
        tracing::warn!("Invalid room_id: {}", e);
        StatusCode::BAD_REQUEST
    })?;
    let user_id = UserId::try_from(query.user_id).map_err(|e| {
        tracing::warn!("Invalid user_id: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user_id, room_id)))
}

/// Reads messages from the connection and sends each one to the room.
///
/// Returns when the peer closes the connection or a read fails.
async fn read_loop(
    state: Arc<AppState>,
    connection: Arc<dyn Connection>,
    user_id: UserId,
    room_id: RoomId,
) {
    loop {
        let incoming = match connection.read_message().await {
            Ok(incoming) => incoming,
            Err(ConnectionError::Closed) => {
                tracing::info!("User '{}' closed the connection", user_id);
                break;
            }
            Err(e) => {
                tracing::error!("WebSocket error for '{}': {}", user_id, e);
                break;
            }
        };

        let content = match MessageContent::new(incoming.content) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Invalid message content from '{}': {}", user_id, e);
                continue;
            }
        };

        // A failed send is reported but does not end the session
        if let Err(e) = state
            .send_message_usecase
            .execute(room_id.clone(), user_id.clone(), content)
            .await
        {
            tracing::warn!("Failed to send message from '{}': {}", user_id, e);
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, user_id: UserId, room_id: RoomId) {
    let (sender, receiver) = socket.split();

    // Outbound frames are queued and pushed to the socket by a dedicated task
    let (tx, rx) = mpsc::unbounded_channel();
    let mut send_task = pusher_loop(rx, sender);
    let connection: Arc<dyn Connection> = Arc::new(WebSocketConnection::new(tx, receiver));

    let client = match state
        .connect_participant_usecase
        .execute(user_id.clone(), room_id.clone(), connection.clone())
        .await
    {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(
                "Rejecting connection of '{}' to room '{}': {}",
                user_id,
                room_id,
                e
            );
            let _ = connection.close().await;
            let _ = send_task.await;
            return;
        }
    };
    tracing::info!(
        "User '{}' connected to room '{}' as client '{}'",
        user_id,
        room_id,
        client.id()
    );

    let mut recv_task = tokio::spawn(read_loop(
        state.clone(),
        connection.clone(),
        user_id.clone(),
        room_id.clone(),
    ));

    // If any one of the tasks completes, abort the other
    let pusher_finished = tokio::select! {
        _ = &mut recv_task => false,
        _ = &mut send_task => {
            recv_task.abort();
            true
        }
    };

    match state
        .disconnect_participant_usecase
        .end_session(&client)
        .await
    {
        Ok(SessionEnd::Disconnected(removed)) => {
            tracing::info!(
                "User '{}' left room '{}' (client '{}')",
                user_id,
                room_id,
                removed.id()
            );
        }
        Ok(SessionEnd::Superseded { current }) => {
            tracing::info!(
                "Client '{}' of '{}' closed; newer client '{}' stays connected",
                client.id(),
                user_id,
                current.id()
            );
        }
        Err(e) => {
            tracing::warn!("Failed to disconnect '{}': {}", user_id, e);
        }
    }

    if !pusher_finished {
        let _ = connection.close().await;
        let _ = send_task.await;
    }
}
