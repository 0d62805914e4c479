//! WebSocket を使った Connection 実装
//!
//! ## 責務
//!
//! - 受信: WebSocket の受信ストリームから JSON フレームを読み、`IncomingMessage` に変換
//! - 送信: `Message` を JSON にしてクライアントごとの送信キューに積む
//!
//! ## 設計ノート
//!
//! 送信キュー（`PusherChannel`）は `pusher_loop` が WebSocket の sink に書き出します。
//! ブロードキャストは送信キューへの投入だけで完了するため、遅いクライアントが
//! 同じルームの他のメンバーへの配送を止めることはありません。

use async_trait::async_trait;
use axum::extract::ws::Message as WsMessage;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{Connection, ConnectionError, IncomingMessage, Message},
    infrastructure::dto::websocket::{IncomingMessageDto, MessageDto},
};

/// 送信キューに積むフレーム
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    Text(String),
    Close,
}

/// クライアントごとの送信キュー
pub type PusherChannel = mpsc::UnboundedSender<OutboundFrame>;

/// WebSocket を使った Connection 実装
///
/// `S` は WebSocket の受信側ストリーム（本番では `SplitStream<WebSocket>`）。
pub struct WebSocketConnection<S> {
    outbound: PusherChannel,
    inbound: Mutex<S>,
}

impl<S> WebSocketConnection<S> {
    pub fn new(outbound: PusherChannel, inbound: S) -> Self {
        Self {
            outbound,
            inbound: Mutex::new(inbound),
        }
    }
}

/// テキストフレームを受信メッセージに変換
///
/// JSON として解釈できない場合は、テキスト全体を本文として扱います。
fn decode_incoming(text: &str) -> IncomingMessage {
    match serde_json::from_str::<IncomingMessageDto>(text) {
        Ok(dto) => dto.into(),
        Err(e) => {
            tracing::debug!("Received non-JSON frame, using raw text as content: {}", e);
            IncomingMessage {
                content: text.to_string(),
            }
        }
    }
}

#[async_trait]
impl<S> Connection for WebSocketConnection<S>
where
    S: Stream<Item = Result<WsMessage, axum::Error>> + Send + Unpin + 'static,
{
    async fn read_message(&self) -> Result<IncomingMessage, ConnectionError> {
        let mut inbound = self.inbound.lock().await;
        loop {
            match inbound.next().await {
                Some(Ok(WsMessage::Text(text))) => return Ok(decode_incoming(text.as_str())),
                Some(Ok(WsMessage::Close(_))) | None => return Err(ConnectionError::Closed),
                Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_))) => {
                    // Ping/pong is handled automatically by the WebSocket protocol
                    continue;
                }
                Some(Ok(WsMessage::Binary(_))) => {
                    tracing::debug!("Ignoring binary frame");
                    continue;
                }
                Some(Err(e)) => return Err(ConnectionError::Receive(e.to_string())),
            }
        }
    }

    async fn write_message(&self, message: &Message) -> Result<(), ConnectionError> {
        let json = serde_json::to_string(&MessageDto::from(message))
            .map_err(|e| ConnectionError::Send(e.to_string()))?;
        self.outbound
            .send(OutboundFrame::Text(json))
            .map_err(|_| ConnectionError::Closed)
    }

    async fn close(&self) -> Result<(), ConnectionError> {
        self.outbound
            .send(OutboundFrame::Close)
            .map_err(|_| ConnectionError::Closed)
    }
}

/// Spawns a task that drains the outbound queue into the WebSocket sink.
///
/// The task ends after a `Close` frame, when the queue is dropped, or when the
/// sink fails.
pub fn pusher_loop<K>(
    mut rx: mpsc::UnboundedReceiver<OutboundFrame>,
    mut sink: K,
) -> tokio::task::JoinHandle<()>
where
    K: Sink<WsMessage> + Send + Unpin + 'static,
{
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            let result = match frame {
                OutboundFrame::Text(text) => sink.send(WsMessage::Text(text.into())).await,
                OutboundFrame::Close => {
                    let _ = sink.send(WsMessage::Close(None)).await;
                    break;
                }
            };
            if result.is_err() {
                tracing::debug!("WebSocket sink closed, stopping pusher loop");
                break;
            }
        }
    })
}
