//! 双方向チャネル（Connection）の抽象化
//!
//! トランスポート層（WebSocket など）が実装します。ドメイン側はこの trait のみに依存します。

use async_trait::async_trait;

use super::{ConnectionError, Message};

/// クライアントから受信したメッセージ
///
/// ID・送信者・時刻はサーバー側で決まるため、本文のみを持ちます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub content: String,
}

#[async_trait]
pub trait Connection: Send + Sync {
    /// 次のメッセージを受信（切断時は `ConnectionError::Closed`）
    async fn read_message(&self) -> Result<IncomingMessage, ConnectionError>;

    async fn write_message(&self, message: &Message) -> Result<(), ConnectionError>;

    async fn close(&self) -> Result<(), ConnectionError>;
}
