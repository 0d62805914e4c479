//! エンティティ
//!
//! `Message` と `Client` は生成後に変更されません（フィールドは非公開、参照のみ）。

use super::{ClientId, MessageContent, MessageId, RoomId, Timestamp, UserId};

/// ユーザー（接続時の存在確認にのみ使用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: String,
}

impl User {
    pub fn new(id: UserId, name: String) -> Self {
        Self { id, name }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// チャットメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    id: MessageId,
    room_id: RoomId,
    user_id: UserId,
    content: MessageContent,
    sent_at: Timestamp,
}

impl Message {
    pub fn new(
        id: MessageId,
        room_id: RoomId,
        user_id: UserId,
        content: MessageContent,
        sent_at: Timestamp,
    ) -> Self {
        Self {
            id,
            room_id,
            user_id,
            content,
            sent_at,
        }
    }

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// 送信者のユーザー ID
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn content(&self) -> &MessageContent {
        &self.content
    }

    pub fn sent_at(&self) -> Timestamp {
        self.sent_at
    }
}

/// クライアントレコード
///
/// 「誰がどのルームに接続しているか」のメタデータ。接続オブジェクトそのものは
/// `ConnectionRegistry` が保持し、こちらは `ClientRepository` が保持します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    id: ClientId,
    user_id: UserId,
    room_id: RoomId,
}

impl Client {
    pub fn new(id: ClientId, user_id: UserId, room_id: RoomId) -> Self {
        Self {
            id,
            user_id,
            room_id,
        }
    }

    pub fn id(&self) -> &ClientId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }
}
