//! インメモリ直近メッセージキャッシュ
//!
//! ルームごとに挿入順の `VecDeque` を持ち、容量を超えたら先頭（最古）から 1 件ずつ削除します。
//! 未キャッシュのルームを読んだときだけ永続ストアを参照します。

use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tsudoi_shared::time::Clock;

use crate::domain::{
    DEFAULT_RECENT_MESSAGE_LIMIT, Message, MessageCache, MessageCacheError, MessageRepository,
    RoomId, Timestamp,
};

pub struct InMemoryMessageCache {
    rooms: RwLock<HashMap<RoomId, VecDeque<Message>>>,
    message_repository: Arc<dyn MessageRepository>,
    clock: Arc<dyn Clock>,
    capacity: usize,
}

impl InMemoryMessageCache {
    /// 既定容量（[`DEFAULT_RECENT_MESSAGE_LIMIT`]）でキャッシュを作成
    pub fn new(message_repository: Arc<dyn MessageRepository>, clock: Arc<dyn Clock>) -> Self {
        Self::with_capacity(message_repository, clock, DEFAULT_RECENT_MESSAGE_LIMIT)
    }

    pub fn with_capacity(
        message_repository: Arc<dyn MessageRepository>,
        clock: Arc<dyn Clock>,
        capacity: usize,
    ) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            message_repository,
            clock,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[async_trait]
impl MessageCache for InMemoryMessageCache {
    async fn get_recent_messages(&self, room_id: &RoomId) -> Result<Vec<Message>, MessageCacheError> {
        {
            let rooms = self.rooms.read().await;
            if let Some(buffer) = rooms.get(room_id) {
                return Ok(buffer.iter().cloned().collect());
            }
        }

        // キャッシュミス: ロックを持たずにストアを参照する
        let now = Timestamp::new(self.clock.now_nanos());
        let page = self
            .message_repository
            .get_message_history_in_room(room_id, self.capacity, now)
            .await?;
        tracing::debug!(
            room_id = %room_id,
            loaded = page.messages.len(),
            "Populating message cache from store"
        );

        let capacity = self.capacity;
        let mut rooms = self.rooms.write().await;
        // 待っている間に add_message が作ったバッファがあればそちらを優先
        let buffer = rooms.entry(room_id.clone()).or_insert_with(|| {
            let mut messages = page.messages;
            messages.reverse();
            messages.sort_by_key(Message::sent_at);
            let overflow = messages.len().saturating_sub(capacity);
            messages.into_iter().skip(overflow).collect()
        });

        Ok(buffer.iter().cloned().collect())
    }

    async fn add_message(&self, room_id: &RoomId, message: Message) -> Result<(), MessageCacheError> {
        let mut rooms = self.rooms.write().await;
        let buffer = rooms.entry(room_id.clone()).or_default();

        // 直前のストア読込で既にバッファに入っている場合は追加しない
        if buffer.iter().any(|cached| cached.id() == message.id()) {
            tracing::debug!(room_id = %room_id, message_id = %message.id(), "Message already cached");
            return Ok(());
        }

        buffer.push_back(message);
        while buffer.len() > self.capacity {
            buffer.pop_front();
        }

        Ok(())
    }
}
