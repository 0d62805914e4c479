//! InMemory Message Repository 実装
//!
//! 永続ストアの代替。ルームごとに送信順で保持します。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    HistoryPage, Message, MessageId, MessageRepository, RepositoryError, RoomId, Timestamp,
};

#[derive(Default)]
struct MessageStore {
    ids: HashSet<MessageId>,
    by_room: HashMap<RoomId, Vec<Message>>,
}

#[derive(Default)]
pub struct InMemoryMessageRepository {
    store: RwLock<MessageStore>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存済みメッセージ数
    pub async fn count(&self) -> usize {
        self.store.read().await.ids.len()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn create_message(&self, message: &Message) -> Result<(), RepositoryError> {
        let mut store = self.store.write().await;
        if !store.ids.insert(message.id().clone()) {
            return Err(RepositoryError::already_exists(
                "message",
                message.id().as_str(),
            ));
        }
        store
            .by_room
            .entry(message.room_id().clone())
            .or_default()
            .push(message.clone());
        Ok(())
    }

    async fn get_message_history_in_room(
        &self,
        room_id: &RoomId,
        limit: usize,
        before_sent_at: Timestamp,
    ) -> Result<HistoryPage, RepositoryError> {
        let store = self.store.read().await;

        let mut messages: Vec<Message> = store
            .by_room
            .get(room_id)
            .map(|messages| {
                messages
                    .iter()
                    .filter(|message| message.sent_at() < before_sent_at)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        // 新しい順（同時刻は後から保存された方を先に）
        messages.reverse();
        messages.sort_by(|a, b| b.sent_at().cmp(&a.sent_at()));

        // カーソルは排他的なので、境界と同時刻のメッセージは同じページに含める
        let keep = match limit.checked_sub(1).and_then(|i| messages.get(i)) {
            Some(boundary) => {
                let boundary = boundary.sent_at();
                messages
                    .iter()
                    .take_while(|message| message.sent_at() >= boundary)
                    .count()
            }
            None => messages.len().min(limit),
        };
        messages.truncate(keep);

        let next_before_sent_at = messages
            .last()
            .map_or(before_sent_at, |oldest| oldest.sent_at());
        let has_next = !messages.is_empty() && messages.len() >= limit;

        Ok(HistoryPage {
            messages,
            next_before_sent_at,
            has_next,
        })
    }
}
