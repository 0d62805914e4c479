//! UseCase: メッセージ履歴取得（ハイブリッド読み出し）
//!
//! 直近メッセージキャッシュだけで答えられるかをリクエストごとに判定し、
//! 答えられない場合は永続ストアに問い合わせます。
//!
//! キャッシュは時刻で索引付けされていない挿入順の窓なので、保持している全メッセージが
//! カーソルより前である場合にのみ、そのまま結果として信用できます。

use std::sync::Arc;

use crate::domain::{HistoryPage, MessageCache, MessageRepository, RoomId, Timestamp};

use super::error::GetMessageHistoryError;

/// `limit` 省略時の既定値
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// `limit` の上限
pub const MAX_HISTORY_LIMIT: usize = 100;

/// メッセージ履歴取得のユースケース
pub struct GetMessageHistoryUseCase {
    message_cache: Arc<dyn MessageCache>,
    message_repository: Arc<dyn MessageRepository>,
}

impl GetMessageHistoryUseCase {
    pub fn new(
        message_cache: Arc<dyn MessageCache>,
        message_repository: Arc<dyn MessageRepository>,
    ) -> Self {
        Self {
            message_cache,
            message_repository,
        }
    }

    /// `before_sent_at` より前のメッセージを最大 `limit` 件取得
    ///
    /// キャッシュから答える場合は古い順、ストアから答える場合はストアの結果（新しい順）を
    /// そのまま返します。
    pub async fn execute(
        &self,
        room_id: RoomId,
        limit: usize,
        before_sent_at: Timestamp,
    ) -> Result<HistoryPage, GetMessageHistoryError> {
        if limit == 0 || limit > MAX_HISTORY_LIMIT {
            return Err(GetMessageHistoryError::InvalidLimit {
                limit,
                max: MAX_HISTORY_LIMIT,
            });
        }

        let cached = self.message_cache.get_recent_messages(&room_id).await?;

        let earliest = cached.iter().map(|m| m.sent_at()).min();
        let latest = cached.iter().map(|m| m.sent_at()).max();
        match earliest.zip(latest) {
            Some((earliest, latest)) if latest < before_sent_at => {
                tracing::debug!(
                    room_id = %room_id,
                    cached = cached.len(),
                    "Serving message history from cache"
                );
                let has_next = cached.len() >= limit;
                return Ok(HistoryPage {
                    messages: cached,
                    next_before_sent_at: earliest,
                    has_next,
                });
            }
            _ => {}
        }

        tracing::debug!(room_id = %room_id, limit, "Serving message history from store");
        let page = self
            .message_repository
            .get_message_history_in_room(&room_id, limit, before_sent_at)
            .await?;
        Ok(page)
    }
}
