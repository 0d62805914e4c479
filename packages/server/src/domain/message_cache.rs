//! 直近メッセージキャッシュの trait 定義

use async_trait::async_trait;

use super::{Message, MessageCacheError, RoomId};

/// ルームごとにキャッシュする直近メッセージ数の既定値
///
/// クライアント側の表示件数と揃えておくこと。
pub const DEFAULT_RECENT_MESSAGE_LIMIT: usize = 20;

/// ルームごとの直近メッセージキャッシュ
///
/// 挿入順の固定長バッファ（FIFO）。LRU ではありません。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageCache: Send + Sync {
    /// 直近メッセージを古い順に取得
    ///
    /// 未キャッシュのルームは永続ストアから読み込んでから返します。
    /// キャッシュ済みのルームはストアを再参照しません。
    async fn get_recent_messages(&self, room_id: &RoomId) -> Result<Vec<Message>, MessageCacheError>;

    /// 末尾に追加し、容量を超えた分を先頭から削除
    async fn add_message(&self, room_id: &RoomId, message: Message) -> Result<(), MessageCacheError>;
}
