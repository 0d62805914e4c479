//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{Client, ClientId, Message, RepositoryError, RoomId, Timestamp, User, UserId};

/// 履歴ページ
///
/// `next_before_sent_at` は次のページを取得するためのカーソル（排他的上限）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPage {
    pub messages: Vec<Message>,
    pub next_before_sent_at: Timestamp,
    pub has_next: bool,
}

/// メッセージの永続ストア
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// メッセージを永続化
    async fn create_message(&self, message: &Message) -> Result<(), RepositoryError>;

    /// `before_sent_at` より前のメッセージを新しい順に最大 `limit` 件取得
    async fn get_message_history_in_room(
        &self,
        room_id: &RoomId,
        limit: usize,
        before_sent_at: Timestamp,
    ) -> Result<HistoryPage, RepositoryError>;
}

/// ユーザー参照
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user_by_id(&self, user_id: &UserId) -> Result<User, RepositoryError>;
}

/// クライアントディレクトリ
///
/// クライアントレコードを ID・ルーム・ユーザーの 3 つのキーで引けるようにします。
/// ユーザー単位の索引は単一値で、同じユーザーの新しいクライアントが古いものを
/// 置き換えます（ID・ルーム単位の索引には両方残ります）。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// クライアントを登録（ID 重複時は `AlreadyExists`）
    async fn create_client(&self, client: Client) -> Result<(), RepositoryError>;

    /// クライアントを削除（存在しない場合は `NotFound`）
    async fn delete_client(&self, client_id: &ClientId) -> Result<(), RepositoryError>;

    async fn get_client_by_id(&self, client_id: &ClientId) -> Result<Client, RepositoryError>;

    /// ルームに接続中のクライアント一覧（該当なしは空）
    async fn get_clients_by_room_id(&self, room_id: &RoomId)
    -> Result<Vec<Client>, RepositoryError>;

    async fn get_client_by_user_id(&self, user_id: &UserId) -> Result<Client, RepositoryError>;
}
