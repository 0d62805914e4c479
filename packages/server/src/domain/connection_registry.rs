//! ConnectionRegistry trait 定義
//!
//! 参加者（ユーザー, ルーム）から、到達に使う生きた Connection への対応付けと、
//! ルーム単位のブロードキャストを担います。

use std::sync::Arc;

use async_trait::async_trait;

use super::{Connection, ConnectionRegistryError, Message, RoomId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// 接続を登録
    ///
    /// 同じユーザーの既存接続は置き換えられます（後勝ち、重複エラーなし）。
    async fn register(
        &self,
        connection: Arc<dyn Connection>,
        user_id: UserId,
        room_id: RoomId,
    ) -> Result<(), ConnectionRegistryError>;

    /// 接続を登録解除
    ///
    /// 最後のメンバーが抜けたルームは削除されます。
    /// 未登録の接続は `ConnectionNotRegistered` を返します。
    async fn unregister(&self, connection: &Arc<dyn Connection>)
    -> Result<(), ConnectionRegistryError>;

    async fn get_connection_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Arc<dyn Connection>, ConnectionRegistryError>;

    /// ルームの全メンバーに送信
    ///
    /// 最初に失敗した書き込みのエラーを返し、残りのメンバーには送信しません。
    async fn broadcast_to_room(
        &self,
        room_id: &RoomId,
        message: &Message,
    ) -> Result<(), ConnectionRegistryError>;

    /// ルームに登録中の接続数
    async fn count_room_members(&self, room_id: &RoomId) -> usize;
}
