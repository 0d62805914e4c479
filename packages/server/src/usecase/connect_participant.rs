//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - ユーザー確認 → クライアント ID 採番 → クライアントレコード作成 → 接続登録 の順序
//!
//! ### なぜこのテストが必要か
//! - 未登録ユーザーの接続を拒否できることを保証
//! - 接続後、ClientRepository と ConnectionRegistry の両方から参加者が見えることを確認
//! - 途中で失敗しても、それまでの手順は巻き戻されないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：登録済みユーザーの接続
//! - 異常系：未登録ユーザー、ID 採番失敗、クライアントレコードの重複
//! - エッジケース：同じユーザーの再接続（新しいクライアント ID が採番される）

use std::sync::Arc;

use crate::domain::{
    Client, ClientIdFactory, ClientRepository, Connection, ConnectionRegistry, RoomId, UserId,
    UserRepository,
};

use super::error::ConnectError;

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// UserRepository（ユーザー存在確認）
    user_repository: Arc<dyn UserRepository>,
    /// ClientRepository（クライアントレコードの保存先）
    client_repository: Arc<dyn ClientRepository>,
    /// ConnectionRegistry（接続オブジェクトの登録先）
    connection_registry: Arc<dyn ConnectionRegistry>,
    client_id_factory: Arc<dyn ClientIdFactory>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        client_repository: Arc<dyn ClientRepository>,
        connection_registry: Arc<dyn ConnectionRegistry>,
        client_id_factory: Arc<dyn ClientIdFactory>,
    ) -> Self {
        Self {
            user_repository,
            client_repository,
            connection_registry,
            client_id_factory,
        }
    }

    /// 参加者接続を実行
    ///
    /// # Arguments
    ///
    /// * `user_id` - 接続するユーザーの ID
    /// * `room_id` - 参加するルームの ID
    /// * `connection` - トランスポート層が用意した接続
    ///
    /// # Returns
    ///
    /// * `Ok(Client)` - 作成されたクライアントレコード
    /// * `Err(ConnectError)` - 接続失敗（完了済みの手順は巻き戻さない）
    pub async fn execute(
        &self,
        user_id: UserId,
        room_id: RoomId,
        connection: Arc<dyn Connection>,
    ) -> Result<Client, ConnectError> {
        // 1. ユーザーの存在確認
        self.user_repository
            .get_user_by_id(&user_id)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    ConnectError::UserNotFound(user_id.as_str().to_string())
                } else {
                    ConnectError::UserLookup(e)
                }
            })?;

        // 2. クライアント ID を採番
        let client_id = self.client_id_factory.new_client_id()?;

        // 3. クライアントレコードを保存
        let client = Client::new(client_id, user_id.clone(), room_id.clone());
        self.client_repository
            .create_client(client.clone())
            .await
            .map_err(ConnectError::CreateClient)?;

        // 4. 接続を登録
        self.connection_registry
            .register(connection, user_id, room_id)
            .await?;

        tracing::debug!(
            client_id = %client.id(),
            user_id = %client.user_id(),
            room_id = %client.room_id(),
            "participant connected"
        );

        Ok(client)
    }
}
