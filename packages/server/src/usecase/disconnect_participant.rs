//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() / end_session() メソッド
//! - 接続の取得 → クライアントレコードの取得 → 接続の登録解除 → レコード削除 の順序
//!
//! ### なぜこのテストが必要か
//! - 切断後、ConnectionRegistry と ClientRepository の両方から参加者が消えることを保証
//! - 登録解除がレコード削除より先に行われることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断
//! - 異常系：接続していないユーザーの切断、レコード削除の失敗
//! - エッジケース：最後の参加者の切断（ルームが消える）、再接続済みユーザーの古いセッションの終了

use std::sync::Arc;

use crate::domain::{Client, ClientRepository, ConnectionRegistry, UserId};

use super::error::DisconnectError;

/// [`DisconnectParticipantUseCase::end_session`] の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// 接続とクライアントレコードを削除した
    Disconnected(Client),
    /// 同じユーザーの新しいセッションに置き換え済みだったため、古いレコードだけを削除した
    Superseded { current: Client },
}

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    client_repository: Arc<dyn ClientRepository>,
    connection_registry: Arc<dyn ConnectionRegistry>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(
        client_repository: Arc<dyn ClientRepository>,
        connection_registry: Arc<dyn ConnectionRegistry>,
    ) -> Self {
        Self {
            client_repository,
            connection_registry,
        }
    }

    /// 参加者切断を実行
    ///
    /// ユーザー ID で引くため、同じユーザーが再接続済みの場合は新しい接続が対象になります。
    ///
    /// # Returns
    ///
    /// * `Ok(Client)` - 削除されたクライアントレコード
    /// * `Err(DisconnectError)` - 切断失敗（登録解除後にレコード削除が失敗した場合、レコードは残る）
    pub async fn execute(&self, user_id: UserId) -> Result<Client, DisconnectError> {
        // 1. 接続を取得
        let connection = self
            .connection_registry
            .get_connection_by_user_id(&user_id)
            .await
            .map_err(DisconnectError::ConnectionLookup)?;

        // 2. クライアントレコードを取得
        let client = self
            .client_repository
            .get_client_by_user_id(&user_id)
            .await
            .map_err(DisconnectError::ClientLookup)?;

        // 3. 接続の登録解除
        self.connection_registry
            .unregister(&connection)
            .await
            .map_err(DisconnectError::Unregister)?;

        // 4. クライアントレコードを削除
        self.client_repository
            .delete_client(client.id())
            .await
            .map_err(DisconnectError::DeleteClient)?;

        tracing::debug!(
            client_id = %client.id(),
            user_id = %user_id,
            room_id = %client.room_id(),
            "participant disconnected"
        );

        Ok(client)
    }

    /// 接続時に作成したクライアントレコードのセッションを終了
    ///
    /// 同じユーザーが既に再接続している場合は新しいセッションに触れず、
    /// `session` のレコードだけを削除します。
    pub async fn end_session(&self, session: &Client) -> Result<SessionEnd, DisconnectError> {
        // 1. ユーザーの現在のクライアントを確認
        match self
            .client_repository
            .get_client_by_user_id(session.user_id())
            .await
        {
            Ok(current) if current.id() != session.id() => {
                // 2. 古いレコードだけを削除（接続は新しいセッションの登録時に置き換え済み）
                match self.client_repository.delete_client(session.id()).await {
                    Ok(()) => {}
                    Err(e) if e.is_not_found() => {}
                    Err(e) => return Err(DisconnectError::DeleteClient(e)),
                }
                tracing::warn!(
                    client_id = %session.id(),
                    current_client_id = %current.id(),
                    user_id = %session.user_id(),
                    "session superseded by a newer connection of the same user"
                );
                return Ok(SessionEnd::Superseded { current });
            }
            _ => {}
        }

        // 3. 通常の切断
        let removed = self.execute(session.user_id().clone()).await?;
        if removed.id() != session.id() {
            tracing::warn!(
                client_id = %session.id(),
                removed_client_id = %removed.id(),
                user_id = %session.user_id(),
                "disconnect removed a different client than the one that ended"
            );
        }
        Ok(SessionEnd::Disconnected(removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            ClientId, Connection, ConnectionRegistryError, MockClientRepository, RepositoryError,
            RoomId, connection::testing::RecordingConnection,
        },
        infrastructure::{
            connection_registry::InMemoryConnectionRegistry, repository::InMemoryClientRepository,
        },
    };

    fn user_id(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn lobby() -> RoomId {
        RoomId::new("lobby".to_string()).unwrap()
    }

    fn client(id: &str, user: &str) -> Client {
        Client::new(ClientId::new(id.to_string()).unwrap(), user_id(user), lobby())
    }

    async fn connect(
        client_repository: &InMemoryClientRepository,
        connection_registry: &InMemoryConnectionRegistry,
        client: Client,
    ) -> Arc<dyn Connection> {
        let connection: Arc<dyn Connection> = Arc::new(RecordingConnection::new());
        connection_registry
            .register(connection.clone(), client.user_id().clone(), client.room_id().clone())
            .await
            .unwrap();
        client_repository.create_client(client).await.unwrap();
        connection
    }

    #[tokio::test]
    async fn test_disconnect_participant_success() {
        // テスト項目: 切断すると接続とクライアントレコードの両方が消える
        // given (前提条件):
        let client_repository = Arc::new(InMemoryClientRepository::new());
        let connection_registry = Arc::new(InMemoryConnectionRegistry::new());
        connect(&client_repository, &connection_registry, client("c-1", "alice")).await;
        connect(&client_repository, &connection_registry, client("c-2", "bob")).await;
        let usecase =
            DisconnectParticipantUseCase::new(client_repository.clone(), connection_registry.clone());

        // when (操作):
        let removed = usecase.execute(user_id("alice")).await.unwrap();

        // then (期待する結果):
        assert_eq!(removed, client("c-1", "alice"));
        assert!(
            connection_registry
                .get_connection_by_user_id(&user_id("alice"))
                .await
                .is_err()
        );
        assert!(
            client_repository
                .get_client_by_id(removed.id())
                .await
                .unwrap_err()
                .is_not_found()
        );
        // 残りの参加者はそのまま
        assert_eq!(connection_registry.count_room_members(&lobby()).await, 1);
        assert_eq!(
            client_repository.get_clients_by_room_id(&lobby()).await.unwrap(),
            vec![client("c-2", "bob")]
        );
    }

    #[tokio::test]
    async fn test_disconnect_last_participant_removes_room() {
        // テスト項目: 最後の参加者が切断するとルームへのブロードキャストは RoomNotFound になる
        // given (前提条件):
        let client_repository = Arc::new(InMemoryClientRepository::new());
        let connection_registry = Arc::new(InMemoryConnectionRegistry::new());
        connect(&client_repository, &connection_registry, client("c-1", "alice")).await;
        let usecase =
            DisconnectParticipantUseCase::new(client_repository, connection_registry.clone());

        // when (操作):
        usecase.execute(user_id("alice")).await.unwrap();

        // then (期待する結果):
        assert_eq!(connection_registry.count_room_members(&lobby()).await, 0);
    }

    #[tokio::test]
    async fn test_disconnect_unknown_user() {
        // テスト項目: 接続していないユーザーの切断は ConnectionLookup(NotFound) になる
        // given (前提条件):
        let usecase = DisconnectParticipantUseCase::new(
            Arc::new(InMemoryClientRepository::new()),
            Arc::new(InMemoryConnectionRegistry::new()),
        );

        // when (操作):
        let result = usecase.execute(user_id("ghost")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(DisconnectError::ConnectionLookup(
                ConnectionRegistryError::UserNotConnected("ghost".to_string())
            ))
        );
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_failure_after_unregister_leaves_stale_record() {
        // テスト項目: 登録解除後にレコード削除が失敗すると、接続は消えるがレコードは残る
        // given (前提条件):
        let connection_registry = Arc::new(InMemoryConnectionRegistry::new());
        connection_registry
            .register(Arc::new(RecordingConnection::new()), user_id("alice"), lobby())
            .await
            .unwrap();
        let mut client_repository = MockClientRepository::new();
        client_repository
            .expect_get_client_by_user_id()
            .times(1)
            .returning(|_| Ok(client("c-1", "alice")));
        client_repository
            .expect_delete_client()
            .times(1)
            .returning(|_| Err(RepositoryError::Storage("io error".to_string())));
        let usecase =
            DisconnectParticipantUseCase::new(Arc::new(client_repository), connection_registry.clone());

        // when (操作):
        let result = usecase.execute(user_id("alice")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(DisconnectError::DeleteClient(RepositoryError::Storage(
                "io error".to_string()
            )))
        );
        assert_eq!(connection_registry.count_room_members(&lobby()).await, 0);
    }

    #[tokio::test]
    async fn test_client_lookup_failure_keeps_connection() {
        // テスト項目: クライアントレコードが見つからない場合は登録解除しない
        // given (前提条件):
        let connection_registry = Arc::new(InMemoryConnectionRegistry::new());
        connection_registry
            .register(Arc::new(RecordingConnection::new()), user_id("alice"), lobby())
            .await
            .unwrap();
        let usecase = DisconnectParticipantUseCase::new(
            Arc::new(InMemoryClientRepository::new()),
            connection_registry.clone(),
        );

        // when (操作):
        let result = usecase.execute(user_id("alice")).await;

        // then (期待する結果):
        assert!(matches!(result, Err(DisconnectError::ClientLookup(_))));
        assert_eq!(connection_registry.count_room_members(&lobby()).await, 1);
    }

    #[tokio::test]
    async fn test_end_session_of_current_client_disconnects() {
        // テスト項目: 現在のセッションを終了すると通常の切断と同じく接続とレコードが消える
        let client_repository = Arc::new(InMemoryClientRepository::new());
        let connection_registry = Arc::new(InMemoryConnectionRegistry::new());
        connect(&client_repository, &connection_registry, client("c-1", "alice")).await;
        let usecase =
            DisconnectParticipantUseCase::new(client_repository.clone(), connection_registry.clone());

        let result = usecase.end_session(&client("c-1", "alice")).await;

        assert_eq!(result, Ok(SessionEnd::Disconnected(client("c-1", "alice"))));
        assert_eq!(connection_registry.count_room_members(&lobby()).await, 0);
        assert!(
            client_repository
                .get_clients_by_room_id(&lobby())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_end_session_after_reconnect_keeps_newer_session() {
        // テスト項目: 再接続済みのユーザーの古いセッションを終了しても、新しいセッションは切断されず古いレコードだけが消える
        // given (前提条件): alice が c-1 で接続した後、c-2 で再接続している
        let client_repository = Arc::new(InMemoryClientRepository::new());
        let connection_registry = Arc::new(InMemoryConnectionRegistry::new());
        connect(&client_repository, &connection_registry, client("c-1", "alice")).await;
        let newer = connect(&client_repository, &connection_registry, client("c-2", "alice")).await;
        let usecase =
            DisconnectParticipantUseCase::new(client_repository.clone(), connection_registry.clone());

        // when (操作): 古いセッション c-1 が終了する
        let result = usecase.end_session(&client("c-1", "alice")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Ok(SessionEnd::Superseded {
                current: client("c-2", "alice")
            })
        );
        let found = connection_registry
            .get_connection_by_user_id(&user_id("alice"))
            .await
            .unwrap();
        assert!(Arc::ptr_eq(&found, &newer));
        assert_eq!(
            client_repository.get_clients_by_room_id(&lobby()).await.unwrap(),
            vec![client("c-2", "alice")]
        );
        assert_eq!(
            client_repository
                .get_client_by_user_id(&user_id("alice"))
                .await
                .unwrap(),
            client("c-2", "alice")
        );
    }
}
