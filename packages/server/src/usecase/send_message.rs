//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - ID 採番 → 永続化 → キャッシュ追加 → ルームへのブロードキャスト の順序
//!
//! ### なぜこのテストが必要か
//! - 同じルームの全メンバー（送信者を含む）に配送されることを保証
//! - 途中で失敗しても永続化済みのメッセージは残る（補償しない）ことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト
//! - 異常系：ID 採番の失敗、永続化の失敗、ブロードキャスト先のルームが存在しない
//! - エッジケース：書き込みに失敗するメンバーがいる

use std::sync::Arc;

use tsudoi_shared::time::Clock;

use crate::domain::{
    ConnectionRegistry, Message, MessageCache, MessageContent, MessageIdFactory,
    MessageRepository, RoomId, Timestamp, UserId,
};

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// MessageRepository（永続ストア）
    message_repository: Arc<dyn MessageRepository>,
    /// MessageCache（ルーム別の直近メッセージ）
    message_cache: Arc<dyn MessageCache>,
    /// ConnectionRegistry（配送先の解決）
    connection_registry: Arc<dyn ConnectionRegistry>,
    message_id_factory: Arc<dyn MessageIdFactory>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        message_repository: Arc<dyn MessageRepository>,
        message_cache: Arc<dyn MessageCache>,
        connection_registry: Arc<dyn ConnectionRegistry>,
        message_id_factory: Arc<dyn MessageIdFactory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            message_repository,
            message_cache,
            connection_registry,
            message_id_factory,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `room_id` - 送信先のルーム
    /// * `sender_id` - 送信者のユーザー ID
    /// * `content` - メッセージ本文
    ///
    /// # Returns
    ///
    /// * `Ok(Message)` - 送信されたメッセージ
    /// * `Err(SendMessageError)` - 送信失敗（永続化済みのメッセージは削除しない）
    pub async fn execute(
        &self,
        room_id: RoomId,
        sender_id: UserId,
        content: MessageContent,
    ) -> Result<Message, SendMessageError> {
        // 1. メッセージ ID を採番
        let message_id = self.message_id_factory.new_message_id()?;

        // 2. 現在時刻でメッセージを作成
        let sent_at = Timestamp::new(self.clock.now_nanos());
        let message = Message::new(message_id, room_id.clone(), sender_id, content, sent_at);

        // 3. 永続化
        self.message_repository
            .create_message(&message)
            .await
            .map_err(SendMessageError::Persist)?;

        // 4. キャッシュに追加
        self.message_cache
            .add_message(&room_id, message.clone())
            .await?;

        // 5. ルームにブロードキャスト
        self.connection_registry
            .broadcast_to_room(&room_id, &message)
            .await?;

        tracing::debug!(
            message_id = %message.id(),
            room_id = %room_id,
            user_id = %message.user_id(),
            "message sent"
        );

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            Connection, ConnectionError, ConnectionRegistryError, IdFactoryError, MessageId,
            MockConnectionRegistry,
            MockMessageIdFactory, MockMessageRepository, RepositoryError,
            connection::testing::RecordingConnection,
        },
        infrastructure::{
            connection_registry::InMemoryConnectionRegistry,
            factory::UuidIdFactory,
            message_cache::InMemoryMessageCache,
            repository::InMemoryMessageRepository,
        },
    };
    use tsudoi_shared::time::FixedClock;

    const NOW: i64 = 1_672_498_800_000_000_000;

    fn lobby() -> RoomId {
        RoomId::new("lobby".to_string()).unwrap()
    }

    fn user_id(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn content(text: &str) -> MessageContent {
        MessageContent::new(text.to_string()).unwrap()
    }

    struct Fixture {
        usecase: SendMessageUseCase,
        message_repository: Arc<InMemoryMessageRepository>,
        message_cache: Arc<InMemoryMessageCache>,
        connection_registry: Arc<InMemoryConnectionRegistry>,
    }

    fn create_fixture() -> Fixture {
        let clock = Arc::new(FixedClock::new(NOW));
        let message_repository = Arc::new(InMemoryMessageRepository::new());
        let message_cache = Arc::new(InMemoryMessageCache::new(
            message_repository.clone(),
            clock.clone(),
        ));
        let connection_registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = SendMessageUseCase::new(
            message_repository.clone(),
            message_cache.clone(),
            connection_registry.clone(),
            Arc::new(UuidIdFactory::new()),
            clock,
        );
        Fixture {
            usecase,
            message_repository,
            message_cache,
            connection_registry,
        }
    }

    #[tokio::test]
    async fn test_send_message_reaches_every_room_member() {
        // テスト項目: 送信者を含むルームの全メンバーにメッセージが届き、永続化とキャッシュ追加も行われる
        // given (前提条件):
        let fixture = create_fixture();
        let alice = Arc::new(RecordingConnection::new());
        let bob = Arc::new(RecordingConnection::new());
        let elsewhere = Arc::new(RecordingConnection::new());
        fixture
            .connection_registry
            .register(alice.clone(), user_id("alice"), lobby())
            .await
            .unwrap();
        fixture
            .connection_registry
            .register(bob.clone(), user_id("bob"), lobby())
            .await
            .unwrap();
        fixture
            .connection_registry
            .register(
                elsewhere.clone(),
                user_id("charlie"),
                RoomId::new("other".to_string()).unwrap(),
            )
            .await
            .unwrap();

        // when (操作):
        let message = fixture
            .usecase
            .execute(lobby(), user_id("alice"), content("Hello!"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(message.sent_at(), Timestamp::new(NOW));
        assert_eq!(message.user_id(), &user_id("alice"));
        assert_eq!(alice.written(), vec![message.clone()]);
        assert_eq!(bob.written(), vec![message.clone()]);
        assert!(elsewhere.written().is_empty());
        assert_eq!(fixture.message_repository.count().await, 1);
        assert_eq!(
            fixture
                .message_cache
                .get_recent_messages(&lobby())
                .await
                .unwrap(),
            vec![message]
        );
    }

    #[tokio::test]
    async fn test_send_to_empty_room_keeps_persisted_message() {
        // テスト項目: 誰も接続していないルームへの送信は RoomNotFound だが、永続化とキャッシュは残る
        // given (前提条件):
        let fixture = create_fixture();

        // when (操作):
        let result = fixture
            .usecase
            .execute(lobby(), user_id("alice"), content("anyone?"))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(SendMessageError::Broadcast(
                ConnectionRegistryError::RoomNotFound("lobby".to_string())
            ))
        );
        assert_eq!(fixture.message_repository.count().await, 1);
        assert_eq!(
            fixture
                .message_cache
                .get_recent_messages(&lobby())
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_failed_write_is_reported() {
        // テスト項目: メンバーへの書き込みが失敗すると Broadcast エラーになる
        // given (前提条件):
        let fixture = create_fixture();
        let gone: Arc<dyn Connection> = Arc::new(RecordingConnection::failing());
        fixture
            .connection_registry
            .register(gone, user_id("bob"), lobby())
            .await
            .unwrap();

        // when (操作):
        let result = fixture
            .usecase
            .execute(lobby(), user_id("alice"), content("Hello!"))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(SendMessageError::Broadcast(ConnectionRegistryError::Write {
                user_id: "bob".to_string(),
                source: ConnectionError::Send("peer gone".to_string()),
            }))
        );
        assert_eq!(fixture.message_repository.count().await, 1);
    }

    #[tokio::test]
    async fn test_persist_failure_skips_cache_and_broadcast() {
        // テスト項目: 永続化に失敗するとキャッシュ追加もブロードキャストも行われない
        // given (前提条件):
        let mut message_repository = MockMessageRepository::new();
        message_repository
            .expect_create_message()
            .times(1)
            .returning(|_| Err(RepositoryError::Storage("disk full".to_string())));
        let mut connection_registry = MockConnectionRegistry::new();
        connection_registry.expect_broadcast_to_room().times(0);
        let mut id_factory = MockMessageIdFactory::new();
        id_factory
            .expect_new_message_id()
            .returning(|| Ok(MessageId::new("m-1".to_string()).unwrap()));
        let clock = Arc::new(FixedClock::new(NOW));
        let message_cache = Arc::new(InMemoryMessageCache::new(
            Arc::new(InMemoryMessageRepository::new()),
            clock.clone(),
        ));
        let usecase = SendMessageUseCase::new(
            Arc::new(message_repository),
            message_cache.clone(),
            Arc::new(connection_registry),
            Arc::new(id_factory),
            clock,
        );

        // when (操作):
        let result = usecase
            .execute(lobby(), user_id("alice"), content("Hello!"))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(SendMessageError::Persist(RepositoryError::Storage(
                "disk full".to_string()
            )))
        );
        assert!(
            message_cache
                .get_recent_messages(&lobby())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_message_id_failure_persists_nothing() {
        // テスト項目: メッセージ ID の採番に失敗すると、保存・キャッシュ追加・ブロードキャストのいずれも行われない
        // given (前提条件):
        let mut id_factory = MockMessageIdFactory::new();
        id_factory.expect_new_message_id().times(1).returning(|| {
            Err(IdFactoryError::Generation {
                kind: "message_id",
                reason: "entropy unavailable".to_string(),
            })
        });
        let mut message_repository = MockMessageRepository::new();
        message_repository.expect_create_message().times(0);
        let mut connection_registry = MockConnectionRegistry::new();
        connection_registry.expect_broadcast_to_room().times(0);
        let clock = Arc::new(FixedClock::new(NOW));
        let message_cache = Arc::new(InMemoryMessageCache::new(
            Arc::new(InMemoryMessageRepository::new()),
            clock.clone(),
        ));
        let usecase = SendMessageUseCase::new(
            Arc::new(message_repository),
            message_cache.clone(),
            Arc::new(connection_registry),
            Arc::new(id_factory),
            clock,
        );

        // when (操作):
        let result = usecase
            .execute(lobby(), user_id("alice"), content("Hello!"))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(SendMessageError::IdGeneration(IdFactoryError::Generation {
                kind: "message_id",
                reason: "entropy unavailable".to_string(),
            }))
        );
        assert!(
            message_cache
                .get_recent_messages(&lobby())
                .await
                .unwrap()
                .is_empty()
        );
    }
}
