//! Server state.

use std::sync::Arc;

use tsudoi_shared::time::Clock;

use crate::{
    domain::{DEFAULT_RECENT_MESSAGE_LIMIT, User, UserId},
    infrastructure::{
        connection_registry::InMemoryConnectionRegistry,
        factory::UuidIdFactory,
        message_cache::InMemoryMessageCache,
        repository::{InMemoryClientRepository, InMemoryMessageRepository, InMemoryUserRepository},
    },
    usecase::{
        ConnectParticipantUseCase, DEFAULT_HISTORY_LIMIT, DisconnectParticipantUseCase,
        GetMessageHistoryUseCase, GetRoomClientsUseCase, SendMessageUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// GetMessageHistoryUseCase（履歴取得のユースケース）
    pub get_message_history_usecase: Arc<GetMessageHistoryUseCase>,
    /// GetRoomClientsUseCase（ルームのクライアント一覧のユースケース）
    pub get_room_clients_usecase: Arc<GetRoomClientsUseCase>,
    /// `before_sent_at` 省略時の「現在時刻」
    pub clock: Arc<dyn Clock>,
    /// `limit` 省略時の件数
    pub history_default_limit: usize,
}

/// Options for [`AppState::in_memory`]
#[derive(Debug, Clone)]
pub struct InMemoryOptions {
    /// Users accepted by the connect endpoint
    pub users: Vec<UserId>,
    pub cache_capacity: usize,
    pub history_default_limit: usize,
}

impl Default for InMemoryOptions {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            cache_capacity: DEFAULT_RECENT_MESSAGE_LIMIT,
            history_default_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl AppState {
    /// Wire every use case against the in-memory adapters.
    ///
    /// Dependencies are created in order:
    /// 1. Repositories
    /// 2. ConnectionRegistry / MessageCache / ID factory
    /// 3. UseCases
    pub fn in_memory(options: InMemoryOptions, clock: Arc<dyn Clock>) -> Self {
        // 1. Repositories (in-memory database)
        let user_repository = Arc::new(InMemoryUserRepository::with_users(
            options
                .users
                .into_iter()
                .map(|id| User::new(id.clone(), id.into_string())),
        ));
        let client_repository = Arc::new(InMemoryClientRepository::new());
        let message_repository = Arc::new(InMemoryMessageRepository::new());

        // 2. Registry, cache and ID factory
        let connection_registry = Arc::new(InMemoryConnectionRegistry::new());
        let message_cache = Arc::new(InMemoryMessageCache::with_capacity(
            message_repository.clone(),
            clock.clone(),
            options.cache_capacity,
        ));
        let id_factory = Arc::new(UuidIdFactory::new());

        // 3. UseCases
        let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
            user_repository,
            client_repository.clone(),
            connection_registry.clone(),
            id_factory.clone(),
        ));
        let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
            client_repository.clone(),
            connection_registry.clone(),
        ));
        let send_message_usecase = Arc::new(SendMessageUseCase::new(
            message_repository.clone(),
            message_cache.clone(),
            connection_registry,
            id_factory,
            clock.clone(),
        ));
        let get_message_history_usecase = Arc::new(GetMessageHistoryUseCase::new(
            message_cache,
            message_repository,
        ));
        let get_room_clients_usecase = Arc::new(GetRoomClientsUseCase::new(client_repository));

        Self {
            connect_participant_usecase,
            disconnect_participant_usecase,
            send_message_usecase,
            get_message_history_usecase,
            get_room_clients_usecase,
            clock,
            history_default_limit: options.history_default_limit,
        }
    }
}
