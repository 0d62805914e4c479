//! UseCase 層のエラー型
//!
//! 各ユースケースは下位ポートのエラーを変換せずに包んで返します（リトライや握りつぶしはしない）。

use thiserror::Error;

use crate::domain::{ConnectionRegistryError, IdFactoryError, MessageCacheError, RepositoryError};

/// 参加者接続のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("user '{0}' not found")]
    UserNotFound(String),

    #[error("user lookup failed: {0}")]
    UserLookup(RepositoryError),

    #[error(transparent)]
    IdGeneration(#[from] IdFactoryError),

    #[error("failed to create client record: {0}")]
    CreateClient(RepositoryError),

    #[error("failed to register connection: {0}")]
    Register(#[from] ConnectionRegistryError),
}

impl ConnectError {
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::UserNotFound(_) => true,
            Self::Register(e) => e.is_not_found(),
            _ => false,
        }
    }
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error(transparent)]
    IdGeneration(#[from] IdFactoryError),

    #[error("failed to persist message: {0}")]
    Persist(RepositoryError),

    #[error("failed to cache message: {0}")]
    Cache(#[from] MessageCacheError),

    #[error("failed to broadcast message: {0}")]
    Broadcast(#[from] ConnectionRegistryError),
}

impl SendMessageError {
    /// ブロードキャスト先のルームが存在しない場合など
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Broadcast(e) if e.is_not_found())
    }
}

/// 参加者切断のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisconnectError {
    #[error("connection lookup failed: {0}")]
    ConnectionLookup(ConnectionRegistryError),

    #[error("client lookup failed: {0}")]
    ClientLookup(RepositoryError),

    #[error("failed to unregister connection: {0}")]
    Unregister(ConnectionRegistryError),

    #[error("failed to delete client record: {0}")]
    DeleteClient(RepositoryError),
}

impl DisconnectError {
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::ConnectionLookup(e) | Self::Unregister(e) => e.is_not_found(),
            Self::ClientLookup(e) | Self::DeleteClient(e) => e.is_not_found(),
        }
    }
}

/// メッセージ履歴取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetMessageHistoryError {
    #[error("limit must be between 1 and {max}, got {limit}")]
    InvalidLimit { limit: usize, max: usize },

    #[error("failed to read recent messages: {0}")]
    Cache(#[from] MessageCacheError),

    #[error("failed to read message history: {0}")]
    Store(#[from] RepositoryError),
}

impl GetMessageHistoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_not_found())
    }

    /// 呼び出し側の入力が原因のエラーか
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidLimit { .. })
    }
}
