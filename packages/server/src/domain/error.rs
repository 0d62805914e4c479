//! ドメイン層のエラー型
//!
//! 各ポート（trait）ごとにエラー型を分け、UseCase 層はそれらをそのまま伝播します。

use thiserror::Error;

/// 値オブジェクトの検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// Repository（クライアントディレクトリ、永続ストア、ユーザー参照）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} '{id}' already exists")]
    AlreadyExists { entity: &'static str, id: String },

    /// 下位ストレージの障害
    #[error("storage failure: {0}")]
    Storage(String),
}

impl RepositoryError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn already_exists(entity: &'static str, id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// 双方向チャネル（Connection）の I/O エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    #[error("connection closed")]
    Closed,

    #[error("failed to send: {0}")]
    Send(String),

    #[error("failed to receive: {0}")]
    Receive(String),
}

/// ConnectionRegistry のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionRegistryError {
    #[error("no live connection for user '{0}'")]
    UserNotConnected(String),

    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("connection is not registered")]
    ConnectionNotRegistered,

    #[error("failed to write to user '{user_id}': {source}")]
    Write {
        user_id: String,
        #[source]
        source: ConnectionError,
    },
}

impl ConnectionRegistryError {
    pub fn is_not_found(&self) -> bool {
        !matches!(self, Self::Write { .. })
    }
}

/// MessageCache のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageCacheError {
    /// キャッシュミス時の永続ストア参照に失敗
    #[error("backing store lookup failed: {0}")]
    Store(#[from] RepositoryError),
}

/// ID 採番のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdFactoryError {
    #[error("failed to generate {kind}: {reason}")]
    Generation { kind: &'static str, reason: String },
}
