//! Domain layer
//!
//! 値オブジェクト・エンティティ・エラー型と、UseCase 層が依存する
//! ポート（trait）を定義します。具体的な実装は Infrastructure 層が提供します。

pub mod connection;
pub mod connection_registry;
pub mod entity;
pub mod error;
pub mod factory;
pub mod message_cache;
pub mod repository;
pub mod value_object;

pub use connection::{Connection, IncomingMessage};
pub use connection_registry::ConnectionRegistry;
pub use entity::{Client, Message, User};
pub use error::{
    ConnectionError, ConnectionRegistryError, IdFactoryError, MessageCacheError,
    RepositoryError, ValueObjectError,
};
pub use factory::{ClientIdFactory, MessageIdFactory};
pub use message_cache::{DEFAULT_RECENT_MESSAGE_LIMIT, MessageCache};
pub use repository::{ClientRepository, HistoryPage, MessageRepository, UserRepository};
pub use value_object::{ClientId, MessageContent, MessageId, RoomId, Timestamp, UserId};

#[cfg(test)]
pub use connection_registry::MockConnectionRegistry;
#[cfg(test)]
pub use factory::{MockClientIdFactory, MockMessageIdFactory};
#[cfg(test)]
pub use message_cache::MockMessageCache;
#[cfg(test)]
pub use repository::{MockClientRepository, MockMessageRepository, MockUserRepository};
