//! Infrastructure layer
//!
//! ドメイン層が定義するポートの具体的な実装（インメモリ、WebSocket、UUID）と DTO。

pub mod connection;
pub mod connection_registry;
pub mod dto;
pub mod factory;
pub mod message_cache;
pub mod repository;
