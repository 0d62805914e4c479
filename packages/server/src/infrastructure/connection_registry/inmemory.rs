//! インメモリ ConnectionRegistry 実装
//!
//! ## 設計ノート
//!
//! ユーザー単位・ルーム単位の 2 つの索引を `Connections` 集約にまとめ、
//! 1 つの `RwLock` で保護します。索引そのものは外部に公開しないため、
//! 「ユーザー索引から到達できる接続は、同じルームのルーム索引からも到達できる」
//! という不変条件は、この型の中だけで維持されます。
//!
//! ブロードキャストはロック中に宛先のスナップショットを取り、ロック解放後に
//! 書き込みます。送信中に切断したメンバーへも 1 回だけ送信が試みられることがあります。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    Connection, ConnectionRegistry, ConnectionRegistryError, Message, RoomId, UserId,
};

struct Member {
    room_id: RoomId,
    connection: Arc<dyn Connection>,
}

/// 2 つの索引の集約（ロックは常にこの単位で取得）
#[derive(Default)]
struct Connections {
    by_user: HashMap<UserId, Member>,
    by_room: HashMap<RoomId, HashMap<UserId, Arc<dyn Connection>>>,
}

impl Connections {
    fn insert(&mut self, connection: Arc<dyn Connection>, user_id: UserId, room_id: RoomId) {
        // 後勝ち: 既存の接続は両方の索引から外す
        if let Some(previous) = self.by_user.remove(&user_id) {
            self.remove_from_room(&previous.room_id, &user_id);
        }

        self.by_room
            .entry(room_id.clone())
            .or_default()
            .insert(user_id.clone(), connection.clone());
        self.by_user.insert(
            user_id,
            Member {
                room_id,
                connection,
            },
        );
    }

    fn remove(&mut self, connection: &Arc<dyn Connection>) -> Option<(UserId, RoomId)> {
        let user_id = self
            .by_user
            .iter()
            .find(|(_, member)| Arc::ptr_eq(&member.connection, connection))
            .map(|(user_id, _)| user_id.clone())?;

        let member = self.by_user.remove(&user_id)?;
        self.remove_from_room(&member.room_id, &user_id);
        Some((user_id, member.room_id))
    }

    fn remove_from_room(&mut self, room_id: &RoomId, user_id: &UserId) {
        if let Some(members) = self.by_room.get_mut(room_id) {
            members.remove(user_id);
            if members.is_empty() {
                self.by_room.remove(room_id);
            }
        }
    }
}

/// インメモリ ConnectionRegistry 実装
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    connections: RwLock<Connections>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(
        &self,
        connection: Arc<dyn Connection>,
        user_id: UserId,
        room_id: RoomId,
    ) -> Result<(), ConnectionRegistryError> {
        let mut connections = self.connections.write().await;
        tracing::debug!(user_id = %user_id, room_id = %room_id, "Registering connection");
        connections.insert(connection, user_id, room_id);
        Ok(())
    }

    async fn unregister(
        &self,
        connection: &Arc<dyn Connection>,
    ) -> Result<(), ConnectionRegistryError> {
        let mut connections = self.connections.write().await;
        match connections.remove(connection) {
            Some((user_id, room_id)) => {
                tracing::debug!(user_id = %user_id, room_id = %room_id, "Unregistered connection");
                Ok(())
            }
            None => Err(ConnectionRegistryError::ConnectionNotRegistered),
        }
    }

    async fn get_connection_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Arc<dyn Connection>, ConnectionRegistryError> {
        let connections = self.connections.read().await;
        connections
            .by_user
            .get(user_id)
            .map(|member| member.connection.clone())
            .ok_or_else(|| ConnectionRegistryError::UserNotConnected(user_id.to_string()))
    }

    async fn broadcast_to_room(
        &self,
        room_id: &RoomId,
        message: &Message,
    ) -> Result<(), ConnectionRegistryError> {
        let recipients: Vec<(UserId, Arc<dyn Connection>)> = {
            let connections = self.connections.read().await;
            let members = connections
                .by_room
                .get(room_id)
                .ok_or_else(|| ConnectionRegistryError::RoomNotFound(room_id.to_string()))?;
            members
                .iter()
                .map(|(user_id, connection)| (user_id.clone(), connection.clone()))
                .collect()
        };

        for (user_id, connection) in recipients {
            if let Err(source) = connection.write_message(message).await {
                tracing::warn!(
                    user_id = %user_id,
                    room_id = %room_id,
                    error = %source,
                    "Failed to write message, aborting broadcast"
                );
                return Err(ConnectionRegistryError::Write {
                    user_id: user_id.into_string(),
                    source,
                });
            }
        }

        tracing::debug!(room_id = %room_id, message_id = %message.id(), "Broadcasted message");
        Ok(())
    }

    async fn count_room_members(&self, room_id: &RoomId) -> usize {
        let connections = self.connections.read().await;
        connections.by_room.get(room_id).map_or(0, HashMap::len)
    }
}
