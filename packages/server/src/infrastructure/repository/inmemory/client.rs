//! InMemory Client Repository 実装（クライアントディレクトリ）
//!
//! ID・ルーム・ユーザーの 3 つの索引を 1 つのロックでまとめて更新します。
//! ユーザー索引は単一値（後勝ち）です。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{Client, ClientId, ClientRepository, RepositoryError, RoomId, UserId};

const ENTITY: &str = "client";

#[derive(Default)]
struct ClientIndex {
    by_id: HashMap<ClientId, Client>,
    by_room: HashMap<RoomId, HashMap<ClientId, Client>>,
    by_user: HashMap<UserId, Client>,
}

/// インメモリ クライアントディレクトリ
#[derive(Default)]
pub struct InMemoryClientRepository {
    index: RwLock<ClientIndex>,
}

impl InMemoryClientRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientRepository for InMemoryClientRepository {
    async fn create_client(&self, client: Client) -> Result<(), RepositoryError> {
        let mut index = self.index.write().await;

        if index.by_id.contains_key(client.id()) {
            return Err(RepositoryError::already_exists(ENTITY, client.id().as_str()));
        }

        index
            .by_room
            .entry(client.room_id().clone())
            .or_default()
            .insert(client.id().clone(), client.clone());
        index.by_user.insert(client.user_id().clone(), client.clone());
        tracing::debug!(
            client_id = %client.id(),
            user_id = %client.user_id(),
            room_id = %client.room_id(),
            "Client created"
        );
        index.by_id.insert(client.id().clone(), client);

        Ok(())
    }

    async fn delete_client(&self, client_id: &ClientId) -> Result<(), RepositoryError> {
        let mut index = self.index.write().await;

        let client = index
            .by_id
            .remove(client_id)
            .ok_or_else(|| RepositoryError::not_found(ENTITY, client_id.as_str()))?;

        if let Some(room_clients) = index.by_room.get_mut(client.room_id()) {
            room_clients.remove(client_id);
            if room_clients.is_empty() {
                index.by_room.remove(client.room_id());
            }
        }

        // 同じユーザーの新しいクライアントが索引を上書きしている場合は残す
        if index
            .by_user
            .get(client.user_id())
            .is_some_and(|current| current.id() == client_id)
        {
            index.by_user.remove(client.user_id());
        }

        tracing::debug!(client_id = %client_id, "Client deleted");
        Ok(())
    }

    async fn get_client_by_id(&self, client_id: &ClientId) -> Result<Client, RepositoryError> {
        let index = self.index.read().await;
        index
            .by_id
            .get(client_id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(ENTITY, client_id.as_str()))
    }

    async fn get_clients_by_room_id(
        &self,
        room_id: &RoomId,
    ) -> Result<Vec<Client>, RepositoryError> {
        let index = self.index.read().await;
        Ok(index
            .by_room
            .get(room_id)
            .map(|clients| clients.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get_client_by_user_id(&self, user_id: &UserId) -> Result<Client, RepositoryError> {
        let index = self.index.read().await;
        index
            .by_user
            .get(user_id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(ENTITY, user_id.as_str()))
    }
}
