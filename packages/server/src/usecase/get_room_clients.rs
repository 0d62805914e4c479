//! UseCase: ルームの接続クライアント一覧

use std::sync::Arc;

use crate::domain::{Client, ClientRepository, RepositoryError, RoomId};

/// ルームの接続クライアント一覧取得のユースケース
pub struct GetRoomClientsUseCase {
    client_repository: Arc<dyn ClientRepository>,
}

impl GetRoomClientsUseCase {
    pub fn new(client_repository: Arc<dyn ClientRepository>) -> Self {
        Self { client_repository }
    }

    /// クライアント ID 順に並べて返す（誰もいないルームは空）
    pub async fn execute(&self, room_id: RoomId) -> Result<Vec<Client>, RepositoryError> {
        let mut clients = self.client_repository.get_clients_by_room_id(&room_id).await?;

        // Sort by client_id for consistent ordering
        clients.sort_by(|a, b| a.id().cmp(b.id()));

        Ok(clients)
    }
}
