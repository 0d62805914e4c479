//! InMemory User Repository 実装
//!
//! ユーザー登録は本サービスの範囲外のため、起動時に与えられたユーザーのみを保持します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{RepositoryError, User, UserId, UserRepository};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.id().clone(), user))
            .collect();
        Self {
            users: RwLock::new(users),
        }
    }

    pub async fn add_user(&self, user: User) {
        self.users.write().await.insert(user.id().clone(), user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_user_by_id(&self, user_id: &UserId) -> Result<User, RepositoryError> {
        self.users
            .read()
            .await
            .get(user_id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("user", user_id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_user_by_id() {
        // テスト項目: 登録済みユーザーは取得でき、未登録は NotFound
        // given (前提条件):
        let alice = User::new(UserId::new("alice".to_string()).unwrap(), "Alice".to_string());
        let repo = InMemoryUserRepository::with_users([alice.clone()]);
        let bob = UserId::new("bob".to_string()).unwrap();

        // then (期待する結果):
        assert_eq!(repo.get_user_by_id(alice.id()).await, Ok(alice));
        assert_eq!(
            repo.get_user_by_id(&bob).await,
            Err(RepositoryError::not_found("user", "bob"))
        );

        repo.add_user(User::new(bob.clone(), "Bob".to_string())).await;
        assert_eq!(repo.get_user_by_id(&bob).await.unwrap().name(), "Bob");
    }
}
