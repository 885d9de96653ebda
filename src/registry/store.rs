// src/registry/store.rs
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::model::{CreateUserRequest, User};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("User not found: {0}")]
    NotFound(i64),
}

/// In-memory user store shared by every request of the registry service.
///
/// The collection is append-only. Ids are `len + 1` at insertion time, taken
/// under the write lock, so they start at 1 and never repeat. Iterating the
/// id-ordered map therefore yields records in insertion order.
#[derive(Clone, Default)]
pub struct UserRegistry {
    users: Arc<RwLock<BTreeMap<i64, User>>>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_user(&self, id: i64) -> Result<User, RegistryError> {
        self.users
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(RegistryError::NotFound(id))
    }

    pub async fn create_user(&self, input: CreateUserRequest) -> User {
        let mut users = self.users.write().await;
        let id = users.len() as i64 + 1;
        let user = User {
            id: Some(id),
            name: input.name,
            email: input.email,
        };
        users.insert(id, user.clone());

        tracing::debug!(id, "stored user");
        user
    }

    pub async fn list_users(&self) -> Vec<User> {
        self.users.read().await.values().cloned().collect()
    }

    /// Number of stored records, reported as the registry size gauge.
    pub async fn record_count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn request(name: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(future)
    }

    #[tokio::test]
    async fn first_user_gets_id_one() {
        let registry = UserRegistry::new();
        let user = registry.create_user(request("Alice", "a@x.com")).await;

        assert_eq!(
            user,
            User {
                id: Some(1),
                name: "Alice".to_string(),
                email: "a@x.com".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn missing_id_is_not_found() {
        let registry = UserRegistry::new();
        registry.create_user(request("Alice", "a@x.com")).await;

        assert_eq!(registry.get_user(2).await, Err(RegistryError::NotFound(2)));
        assert_eq!(registry.get_user(0).await, Err(RegistryError::NotFound(0)));
        assert_eq!(registry.get_user(-1).await, Err(RegistryError::NotFound(-1)));
    }

    #[tokio::test]
    async fn duplicates_and_empty_fields_are_accepted() {
        let registry = UserRegistry::new();
        registry.create_user(request("Bob", "b@x.com")).await;
        registry.create_user(request("Bob", "b@x.com")).await;
        let empty = registry.create_user(request("", "")).await;

        assert_eq!(empty.id, Some(3));
        assert_eq!(registry.record_count().await, 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_get_distinct_ids() {
        let registry = UserRegistry::new();
        let mut tasks = Vec::new();
        for i in 0..64 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                registry
                    .create_user(request(&format!("user-{i}"), "u@x.com"))
                    .await
            }));
        }

        let ids: HashSet<i64> = futures::future::join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().id.unwrap())
            .collect();

        assert_eq!(ids, (1..=64).collect::<HashSet<i64>>());
    }

    proptest! {
        #[test]
        fn created_user_is_returned_by_get(name in ".*", email in ".*") {
            block_on(async {
                let registry = UserRegistry::new();
                let created = registry.create_user(request(&name, &email)).await;
                let id = created.id.unwrap();
                assert_eq!(registry.get_user(id).await, Ok(created));
            });
        }

        #[test]
        fn listing_preserves_creation_order(names in proptest::collection::vec("[a-z]{1,8}", 0..32)) {
            block_on(async {
                let registry = UserRegistry::new();
                for name in &names {
                    registry.create_user(request(name, "x@x.com")).await;
                }

                let listed = registry.list_users().await;
                assert_eq!(listed.len(), names.len());
                for (index, (user, name)) in listed.iter().zip(&names).enumerate() {
                    assert_eq!(user.id, Some(index as i64 + 1));
                    assert_eq!(&user.name, name);
                }
            });
        }
    }
}
