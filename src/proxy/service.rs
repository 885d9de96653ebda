// src/proxy/service.rs
use std::sync::Arc;

use super::ProxyError;
use crate::client::RemoteUserClient;
use crate::model::User;

/// Proxy operations; storage lives entirely in the registry behind `client`.
#[derive(Clone)]
pub struct UserProxyService {
    client: Arc<dyn RemoteUserClient>,
}

impl UserProxyService {
    pub fn new(client: Arc<dyn RemoteUserClient>) -> Self {
        Self { client }
    }

    pub async fn fetch_user(&self, id: i64) -> Result<User, ProxyError> {
        Ok(self.client.get_user_by_id(id).await?)
    }

    pub async fn create_new_user(&self, name: String, email: String) -> Result<User, ProxyError> {
        let user = User::draft(name, email);
        Ok(self.client.create_user(&user).await?)
    }

    pub async fn get_all_users(&self) -> Result<Vec<User>, ProxyError> {
        Ok(self.client.list_users().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use tokio::sync::Mutex;

    /// Records what reached it; answers from a fixed list.
    #[derive(Default)]
    struct FakeRegistry {
        users: Vec<User>,
        created: Mutex<Vec<User>>,
    }

    #[async_trait]
    impl RemoteUserClient for FakeRegistry {
        async fn get_user_by_id(&self, id: i64) -> Result<User, ClientError> {
            self.users
                .iter()
                .find(|u| u.id == Some(id))
                .cloned()
                .ok_or(ClientError::Status {
                    status: StatusCode::NOT_FOUND,
                    body: String::new(),
                })
        }

        async fn create_user(&self, user: &User) -> Result<User, ClientError> {
            self.created.lock().await.push(user.clone());
            Ok(User {
                id: Some(7),
                ..user.clone()
            })
        }

        async fn list_users(&self) -> Result<Vec<User>, ClientError> {
            Ok(self.users.clone())
        }
    }

    fn alice() -> User {
        User {
            id: Some(1),
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
        }
    }

    #[tokio::test]
    async fn create_sends_draft_without_id() {
        let fake = Arc::new(FakeRegistry::default());
        let service = UserProxyService::new(fake.clone());

        let created = service
            .create_new_user("Bob".to_string(), "b@x.com".to_string())
            .await
            .unwrap();

        assert_eq!(created.id, Some(7));
        assert_eq!(*fake.created.lock().await, vec![User::draft("Bob", "b@x.com")]);
    }

    #[tokio::test]
    async fn fetch_and_list_delegate() {
        let service = UserProxyService::new(Arc::new(FakeRegistry {
            users: vec![alice()],
            ..Default::default()
        }));

        assert_eq!(service.fetch_user(1).await.unwrap(), alice());
        assert_eq!(service.get_all_users().await.unwrap(), vec![alice()]);
    }

    #[tokio::test]
    async fn missing_user_keeps_upstream_status() {
        let service = UserProxyService::new(Arc::new(FakeRegistry::default()));

        let err = service.fetch_user(5).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }
}
