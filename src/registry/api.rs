// src/registry/api.rs
use async_trait::async_trait;
use hyper::{Body, Method, Request, Response, StatusCode};
use std::sync::Arc;

use super::{RegistryError, UserRegistry};
use crate::metrics::MetricsCollector;
use crate::model::CreateUserRequest;
use crate::server::{match_resource, response, HttpApp, Resource};

pub const USERS_PATH: &str = "/api/users";

/// HTTP surface of the registry (back) service.
pub struct RegistryApi {
    registry: UserRegistry,
    metrics: Option<Arc<MetricsCollector>>,
}

impl RegistryApi {
    pub fn new(registry: UserRegistry) -> Self {
        Self {
            registry,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    async fn get_user(&self, raw_id: &str) -> Response<Body> {
        let Ok(id) = raw_id.parse::<i64>() else {
            tracing::debug!(raw_id, "rejected non-integer user id");
            return response::text(StatusCode::BAD_REQUEST, "Invalid user id");
        };

        match self.registry.get_user(id).await {
            Ok(user) => response::json(StatusCode::OK, &user),
            Err(e @ RegistryError::NotFound(_)) => {
                tracing::info!(%e, "lookup missed");
                response::text(StatusCode::NOT_FOUND, "User not found")
            }
        }
    }

    async fn create_user(&self, req: Request<Body>) -> Response<Body> {
        let input: CreateUserRequest = match response::read_json(req).await {
            Ok(input) => input,
            Err(e) => {
                tracing::info!(%e, "rejected create request");
                return response::text(StatusCode::BAD_REQUEST, "Malformed request body");
            }
        };

        let user = self.registry.create_user(input).await;
        if let Some(metrics) = &self.metrics {
            metrics.update_registry_records(self.registry.record_count().await);
        }
        response::json(StatusCode::OK, &user)
    }

    async fn list_users(&self) -> Response<Body> {
        let users = self.registry.list_users().await;
        response::json(StatusCode::OK, &users)
    }
}

#[async_trait]
impl HttpApp for RegistryApi {
    async fn handle(&self, req: Request<Body>) -> Response<Body> {
        let path = req.uri().path().to_owned();
        let method = req.method().clone();

        match match_resource(&path, USERS_PATH) {
            Some(Resource::Collection) => match method {
                Method::GET => self.list_users().await,
                Method::POST => self.create_user(req).await,
                _ => response::method_not_allowed("GET, POST"),
            },
            Some(Resource::Item(raw_id)) => match method {
                Method::GET => self.get_user(raw_id).await,
                _ => response::method_not_allowed("GET"),
            },
            None => response::not_found(),
        }
    }

    fn name(&self) -> &'static str {
        "back"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::User;

    async fn call(api: &RegistryApi, method: Method, uri: &str, body: &str) -> (StatusCode, Vec<u8>) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.to_string()))
            .unwrap();
        let res = api.handle(req).await;
        let status = res.status();
        let bytes = hyper::body::to_bytes(res.into_body()).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let api = RegistryApi::new(UserRegistry::new());

        let (status, body) = call(
            &api,
            Method::POST,
            "/api/users",
            r#"{"name":"Alice","email":"a@x.com"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let created: User = serde_json::from_slice(&body).unwrap();
        assert_eq!(created.id, Some(1));

        let (status, body) = call(&api, Method::GET, "/api/users/1", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_slice::<User>(&body).unwrap(), created);
    }

    #[tokio::test]
    async fn list_returns_users_in_creation_order() {
        let api = RegistryApi::new(UserRegistry::new());
        for name in ["a", "b", "c"] {
            let body = format!(r#"{{"name":"{name}","email":"{name}@x.com"}}"#);
            call(&api, Method::POST, "/api/users", &body).await;
        }

        let (status, body) = call(&api, Method::GET, "/api/users", "").await;
        assert_eq!(status, StatusCode::OK);
        let users: Vec<User> = serde_json::from_slice(&body).unwrap();
        let ids: Vec<_> = users.iter().map(|u| u.id.unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(users[2].name, "c");
    }

    #[tokio::test]
    async fn unknown_id_is_404() {
        let api = RegistryApi::new(UserRegistry::new());
        let (status, _) = call(&api, Method::GET, "/api/users/99", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn negative_id_is_404() {
        let api = RegistryApi::new(UserRegistry::new());
        call(&api, Method::POST, "/api/users", r#"{"name":"A","email":"a@x"}"#).await;

        let (status, _) = call(&api, Method::GET, "/api/users/-1", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn bad_input_is_400() {
        let api = RegistryApi::new(UserRegistry::new());

        let (status, _) = call(&api, Method::GET, "/api/users/abc", "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(&api, Method::GET, "/api/users/9223372036854775808", "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(&api, Method::POST, "/api/users", r#"{"name":"no email"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn routing_rejects_unknown_paths_and_methods() {
        let api = RegistryApi::new(UserRegistry::new());

        let (status, _) = call(&api, Method::GET, "/api/other", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(&api, Method::DELETE, "/api/users/1", "").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
