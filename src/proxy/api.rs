// src/proxy/api.rs
use async_trait::async_trait;
use hyper::{Body, Method, Request, Response, StatusCode};

use super::{ProxyError, UserProxyService};
use crate::model::CreateUserRequest;
use crate::server::{match_resource, response, HttpApp, Resource};

pub const CLIENT_USERS_PATH: &str = "/api/client/users";

/// HTTP surface of the proxy (front) service.
///
/// Every endpoint's failure goes through `ProxyError` into the fixed
/// status/body table, whatever the registry answered.
pub struct ProxyApi {
    service: UserProxyService,
}

impl ProxyApi {
    pub fn new(service: UserProxyService) -> Self {
        Self { service }
    }

    async fn get_user(&self, raw_id: &str) -> Result<Response<Body>, ProxyError> {
        let id = raw_id
            .parse::<i64>()
            .map_err(|e| ProxyError::BadRequest(format!("user id `{raw_id}`: {e}")))?;
        let user = self.service.fetch_user(id).await?;
        Ok(response::json(StatusCode::OK, &user))
    }

    async fn create_user(&self, req: Request<Body>) -> Result<Response<Body>, ProxyError> {
        let request: CreateUserRequest = response::read_json(req)
            .await
            .map_err(|e| ProxyError::BadRequest(e.to_string()))?;
        let user = self
            .service
            .create_new_user(request.name, request.email)
            .await?;
        Ok(response::json(StatusCode::OK, &user))
    }

    async fn list_users(&self) -> Result<Response<Body>, ProxyError> {
        let users = self.service.get_all_users().await?;
        Ok(response::json(StatusCode::OK, &users))
    }
}

#[async_trait]
impl HttpApp for ProxyApi {
    async fn handle(&self, req: Request<Body>) -> Response<Body> {
        let path = req.uri().path().to_owned();
        let method = req.method().clone();

        let result = match match_resource(&path, CLIENT_USERS_PATH) {
            Some(Resource::Collection) => match method {
                Method::GET => self.list_users().await,
                Method::POST => self.create_user(req).await,
                _ => return response::method_not_allowed("GET, POST"),
            },
            Some(Resource::Item(raw_id)) => match method {
                Method::GET => self.get_user(raw_id).await,
                _ => return response::method_not_allowed("GET"),
            },
            None => return response::not_found(),
        };

        result.unwrap_or_else(|e| {
            tracing::warn!(%e, status = ?e.status(), "proxy call failed");
            e.into()
        })
    }

    fn name(&self) -> &'static str {
        "front"
    }
}
