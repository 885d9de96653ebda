// src/model.rs
use serde::{Deserialize, Serialize};

/// A user record as exchanged between the proxy, the registry and callers.
///
/// `id` is absent on input and always set on records returned by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
}

impl User {
    /// A record that has not been stored yet.
    pub fn draft(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Body accepted by both `POST /api/users` and `POST /api/client/users`.
///
/// Unknown fields (including an `id` sent by a client) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

impl From<CreateUserRequest> for User {
    fn from(request: CreateUserRequest) -> Self {
        User::draft(request.name, request.email)
    }
}
