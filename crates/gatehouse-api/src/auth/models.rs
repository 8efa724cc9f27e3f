//! Domain model and request/response shapes for the identity service
//!
//! The `User` record maps to the `users` table. The password hash is never
//! serialized; API responses go through [`UserResponse`], which carries a
//! freshly issued token on create/login and omits the password entirely.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// User identity record
///
/// `id` and `username` are immutable after creation; the only mutation path
/// updates the display name.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique identifier, assigned once at registration
    pub id: Uuid,
    /// Unique username (natural key, used for login lookup)
    pub username: String,
    /// Display name
    pub name: String,
    /// Argon2id credential hash; holds a hash from the moment the record is
    /// constructed, never the plaintext
    #[serde(skip_serializing)]
    #[sqlx(rename = "password")]
    pub password_hash: String,
    /// Free-form role tag
    pub role: String,
}

impl User {
    /// Build a new user record from a registration request and a
    /// pre-computed credential hash
    pub fn from_request(request: &UserRequest, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: request.username.clone(),
            name: request.name.clone(),
            password_hash,
            role: request.role.clone(),
        }
    }

    /// Apply an update request to this record
    ///
    /// Only the display name is taken from the request; username, password,
    /// and role in the body are ignored on this path.
    pub fn apply_update(&mut self, request: &UserRequest) {
        self.name = request.name.clone();
    }

    /// Convert to the API response shape
    pub fn into_response(self, token: Option<String>) -> UserResponse {
        UserResponse {
            id: self.id,
            username: self.username,
            name: self.name,
            role: self.role,
            token,
        }
    }
}

/// Registration and profile-update request body
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UserRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub password: String,
    pub role: String,
}

/// Login request body
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// User response body
///
/// Never carries a password field; `token` is present on registration and
/// login responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}
