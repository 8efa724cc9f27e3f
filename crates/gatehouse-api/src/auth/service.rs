//! User identity service
//!
//! Business logic for registration, login, profile resolution, and profile
//! update. Orchestrates the credential store (hashing + repository) and the
//! token service; handlers above it only decode requests and map responses.

use super::jwt::issue_token;
use super::models::{LoginRequest, User, UserRequest, UserResponse};
use super::password::{hash_password, verify_password};
use super::repository::{RepositoryError, UserRepository};
use crate::error::AppError;
use gatehouse_core::AuthConfig;
use sqlx::PgPool;
use uuid::Uuid;

/// User identity service
pub struct UserService {
    repository: UserRepository,
    auth_config: AuthConfig,
}

impl UserService {
    /// Create a new identity service over the shared pool and signing config
    pub fn new(pool: PgPool, auth_config: AuthConfig) -> Self {
        Self {
            repository: UserRepository::new(pool),
            auth_config,
        }
    }

    /// Register a new user
    ///
    /// Allocates a fresh id, hashes the password, persists the record, and
    /// returns the user with a freshly issued token. Persistence failure
    /// (including a duplicate username) surfaces as a generic bad request.
    pub async fn register(&self, request: UserRequest) -> Result<UserResponse, AppError> {
        let password_hash = hash_password(&request.password)
            .map_err(|e| AppError::Internal(format!("failed to hash password: {e}")))?;

        let user = User::from_request(&request, password_hash);

        self.repository
            .create(&user)
            .await
            .map_err(|e| AppError::BadRequest(format!("failed to create user: {e}")))?;

        let token = self.issue_for(&user)?;
        Ok(user.into_response(Some(token)))
    }

    /// Login with username and password
    ///
    /// An unknown username is a bad request (lookup failure surfaced to the
    /// caller); a known username with a non-matching password is rejected as
    /// unauthorized before any token is minted.
    pub async fn login(&self, request: LoginRequest) -> Result<UserResponse, AppError> {
        let user = self
            .repository
            .find_by_username(&request.username)
            .await
            .map_err(lookup_error)?;

        if !verify_password(&request.password, &user.password_hash) {
            return Err(AppError::Unauthorized);
        }

        let token = self.issue_for(&user)?;
        Ok(user.into_response(Some(token)))
    }

    /// Fetch a user by primary key
    pub async fn resolve_by_id(&self, id: Uuid) -> Result<User, AppError> {
        self.repository.find_by_id(id).await.map_err(lookup_error)
    }

    /// Update a user's profile
    ///
    /// Fetches the current record, applies the name change only, and
    /// persists it transactionally. Username and password in the request
    /// body are never written by this path.
    pub async fn update(&self, id: Uuid, request: UserRequest) -> Result<User, AppError> {
        let mut user = self.repository.find_by_id(id).await.map_err(lookup_error)?;

        user.apply_update(&request);

        self.repository.update(&user).await.map_err(lookup_error)?;

        Ok(user)
    }

    fn issue_for(&self, user: &User) -> Result<String, AppError> {
        issue_token(&self.auth_config, user.id, &user.username, &user.role)
            .map_err(|e| AppError::Internal(format!("failed to issue token: {e}")))
    }
}

/// Map repository lookup failures for the transport boundary
///
/// NotFound is wrapped into BadRequest at the service boundary; other
/// database failures keep their internal classification.
fn lookup_error(e: RepositoryError) -> AppError {
    match e {
        RepositoryError::NotFound => AppError::BadRequest("user not found".to_string()),
        RepositoryError::Database(e) => AppError::Database(e.to_string()),
    }
}
