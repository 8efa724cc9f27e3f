//! User API handlers
//!
//! HTTP endpoints for registration, login, and profile management. Handlers
//! decode and validate the request body, delegate to the identity service,
//! and emit security audit events; all business rules live in the service.

use crate::audit::{audit_log, extract_ip_address, extract_user_agent, AuditEvent};
use crate::auth::{AuthenticatedUser, LoginRequest, UserRequest, UserService};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;
use validator::Validate;

/// Register a new user account
///
/// Creates a new user with the provided username, name, password, and role,
/// and returns the created user with a freshly issued token.
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Invalid input or username taken", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<UserRequest>,
) -> Result<impl IntoResponse, AppError> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let ip_address = extract_ip_address(&headers);
    let user_agent = extract_user_agent(&headers);
    let username = request.username.clone();

    let service = UserService::new(state.db.clone(), state.config.auth.clone());
    match service.register(request).await {
        Ok(response) => {
            audit_log(&AuditEvent::RegistrationSuccess {
                user_id: response.id,
                username,
                role: response.role.clone(),
                ip_address,
                user_agent,
            });
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(e) => {
            audit_log(&AuditEvent::RegistrationFailure {
                username,
                reason: format!("{e:?}"),
                ip_address,
                user_agent,
            });
            Err(e)
        }
    }
}

/// Login with username and password
///
/// Verifies the submitted password against the stored credential hash and
/// returns the user with a freshly issued token.
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = UserResponse),
        (status = 400, description = "Invalid input or unknown username", body = crate::error::ApiError),
        (status = 401, description = "Password mismatch", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let ip_address = extract_ip_address(&headers);
    let user_agent = extract_user_agent(&headers);
    let username = request.username.clone();

    let service = UserService::new(state.db.clone(), state.config.auth.clone());
    match service.login(request).await {
        Ok(response) => {
            audit_log(&AuditEvent::LoginSuccess {
                user_id: response.id,
                username,
                ip_address,
                user_agent,
            });
            Ok(Json(response))
        }
        Err(e) => {
            audit_log(&AuditEvent::LoginFailure {
                username,
                reason: format!("{e:?}"),
                ip_address,
                user_agent,
            });
            Err(e)
        }
    }
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/users/profile",
    tag = "users",
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 400, description = "User no longer exists", body = crate::error::ApiError),
        (status = 401, description = "Unauthorized", body = crate::error::ApiError),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, AppError> {
    let service = UserService::new(state.db.clone(), state.config.auth.clone());
    let profile = service.resolve_by_id(user.id).await?;

    Ok(Json(profile.into_response(None)))
}

/// Update the authenticated user's profile
///
/// Only the display name is applied; username and password in the body are
/// ignored.
#[utoipa::path(
    put,
    path = "/users/profile",
    tag = "users",
    request_body = UserRequest,
    responses(
        (status = 200, description = "Updated user profile", body = UserResponse),
        (status = 400, description = "Invalid input or user no longer exists", body = crate::error::ApiError),
        (status = 401, description = "Unauthorized", body = crate::error::ApiError),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    headers: HeaderMap,
    Json(request): Json<UserRequest>,
) -> Result<impl IntoResponse, AppError> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let service = UserService::new(state.db.clone(), state.config.auth.clone());
    let updated = service.update(user.id, request).await?;

    audit_log(&AuditEvent::ProfileUpdate {
        user_id: updated.id,
        username: updated.username.clone(),
        ip_address: extract_ip_address(&headers),
    });

    Ok(Json(updated.into_response(None)))
}

/// Echo the verified identity
///
/// Returns the claims attached by the auth gate without touching storage;
/// useful for callers that only need to check a token.
#[utoipa::path(
    get,
    path = "/users/validate-auth",
    tag = "users",
    responses(
        (status = 200, description = "Decoded identity from the presented token", body = AuthenticatedUser),
        (status = 401, description = "Unauthorized", body = crate::error::ApiError),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn validate_auth_handler(
    Extension(user): Extension<AuthenticatedUser>,
) -> impl IntoResponse {
    Json(user)
}
