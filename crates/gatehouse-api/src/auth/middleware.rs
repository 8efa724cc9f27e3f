/// Authentication middleware for protecting routes
///
/// Extracts and verifies bearer tokens from the Authorization header. On
/// success, the decoded identity is added to request extensions as a typed
/// [`AuthenticatedUser`]; on any failure the downstream handler never runs.
use super::jwt::{verify_token, Claims, TokenError};
use crate::audit::{audit_log, extract_ip_address, extract_user_agent, AuditEvent};
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Authenticated identity extracted from a verified token
///
/// Added to request extensions by the auth middleware; handlers read it with
/// `Extension<AuthenticatedUser>` instead of re-verifying the token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// User's unique identifier
    pub id: Uuid,
    /// Username embedded in the token
    pub username: String,
    /// Role tag embedded in the token
    pub role: String,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            username: claims.username,
            role: claims.role,
        }
    }
}

/// Authentication middleware errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingAuthHeader,

    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] TokenError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingAuthHeader => "Missing Authorization header",
            AuthError::InvalidAuthHeader => "Invalid Authorization header format",
            AuthError::InvalidToken(_) => "Invalid or expired token",
        };

        let body = serde_json::json!({
            "error": message,
            "status": StatusCode::UNAUTHORIZED.as_u16(),
        });

        (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
    }
}

/// Authentication middleware that requires a valid bearer token
///
/// This middleware:
/// 1. Extracts the Authorization header (`Bearer <token>`)
/// 2. Verifies the token signature and expiry against the shared config
/// 3. Adds [`AuthenticatedUser`] to request extensions
///
/// A missing header, wrong scheme, or empty token short-circuits with 401
/// before any verification work. The signing key reaches this function
/// through [`AppState`]; it is read-only after startup.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let ip_address = extract_ip_address(request.headers());
    let user_agent = extract_user_agent(request.headers());

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)?;

    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }

    let claims = match verify_token(&state.config.auth, token) {
        Ok(c) => c,
        Err(e) => {
            audit_log(&AuditEvent::InvalidToken {
                ip_address,
                user_agent,
                reason: e.to_string(),
            });
            return Err(AuthError::InvalidToken(e));
        }
    };

    request
        .extensions_mut()
        .insert(AuthenticatedUser::from(claims));

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_authenticated_user_from_claims() {
        let id = Uuid::new_v4();
        let now = Utc::now().timestamp();

        let claims = Claims {
            id,
            username: "alice".to_string(),
            role: "user".to_string(),
            iat: now,
            exp: now + 3600,
        };

        let user = AuthenticatedUser::from(claims);

        assert_eq!(user.id, id);
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, "user");
    }

    #[test]
    fn test_auth_error_responses_are_unauthorized() {
        for error in [
            AuthError::MissingAuthHeader,
            AuthError::InvalidAuthHeader,
            AuthError::InvalidToken(TokenError::Expired),
        ] {
            let response = error.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }
}
