//! API route definitions

use crate::auth::middleware::auth_middleware;
use crate::handlers::users;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Create the user API routes
///
/// Every protected route sits behind the auth gate exactly once; the gate is
/// the only path by which identity enters the handlers below it.
pub fn api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/users", post(users::register_handler))
        .route("/users/login", post(users::login_handler));

    // Protected routes (authentication required)
    let protected_routes = Router::new()
        .route(
            "/users/profile",
            get(users::profile_handler).put(users::update_profile_handler),
        )
        .route("/users/validate-auth", get(users::validate_auth_handler))
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new().merge(public_routes).merge(protected_routes)
}
