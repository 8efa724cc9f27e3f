//! Gatehouse API - identity and bearer-token HTTP service
//!
//! Issues and verifies signed bearer tokens, gates protected endpoints
//! behind token verification, and stores user credentials as salted
//! Argon2id hashes.

pub mod audit;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use state::AppState;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation for the user API
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::users::register_handler,
        handlers::users::login_handler,
        handlers::users::profile_handler,
        handlers::users::update_profile_handler,
        handlers::users::validate_auth_handler,
        handlers::health::health_handler,
    ),
    components(schemas(
        auth::UserRequest,
        auth::LoginRequest,
        auth::UserResponse,
        auth::AuthenticatedUser,
        error::ApiError,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "users", description = "User identity endpoints"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(routes::api_routes(state.clone()))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let list: Vec<axum::http::HeaderValue> =
            origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(list))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Configuration used by the test router: a fixed signing key and a lazy
/// pool that never connects unless a handler actually touches the database.
#[cfg(any(test, feature = "test-utils"))]
pub fn test_config() -> gatehouse_core::AppConfig {
    let mut config = gatehouse_core::AppConfig::default();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    if let Ok(url) = std::env::var("TEST_DATABASE_URL") {
        config.database.url = url;
    }
    config
}

/// Build a router for integration tests
#[cfg(any(test, feature = "test-utils"))]
pub fn create_router_for_testing() -> Router {
    let config = test_config();
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy(&config.database.url)
        .expect("invalid test database url");

    create_router(Arc::new(AppState::new(config, pool)))
}
