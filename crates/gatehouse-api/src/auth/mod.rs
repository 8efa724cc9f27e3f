//! Authentication and identity module
//!
//! This module provides the token-based identity stack:
//! - Bearer token issuance and verification
//! - Password hashing with Argon2
//! - Middleware for request authentication
//! - The user identity service and its repository
//! - Domain model and request/response shapes

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;

pub use jwt::{issue_token, verify_token, Claims, TokenError};
pub use middleware::{auth_middleware, AuthError, AuthenticatedUser};
pub use models::{LoginRequest, User, UserRequest, UserResponse};
pub use password::{hash_password, verify_password, PasswordConfig, PasswordError};
pub use repository::{RepositoryError, UserRepository};
pub use service::UserService;
