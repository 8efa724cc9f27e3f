//! Bearer token issuance and verification
//!
//! Implements JWT-based identity assertions with HMAC-SHA256 signing.
//! Tokens embed the user's id, username, and role plus an absolute expiry
//! set to issuance time + the configured validity window.

use chrono::Utc;
use gatehouse_core::AuthConfig;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Decoded token payload
///
/// A point-in-time copy of the user's identity: changes to the underlying
/// user record after issuance are not reflected until the next token is
/// minted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User's unique identifier
    pub id: Uuid,
    /// Username at issuance time
    pub username: String,
    /// Role tag at issuance time (trusted verbatim on verification)
    pub role: String,
    /// Issued at timestamp (Unix epoch seconds)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch seconds)
    pub exp: i64,
}

/// Token issuance and verification errors
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token cannot be parsed")]
    Malformed,

    #[error("token signature does not match")]
    SignatureInvalid,

    #[error("token has expired")]
    Expired,

    #[error("failed to sign claims: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Issue a signed bearer token for the given identity
///
/// The expiry is absolute: issuance time plus `token_ttl_secs` from the
/// configuration. Signing only fails if the key material is unusable, which
/// is a configuration error rather than a per-request condition.
pub fn issue_token(
    config: &AuthConfig,
    id: Uuid,
    username: &str,
    role: &str,
) -> Result<String, TokenError> {
    let now = Utc::now().timestamp();

    let claims = Claims {
        id,
        username: username.to_string(),
        role: role.to_string(),
        iat: now,
        exp: now + config.token_ttl_secs as i64,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(TokenError::Signing)
}

/// Verify a bearer token and extract its claims
///
/// Signature and expiry are checked independently; a valid signature with a
/// past expiry is rejected with [`TokenError::Expired`]. No claim value
/// beyond the expiry is validated: username and role are trusted verbatim
/// from the verified payload.
pub fn verify_token(config: &AuthConfig, token: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
        _ => TokenError::Malformed,
    })?;

    // jsonwebtoken still accepts exp == now; the validity window is [iat, exp)
    if token_data.claims.exp <= Utc::now().timestamp() {
        return Err(TokenError::Expired);
    }

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "unit-test-secret".to_string(),
            token_ttl_secs: 3600,
        }
    }

    fn encode_raw(config: &AuthConfig, claims: &Claims) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_and_verify_token() {
        let config = test_config();
        let user_id = Uuid::new_v4();

        let token = issue_token(&config, user_id, "alice", "user").expect("issue failed");
        let claims = verify_token(&config, &token).expect("verify failed");

        assert_eq!(claims.id, user_id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, "user");
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn test_malformed_token() {
        let config = test_config();

        let result = verify_token(&config, "not.a.token");
        assert!(matches!(result, Err(TokenError::Malformed)));

        let result = verify_token(&config, "");
        assert!(matches!(result, Err(TokenError::Malformed)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = test_config();
        let other = AuthConfig {
            jwt_secret: "another-secret".to_string(),
            ..test_config()
        };

        let token = issue_token(&config, Uuid::new_v4(), "alice", "user").unwrap();

        let result = verify_token(&other, &token);
        assert!(matches!(result, Err(TokenError::SignatureInvalid)));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let config = test_config();
        let token = issue_token(&config, Uuid::new_v4(), "alice", "user").unwrap();

        // Flip the final signature character to another valid base64 character.
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });
        assert_ne!(token, tampered);

        let result = verify_token(&config, &tampered);
        assert!(matches!(result, Err(TokenError::SignatureInvalid)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = test_config();
        let now = Utc::now().timestamp();

        let claims = Claims {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            role: "user".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };

        let token = encode_raw(&config, &claims);
        let result = verify_token(&config, &token);
        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_token_rejected_at_exact_expiry() {
        let config = test_config();
        let now = Utc::now().timestamp();

        let claims = Claims {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            role: "user".to_string(),
            iat: now - 3600,
            exp: now,
        };

        let token = encode_raw(&config, &claims);
        let result = verify_token(&config, &token);
        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_expired_and_tampered_reports_signature() {
        // Signature integrity is checked before expiry.
        let config = test_config();
        let now = Utc::now().timestamp();

        let claims = Claims {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            role: "user".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };

        let other = AuthConfig {
            jwt_secret: "another-secret".to_string(),
            ..test_config()
        };
        let token = encode_raw(&other, &claims);

        let result = verify_token(&config, &token);
        assert!(matches!(result, Err(TokenError::SignatureInvalid)));
    }
}
