/// Password hashing and verification using Argon2id
///
/// Credential hashes are one-way: equality is checked by re-deriving and
/// comparing, never by reversing. Each hash embeds its own random 16-byte
/// salt, so two hashes of the same plaintext differ.
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use thiserror::Error;

/// Credential hashing errors
///
/// Hashing fails only on underlying randomness or parameter failure, never
/// on the content of the password itself.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hashing(String),
}

/// Work factor configuration for the hash function
///
/// Increasing memory or iterations slows hashing down; the slowness is the
/// point.
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    /// Memory cost in KB (default: 65536 = 64 MB)
    pub memory_cost: u32,
    /// Time cost (iterations, default: 3)
    pub time_cost: u32,
    /// Parallelism (threads, default: 4)
    pub parallelism: u32,
    /// Output length in bytes (default: 32)
    pub output_len: Option<usize>,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost: 65536, // 64 MB
            time_cost: 3,
            parallelism: 4,
            output_len: Some(32),
        }
    }
}

impl PasswordConfig {
    fn to_params(&self) -> Result<Params, PasswordError> {
        Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            self.output_len,
        )
        .map_err(|e| PasswordError::Hashing(e.to_string()))
    }
}

/// Hash a plaintext password with the default work factor
///
/// Returns a PHC string (algorithm, parameters, salt, and hash) safe to
/// store as-is; no separate salt storage is needed.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    hash_password_with_config(password, &PasswordConfig::default())
}

/// Hash a password with a custom work factor
pub fn hash_password_with_config(
    password: &str,
    config: &PasswordConfig,
) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = config.to_params()?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hashing(e.to_string()))?;

    Ok(password_hash.to_string())
}

/// Verify a plaintext password against a stored hash
///
/// Never fails with an error: a mismatched password and a malformed stored
/// hash both resolve to `false`.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light_config() -> PasswordConfig {
        // Lighter parameters keep the test suite fast.
        PasswordConfig {
            memory_cost: 8192,
            time_cost: 1,
            parallelism: 1,
            output_len: Some(32),
        }
    }

    #[test]
    fn test_hash_and_verify_password() {
        let password = "pw123";
        let hash = hash_password_with_config(password, &light_config()).expect("hash failed");

        assert!(verify_password(password, &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn test_same_password_produces_different_hashes() {
        let password = "same-password";

        let hash1 = hash_password_with_config(password, &light_config()).unwrap();
        let hash2 = hash_password_with_config(password, &light_config()).unwrap();

        assert_ne!(hash1, hash2);

        assert!(verify_password(password, &hash1));
        assert!(verify_password(password, &hash2));
    }

    #[test]
    fn test_hash_never_contains_plaintext() {
        let password = "hunter2";
        let hash = hash_password_with_config(password, &light_config()).unwrap();

        assert!(!hash.contains(password));
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_malformed_hash_resolves_to_false() {
        assert!(!verify_password("password", "not-a-phc-string"));
        assert!(!verify_password("password", ""));
    }

    #[test]
    fn test_custom_work_factor_recorded_in_hash() {
        let config = PasswordConfig {
            memory_cost: 16384,
            time_cost: 2,
            parallelism: 2,
            output_len: Some(32),
        };

        let hash = hash_password_with_config("pw123", &config).unwrap();

        assert!(hash.contains("m=16384"));
        assert!(hash.contains("t=2"));
        assert!(hash.contains("p=2"));
        assert!(verify_password("pw123", &hash));
    }
}
