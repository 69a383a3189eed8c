//! Password hashing for admin panel accounts.
//!
//! Hashes are stored in PHC string format so the parameters travel with the
//! hash and older hashes keep verifying after a parameter change.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashError(String),

    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// OWASP Argon2id baseline: 19 MiB, 2 iterations, 1 lane.
const MEMORY_COST_KIB: u32 = 19456;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;
const OUTPUT_LEN: usize = 32;

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, Some(OUTPUT_LEN))
        .map_err(|e| PasswordError::HashError(format!("invalid Argon2 params: {}", e)))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a plaintext password with Argon2id and a random salt.
///
/// ```
/// use shared::password::hash_password;
///
/// let hash = hash_password("correct horse").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Checks a plaintext password against a stored PHC hash.
///
/// Returns `Ok(false)` on mismatch and an error only when the stored hash
/// cannot be parsed or verification itself fails.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

/// Returns true when a stored hash was produced with different parameters
/// than the current ones and should be replaced on the next password change.
pub fn needs_rehash(hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => {
            let expected = format!("m={},t={},p={}", MEMORY_COST_KIB, TIME_COST, PARALLELISM);
            parsed.algorithm.as_str() != "argon2id" || !hash.contains(&expected)
        }
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_has_expected_parameters() {
        let hash = hash_password("admin-password").unwrap();
        assert!(hash.starts_with("$argon2id$v=19$m=19456,t=2,p=1$"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("same").unwrap();
        let second = hash_password("same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_roundtrip() {
        let hash = hash_password("Secr3t!").unwrap();
        assert!(verify_password("Secr3t!", &hash).unwrap());
        assert!(!verify_password("secr3t!", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        let result = verify_password("password", "plain-text-password");
        assert!(matches!(result, Err(PasswordError::InvalidHashFormat)));
    }

    #[test]
    fn test_needs_rehash() {
        let hash = hash_password("password").unwrap();
        assert!(!needs_rehash(&hash));
        assert!(needs_rehash("not-a-hash"));
        assert!(needs_rehash(
            "$argon2id$v=19$m=4096,t=3,p=1$c29tZXNhbHQ$RdescudvJCsgt3ub+b+dWRWJTmaaJObG"
        ));
    }
}
