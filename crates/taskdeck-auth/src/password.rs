// Password hashing and validation module

use crate::error::{AuthError, AuthResult};
use bcrypt::{hash, verify};
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Bcrypt only looks at the first 72 bytes of its input.
pub const BCRYPT_MAX_BYTES: usize = 72;

const DUMMY_PASSWORD: &str = "taskdeck-no-such-account";

// One throwaway hash per cost factor, created on first use.
static DUMMY_HASHES: Mutex<BTreeMap<u32, String>> = parking_lot::const_mutex(BTreeMap::new());

/// Hash a password using bcrypt.
///
/// Runs on the blocking thread pool so request workers are not stalled by the
/// key-stretching rounds.
///
/// # Errors
/// Returns `AuthError::HashingError` if bcrypt fails or the task is cancelled.
pub async fn hash_password(password: &str, cost: u32) -> AuthResult<String> {
    let password = password.to_string();

    tokio::task::spawn_blocking(move || {
        hash(password, cost).map_err(|e| AuthError::HashingError(e.to_string()))
    })
    .await
    .map_err(|e| AuthError::HashingError(format!("Task join error: {}", e)))?
}

/// Verify a password against a bcrypt hash.
///
/// `Ok(false)` means the password did not match; `Err` means the hash itself
/// could not be processed.
pub async fn verify_password(password: &str, hash: &str) -> AuthResult<bool> {
    let password = password.to_string();
    let hash = hash.to_string();

    tokio::task::spawn_blocking(move || {
        verify(password, &hash).map_err(|e| AuthError::HashingError(e.to_string()))
    })
    .await
    .map_err(|e| AuthError::HashingError(format!("Task join error: {}", e)))?
}

/// Run a full bcrypt verification that can never succeed.
///
/// Login calls this when the email is unknown so that the response takes as
/// long as a wrong-password rejection at the same `cost`.
pub async fn verify_against_dummy(password: &str, cost: u32) -> AuthResult<()> {
    let dummy = dummy_hash(cost).await?;
    verify_password(password, &dummy).await.map(|_| ())
}

async fn dummy_hash(cost: u32) -> AuthResult<String> {
    if let Some(existing) = DUMMY_HASHES.lock().get(&cost) {
        return Ok(existing.clone());
    }
    let fresh = hash_password(DUMMY_PASSWORD, cost).await?;
    Ok(DUMMY_HASHES.lock().entry(cost).or_insert(fresh).clone())
}

/// Check a candidate password against the configured length bounds.
///
/// The minimum counts characters; the maximum counts bytes, since that is
/// what bcrypt truncates on.
pub fn validate_password(password: &str, min_length: usize, max_length: usize) -> AuthResult<()> {
    if password.chars().count() < min_length {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {} characters",
            min_length
        )));
    }

    let max_length = max_length.min(BCRYPT_MAX_BYTES);
    if password.len() > max_length {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at most {} bytes",
            max_length
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify_password() {
        let password = "correct horse";
        let hash = hash_password(password, 4).await.expect("Failed to hash");
        assert!(hash.starts_with("$2b$"));

        assert!(verify_password(password, &hash).await.unwrap());
        assert!(!verify_password("wrong horse", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_same_password_different_salts() {
        let a = hash_password("samesame", 4).await.unwrap();
        let b = hash_password("samesame", 4).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_verify_against_garbage_hash_is_error() {
        let result = verify_password("anything", "not-a-bcrypt-hash").await;
        assert!(matches!(result, Err(AuthError::HashingError(_))));
    }

    #[tokio::test]
    async fn test_dummy_verification_is_cached_per_cost() {
        verify_against_dummy("whatever", 4).await.unwrap();
        let first = dummy_hash(4).await.unwrap();
        verify_against_dummy(DUMMY_PASSWORD, 4).await.unwrap();
        assert_eq!(dummy_hash(4).await.unwrap(), first);
        assert!(first.starts_with("$2b$04$"));
    }

    #[test]
    fn test_validate_password_bounds() {
        assert!(validate_password("secret", 6, 72).is_ok());
        assert!(matches!(validate_password("short", 6, 72), Err(AuthError::WeakPassword(_))));

        let long = "x".repeat(73);
        assert!(validate_password(&long, 6, 72).is_err());
        // The bcrypt cap applies even when the configured maximum is larger.
        assert!(validate_password(&long, 6, 500).is_err());
    }
}
