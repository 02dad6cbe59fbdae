//! Password hashing for signup and login
//!
//! Argon2id with a random salt per hash. Both operations are CPU-bound,
//! so request handlers go through the `*_async` variants.

use anyhow::{anyhow, Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

pub struct PasswordService;

impl PasswordService {
    pub fn hash(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| anyhow!("Failed to hash password: {}", e))
    }

    /// Returns `Ok(false)` on mismatch; `Err` only for an unparseable stored hash.
    pub fn verify(password: &str, hash: &str) -> Result<bool> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| anyhow!("Invalid hash format: {}", e))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    pub async fn hash_async(password: String) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .context("password hashing task failed")?
    }

    pub async fn verify_async(password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .context("password verification task failed")?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = PasswordService::hash("student-pass-123").unwrap();

        assert!(PasswordService::verify("student-pass-123", &hash).unwrap());
        assert!(!PasswordService::verify("admin-pass-123", &hash).unwrap());
    }

    #[test]
    fn test_salted_hashes_differ() {
        let first = PasswordService::hash("same-password").unwrap();
        let second = PasswordService::hash("same-password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_garbage_hash_is_error() {
        assert!(PasswordService::verify("whatever", "not-a-phc-string").is_err());
    }

    #[tokio::test]
    async fn test_async_round_trip() {
        let hash = PasswordService::hash_async("async-password".to_string())
            .await
            .unwrap();
        assert!(PasswordService::verify_async("async-password".to_string(), hash)
            .await
            .unwrap());
    }
}
