use std::fmt;

use anyhow::Context;
use lazy_static::lazy_static;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::{error, warn};

/// Output of [`hash_password`]. The only value the credential store accepts
/// for the password column; there is no way to build one from plaintext
/// except through the hasher.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword(..)")
    }
}

/// Argon2id with a fresh random salt; the salt lives inside the PHC string.
pub fn hash_password(plain: &str) -> anyhow::Result<HashedPassword> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(HashedPassword(hash))
}

/// Returns `false` for a wrong password and for a stored value that is not a
/// valid PHC hash string.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "stored password hash is malformed");
            return false;
        }
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

lazy_static! {
    static ref DUMMY_HASH: String = hash_password("finance-tracker-dummy-password")
        .map(|h| h.0)
        .unwrap_or_default();
}

/// A real Argon2 hash of a throwaway password, with the same parameters as
/// stored hashes. Verifying against it costs the same as a real check.
pub fn dummy_hash() -> &'static str {
    DUMMY_HASH.as_str()
}

pub async fn hash_password_async(plain: String) -> anyhow::Result<HashedPassword> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .context("password hashing task panicked")?
}

pub async fn verify_password_async(plain: String, hash: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .context("password verification task panicked")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, hash.as_str()));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("correct-horse-battery-staple").expect("hashing should succeed");
        assert!(!verify_password("wrong-password", hash.as_str()));
    }

    #[test]
    fn verify_returns_false_on_malformed_hash() {
        assert!(!verify_password("anything", "not-a-valid-hash"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn hash_never_contains_plaintext_and_is_salted() {
        let a = hash_password("secret123").unwrap();
        let b = hash_password("secret123").unwrap();
        assert!(!a.as_str().contains("secret123"));
        assert!(a.as_str().starts_with("$argon2"));
        assert_ne!(a, b);
    }

    #[test]
    fn debug_output_is_redacted() {
        let hash = hash_password("secret123").unwrap();
        assert_eq!(format!("{hash:?}"), "HashedPassword(..)");
    }

    #[test]
    fn dummy_hash_is_a_real_argon2_hash() {
        let dummy = dummy_hash();
        assert!(dummy.starts_with("$argon2"));
        assert!(PasswordHash::new(dummy).is_ok());
        assert!(!verify_password("Secur3P@ssw0rd!", dummy));
        assert_eq!(dummy, dummy_hash());
    }

    #[tokio::test]
    async fn async_wrappers_agree_with_sync_versions() {
        let hash = hash_password_async("secret123".into()).await.unwrap();
        assert!(verify_password_async("secret123".into(), hash.as_str().to_string())
            .await
            .unwrap());
        assert!(!verify_password_async("secret124".into(), hash.as_str().to_string())
            .await
            .unwrap());
    }
}
