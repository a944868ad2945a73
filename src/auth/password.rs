use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::{error, warn};

/// Stored in place of a hash for accounts created through Google sign-in.
/// Not parseable as an argon2 hash, so password login can never match it.
pub const GOOGLE_PLACEHOLDER_HASH: &str = "google-oauth";

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// An unparsable stored hash counts as a mismatch, so login keeps its
/// uniform invalid-credentials answer for Google-created accounts.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "stored credential is not a parseable hash");
            return false;
        }
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn google_placeholder_never_verifies() {
        assert!(!verify_password("google-oauth", GOOGLE_PLACEHOLDER_HASH));
        assert!(!verify_password("", GOOGLE_PLACEHOLDER_HASH));
    }
}
