//! Argon2 password hashing behind the [`PasswordHasher`] port.

use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};
use password_hash::{PasswordHash, SaltString};

use crewdesk_app::ports::PasswordHasher;
use crewdesk_domain::error::CrewdeskError;

/// Salted argon2id hashing with the library's default parameters. Digests
/// are PHC strings, so parameters and salt travel with the hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, CrewdeskError> {
        let mut salt_bytes = [0u8; 16];
        getrandom::getrandom(&mut salt_bytes)
            .map_err(|err| CrewdeskError::Storage(Box::new(err)))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|err| CrewdeskError::Storage(Box::new(err)))?;
        let argon2 = Argon2::default();
        let phc = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| CrewdeskError::Storage(Box::new(err)))?
            .to_string();
        Ok(phc)
    }

    fn verify(&self, password: &str, digest: &str) -> bool {
        if let Ok(parsed) = PasswordHash::new(digest) {
            let argon2 = Argon2::default();
            argon2.verify_password(password.as_bytes(), &parsed).is_ok()
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_verify_password_against_its_own_digest() {
        let hasher = Argon2PasswordHasher;
        let digest = hasher.hash("correct horse").unwrap();
        assert!(hasher.verify("correct horse", &digest));
    }

    #[test]
    fn should_reject_wrong_password() {
        let hasher = Argon2PasswordHasher;
        let digest = hasher.hash("correct horse").unwrap();
        assert!(!hasher.verify("battery staple", &digest));
    }

    #[test]
    fn should_salt_digests_uniquely() {
        let hasher = Argon2PasswordHasher;
        let a = hasher.hash("same input").unwrap();
        let b = hasher.hash("same input").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn should_treat_malformed_digest_as_mismatch() {
        let hasher = Argon2PasswordHasher;
        assert!(!hasher.verify("anything", "not-a-phc-string"));
        assert!(!hasher.verify("anything", ""));
    }
}
