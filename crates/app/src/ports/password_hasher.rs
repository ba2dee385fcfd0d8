//! Credential hashing port — delegated to a standard slow-hash primitive.

use crewdesk_domain::error::CrewdeskError;

/// Hashes and verifies account passwords.
///
/// Digests are opaque to the core; the adapter owns the algorithm, salt
/// handling, and encoding.
pub trait PasswordHasher {
    /// Produce a salted digest for `password`.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::Storage`] when the underlying primitive
    /// fails (effectively never for valid parameters).
    fn hash(&self, password: &str) -> Result<String, CrewdeskError>;

    /// Whether `password` matches `digest`. Malformed digests verify as
    /// `false`, never as an error.
    fn verify(&self, password: &str, digest: &str) -> bool;
}
