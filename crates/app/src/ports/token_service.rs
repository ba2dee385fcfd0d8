//! Token service port — issuance, verification, and revocation.
//!
//! The core holds no token state; everything (signing keys, lifetimes,
//! revocation lists) lives behind this boundary.

use crewdesk_domain::error::CrewdeskError;
use crewdesk_domain::id::UserId;
use crewdesk_domain::role::Role;
use crewdesk_domain::user::User;

/// Access/refresh token pair returned at login.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Claims extracted from a verified access token.
///
/// Callers must still load the user row: flags and activity are evaluated
/// fresh per request, never trusted from the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: UserId,
    pub role: Role,
}

/// Issues and validates bearer tokens.
pub trait TokenService {
    /// Issue a fresh access/refresh pair for `user`.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::Storage`] when signing fails.
    fn issue(&self, user: &User) -> Result<TokenPair, CrewdeskError>;

    /// Verify an access token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::Authentication`] for expired, malformed,
    /// or wrong-kind tokens.
    fn verify_access(&self, token: &str) -> Result<TokenClaims, CrewdeskError>;

    /// Exchange a valid refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::Authentication`] for expired, malformed,
    /// or revoked refresh tokens.
    fn refresh(&self, refresh_token: &str) -> Result<String, CrewdeskError>;

    /// Revoke a refresh token so it can no longer be exchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::Authentication`] when the token is not a
    /// valid refresh token.
    fn revoke(&self, refresh_token: &str) -> Result<(), CrewdeskError>;
}
