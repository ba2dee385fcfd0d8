//! JWT token service behind the [`TokenService`] port.
//!
//! HS256-signed access and refresh tokens. Each token carries a `kind`
//! claim so a refresh token can never be presented as an access token (or
//! the reverse), and a `jti` so refresh tokens can be individually revoked.
//! The revocation list is process-local; the port boundary admits a
//! store-backed implementation without touching the core.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crewdesk_app::ports::{TokenClaims, TokenPair, TokenService};
use crewdesk_domain::error::{AuthenticationError, CrewdeskError};
use crewdesk_domain::id::UserId;
use crewdesk_domain::role::Role;
use crewdesk_domain::user::User;

/// Token signing configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret key for signing tokens. Must be non-empty.
    pub secret: String,
    /// Token issuer.
    pub issuer: String,
    /// Access token lifetime in seconds.
    pub access_ttl_secs: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_ttl_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: String::new(), // Must be set by the operator
            issuer: "crewdesk".to_string(),
            access_ttl_secs: 3600,
            refresh_ttl_secs: 86400 * 7,
        }
    }
}

impl AuthConfig {
    /// Creates a new configuration with the given secret.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: String,
    iss: String,
    iat: i64,
    exp: i64,
    jti: String,
    kind: TokenKind,
}

/// HS256 JWT issuer/verifier implementing the [`TokenService`] port.
#[derive(Clone)]
pub struct JwtTokenService {
    issuer: String,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
    revoked: Arc<Mutex<HashSet<String>>>,
}

impl JwtTokenService {
    /// Creates a new token service.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::Storage`] when the secret is empty.
    pub fn new(config: AuthConfig) -> Result<Self, CrewdeskError> {
        if config.secret.is_empty() {
            return Err(CrewdeskError::Storage(
                "JWT secret is not configured".into(),
            ));
        }
        if config.secret.len() < 32 {
            tracing::warn!("JWT secret is shorter than recommended (32 bytes)");
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.leeway = 30;

        Ok(Self {
            issuer: config.issuer,
            access_ttl_secs: config.access_ttl_secs,
            refresh_ttl_secs: config.refresh_ttl_secs,
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
            revoked: Arc::new(Mutex::new(HashSet::new())),
        })
    }

    fn claims(&self, user_id: &str, role: &str, kind: TokenKind, ttl_secs: i64) -> Claims {
        let now = chrono::Utc::now().timestamp();
        Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            iss: self.issuer.clone(),
            iat: now,
            exp: now + ttl_secs,
            jti: uuid::Uuid::new_v4().to_string(),
            kind,
        }
    }

    fn encode(&self, claims: &Claims) -> Result<String, CrewdeskError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|err| CrewdeskError::Storage(Box::new(err)))
    }

    fn decode(&self, token: &str, expected: TokenKind) -> Result<Claims, CrewdeskError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|err| {
            match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthenticationError::Expired,
                _ => AuthenticationError::Invalid,
            }
        })?;
        if data.claims.kind != expected {
            return Err(AuthenticationError::Invalid.into());
        }
        Ok(data.claims)
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &User) -> Result<TokenPair, CrewdeskError> {
        let user_id = user.id.to_string();
        let role = user.role.to_string();
        let access = self.encode(&self.claims(
            &user_id,
            &role,
            TokenKind::Access,
            self.access_ttl_secs,
        ))?;
        let refresh = self.encode(&self.claims(
            &user_id,
            &role,
            TokenKind::Refresh,
            self.refresh_ttl_secs,
        ))?;
        Ok(TokenPair { access, refresh })
    }

    fn verify_access(&self, token: &str) -> Result<TokenClaims, CrewdeskError> {
        let claims = self.decode(token, TokenKind::Access)?;
        let user_id =
            UserId::from_str(&claims.sub).map_err(|_| AuthenticationError::Invalid)?;
        let role = Role::from_str(&claims.role).map_err(|_| AuthenticationError::Invalid)?;
        Ok(TokenClaims { user_id, role })
    }

    fn refresh(&self, refresh_token: &str) -> Result<String, CrewdeskError> {
        let claims = self.decode(refresh_token, TokenKind::Refresh)?;
        if self.revoked.lock().unwrap_or_else(std::sync::PoisonError::into_inner).contains(&claims.jti) {
            return Err(AuthenticationError::Revoked.into());
        }
        self.encode(&self.claims(
            &claims.sub,
            &claims.role,
            TokenKind::Access,
            self.access_ttl_secs,
        ))
    }

    fn revoke(&self, refresh_token: &str) -> Result<(), CrewdeskError> {
        let claims = self.decode(refresh_token, TokenKind::Refresh)?;
        self.revoked
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(claims.jti);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtTokenService {
        JwtTokenService::new(AuthConfig::new(
            "test-secret-key-that-is-long-enough-for-testing",
        ))
        .unwrap()
    }

    fn test_user() -> User {
        User::builder()
            .email("jwt@example.com")
            .phone_number("+254700000900")
            .first_name("Jay")
            .last_name("Dub")
            .role(Role::Maintenance)
            .password_hash("$argon2id$stub")
            .build()
            .unwrap()
    }

    #[test]
    fn should_reject_empty_secret() {
        assert!(JwtTokenService::new(AuthConfig::default()).is_err());
    }

    #[test]
    fn should_issue_and_verify_access_token() {
        let service = test_service();
        let user = test_user();

        let pair = service.issue(&user).unwrap();
        let claims = service.verify_access(&pair.access).unwrap();

        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.role, Role::Maintenance);
    }

    #[test]
    fn should_reject_refresh_token_presented_as_access() {
        let service = test_service();
        let pair = service.issue(&test_user()).unwrap();

        let result = service.verify_access(&pair.refresh);
        assert!(matches!(
            result,
            Err(CrewdeskError::Authentication(AuthenticationError::Invalid))
        ));
    }

    #[test]
    fn should_exchange_refresh_for_new_access_token() {
        let service = test_service();
        let user = test_user();
        let pair = service.issue(&user).unwrap();

        let access = service.refresh(&pair.refresh).unwrap();
        let claims = service.verify_access(&access).unwrap();
        assert_eq!(claims.user_id, user.id);
    }

    #[test]
    fn should_reject_access_token_presented_as_refresh() {
        let service = test_service();
        let pair = service.issue(&test_user()).unwrap();

        let result = service.refresh(&pair.access);
        assert!(matches!(
            result,
            Err(CrewdeskError::Authentication(AuthenticationError::Invalid))
        ));
    }

    #[test]
    fn should_reject_revoked_refresh_token() {
        let service = test_service();
        let pair = service.issue(&test_user()).unwrap();

        service.revoke(&pair.refresh).unwrap();

        let result = service.refresh(&pair.refresh);
        assert!(matches!(
            result,
            Err(CrewdeskError::Authentication(AuthenticationError::Revoked))
        ));
    }

    #[test]
    fn should_reject_token_signed_with_other_secret() {
        let one = JwtTokenService::new(AuthConfig::new("secret-one-for-testing-purposes")).unwrap();
        let two = JwtTokenService::new(AuthConfig::new("secret-two-for-testing-purposes")).unwrap();

        let pair = one.issue(&test_user()).unwrap();
        assert!(two.verify_access(&pair.access).is_err());
    }

    #[test]
    fn should_reject_garbage_token() {
        let service = test_service();
        assert!(service.verify_access("not.a.token").is_err());
    }
}
