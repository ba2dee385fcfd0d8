//! Auth service — login, token refresh, logout, and caller resolution.

use crewdesk_domain::caller::{Caller, CallerUser};
use crewdesk_domain::error::{AuthenticationError, CrewdeskError};
use crewdesk_domain::user::{User, normalize_email};

use crate::ports::{PasswordHasher, TokenPair, TokenService, UserRepository};

/// Outcome of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub tokens: TokenPair,
    pub user: User,
}

/// Application service for authentication flows. All token state lives
/// behind the [`TokenService`] port.
pub struct AuthService<UR, PH, TS> {
    users: UR,
    hasher: PH,
    tokens: TS,
    /// Digest verified against when the email is unknown, so unknown and
    /// known-but-wrong lookups cost the same amount of hashing work.
    dummy_digest: String,
}

impl<UR, PH, TS> AuthService<UR, PH, TS>
where
    UR: UserRepository,
    PH: PasswordHasher,
    TS: TokenService,
{
    /// Create a new service backed by the given ports.
    pub fn new(users: UR, hasher: PH, tokens: TS) -> Self {
        let dummy_digest = hasher.hash("crewdesk-equalizing-digest").unwrap_or_default();
        Self {
            users,
            hasher,
            tokens,
            dummy_digest,
        }
    }

    /// Verify an email/password pair. Returns `Ok(None)` on *any* mismatch —
    /// unknown email, wrong password, or inactive account — without
    /// revealing which.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, CrewdeskError> {
        let email = normalize_email(email);
        match self.users.get_by_email(&email).await? {
            Some(user) => {
                let verified = self.hasher.verify(password, &user.password_hash);
                Ok((verified && user.is_active).then_some(user))
            }
            None => {
                // Equalize work so unknown emails are not observable.
                let _ = self.hasher.verify(password, &self.dummy_digest);
                Ok(None)
            }
        }
    }

    /// Authenticate and issue an access/refresh token pair.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::Authentication`] on any credential mismatch.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, CrewdeskError> {
        let Some(user) = self.authenticate(email, password).await? else {
            return Err(AuthenticationError::InvalidCredentials.into());
        };
        let tokens = self.tokens.issue(&user)?;
        tracing::info!(user_id = %user.id, "login");
        Ok(LoginResponse { tokens, user })
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::Authentication`] for expired, malformed, or
    /// revoked refresh tokens.
    pub fn refresh(&self, refresh_token: &str) -> Result<String, CrewdeskError> {
        self.tokens.refresh(refresh_token)
    }

    /// Revoke a refresh token (logout).
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::Authentication`] when the token is not a
    /// valid refresh token.
    pub fn logout(&self, refresh_token: &str) -> Result<(), CrewdeskError> {
        self.tokens.revoke(refresh_token)
    }

    /// Resolve the caller for a request from an optional bearer token.
    ///
    /// The user row is loaded fresh: role, flags, and activity are never
    /// trusted from the token alone.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::Authentication`] for invalid or expired
    /// tokens, tokens of deleted accounts, and inactive accounts.
    pub async fn resolve_caller(&self, token: Option<&str>) -> Result<Caller, CrewdeskError> {
        let Some(token) = token else {
            return Ok(Caller::Anonymous);
        };
        let claims = self.tokens.verify_access(token)?;
        let user = self
            .users
            .get_by_id(claims.user_id)
            .await?
            .ok_or(AuthenticationError::Invalid)?;
        if !user.is_active {
            return Err(AuthenticationError::Inactive.into());
        }
        Ok(Caller::User(CallerUser::from_user(&user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewdesk_domain::role::Role;

    use crate::test_support::{InMemoryStore, PlainHasher, StubTokenService};

    type Service = AuthService<crate::test_support::InMemoryUserRepo, PlainHasher, StubTokenService>;

    fn service(store: &InMemoryStore) -> Service {
        AuthService::new(store.user_repo(), PlainHasher, StubTokenService)
    }

    async fn seed_user(store: &InMemoryStore, email: &str, active: bool) -> User {
        let user = User::builder()
            .email(email)
            .phone_number("+254700000200")
            .first_name("Auth")
            .last_name("Case")
            .role(Role::Technician)
            .password_hash("plain:right-pass")
            .active(active)
            .build()
            .unwrap();
        store.user_repo().insert(user.clone()).await.unwrap()
    }

    #[tokio::test]
    async fn should_authenticate_with_correct_password() {
        let store = InMemoryStore::default();
        let svc = service(&store);
        let user = seed_user(&store, "auth@example.com", true).await;

        let found = svc
            .authenticate("auth@example.com", "right-pass")
            .await
            .unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn should_authenticate_with_differently_cased_email() {
        let store = InMemoryStore::default();
        let svc = service(&store);
        seed_user(&store, "case@example.com", true).await;

        let found = svc
            .authenticate("Case@Example.COM", "right-pass")
            .await
            .unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn should_return_none_for_wrong_password() {
        let store = InMemoryStore::default();
        let svc = service(&store);
        seed_user(&store, "wrong@example.com", true).await;

        let found = svc
            .authenticate("wrong@example.com", "other-pass")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn should_return_none_for_unknown_email() {
        let store = InMemoryStore::default();
        let svc = service(&store);

        let found = svc
            .authenticate("ghost@example.com", "whatever")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn should_return_none_for_inactive_account() {
        let store = InMemoryStore::default();
        let svc = service(&store);
        seed_user(&store, "inactive@example.com", false).await;

        let found = svc
            .authenticate("inactive@example.com", "right-pass")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn should_issue_tokens_on_login() {
        let store = InMemoryStore::default();
        let svc = service(&store);
        let user = seed_user(&store, "login@example.com", true).await;

        let response = svc.login("login@example.com", "right-pass").await.unwrap();
        assert!(response.tokens.access.contains(&user.id.to_string()));
        assert_eq!(response.user.id, user.id);
    }

    #[tokio::test]
    async fn should_reject_login_with_bad_credentials() {
        let store = InMemoryStore::default();
        let svc = service(&store);
        seed_user(&store, "badlogin@example.com", true).await;

        let result = svc.login("badlogin@example.com", "nope").await;
        assert!(matches!(
            result,
            Err(CrewdeskError::Authentication(
                AuthenticationError::InvalidCredentials
            ))
        ));
    }

    #[tokio::test]
    async fn should_resolve_anonymous_when_no_token() {
        let store = InMemoryStore::default();
        let svc = service(&store);

        let caller = svc.resolve_caller(None).await.unwrap();
        assert_eq!(caller, Caller::Anonymous);
    }

    #[tokio::test]
    async fn should_resolve_caller_from_valid_token() {
        let store = InMemoryStore::default();
        let svc = service(&store);
        let user = seed_user(&store, "tok@example.com", true).await;
        let tokens = StubTokenService.issue(&user).unwrap();

        let caller = svc.resolve_caller(Some(&tokens.access)).await.unwrap();
        assert_eq!(caller.user().map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn should_reject_token_of_deleted_account() {
        let store = InMemoryStore::default();
        let svc = service(&store);
        let user = seed_user(&store, "gone@example.com", true).await;
        let tokens = StubTokenService.issue(&user).unwrap();
        store.user_repo().delete(user.id).await.unwrap();

        let result = svc.resolve_caller(Some(&tokens.access)).await;
        assert!(matches!(result, Err(CrewdeskError::Authentication(_))));
    }

    #[tokio::test]
    async fn should_reject_token_of_inactive_account() {
        let store = InMemoryStore::default();
        let svc = service(&store);
        let user = seed_user(&store, "sleepy@example.com", false).await;
        let tokens = StubTokenService.issue(&user).unwrap();

        let result = svc.resolve_caller(Some(&tokens.access)).await;
        assert!(matches!(
            result,
            Err(CrewdeskError::Authentication(AuthenticationError::Inactive))
        ));
    }

    #[tokio::test]
    async fn should_reject_garbage_token() {
        let store = InMemoryStore::default();
        let svc = service(&store);

        let result = svc.resolve_caller(Some("garbage")).await;
        assert!(matches!(result, Err(CrewdeskError::Authentication(_))));
    }
}
