//! User repository port — persistence for accounts.

use std::future::Future;

use crewdesk_domain::error::CrewdeskError;
use crewdesk_domain::id::UserId;
use crewdesk_domain::profile::Profile;
use crewdesk_domain::user::User;

/// Repository for persisting and querying [`User`]s.
///
/// Email and phone number carry unique constraints at the store; inserts
/// racing past service-level pre-checks surface as
/// [`CrewdeskError::Conflict`].
pub trait UserRepository {
    /// Persist a new user.
    fn insert(&self, user: User) -> impl Future<Output = Result<User, CrewdeskError>> + Send;

    /// Persist a new user together with its role-matched profile in one
    /// atomic unit: either both rows exist afterwards or neither does, and
    /// no intermediate state is observable by concurrent operations.
    fn insert_with_profile(
        &self,
        user: User,
        profile: Option<Profile>,
    ) -> impl Future<Output = Result<User, CrewdeskError>> + Send;

    /// Get a user by its unique identifier.
    fn get_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, CrewdeskError>> + Send;

    /// Get a user by normalized email.
    fn get_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, CrewdeskError>> + Send;

    /// Get a user by phone number.
    fn get_by_phone(
        &self,
        phone: &str,
    ) -> impl Future<Output = Result<Option<User>, CrewdeskError>> + Send;

    /// List all users.
    fn get_all(&self) -> impl Future<Output = Result<Vec<User>, CrewdeskError>> + Send;

    /// Update an existing user.
    fn update(&self, user: User) -> impl Future<Output = Result<User, CrewdeskError>> + Send;

    /// Delete a user; the attached profile row is removed by the store's
    /// cascade rule.
    fn delete(&self, id: UserId) -> impl Future<Output = Result<(), CrewdeskError>> + Send;
}
