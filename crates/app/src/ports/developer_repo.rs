//! Developer profile repository port.

use std::future::Future;

use crewdesk_domain::error::CrewdeskError;
use crewdesk_domain::id::UserId;
use crewdesk_domain::profile::DeveloperProfile;

/// Repository for [`DeveloperProfile`]s.
pub trait DeveloperRepository {
    /// Insert the profile, or return the existing row when the owning user
    /// already has one (store-level upsert).
    fn insert_or_fetch(
        &self,
        profile: DeveloperProfile,
    ) -> impl Future<Output = Result<DeveloperProfile, CrewdeskError>> + Send;

    /// Get the profile owned by `user_id`.
    fn get_by_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<DeveloperProfile>, CrewdeskError>> + Send;

    /// Update an existing profile.
    fn update(
        &self,
        profile: DeveloperProfile,
    ) -> impl Future<Output = Result<DeveloperProfile, CrewdeskError>> + Send;
}
