//! Technician profile repository port.

use std::future::Future;

use crewdesk_domain::error::CrewdeskError;
use crewdesk_domain::id::{CompanyId, TechnicianId, UserId};
use crewdesk_domain::profile::TechnicianProfile;

/// Repository for [`TechnicianProfile`]s.
pub trait TechnicianRepository {
    /// Insert the profile, or — when a profile already exists for the same
    /// user — return the existing row. Implementations must resolve the
    /// race at the store (unique constraint on `user_id` plus a
    /// conflict-fallback fetch), never by checking first.
    fn insert_or_fetch(
        &self,
        profile: TechnicianProfile,
    ) -> impl Future<Output = Result<TechnicianProfile, CrewdeskError>> + Send;

    /// Get a profile by its unique identifier.
    fn get_by_id(
        &self,
        id: TechnicianId,
    ) -> impl Future<Output = Result<Option<TechnicianProfile>, CrewdeskError>> + Send;

    /// Get the profile owned by `user_id`.
    fn get_by_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<TechnicianProfile>, CrewdeskError>> + Send;

    /// List the technicians belonging to a company.
    fn list_by_company(
        &self,
        company_id: CompanyId,
    ) -> impl Future<Output = Result<Vec<TechnicianProfile>, CrewdeskError>> + Send;

    /// List all technician profiles.
    fn get_all(
        &self,
    ) -> impl Future<Output = Result<Vec<TechnicianProfile>, CrewdeskError>> + Send;

    /// Update an existing profile.
    fn update(
        &self,
        profile: TechnicianProfile,
    ) -> impl Future<Output = Result<TechnicianProfile, CrewdeskError>> + Send;

    /// Delete a profile; the owning user is untouched.
    fn delete(&self, id: TechnicianId) -> impl Future<Output = Result<(), CrewdeskError>> + Send;
}
