//! Maintenance company profile repository port.

use std::future::Future;

use crewdesk_domain::error::CrewdeskError;
use crewdesk_domain::id::{CompanyId, UserId};
use crewdesk_domain::profile::MaintenanceCompanyProfile;

/// Repository for [`MaintenanceCompanyProfile`]s.
pub trait CompanyRepository {
    /// Insert the profile, or return the existing row when the owning user
    /// already has one (store-level upsert, as for technicians).
    fn insert_or_fetch(
        &self,
        profile: MaintenanceCompanyProfile,
    ) -> impl Future<Output = Result<MaintenanceCompanyProfile, CrewdeskError>> + Send;

    /// Get a company by its unique identifier.
    fn get_by_id(
        &self,
        id: CompanyId,
    ) -> impl Future<Output = Result<Option<MaintenanceCompanyProfile>, CrewdeskError>> + Send;

    /// Get the company profile owned by `user_id`, if any.
    fn get_by_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<MaintenanceCompanyProfile>, CrewdeskError>> + Send;

    /// Get the company administered by `admin_user_id`, if any.
    fn get_by_admin(
        &self,
        admin_user_id: UserId,
    ) -> impl Future<Output = Result<Option<MaintenanceCompanyProfile>, CrewdeskError>> + Send;

    /// List all companies.
    fn get_all(
        &self,
    ) -> impl Future<Output = Result<Vec<MaintenanceCompanyProfile>, CrewdeskError>> + Send;

    /// Update an existing company.
    fn update(
        &self,
        profile: MaintenanceCompanyProfile,
    ) -> impl Future<Output = Result<MaintenanceCompanyProfile, CrewdeskError>> + Send;

    /// Delete a company; member technicians are detached (set-null), not
    /// removed.
    fn delete(&self, id: CompanyId) -> impl Future<Output = Result<(), CrewdeskError>> + Send;
}
