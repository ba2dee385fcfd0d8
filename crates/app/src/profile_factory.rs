//! Profile factory — role-keyed creation and lookup of profile records.
//!
//! Dispatches on the user's role tag to the matching profile variant.
//! Creation is idempotent and race-safe: persistence goes through each
//! repository's `insert_or_fetch`, which resolves concurrent calls at the
//! store's uniqueness constraint. There is no check-then-insert anywhere in
//! this path, and no implicit creation hook — callers invoke the factory
//! explicitly.

use crewdesk_domain::error::CrewdeskError;
use crewdesk_domain::profile::{
    DeveloperProfile, MaintenanceCompanyProfile, Profile, ProfileData, TechnicianProfile,
};
use crewdesk_domain::role::Role;
use crewdesk_domain::user::User;

use crate::ports::{CompanyRepository, DeveloperRepository, TechnicianRepository};

/// Creates, fetches, and updates role-matched profiles.
pub struct ProfileFactory<TR, CR, DR> {
    technicians: TR,
    companies: CR,
    developers: DR,
}

impl<TR, CR, DR> ProfileFactory<TR, CR, DR> {
    /// Create a new factory backed by the given repositories.
    pub fn new(technicians: TR, companies: CR, developers: DR) -> Self {
        Self {
            technicians,
            companies,
            developers,
        }
    }

    /// Build (without persisting) the profile value matching `user`'s role,
    /// applying the role-matching section of `data`. Returns `None` for
    /// roles with no profile variant.
    ///
    /// Technician and developer profiles have no required fields and are
    /// built even without payload data. A maintenance company profile needs
    /// its company fields, so it is only built when the payload carries the
    /// maintenance section — the company is otherwise created later through
    /// the directory. The maintenance variant defaults its admin to the
    /// owning user when the payload does not name one.
    #[must_use]
    pub fn build(user: &User, data: &ProfileData) -> Option<Profile> {
        match user.role {
            Role::Technician => {
                let mut profile = TechnicianProfile::new(user.id);
                if let Some(section) = &data.technician {
                    if let Some(specialization) = &section.specialization {
                        profile.specialization.clone_from(specialization);
                    }
                }
                Some(Profile::Technician(profile))
            }
            Role::Maintenance => {
                let section = data.maintenance.clone()?;
                let mut profile = MaintenanceCompanyProfile::new(
                    user.id,
                    section.company_name.unwrap_or_default(),
                );
                if let Some(registration_number) = section.registration_number {
                    profile.registration_number = registration_number;
                }
                if let Some(admin) = section.admin_user_id {
                    profile.admin_user_id = Some(admin);
                }
                Some(Profile::Maintenance(profile))
            }
            Role::Developer => {
                let section = data.developer.clone().unwrap_or_default();
                let mut profile = DeveloperProfile::new(user.id);
                profile.developer_name = section.developer_name;
                profile.address = section.address;
                profile.company_name = section.company_name;
                Some(Profile::Developer(profile))
            }
            Role::Admin => None,
        }
    }
}

impl<TR, CR, DR> ProfileFactory<TR, CR, DR>
where
    TR: TechnicianRepository,
    CR: CompanyRepository,
    DR: DeveloperRepository,
{
    /// Create the profile for `user`, or return the existing one when it is
    /// already attached. Safe to call repeatedly, including concurrently.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn create(
        &self,
        user: &User,
        data: &ProfileData,
    ) -> Result<Option<Profile>, CrewdeskError> {
        let Some(profile) = Self::build(user, data) else {
            return Ok(None);
        };
        let persisted = match profile {
            Profile::Technician(p) => {
                Profile::Technician(self.technicians.insert_or_fetch(p).await?)
            }
            Profile::Maintenance(p) => {
                Profile::Maintenance(self.companies.insert_or_fetch(p).await?)
            }
            Profile::Developer(p) => Profile::Developer(self.developers.insert_or_fetch(p).await?),
        };
        Ok(Some(persisted))
    }

    /// Fetch the profile attached to `user`, if any.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn get(&self, user: &User) -> Result<Option<Profile>, CrewdeskError> {
        let profile = match user.role {
            Role::Technician => self
                .technicians
                .get_by_user(user.id)
                .await?
                .map(Profile::Technician),
            Role::Maintenance => self
                .companies
                .get_by_user(user.id)
                .await?
                .map(Profile::Maintenance),
            Role::Developer => self
                .developers
                .get_by_user(user.id)
                .await?
                .map(Profile::Developer),
            Role::Admin => None,
        };
        Ok(profile)
    }

    /// Apply the role-matching section of `data` to the user's existing
    /// profile. A missing profile or a payload without a matching section is
    /// a no-op.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn apply_update(
        &self,
        user: &User,
        data: &ProfileData,
    ) -> Result<Option<Profile>, CrewdeskError> {
        match user.role {
            Role::Technician => {
                let (Some(section), Some(mut profile)) =
                    (&data.technician, self.technicians.get_by_user(user.id).await?)
                else {
                    return Ok(None);
                };
                if let Some(specialization) = &section.specialization {
                    profile.specialization.clone_from(specialization);
                }
                Ok(Some(Profile::Technician(
                    self.technicians.update(profile).await?,
                )))
            }
            Role::Maintenance => {
                let (Some(section), Some(mut profile)) =
                    (&data.maintenance, self.companies.get_by_user(user.id).await?)
                else {
                    return Ok(None);
                };
                if let Some(company_name) = &section.company_name {
                    profile.company_name.clone_from(company_name);
                }
                if let Some(registration_number) = &section.registration_number {
                    profile.registration_number.clone_from(registration_number);
                }
                Ok(Some(Profile::Maintenance(
                    self.companies.update(profile).await?,
                )))
            }
            Role::Developer => {
                let (Some(section), Some(mut profile)) =
                    (&data.developer, self.developers.get_by_user(user.id).await?)
                else {
                    return Ok(None);
                };
                if section.developer_name.is_some() {
                    profile.developer_name.clone_from(&section.developer_name);
                }
                if section.address.is_some() {
                    profile.address.clone_from(&section.address);
                }
                if section.company_name.is_some() {
                    profile.company_name.clone_from(&section.company_name);
                }
                Ok(Some(Profile::Developer(
                    self.developers.update(profile).await?,
                )))
            }
            Role::Admin => Ok(None),
        }
    }
}
