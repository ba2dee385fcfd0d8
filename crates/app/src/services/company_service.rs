//! Company service — maintenance company CRUD and the company↔technician
//! directory with its delegated-admin rules.

use crewdesk_domain::caller::{Caller, CallerUser};
use crewdesk_domain::error::{CrewdeskError, NotFoundError, ValidationError};
use crewdesk_domain::id::{CompanyId, UserId};
use crewdesk_domain::profile::{MaintenanceCompanyProfile, TechnicianProfile};
use crewdesk_domain::role::Role;
use crewdesk_domain::user::{User, normalize_email};

use crate::authorize::{Action, ResourceKind, ensure_collection, require_authenticated};
use crate::ports::{CompanyRepository, PasswordHasher, TechnicianRepository, UserRepository};
use crate::services::technician_service::{NewTechnician, insert_technician_user};

/// Payload for creating a company profile for a maintenance user.
#[derive(Debug, Clone)]
pub struct CreateCompany {
    /// The maintenance user this company profile belongs to.
    pub user_id: UserId,
    pub company_name: String,
    pub registration_number: Option<String>,
    /// Defaults to the owning user when absent.
    pub admin_user_id: Option<UserId>,
}

/// Partial company update.
#[derive(Debug, Clone, Default)]
pub struct UpdateCompany {
    pub company_name: Option<String>,
    pub registration_number: Option<String>,
    pub admin_user_id: Option<UserId>,
}

/// Locates a technician user by id or email.
#[derive(Debug, Clone, Default)]
pub struct TechnicianLocator {
    pub user_id: Option<UserId>,
    pub email: Option<String>,
}

impl TechnicianLocator {
    fn describe(&self) -> String {
        self.user_id
            .map(|id| id.to_string())
            .or_else(|| self.email.clone())
            .unwrap_or_default()
    }
}

/// Application service for companies and their technician rosters.
pub struct CompanyService<UR, TR, CR, PH> {
    users: UR,
    technicians: TR,
    companies: CR,
    hasher: PH,
}

impl<UR, TR, CR, PH> CompanyService<UR, TR, CR, PH>
where
    UR: UserRepository,
    TR: TechnicianRepository,
    CR: CompanyRepository,
    PH: PasswordHasher,
{
    /// Create a new service backed by the given ports.
    pub fn new(users: UR, technicians: TR, companies: CR, hasher: PH) -> Self {
        Self {
            users,
            technicians,
            companies,
            hasher,
        }
    }

    /// Resolve a company within the caller's visible scope: staff and
    /// superusers see any company, everyone else only the one they
    /// administer. Out-of-scope companies are reported as absent.
    async fn scoped_company(
        &self,
        me: &CallerUser,
        id: CompanyId,
    ) -> Result<MaintenanceCompanyProfile, CrewdeskError> {
        let not_found = || NotFoundError {
            entity: "MaintenanceCompany",
            id: id.to_string(),
        };
        let company = self.companies.get_by_id(id).await?.ok_or_else(not_found)?;
        if me.is_elevated() || company.is_administered_by(me.id) {
            Ok(company)
        } else {
            Err(not_found().into())
        }
    }

    /// Create a company profile. Staff/superusers only.
    ///
    /// Idempotent per owning user: re-creating for a user who already has a
    /// company profile returns the existing one.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::Forbidden`] for non-elevated callers,
    /// [`CrewdeskError::NotFound`] for an unknown owner, or
    /// [`CrewdeskError::Validation`] when the owner is not a maintenance
    /// account.
    pub async fn create_company(
        &self,
        caller: &Caller,
        payload: CreateCompany,
    ) -> Result<MaintenanceCompanyProfile, CrewdeskError> {
        ensure_collection(
            caller,
            Action::Create,
            ResourceKind::Company,
            false,
            "create maintenance companies",
        )?;
        let owner = self
            .users
            .get_by_id(payload.user_id)
            .await?
            .ok_or(NotFoundError {
                entity: "User",
                id: payload.user_id.to_string(),
            })?;
        if owner.role != Role::Maintenance {
            return Err(ValidationError::NotAMaintenanceAccount.into());
        }
        let mut company = MaintenanceCompanyProfile::new(owner.id, payload.company_name);
        if let Some(registration_number) = payload.registration_number {
            company.registration_number = registration_number;
        }
        if let Some(admin_id) = payload.admin_user_id {
            self.users.get_by_id(admin_id).await?.ok_or(NotFoundError {
                entity: "User",
                id: admin_id.to_string(),
            })?;
            company.admin_user_id = Some(admin_id);
        }
        let company = self.companies.insert_or_fetch(company).await?;
        tracing::info!(company_id = %company.id, "maintenance company created");
        Ok(company)
    }

    /// Fetch one company in scope.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::NotFound`] when absent or out of scope.
    pub async fn get_company(
        &self,
        caller: &Caller,
        id: CompanyId,
    ) -> Result<MaintenanceCompanyProfile, CrewdeskError> {
        let me = require_authenticated(caller)?;
        self.scoped_company(me, id).await
    }

    /// List companies: all for staff/superusers, the administered one for a
    /// maintenance admin.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::Forbidden`] for callers who are neither
    /// elevated nor administering a company.
    pub async fn list_companies(
        &self,
        caller: &Caller,
    ) -> Result<Vec<MaintenanceCompanyProfile>, CrewdeskError> {
        let me = require_authenticated(caller)?;
        let own = self.companies.get_by_admin(me.id).await?;
        ensure_collection(
            caller,
            Action::List,
            ResourceKind::Company,
            own.is_some(),
            "list maintenance companies",
        )?;
        if me.is_elevated() {
            self.companies.get_all().await
        } else {
            Ok(own.into_iter().collect())
        }
    }

    /// Apply a partial update to a company in scope.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::NotFound`] when absent or out of scope.
    pub async fn update_company(
        &self,
        caller: &Caller,
        id: CompanyId,
        payload: UpdateCompany,
    ) -> Result<MaintenanceCompanyProfile, CrewdeskError> {
        let me = require_authenticated(caller)?;
        let mut company = self.scoped_company(me, id).await?;
        if let Some(company_name) = payload.company_name {
            company.company_name = company_name;
        }
        if let Some(registration_number) = payload.registration_number {
            company.registration_number = registration_number;
        }
        if let Some(admin_id) = payload.admin_user_id {
            self.users.get_by_id(admin_id).await?.ok_or(NotFoundError {
                entity: "User",
                id: admin_id.to_string(),
            })?;
            company.admin_user_id = Some(admin_id);
        }
        self.companies.update(company).await
    }

    /// Delete a company in scope. Member technicians persist, unaffiliated.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::NotFound`] when absent or out of scope.
    pub async fn delete_company(&self, caller: &Caller, id: CompanyId) -> Result<(), CrewdeskError> {
        let me = require_authenticated(caller)?;
        let company = self.scoped_company(me, id).await?;
        self.companies.delete(company.id).await?;
        tracing::info!(company_id = %id, "maintenance company deleted");
        Ok(())
    }

    /// Resolve a company by its admin's email. Authenticated callers only.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::NotFound`] when no maintenance account with
    /// that email administers a company.
    pub async fn find_by_admin_email(
        &self,
        caller: &Caller,
        email: &str,
    ) -> Result<MaintenanceCompanyProfile, CrewdeskError> {
        require_authenticated(caller)?;
        let email = normalize_email(email);
        let not_found = || NotFoundError {
            entity: "MaintenanceCompany",
            id: email.clone(),
        };
        let user = self
            .users
            .get_by_email(&email)
            .await?
            .filter(|u| u.role == Role::Maintenance)
            .ok_or_else(not_found)?;
        self.companies
            .get_by_admin(user.id)
            .await?
            .ok_or_else(|| not_found().into())
    }

    /// List the technicians of a company in scope.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::NotFound`] when the company is absent or
    /// out of scope.
    pub async fn list_technicians(
        &self,
        caller: &Caller,
        company_id: CompanyId,
    ) -> Result<Vec<TechnicianProfile>, CrewdeskError> {
        let me = require_authenticated(caller)?;
        let company = self.scoped_company(me, company_id).await?;
        self.technicians.list_by_company(company.id).await
    }

    async fn resolve_technician_user(
        &self,
        locator: &TechnicianLocator,
    ) -> Result<User, CrewdeskError> {
        let user = match (locator.user_id, &locator.email) {
            (Some(id), _) => self.users.get_by_id(id).await?,
            (None, Some(email)) => self.users.get_by_email(&normalize_email(email)).await?,
            (None, None) => return Err(ValidationError::MissingTechnicianLocator.into()),
        };
        user.filter(|u| u.role == Role::Technician)
            .ok_or_else(|| {
                NotFoundError {
                    entity: "Technician",
                    id: locator.describe(),
                }
                .into()
            })
    }

    /// Attach an existing technician user to a company in scope. The
    /// technician profile is created on the fly when missing (idempotent
    /// get-or-create); an existing affiliation is reassigned.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::NotFound`] for an out-of-scope company or a
    /// locator that does not resolve to a technician user, and
    /// [`CrewdeskError::Validation`] for an empty locator.
    pub async fn add_technician(
        &self,
        caller: &Caller,
        company_id: CompanyId,
        locator: TechnicianLocator,
    ) -> Result<TechnicianProfile, CrewdeskError> {
        let me = require_authenticated(caller)?;
        let company = self.scoped_company(me, company_id).await?;
        let user = self.resolve_technician_user(&locator).await?;
        let mut profile = self
            .technicians
            .insert_or_fetch(TechnicianProfile::new(user.id))
            .await?;
        profile.company_id = Some(company.id);
        let profile = self.technicians.update(profile).await?;
        tracing::info!(
            company_id = %company.id,
            technician_id = %profile.id,
            "technician added to company"
        );
        Ok(profile)
    }

    /// Detach a technician from a company in scope. Fails when the
    /// technician is not currently a member of *this* company.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::NotFound`] for an out-of-scope company, an
    /// unresolvable locator, or a technician outside this company.
    pub async fn remove_technician(
        &self,
        caller: &Caller,
        company_id: CompanyId,
        locator: TechnicianLocator,
    ) -> Result<(), CrewdeskError> {
        let me = require_authenticated(caller)?;
        let company = self.scoped_company(me, company_id).await?;
        let user = self.resolve_technician_user(&locator).await?;
        let mut profile = self
            .technicians
            .get_by_user(user.id)
            .await?
            .filter(|t| t.company_id == Some(company.id))
            .ok_or(NotFoundError {
                entity: "Technician",
                id: locator.describe(),
            })?;
        profile.company_id = None;
        self.technicians.update(profile).await?;
        tracing::info!(company_id = %company.id, user_id = %user.id, "technician removed");
        Ok(())
    }

    /// Create a brand-new technician user directly into a company in scope.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::NotFound`] for an out-of-scope company or
    /// [`CrewdeskError::Validation`] for malformed/duplicate user fields.
    pub async fn create_technician(
        &self,
        caller: &Caller,
        company_id: CompanyId,
        input: NewTechnician,
    ) -> Result<TechnicianProfile, CrewdeskError> {
        let me = require_authenticated(caller)?;
        let company = self.scoped_company(me, company_id).await?;
        insert_technician_user(&self.users, &self.hasher, input, Some(company.id)).await
    }
}
