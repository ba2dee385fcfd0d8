//! Technician service — scoped access to technician profiles.

use crewdesk_domain::caller::{Caller, CallerUser};
use crewdesk_domain::error::{CrewdeskError, NotFoundError, ValidationError};
use crewdesk_domain::id::{CompanyId, TechnicianId};
use crewdesk_domain::profile::{Profile, TechnicianProfile};
use crewdesk_domain::role::Role;
use crewdesk_domain::user::User;

use crate::authorize::{
    Action, ResourceKind, TargetRef, authorize_object, ensure_collection, require_authenticated,
};
use crate::ports::{CompanyRepository, PasswordHasher, TechnicianRepository, UserRepository};

/// Payload for creating a technician user and profile in one step.
#[derive(Debug, Clone)]
pub struct NewTechnician {
    pub email: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub specialization: Option<String>,
}

/// Partial technician profile update.
#[derive(Debug, Clone, Default)]
pub struct TechnicianUpdate {
    pub specialization: Option<String>,
}

/// Create a technician account with its profile pre-attached, all in one
/// atomic unit. Email and phone uniqueness are pre-checked explicitly so
/// duplicates surface as field-level validation errors rather than a bare
/// store conflict.
///
/// Shared by the directory's `create_technician` and the technician
/// service's `create_with_user`.
///
/// # Errors
///
/// Returns [`CrewdeskError::Validation`] for malformed or duplicate input.
pub(crate) async fn insert_technician_user<UR, PH>(
    users: &UR,
    hasher: &PH,
    input: NewTechnician,
    company_id: Option<CompanyId>,
) -> Result<TechnicianProfile, CrewdeskError>
where
    UR: UserRepository,
    PH: PasswordHasher,
{
    if input.password.is_empty() {
        return Err(ValidationError::EmptyPassword.into());
    }
    let password_hash = hasher.hash(&input.password)?;
    let user = User::builder()
        .email(&input.email)
        .phone_number(input.phone_number)
        .first_name(input.first_name)
        .last_name(input.last_name)
        .role(Role::Technician)
        .password_hash(password_hash)
        .build()?;
    if users.get_by_email(&user.email).await?.is_some() {
        return Err(ValidationError::DuplicateEmail.into());
    }
    if users.get_by_phone(&user.phone_number).await?.is_some() {
        return Err(ValidationError::DuplicatePhoneNumber.into());
    }

    let mut profile = TechnicianProfile::new(user.id);
    if let Some(specialization) = input.specialization {
        profile.specialization = specialization;
    }
    profile.company_id = company_id;

    users
        .insert_with_profile(user, Some(Profile::Technician(profile.clone())))
        .await?;
    tracing::info!(technician_id = %profile.id, "technician created");
    Ok(profile)
}

/// Application service for technician profiles outside the company
/// directory: visibility-scoped listing, retrieval, updates, and deletion.
pub struct TechnicianService<UR, TR, CR, PH> {
    users: UR,
    technicians: TR,
    companies: CR,
    hasher: PH,
}

impl<UR, TR, CR, PH> TechnicianService<UR, TR, CR, PH>
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

    /// The technicians visible to `caller`: all of them for
    /// staff/superusers, the company's for its admin, the own profile for a
    /// technician, none otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::Authentication`] for anonymous callers.
    pub async fn list_visible(
        &self,
        caller: &Caller,
    ) -> Result<Vec<TechnicianProfile>, CrewdeskError> {
        let me = require_authenticated(caller)?;
        if me.is_elevated() {
            return self.technicians.get_all().await;
        }
        match me.role {
            Role::Maintenance => match self.companies.get_by_admin(me.id).await? {
                Some(company) => self.technicians.list_by_company(company.id).await,
                None => Ok(Vec::new()),
            },
            Role::Technician => Ok(self
                .technicians
                .get_by_user(me.id)
                .await?
                .into_iter()
                .collect()),
            _ => Ok(Vec::new()),
        }
    }

    /// Resolve a technician within the caller's visible scope. Out-of-scope
    /// profiles are reported as absent.
    async fn scoped_get(
        &self,
        me: &CallerUser,
        id: TechnicianId,
    ) -> Result<TechnicianProfile, CrewdeskError> {
        let not_found = || NotFoundError {
            entity: "Technician",
            id: id.to_string(),
        };
        let profile = self.technicians.get_by_id(id).await?.ok_or_else(not_found)?;
        let company_admin_id = match profile.company_id {
            Some(company_id) => self
                .companies
                .get_by_id(company_id)
                .await?
                .and_then(|c| c.admin_user_id),
            None => None,
        };
        let target = TargetRef::Technician {
            user_id: profile.user_id,
            company_admin_id,
        };
        if authorize_object(me, &target).is_allowed() {
            Ok(profile)
        } else {
            Err(not_found().into())
        }
    }

    /// Fetch one technician in scope.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::NotFound`] when the profile is absent or
    /// outside the caller's scope.
    pub async fn get(
        &self,
        caller: &Caller,
        id: TechnicianId,
    ) -> Result<TechnicianProfile, CrewdeskError> {
        let me = require_authenticated(caller)?;
        self.scoped_get(me, id).await
    }

    /// Update a technician in scope (owner, company admin, or
    /// staff/superuser).
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::NotFound`] outside the caller's scope.
    pub async fn update(
        &self,
        caller: &Caller,
        id: TechnicianId,
        payload: TechnicianUpdate,
    ) -> Result<TechnicianProfile, CrewdeskError> {
        let me = require_authenticated(caller)?;
        let mut profile = self.scoped_get(me, id).await?;
        if let Some(specialization) = payload.specialization {
            profile.specialization = specialization;
        }
        self.technicians.update(profile).await
    }

    /// Delete a technician profile in scope. The owning user account is
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::NotFound`] outside the caller's scope.
    pub async fn delete(&self, caller: &Caller, id: TechnicianId) -> Result<(), CrewdeskError> {
        let me = require_authenticated(caller)?;
        let profile = self.scoped_get(me, id).await?;
        self.technicians.delete(profile.id).await
    }

    /// Create a technician user and profile. A maintenance admin creates
    /// into their own company; staff/superusers create unaffiliated.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::Forbidden`] for other roles,
    /// [`CrewdeskError::Validation`] when a maintenance caller has no
    /// company profile or the input is malformed/duplicate.
    pub async fn create_with_user(
        &self,
        caller: &Caller,
        input: NewTechnician,
    ) -> Result<TechnicianProfile, CrewdeskError> {
        let me = ensure_collection(
            caller,
            Action::Create,
            ResourceKind::Technician,
            false,
            "create technicians",
        )?;
        let company_id = if me.role == Role::Maintenance {
            let company = self
                .companies
                .get_by_admin(me.id)
                .await?
                .ok_or(ValidationError::MissingCompanyProfile)?;
            Some(company.id)
        } else {
            None
        };
        insert_technician_user(&self.users, &self.hasher, input, company_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewdesk_domain::caller::CallerUser;
    use crewdesk_domain::profile::MaintenanceCompanyProfile;

    use crate::test_support::{InMemoryStore, PlainHasher};

    type Service = TechnicianService<
        crate::test_support::InMemoryUserRepo,
        crate::test_support::InMemoryTechnicianRepo,
        crate::test_support::InMemoryCompanyRepo,
        PlainHasher,
    >;

    fn service(store: &InMemoryStore) -> Service {
        TechnicianService::new(
            store.user_repo(),
            store.technician_repo(),
            store.company_repo(),
            PlainHasher,
        )
    }

    async fn seed_user(store: &InMemoryStore, email: &str, phone: &str, role: Role) -> User {
        let user = User::builder()
            .email(email)
            .phone_number(phone)
            .first_name("Seed")
            .last_name("User")
            .role(role)
            .password_hash("plain:pw")
            .build()
            .unwrap();
        store.user_repo().insert(user.clone()).await.unwrap()
    }

    fn caller_for(user: &User) -> Caller {
        Caller::User(CallerUser::from_user(user))
    }

    async fn seed_company(store: &InMemoryStore, admin: &User) -> MaintenanceCompanyProfile {
        store
            .company_repo()
            .insert_or_fetch(MaintenanceCompanyProfile::new(admin.id, "Lift Co"))
            .await
            .unwrap()
    }

    async fn seed_technician(
        store: &InMemoryStore,
        user: &User,
        company: Option<CompanyId>,
    ) -> TechnicianProfile {
        let mut profile = TechnicianProfile::new(user.id);
        profile.company_id = company;
        store
            .technician_repo()
            .insert_or_fetch(profile)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn should_hide_unrelated_technician_from_another_technician() {
        let store = InMemoryStore::default();
        let svc = service(&store);
        let a = seed_user(&store, "a@example.com", "+254700000300", Role::Technician).await;
        let b = seed_user(&store, "b@example.com", "+254700000301", Role::Technician).await;
        seed_technician(&store, &a, None).await;
        let b_profile = seed_technician(&store, &b, None).await;

        let result = svc.get(&caller_for(&a), b_profile.id).await;
        assert!(matches!(result, Err(CrewdeskError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_let_owner_and_company_admin_see_technician() {
        let store = InMemoryStore::default();
        let svc = service(&store);
        let admin = seed_user(&store, "adm@example.com", "+254700000302", Role::Maintenance).await;
        let company = seed_company(&store, &admin).await;
        let tech_user =
            seed_user(&store, "t@example.com", "+254700000303", Role::Technician).await;
        let profile = seed_technician(&store, &tech_user, Some(company.id)).await;

        let seen_by_owner = svc.get(&caller_for(&tech_user), profile.id).await.unwrap();
        assert_eq!(seen_by_owner.id, profile.id);

        let seen_by_admin = svc.get(&caller_for(&admin), profile.id).await.unwrap();
        assert_eq!(seen_by_admin.id, profile.id);
    }

    #[tokio::test]
    async fn should_hide_technician_from_admin_of_other_company() {
        let store = InMemoryStore::default();
        let svc = service(&store);
        let admin1 =
            seed_user(&store, "adm1@example.com", "+254700000304", Role::Maintenance).await;
        let admin2 =
            seed_user(&store, "adm2@example.com", "+254700000305", Role::Maintenance).await;
        let company1 = seed_company(&store, &admin1).await;
        seed_company(&store, &admin2).await;
        let tech_user =
            seed_user(&store, "t2@example.com", "+254700000306", Role::Technician).await;
        let profile = seed_technician(&store, &tech_user, Some(company1.id)).await;

        let result = svc.get(&caller_for(&admin2), profile.id).await;
        assert!(matches!(result, Err(CrewdeskError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_scope_listing_by_role() {
        let store = InMemoryStore::default();
        let svc = service(&store);
        let admin = seed_user(&store, "la@example.com", "+254700000307", Role::Maintenance).await;
        let company = seed_company(&store, &admin).await;
        let t1 = seed_user(&store, "lt1@example.com", "+254700000308", Role::Technician).await;
        let t2 = seed_user(&store, "lt2@example.com", "+254700000309", Role::Technician).await;
        seed_technician(&store, &t1, Some(company.id)).await;
        seed_technician(&store, &t2, None).await;

        let for_admin = svc.list_visible(&caller_for(&admin)).await.unwrap();
        assert_eq!(for_admin.len(), 1);
        assert_eq!(for_admin[0].user_id, t1.id);

        let for_t2 = svc.list_visible(&caller_for(&t2)).await.unwrap();
        assert_eq!(for_t2.len(), 1);
        assert_eq!(for_t2[0].user_id, t2.id);

        let mut root = seed_user(&store, "root@example.com", "+254700000310", Role::Admin).await;
        root.is_superuser = true;
        let for_root = svc.list_visible(&caller_for(&root)).await.unwrap();
        assert_eq!(for_root.len(), 2);
    }

    #[tokio::test]
    async fn should_update_specialization_in_scope() {
        let store = InMemoryStore::default();
        let svc = service(&store);
        let tech_user =
            seed_user(&store, "up@example.com", "+254700000311", Role::Technician).await;
        let profile = seed_technician(&store, &tech_user, None).await;

        let updated = svc
            .update(
                &caller_for(&tech_user),
                profile.id,
                TechnicianUpdate {
                    specialization: Some("Boilers".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.specialization, "Boilers");
    }

    #[tokio::test]
    async fn should_create_with_user_into_admins_own_company() {
        let store = InMemoryStore::default();
        let svc = service(&store);
        let admin = seed_user(&store, "ca@example.com", "+254700000312", Role::Maintenance).await;
        let company = seed_company(&store, &admin).await;

        let profile = svc
            .create_with_user(
                &caller_for(&admin),
                NewTechnician {
                    email: "new-tech@example.com".into(),
                    phone_number: "+254700000313".into(),
                    first_name: "New".into(),
                    last_name: "Tech".into(),
                    password: "tech-pass".into(),
                    specialization: Some("HVAC".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(profile.company_id, Some(company.id));
        assert_eq!(store.user_count(), 2);
    }

    #[tokio::test]
    async fn should_reject_create_with_user_without_company_profile() {
        let store = InMemoryStore::default();
        let svc = service(&store);
        let admin =
            seed_user(&store, "nocomp@example.com", "+254700000314", Role::Maintenance).await;

        let result = svc
            .create_with_user(
                &caller_for(&admin),
                NewTechnician {
                    email: "x@example.com".into(),
                    phone_number: "+254700000315".into(),
                    first_name: "X".into(),
                    last_name: "Y".into(),
                    password: "pw-123456".into(),
                    specialization: None,
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(CrewdeskError::Validation(
                ValidationError::MissingCompanyProfile
            ))
        ));
    }

    #[tokio::test]
    async fn should_forbid_create_with_user_for_other_roles() {
        let store = InMemoryStore::default();
        let svc = service(&store);
        let dev = seed_user(&store, "dev@example.com", "+254700000316", Role::Developer).await;

        let result = svc
            .create_with_user(
                &caller_for(&dev),
                NewTechnician {
                    email: "z@example.com".into(),
                    phone_number: "+254700000317".into(),
                    first_name: "Z".into(),
                    last_name: "W".into(),
                    password: "pw-123456".into(),
                    specialization: None,
                },
            )
            .await;
        assert!(matches!(result, Err(CrewdeskError::Forbidden(_))));
    }

    #[tokio::test]
    async fn should_reject_duplicate_email_with_field_error() {
        let store = InMemoryStore::default();
        let svc = service(&store);
        let mut root = seed_user(&store, "root2@example.com", "+254700000318", Role::Admin).await;
        root.is_superuser = true;

        let result = svc
            .create_with_user(
                &caller_for(&root),
                NewTechnician {
                    email: "root2@example.com".into(),
                    phone_number: "+254700000319".into(),
                    first_name: "Dup".into(),
                    last_name: "Email".into(),
                    password: "pw-123456".into(),
                    specialization: None,
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(CrewdeskError::Validation(ValidationError::DuplicateEmail))
        ));
    }
}
