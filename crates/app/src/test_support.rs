//! In-memory port doubles shared by the service tests.
//!
//! All repositories hand out handles to one shared store so a test can wire
//! several services over the same data, the way adapters share one pool.
//! Unique constraints (email, phone, one-profile-per-user) are enforced the
//! same way the real store does, so conflict paths are exercisable.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crewdesk_domain::error::{ConflictError, CrewdeskError};
use crewdesk_domain::id::{CompanyId, DeveloperId, TechnicianId, UserId};
use crewdesk_domain::profile::{
    DeveloperProfile, MaintenanceCompanyProfile, Profile, TechnicianProfile,
};
use crewdesk_domain::user::User;

use crate::ports::{
    CompanyRepository, DeveloperRepository, PasswordHasher, TechnicianRepository, TokenClaims,
    TokenPair, TokenService, UserRepository,
};

#[derive(Default)]
struct State {
    users: HashMap<UserId, User>,
    technicians: HashMap<TechnicianId, TechnicianProfile>,
    companies: HashMap<CompanyId, MaintenanceCompanyProfile>,
    developers: HashMap<DeveloperId, DeveloperProfile>,
}

impl State {
    fn insert_user(&mut self, user: &User) -> Result<(), CrewdeskError> {
        if self.users.values().any(|u| u.email == user.email) {
            return Err(ConflictError { field: "email" }.into());
        }
        if self
            .users
            .values()
            .any(|u| u.phone_number == user.phone_number)
        {
            return Err(ConflictError {
                field: "phone_number",
            }
            .into());
        }
        self.users.insert(user.id, user.clone());
        Ok(())
    }

    fn insert_profile(&mut self, profile: Profile) {
        match profile {
            Profile::Technician(p) => {
                if !self.technicians.values().any(|t| t.user_id == p.user_id) {
                    self.technicians.insert(p.id, p);
                }
            }
            Profile::Maintenance(p) => {
                if !self.companies.values().any(|c| c.user_id == p.user_id) {
                    self.companies.insert(p.id, p);
                }
            }
            Profile::Developer(p) => {
                if !self.developers.values().any(|d| d.user_id == p.user_id) {
                    self.developers.insert(p.id, p);
                }
            }
        }
    }
}

/// Shared backing store for the in-memory repositories.
#[derive(Clone, Default)]
pub(crate) struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub(crate) fn user_repo(&self) -> InMemoryUserRepo {
        InMemoryUserRepo {
            store: self.clone(),
        }
    }

    pub(crate) fn technician_repo(&self) -> InMemoryTechnicianRepo {
        InMemoryTechnicianRepo {
            store: self.clone(),
        }
    }

    pub(crate) fn company_repo(&self) -> InMemoryCompanyRepo {
        InMemoryCompanyRepo {
            store: self.clone(),
        }
    }

    pub(crate) fn developer_repo(&self) -> InMemoryDeveloperRepo {
        InMemoryDeveloperRepo {
            store: self.clone(),
        }
    }

    pub(crate) fn technician_count(&self) -> usize {
        self.lock().technicians.len()
    }

    pub(crate) fn user_count(&self) -> usize {
        self.lock().users.len()
    }
}

pub(crate) struct InMemoryUserRepo {
    store: InMemoryStore,
}

impl UserRepository for InMemoryUserRepo {
    async fn insert(&self, user: User) -> Result<User, CrewdeskError> {
        self.store.lock().insert_user(&user)?;
        Ok(user)
    }

    async fn insert_with_profile(
        &self,
        user: User,
        profile: Option<Profile>,
    ) -> Result<User, CrewdeskError> {
        let mut state = self.store.lock();
        state.insert_user(&user)?;
        if let Some(profile) = profile {
            state.insert_profile(profile);
        }
        Ok(user)
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, CrewdeskError> {
        Ok(self.store.lock().users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, CrewdeskError> {
        Ok(self
            .store
            .lock()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn get_by_phone(&self, phone: &str) -> Result<Option<User>, CrewdeskError> {
        Ok(self
            .store
            .lock()
            .users
            .values()
            .find(|u| u.phone_number == phone)
            .cloned())
    }

    async fn get_all(&self) -> Result<Vec<User>, CrewdeskError> {
        Ok(self.store.lock().users.values().cloned().collect())
    }

    async fn update(&self, user: User) -> Result<User, CrewdeskError> {
        self.store.lock().users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: UserId) -> Result<(), CrewdeskError> {
        let mut state = self.store.lock();
        state.users.remove(&id);
        // Cascade, as the real store's FK rules do.
        state.technicians.retain(|_, t| t.user_id != id);
        state.companies.retain(|_, c| c.user_id != id);
        state.developers.retain(|_, d| d.user_id != id);
        Ok(())
    }
}

pub(crate) struct InMemoryTechnicianRepo {
    store: InMemoryStore,
}

impl TechnicianRepository for InMemoryTechnicianRepo {
    async fn insert_or_fetch(
        &self,
        profile: TechnicianProfile,
    ) -> Result<TechnicianProfile, CrewdeskError> {
        let mut state = self.store.lock();
        if let Some(existing) = state
            .technicians
            .values()
            .find(|t| t.user_id == profile.user_id)
        {
            return Ok(existing.clone());
        }
        state.technicians.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn get_by_id(&self, id: TechnicianId) -> Result<Option<TechnicianProfile>, CrewdeskError> {
        Ok(self.store.lock().technicians.get(&id).cloned())
    }

    async fn get_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<TechnicianProfile>, CrewdeskError> {
        Ok(self
            .store
            .lock()
            .technicians
            .values()
            .find(|t| t.user_id == user_id)
            .cloned())
    }

    async fn list_by_company(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<TechnicianProfile>, CrewdeskError> {
        Ok(self
            .store
            .lock()
            .technicians
            .values()
            .filter(|t| t.company_id == Some(company_id))
            .cloned()
            .collect())
    }

    async fn get_all(&self) -> Result<Vec<TechnicianProfile>, CrewdeskError> {
        Ok(self.store.lock().technicians.values().cloned().collect())
    }

    async fn update(&self, profile: TechnicianProfile) -> Result<TechnicianProfile, CrewdeskError> {
        self.store
            .lock()
            .technicians
            .insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn delete(&self, id: TechnicianId) -> Result<(), CrewdeskError> {
        self.store.lock().technicians.remove(&id);
        Ok(())
    }
}

pub(crate) struct InMemoryCompanyRepo {
    store: InMemoryStore,
}

impl CompanyRepository for InMemoryCompanyRepo {
    async fn insert_or_fetch(
        &self,
        profile: MaintenanceCompanyProfile,
    ) -> Result<MaintenanceCompanyProfile, CrewdeskError> {
        let mut state = self.store.lock();
        if let Some(existing) = state
            .companies
            .values()
            .find(|c| c.user_id == profile.user_id)
        {
            return Ok(existing.clone());
        }
        state.companies.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn get_by_id(
        &self,
        id: CompanyId,
    ) -> Result<Option<MaintenanceCompanyProfile>, CrewdeskError> {
        Ok(self.store.lock().companies.get(&id).cloned())
    }

    async fn get_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<MaintenanceCompanyProfile>, CrewdeskError> {
        Ok(self
            .store
            .lock()
            .companies
            .values()
            .find(|c| c.user_id == user_id)
            .cloned())
    }

    async fn get_by_admin(
        &self,
        admin_user_id: UserId,
    ) -> Result<Option<MaintenanceCompanyProfile>, CrewdeskError> {
        Ok(self
            .store
            .lock()
            .companies
            .values()
            .find(|c| c.admin_user_id == Some(admin_user_id))
            .cloned())
    }

    async fn get_all(&self) -> Result<Vec<MaintenanceCompanyProfile>, CrewdeskError> {
        Ok(self.store.lock().companies.values().cloned().collect())
    }

    async fn update(
        &self,
        profile: MaintenanceCompanyProfile,
    ) -> Result<MaintenanceCompanyProfile, CrewdeskError> {
        self.store
            .lock()
            .companies
            .insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn delete(&self, id: CompanyId) -> Result<(), CrewdeskError> {
        let mut state = self.store.lock();
        state.companies.remove(&id);
        // Set-null on members, as the FK rule does.
        for technician in state.technicians.values_mut() {
            if technician.company_id == Some(id) {
                technician.company_id = None;
            }
        }
        Ok(())
    }
}

pub(crate) struct InMemoryDeveloperRepo {
    store: InMemoryStore,
}

impl DeveloperRepository for InMemoryDeveloperRepo {
    async fn insert_or_fetch(
        &self,
        profile: DeveloperProfile,
    ) -> Result<DeveloperProfile, CrewdeskError> {
        let mut state = self.store.lock();
        if let Some(existing) = state
            .developers
            .values()
            .find(|d| d.user_id == profile.user_id)
        {
            return Ok(existing.clone());
        }
        state.developers.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn get_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<DeveloperProfile>, CrewdeskError> {
        Ok(self
            .store
            .lock()
            .developers
            .values()
            .find(|d| d.user_id == user_id)
            .cloned())
    }

    async fn update(&self, profile: DeveloperProfile) -> Result<DeveloperProfile, CrewdeskError> {
        self.store
            .lock()
            .developers
            .insert(profile.id, profile.clone());
        Ok(profile)
    }
}

/// Reversible stand-in hasher so tests can assert on stored digests.
pub(crate) struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, CrewdeskError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, digest: &str) -> bool {
        digest == format!("plain:{password}")
    }
}

/// Token double: tokens are `"access:<uuid>"` / `"refresh:<uuid>"` strings.
pub(crate) struct StubTokenService;

impl TokenService for StubTokenService {
    fn issue(&self, user: &User) -> Result<TokenPair, CrewdeskError> {
        Ok(TokenPair {
            access: format!("access:{}:{}", user.id, user.role),
            refresh: format!("refresh:{}:{}", user.id, user.role),
        })
    }

    fn verify_access(&self, token: &str) -> Result<TokenClaims, CrewdeskError> {
        let mut parts = token.splitn(3, ':');
        let (Some("access"), Some(id), Some(role)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(crewdesk_domain::error::AuthenticationError::Invalid.into());
        };
        Ok(TokenClaims {
            user_id: id
                .parse()
                .map_err(|_| crewdesk_domain::error::AuthenticationError::Invalid)?,
            role: role
                .parse()
                .map_err(|_| crewdesk_domain::error::AuthenticationError::Invalid)?,
        })
    }

    fn refresh(&self, refresh_token: &str) -> Result<String, CrewdeskError> {
        let rest = refresh_token
            .strip_prefix("refresh:")
            .ok_or(crewdesk_domain::error::AuthenticationError::Invalid)?;
        Ok(format!("access:{rest}"))
    }

    fn revoke(&self, refresh_token: &str) -> Result<(), CrewdeskError> {
        refresh_token
            .strip_prefix("refresh:")
            .map(|_| ())
            .ok_or_else(|| crewdesk_domain::error::AuthenticationError::Invalid.into())
    }
}
