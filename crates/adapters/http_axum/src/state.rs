//! Shared application state for axum handlers.

use std::sync::Arc;

use crewdesk_app::ports::{
    CompanyRepository, DeveloperRepository, PasswordHasher, TechnicianRepository, TokenService,
    UserRepository,
};
use crewdesk_app::services::account_service::AccountService;
use crewdesk_app::services::auth_service::AuthService;
use crewdesk_app::services::company_service::CompanyService;
use crewdesk_app::services::technician_service::TechnicianService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository, hasher, and token service types to avoid
/// dynamic dispatch. `Clone` is implemented manually so the underlying
/// types themselves do not need to be `Clone` — only the `Arc` wrappers are
/// cloned.
pub struct AppState<UR, TR, CR, DR, PH, TS> {
    /// Account lifecycle and scoped visibility.
    pub accounts: Arc<AccountService<UR, TR, CR, DR, PH>>,
    /// Login, refresh, logout, caller resolution.
    pub auth: Arc<AuthService<UR, PH, TS>>,
    /// Company CRUD and the technician directory.
    pub companies: Arc<CompanyService<UR, TR, CR, PH>>,
    /// Scoped technician access.
    pub technicians: Arc<TechnicianService<UR, TR, CR, PH>>,
}

impl<UR, TR, CR, DR, PH, TS> Clone for AppState<UR, TR, CR, DR, PH, TS> {
    fn clone(&self) -> Self {
        Self {
            accounts: Arc::clone(&self.accounts),
            auth: Arc::clone(&self.auth),
            companies: Arc::clone(&self.companies),
            technicians: Arc::clone(&self.technicians),
        }
    }
}

impl<UR, TR, CR, DR, PH, TS> AppState<UR, TR, CR, DR, PH, TS>
where
    UR: UserRepository + Send + Sync + 'static,
    TR: TechnicianRepository + Send + Sync + 'static,
    CR: CompanyRepository + Send + Sync + 'static,
    DR: DeveloperRepository + Send + Sync + 'static,
    PH: PasswordHasher + Send + Sync + 'static,
    TS: TokenService + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        accounts: AccountService<UR, TR, CR, DR, PH>,
        auth: AuthService<UR, PH, TS>,
        companies: CompanyService<UR, TR, CR, PH>,
        technicians: TechnicianService<UR, TR, CR, PH>,
    ) -> Self {
        Self {
            accounts: Arc::new(accounts),
            auth: Arc::new(auth),
            companies: Arc::new(companies),
            technicians: Arc::new(technicians),
        }
    }
}
