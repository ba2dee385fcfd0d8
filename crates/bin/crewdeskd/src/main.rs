//! # crewdeskd — crewdesk daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env vars)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository and credential adapters
//! - Construct application services, injecting adapters via port traits
//! - Optionally bootstrap a first superuser from the environment
//! - Build the axum router, bind, and serve
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use tracing_subscriber::EnvFilter;

use crewdesk_adapter_auth::{Argon2PasswordHasher, AuthConfig, JwtTokenService};
use crewdesk_adapter_http_axum::router;
use crewdesk_adapter_http_axum::state::AppState;
use crewdesk_adapter_storage_sqlite_sqlx::{
    Config as DbConfig, SqliteCompanyRepository, SqliteDeveloperRepository,
    SqliteTechnicianRepository, SqliteUserRepository,
};
use crewdesk_app::ports::{
    CompanyRepository, DeveloperRepository, PasswordHasher, TechnicianRepository, UserRepository,
};
use crewdesk_app::profile_factory::ProfileFactory;
use crewdesk_app::services::account_service::{AccountService, CreateSuperuser};
use crewdesk_app::services::auth_service::AuthService;
use crewdesk_app::services::company_service::CompanyService;
use crewdesk_app::services::technician_service::TechnicianService;
use crewdesk_domain::error::{CrewdeskError, ValidationError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = DbConfig {
        database_url: config.database.url.clone(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Credential adapters
    let hasher = Argon2PasswordHasher;
    let tokens = JwtTokenService::new(AuthConfig {
        secret: config.auth.jwt_secret.clone(),
        issuer: config.auth.issuer.clone(),
        access_ttl_secs: config.auth.access_ttl_secs,
        refresh_ttl_secs: config.auth.refresh_ttl_secs,
    })?;

    // Services, each over its own repository handles (the pool is shared)
    let accounts = AccountService::new(
        SqliteUserRepository::new(pool.clone()),
        ProfileFactory::new(
            SqliteTechnicianRepository::new(pool.clone()),
            SqliteCompanyRepository::new(pool.clone()),
            SqliteDeveloperRepository::new(pool.clone()),
        ),
        hasher,
    );
    let auth = AuthService::new(SqliteUserRepository::new(pool.clone()), hasher, tokens);
    let companies = CompanyService::new(
        SqliteUserRepository::new(pool.clone()),
        SqliteTechnicianRepository::new(pool.clone()),
        SqliteCompanyRepository::new(pool.clone()),
        hasher,
    );
    let technicians = TechnicianService::new(
        SqliteUserRepository::new(pool.clone()),
        SqliteTechnicianRepository::new(pool.clone()),
        SqliteCompanyRepository::new(pool),
        hasher,
    );

    bootstrap_superuser(&accounts).await;

    // HTTP
    let state = AppState::new(accounts, auth, companies, technicians);
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    tracing::info!(%bind_addr, "crewdeskd listening");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the first superuser from `CREWDESK_ADMIN_EMAIL`, `_PHONE`, and
/// `_PASSWORD` when all three are set. An already-existing account is fine;
/// anything else is logged and startup continues.
async fn bootstrap_superuser<UR, TR, CR, DR, PH>(accounts: &AccountService<UR, TR, CR, DR, PH>)
where
    UR: UserRepository,
    TR: TechnicianRepository,
    CR: CompanyRepository,
    DR: DeveloperRepository,
    PH: PasswordHasher,
{
    let (Ok(email), Ok(phone_number), Ok(password)) = (
        std::env::var("CREWDESK_ADMIN_EMAIL"),
        std::env::var("CREWDESK_ADMIN_PHONE"),
        std::env::var("CREWDESK_ADMIN_PASSWORD"),
    ) else {
        return;
    };

    match accounts
        .create_superuser(CreateSuperuser {
            email,
            phone_number,
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
            password,
            is_staff: None,
            is_superuser: None,
        })
        .await
    {
        Ok(user) => tracing::info!(user_id = %user.id, "bootstrap superuser created"),
        Err(CrewdeskError::Validation(
            ValidationError::DuplicateEmail | ValidationError::DuplicatePhoneNumber,
        )) => tracing::debug!("bootstrap superuser already present"),
        Err(err) => tracing::error!(error = %err, "bootstrap superuser failed"),
    }
}
