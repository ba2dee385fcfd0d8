//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod accounts;
#[allow(clippy::missing_errors_doc)]
pub mod auth;
#[allow(clippy::missing_errors_doc)]
pub mod companies;
#[allow(clippy::missing_errors_doc)]
pub mod technicians;

use axum::Router;
use axum::routing::{get, post};

use crewdesk_app::ports::{
    CompanyRepository, DeveloperRepository, PasswordHasher, TechnicianRepository, TokenService,
    UserRepository,
};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<UR, TR, CR, DR, PH, TS>() -> Router<AppState<UR, TR, CR, DR, PH, TS>>
where
    UR: UserRepository + Send + Sync + 'static,
    TR: TechnicianRepository + Send + Sync + 'static,
    CR: CompanyRepository + Send + Sync + 'static,
    DR: DeveloperRepository + Send + Sync + 'static,
    PH: PasswordHasher + Send + Sync + 'static,
    TS: TokenService + Send + Sync + 'static,
{
    Router::new()
        // Accounts
        .route(
            "/accounts",
            get(accounts::list::<UR, TR, CR, DR, PH, TS>)
                .post(accounts::create::<UR, TR, CR, DR, PH, TS>),
        )
        .route(
            "/accounts/change-password",
            post(accounts::change_password::<UR, TR, CR, DR, PH, TS>),
        )
        .route(
            "/accounts/{id}",
            get(accounts::get::<UR, TR, CR, DR, PH, TS>)
                .put(accounts::update::<UR, TR, CR, DR, PH, TS>)
                .delete(accounts::delete::<UR, TR, CR, DR, PH, TS>),
        )
        .route(
            "/accounts/{id}/detail",
            get(accounts::detail::<UR, TR, CR, DR, PH, TS>),
        )
        // Auth
        .route("/auth/login", post(auth::login::<UR, TR, CR, DR, PH, TS>))
        .route(
            "/auth/refresh",
            post(auth::refresh::<UR, TR, CR, DR, PH, TS>),
        )
        .route("/auth/logout", post(auth::logout::<UR, TR, CR, DR, PH, TS>))
        // Companies
        .route(
            "/companies",
            get(companies::list::<UR, TR, CR, DR, PH, TS>)
                .post(companies::create::<UR, TR, CR, DR, PH, TS>),
        )
        .route(
            "/companies/by-email",
            get(companies::by_email::<UR, TR, CR, DR, PH, TS>),
        )
        .route(
            "/companies/{id}",
            get(companies::get::<UR, TR, CR, DR, PH, TS>)
                .put(companies::update::<UR, TR, CR, DR, PH, TS>)
                .delete(companies::delete::<UR, TR, CR, DR, PH, TS>),
        )
        .route(
            "/companies/{id}/technicians",
            get(companies::technicians::<UR, TR, CR, DR, PH, TS>),
        )
        .route(
            "/companies/{id}/technicians/add",
            post(companies::add_technician::<UR, TR, CR, DR, PH, TS>),
        )
        .route(
            "/companies/{id}/technicians/remove",
            post(companies::remove_technician::<UR, TR, CR, DR, PH, TS>),
        )
        .route(
            "/companies/{id}/technicians/create",
            post(companies::create_technician::<UR, TR, CR, DR, PH, TS>),
        )
        // Technicians
        .route(
            "/technicians",
            get(technicians::list::<UR, TR, CR, DR, PH, TS>),
        )
        .route(
            "/technicians/create-with-user",
            post(technicians::create_with_user::<UR, TR, CR, DR, PH, TS>),
        )
        .route(
            "/technicians/{id}",
            get(technicians::get::<UR, TR, CR, DR, PH, TS>)
                .put(technicians::update::<UR, TR, CR, DR, PH, TS>)
                .delete(technicians::delete::<UR, TR, CR, DR, PH, TS>),
        )
}
