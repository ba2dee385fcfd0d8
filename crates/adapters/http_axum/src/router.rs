//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crewdesk_app::ports::{
    CompanyRepository, DeveloperRepository, PasswordHasher, TechnicianRepository, TokenService,
    UserRepository,
};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests the JSON API under `/api` and includes a [`TraceLayer`] that logs
/// each HTTP request/response at the `DEBUG` level using the `tracing`
/// ecosystem.
pub fn build<UR, TR, CR, DR, PH, TS>(state: AppState<UR, TR, CR, DR, PH, TS>) -> Router
where
    UR: UserRepository + Send + Sync + 'static,
    TR: TechnicianRepository + Send + Sync + 'static,
    CR: CompanyRepository + Send + Sync + 'static,
    DR: DeveloperRepository + Send + Sync + 'static,
    PH: PasswordHasher + Send + Sync + 'static,
    TS: TokenService + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
