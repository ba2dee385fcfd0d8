//! JSON REST handlers for authentication flows.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crewdesk_app::ports::{
    CompanyRepository, DeveloperRepository, PasswordHasher, TechnicianRepository, TokenService,
    UserRepository,
};
use crewdesk_domain::id::UserId;
use crewdesk_domain::role::Role;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Abbreviated user payload embedded in the login response.
#[derive(Serialize)]
pub struct LoginUserBody {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub account_type: Role,
}

/// Response body for login.
#[derive(Serialize)]
pub struct LoginBody {
    pub access: String,
    pub refresh: String,
    pub user: LoginUserBody,
}

/// Request body for token refresh and logout.
#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Response body for token refresh.
#[derive(Serialize)]
pub struct RefreshBody {
    pub access: String,
}

/// Possible responses from the logout endpoint.
pub enum LogoutResponse {
    NoContent,
}

impl IntoResponse for LogoutResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `POST /api/auth/login`
pub async fn login<UR, TR, CR, DR, PH, TS>(
    State(state): State<AppState<UR, TR, CR, DR, PH, TS>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginBody>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    TR: TechnicianRepository + Send + Sync + 'static,
    CR: CompanyRepository + Send + Sync + 'static,
    DR: DeveloperRepository + Send + Sync + 'static,
    PH: PasswordHasher + Send + Sync + 'static,
    TS: TokenService + Send + Sync + 'static,
{
    let response = state.auth.login(&req.email, &req.password).await?;
    Ok(Json(LoginBody {
        access: response.tokens.access,
        refresh: response.tokens.refresh,
        user: LoginUserBody {
            id: response.user.id,
            email: response.user.email,
            first_name: response.user.first_name,
            last_name: response.user.last_name,
            account_type: response.user.role,
        },
    }))
}

/// `POST /api/auth/refresh`
pub async fn refresh<UR, TR, CR, DR, PH, TS>(
    State(state): State<AppState<UR, TR, CR, DR, PH, TS>>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<RefreshBody>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    TR: TechnicianRepository + Send + Sync + 'static,
    CR: CompanyRepository + Send + Sync + 'static,
    DR: DeveloperRepository + Send + Sync + 'static,
    PH: PasswordHasher + Send + Sync + 'static,
    TS: TokenService + Send + Sync + 'static,
{
    let access = state.auth.refresh(&req.refresh)?;
    Ok(Json(RefreshBody { access }))
}

/// `POST /api/auth/logout`
pub async fn logout<UR, TR, CR, DR, PH, TS>(
    State(state): State<AppState<UR, TR, CR, DR, PH, TS>>,
    Json(req): Json<RefreshRequest>,
) -> Result<LogoutResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    TR: TechnicianRepository + Send + Sync + 'static,
    CR: CompanyRepository + Send + Sync + 'static,
    DR: DeveloperRepository + Send + Sync + 'static,
    PH: PasswordHasher + Send + Sync + 'static,
    TS: TokenService + Send + Sync + 'static,
{
    state.auth.logout(&req.refresh)?;
    Ok(LogoutResponse::NoContent)
}
