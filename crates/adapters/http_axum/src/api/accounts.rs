//! JSON REST handlers for accounts.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crewdesk_app::ports::{
    CompanyRepository, DeveloperRepository, PasswordHasher, TechnicianRepository, TokenService,
    UserRepository,
};
use crewdesk_app::services::account_service::{ChangePassword, CreateAccount, UpdateAccount};
use crewdesk_domain::detail::UserDetail;
use crewdesk_domain::error::{CrewdeskError, NotFoundError};
use crewdesk_domain::id::UserId;
use crewdesk_domain::profile::{DeveloperData, MaintenanceData, ProfileData, TechnicianData};
use crewdesk_domain::role::Role;
use crewdesk_domain::user::User;

use crate::error::ApiError;
use crate::extract::Bearer;
use crate::state::AppState;

fn parse_user_id(id: &str) -> Result<UserId, ApiError> {
    UserId::from_str(id).map_err(|_| {
        ApiError::from(CrewdeskError::from(NotFoundError {
            entity: "User",
            id: id.to_string(),
        }))
    })
}

/// Request body for creating an account. The nested profile section
/// matching `account_type` is applied; the others are ignored.
#[derive(Deserialize)]
pub struct CreateAccountRequest {
    pub email: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub account_type: Role,
    pub password: String,
    #[serde(default)]
    pub technician_profile: Option<TechnicianData>,
    #[serde(default)]
    pub maintenance_profile: Option<MaintenanceData>,
    #[serde(default)]
    pub developer_profile: Option<DeveloperData>,
}

/// Request body for updating an account. Email and role are immutable and
/// therefore absent.
#[derive(Deserialize)]
pub struct UpdateAccountRequest {
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub technician_profile: Option<TechnicianData>,
    #[serde(default)]
    pub maintenance_profile: Option<MaintenanceData>,
    #[serde(default)]
    pub developer_profile: Option<DeveloperData>,
}

/// Request body for changing the caller's password.
#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

#[derive(Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<User>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<User>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<User>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Possible responses from the detail endpoint.
pub enum DetailResponse {
    Ok(Json<UserDetail>),
}

impl IntoResponse for DetailResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

fn profile_data(
    technician: Option<TechnicianData>,
    maintenance: Option<MaintenanceData>,
    developer: Option<DeveloperData>,
) -> ProfileData {
    ProfileData {
        technician,
        maintenance,
        developer,
    }
}

/// `GET /api/accounts`
pub async fn list<UR, TR, CR, DR, PH, TS>(
    State(state): State<AppState<UR, TR, CR, DR, PH, TS>>,
    bearer: Bearer,
) -> Result<ListResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    TR: TechnicianRepository + Send + Sync + 'static,
    CR: CompanyRepository + Send + Sync + 'static,
    DR: DeveloperRepository + Send + Sync + 'static,
    PH: PasswordHasher + Send + Sync + 'static,
    TS: TokenService + Send + Sync + 'static,
{
    let caller = state.auth.resolve_caller(bearer.token()).await?;
    let users = state.accounts.list_users(&caller).await?;
    Ok(ListResponse::Ok(Json(users)))
}

/// `POST /api/accounts`
pub async fn create<UR, TR, CR, DR, PH, TS>(
    State(state): State<AppState<UR, TR, CR, DR, PH, TS>>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<CreateResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    TR: TechnicianRepository + Send + Sync + 'static,
    CR: CompanyRepository + Send + Sync + 'static,
    DR: DeveloperRepository + Send + Sync + 'static,
    PH: PasswordHasher + Send + Sync + 'static,
    TS: TokenService + Send + Sync + 'static,
{
    let user = state
        .accounts
        .create_account(CreateAccount {
            email: req.email,
            phone_number: req.phone_number,
            first_name: req.first_name,
            last_name: req.last_name,
            role: req.account_type,
            password: req.password,
            profile: profile_data(
                req.technician_profile,
                req.maintenance_profile,
                req.developer_profile,
            ),
        })
        .await?;
    Ok(CreateResponse::Created(Json(user)))
}

/// `GET /api/accounts/:id`
pub async fn get<UR, TR, CR, DR, PH, TS>(
    State(state): State<AppState<UR, TR, CR, DR, PH, TS>>,
    bearer: Bearer,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    TR: TechnicianRepository + Send + Sync + 'static,
    CR: CompanyRepository + Send + Sync + 'static,
    DR: DeveloperRepository + Send + Sync + 'static,
    PH: PasswordHasher + Send + Sync + 'static,
    TS: TokenService + Send + Sync + 'static,
{
    let caller = state.auth.resolve_caller(bearer.token()).await?;
    let user = state.accounts.get_account(&caller, parse_user_id(&id)?).await?;
    Ok(GetResponse::Ok(Json(user)))
}

/// `PUT /api/accounts/:id`
pub async fn update<UR, TR, CR, DR, PH, TS>(
    State(state): State<AppState<UR, TR, CR, DR, PH, TS>>,
    bearer: Bearer,
    Path(id): Path<String>,
    Json(req): Json<UpdateAccountRequest>,
) -> Result<GetResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    TR: TechnicianRepository + Send + Sync + 'static,
    CR: CompanyRepository + Send + Sync + 'static,
    DR: DeveloperRepository + Send + Sync + 'static,
    PH: PasswordHasher + Send + Sync + 'static,
    TS: TokenService + Send + Sync + 'static,
{
    let caller = state.auth.resolve_caller(bearer.token()).await?;
    let user = state
        .accounts
        .update_account(
            &caller,
            parse_user_id(&id)?,
            UpdateAccount {
                phone_number: req.phone_number,
                first_name: req.first_name,
                last_name: req.last_name,
                profile: profile_data(
                    req.technician_profile,
                    req.maintenance_profile,
                    req.developer_profile,
                ),
            },
        )
        .await?;
    Ok(GetResponse::Ok(Json(user)))
}

/// `DELETE /api/accounts/:id`
pub async fn delete<UR, TR, CR, DR, PH, TS>(
    State(state): State<AppState<UR, TR, CR, DR, PH, TS>>,
    bearer: Bearer,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    TR: TechnicianRepository + Send + Sync + 'static,
    CR: CompanyRepository + Send + Sync + 'static,
    DR: DeveloperRepository + Send + Sync + 'static,
    PH: PasswordHasher + Send + Sync + 'static,
    TS: TokenService + Send + Sync + 'static,
{
    let caller = state.auth.resolve_caller(bearer.token()).await?;
    state
        .accounts
        .delete_account(&caller, parse_user_id(&id)?)
        .await?;
    Ok(DeleteResponse::NoContent)
}

/// `GET /api/accounts/:id/detail`
pub async fn detail<UR, TR, CR, DR, PH, TS>(
    State(state): State<AppState<UR, TR, CR, DR, PH, TS>>,
    bearer: Bearer,
    Path(id): Path<String>,
) -> Result<DetailResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    TR: TechnicianRepository + Send + Sync + 'static,
    CR: CompanyRepository + Send + Sync + 'static,
    DR: DeveloperRepository + Send + Sync + 'static,
    PH: PasswordHasher + Send + Sync + 'static,
    TS: TokenService + Send + Sync + 'static,
{
    let caller = state.auth.resolve_caller(bearer.token()).await?;
    let detail = state.accounts.detail(&caller, parse_user_id(&id)?).await?;
    Ok(DetailResponse::Ok(Json(detail)))
}

/// `POST /api/accounts/change-password`
pub async fn change_password<UR, TR, CR, DR, PH, TS>(
    State(state): State<AppState<UR, TR, CR, DR, PH, TS>>,
    bearer: Bearer,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<MessageBody>, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    TR: TechnicianRepository + Send + Sync + 'static,
    CR: CompanyRepository + Send + Sync + 'static,
    DR: DeveloperRepository + Send + Sync + 'static,
    PH: PasswordHasher + Send + Sync + 'static,
    TS: TokenService + Send + Sync + 'static,
{
    let caller = state.auth.resolve_caller(bearer.token()).await?;
    state
        .accounts
        .change_password(
            &caller,
            ChangePassword {
                old_password: req.old_password,
                new_password: req.new_password,
                confirm_new_password: req.confirm_new_password,
            },
        )
        .await?;
    Ok(Json(MessageBody {
        message: "Password changed successfully",
    }))
}
