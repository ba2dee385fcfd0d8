//! JSON REST handlers for maintenance companies and their technician
//! directory.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crewdesk_app::ports::{
    CompanyRepository, DeveloperRepository, PasswordHasher, TechnicianRepository, TokenService,
    UserRepository,
};
use crewdesk_app::services::company_service::{
    CreateCompany, TechnicianLocator, UpdateCompany,
};
use crewdesk_app::services::technician_service::NewTechnician;
use crewdesk_domain::error::{CrewdeskError, NotFoundError};
use crewdesk_domain::id::{CompanyId, UserId};
use crewdesk_domain::profile::{MaintenanceCompanyProfile, TechnicianProfile};

use crate::error::ApiError;
use crate::extract::Bearer;
use crate::state::AppState;

fn parse_company_id(id: &str) -> Result<CompanyId, ApiError> {
    CompanyId::from_str(id).map_err(|_| {
        ApiError::from(CrewdeskError::from(NotFoundError {
            entity: "MaintenanceCompany",
            id: id.to_string(),
        }))
    })
}

/// Request body for creating a company profile.
#[derive(Deserialize)]
pub struct CreateCompanyRequest {
    pub user_id: UserId,
    pub company_name: String,
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub admin_user_id: Option<UserId>,
}

/// Request body for updating a company profile.
#[derive(Deserialize)]
pub struct UpdateCompanyRequest {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub admin_user_id: Option<UserId>,
}

/// Query string for the by-email lookup.
#[derive(Deserialize)]
pub struct ByEmailQuery {
    pub email: String,
}

/// Request body locating a technician by user id or email.
#[derive(Deserialize)]
pub struct LocatorRequest {
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Request body for creating a technician directly into a company.
#[derive(Deserialize)]
pub struct CreateTechnicianRequest {
    pub email: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    #[serde(default)]
    pub specialization: Option<String>,
}

impl CreateTechnicianRequest {
    fn into_new_technician(self) -> NewTechnician {
        NewTechnician {
            email: self.email,
            phone_number: self.phone_number,
            first_name: self.first_name,
            last_name: self.last_name,
            password: self.password,
            specialization: self.specialization,
        }
    }
}

/// Possible responses from the list endpoints.
pub enum ListResponse {
    Ok(Json<Vec<MaintenanceCompanyProfile>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoints.
pub enum GetResponse {
    Ok(Json<MaintenanceCompanyProfile>),
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
    Created(Json<MaintenanceCompanyProfile>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete/remove endpoints.
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

/// Possible responses from the roster endpoints.
pub enum RosterResponse {
    Ok(Json<Vec<TechnicianProfile>>),
}

impl IntoResponse for RosterResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses when a single technician is returned.
pub enum TechnicianResponse {
    Ok(Json<TechnicianProfile>),
    Created(Json<TechnicianProfile>),
}

impl IntoResponse for TechnicianResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `GET /api/companies`
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
    let companies = state.companies.list_companies(&caller).await?;
    Ok(ListResponse::Ok(Json(companies)))
}

/// `POST /api/companies`
pub async fn create<UR, TR, CR, DR, PH, TS>(
    State(state): State<AppState<UR, TR, CR, DR, PH, TS>>,
    bearer: Bearer,
    Json(req): Json<CreateCompanyRequest>,
) -> Result<CreateResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    TR: TechnicianRepository + Send + Sync + 'static,
    CR: CompanyRepository + Send + Sync + 'static,
    DR: DeveloperRepository + Send + Sync + 'static,
    PH: PasswordHasher + Send + Sync + 'static,
    TS: TokenService + Send + Sync + 'static,
{
    let caller = state.auth.resolve_caller(bearer.token()).await?;
    let company = state
        .companies
        .create_company(
            &caller,
            CreateCompany {
                user_id: req.user_id,
                company_name: req.company_name,
                registration_number: req.registration_number,
                admin_user_id: req.admin_user_id,
            },
        )
        .await?;
    Ok(CreateResponse::Created(Json(company)))
}

/// `GET /api/companies/by-email`
pub async fn by_email<UR, TR, CR, DR, PH, TS>(
    State(state): State<AppState<UR, TR, CR, DR, PH, TS>>,
    bearer: Bearer,
    Query(query): Query<ByEmailQuery>,
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
    let company = state
        .companies
        .find_by_admin_email(&caller, &query.email)
        .await?;
    Ok(GetResponse::Ok(Json(company)))
}

/// `GET /api/companies/:id`
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
    let company = state
        .companies
        .get_company(&caller, parse_company_id(&id)?)
        .await?;
    Ok(GetResponse::Ok(Json(company)))
}

/// `PUT /api/companies/:id`
pub async fn update<UR, TR, CR, DR, PH, TS>(
    State(state): State<AppState<UR, TR, CR, DR, PH, TS>>,
    bearer: Bearer,
    Path(id): Path<String>,
    Json(req): Json<UpdateCompanyRequest>,
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
    let company = state
        .companies
        .update_company(
            &caller,
            parse_company_id(&id)?,
            UpdateCompany {
                company_name: req.company_name,
                registration_number: req.registration_number,
                admin_user_id: req.admin_user_id,
            },
        )
        .await?;
    Ok(GetResponse::Ok(Json(company)))
}

/// `DELETE /api/companies/:id`
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
        .companies
        .delete_company(&caller, parse_company_id(&id)?)
        .await?;
    Ok(DeleteResponse::NoContent)
}

/// `GET /api/companies/:id/technicians`
pub async fn technicians<UR, TR, CR, DR, PH, TS>(
    State(state): State<AppState<UR, TR, CR, DR, PH, TS>>,
    bearer: Bearer,
    Path(id): Path<String>,
) -> Result<RosterResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    TR: TechnicianRepository + Send + Sync + 'static,
    CR: CompanyRepository + Send + Sync + 'static,
    DR: DeveloperRepository + Send + Sync + 'static,
    PH: PasswordHasher + Send + Sync + 'static,
    TS: TokenService + Send + Sync + 'static,
{
    let caller = state.auth.resolve_caller(bearer.token()).await?;
    let roster = state
        .companies
        .list_technicians(&caller, parse_company_id(&id)?)
        .await?;
    Ok(RosterResponse::Ok(Json(roster)))
}

/// `POST /api/companies/:id/technicians/add`
pub async fn add_technician<UR, TR, CR, DR, PH, TS>(
    State(state): State<AppState<UR, TR, CR, DR, PH, TS>>,
    bearer: Bearer,
    Path(id): Path<String>,
    Json(req): Json<LocatorRequest>,
) -> Result<TechnicianResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    TR: TechnicianRepository + Send + Sync + 'static,
    CR: CompanyRepository + Send + Sync + 'static,
    DR: DeveloperRepository + Send + Sync + 'static,
    PH: PasswordHasher + Send + Sync + 'static,
    TS: TokenService + Send + Sync + 'static,
{
    let caller = state.auth.resolve_caller(bearer.token()).await?;
    let technician = state
        .companies
        .add_technician(
            &caller,
            parse_company_id(&id)?,
            TechnicianLocator {
                user_id: req.user_id,
                email: req.email,
            },
        )
        .await?;
    Ok(TechnicianResponse::Ok(Json(technician)))
}

/// `POST /api/companies/:id/technicians/remove`
pub async fn remove_technician<UR, TR, CR, DR, PH, TS>(
    State(state): State<AppState<UR, TR, CR, DR, PH, TS>>,
    bearer: Bearer,
    Path(id): Path<String>,
    Json(req): Json<LocatorRequest>,
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
        .companies
        .remove_technician(
            &caller,
            parse_company_id(&id)?,
            TechnicianLocator {
                user_id: req.user_id,
                email: req.email,
            },
        )
        .await?;
    Ok(DeleteResponse::NoContent)
}

/// `POST /api/companies/:id/technicians/create`
pub async fn create_technician<UR, TR, CR, DR, PH, TS>(
    State(state): State<AppState<UR, TR, CR, DR, PH, TS>>,
    bearer: Bearer,
    Path(id): Path<String>,
    Json(req): Json<CreateTechnicianRequest>,
) -> Result<TechnicianResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    TR: TechnicianRepository + Send + Sync + 'static,
    CR: CompanyRepository + Send + Sync + 'static,
    DR: DeveloperRepository + Send + Sync + 'static,
    PH: PasswordHasher + Send + Sync + 'static,
    TS: TokenService + Send + Sync + 'static,
{
    let caller = state.auth.resolve_caller(bearer.token()).await?;
    let technician = state
        .companies
        .create_technician(
            &caller,
            parse_company_id(&id)?,
            req.into_new_technician(),
        )
        .await?;
    Ok(TechnicianResponse::Created(Json(technician)))
}
