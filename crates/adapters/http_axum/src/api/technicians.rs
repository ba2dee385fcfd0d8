//! JSON REST handlers for technician profiles.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crewdesk_app::ports::{
    CompanyRepository, DeveloperRepository, PasswordHasher, TechnicianRepository, TokenService,
    UserRepository,
};
use crewdesk_app::services::technician_service::{NewTechnician, TechnicianUpdate};
use crewdesk_domain::error::{CrewdeskError, NotFoundError};
use crewdesk_domain::id::TechnicianId;
use crewdesk_domain::profile::TechnicianProfile;

use crate::error::ApiError;
use crate::extract::Bearer;
use crate::state::AppState;

fn parse_technician_id(id: &str) -> Result<TechnicianId, ApiError> {
    TechnicianId::from_str(id).map_err(|_| {
        ApiError::from(CrewdeskError::from(NotFoundError {
            entity: "Technician",
            id: id.to_string(),
        }))
    })
}

/// Request body for updating a technician profile.
#[derive(Deserialize)]
pub struct UpdateTechnicianRequest {
    #[serde(default)]
    pub specialization: Option<String>,
}

/// Request body for creating a technician user and profile in one step.
#[derive(Deserialize)]
pub struct CreateWithUserRequest {
    pub email: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    #[serde(default)]
    pub specialization: Option<String>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<TechnicianProfile>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get/update endpoints.
pub enum GetResponse {
    Ok(Json<TechnicianProfile>),
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
    Created(Json<TechnicianProfile>),
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

/// `GET /api/technicians`
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
    let technicians = state.technicians.list_visible(&caller).await?;
    Ok(ListResponse::Ok(Json(technicians)))
}

/// `GET /api/technicians/:id`
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
    let technician = state
        .technicians
        .get(&caller, parse_technician_id(&id)?)
        .await?;
    Ok(GetResponse::Ok(Json(technician)))
}

/// `PUT /api/technicians/:id`
pub async fn update<UR, TR, CR, DR, PH, TS>(
    State(state): State<AppState<UR, TR, CR, DR, PH, TS>>,
    bearer: Bearer,
    Path(id): Path<String>,
    Json(req): Json<UpdateTechnicianRequest>,
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
    let technician = state
        .technicians
        .update(
            &caller,
            parse_technician_id(&id)?,
            TechnicianUpdate {
                specialization: req.specialization,
            },
        )
        .await?;
    Ok(GetResponse::Ok(Json(technician)))
}

/// `DELETE /api/technicians/:id`
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
        .technicians
        .delete(&caller, parse_technician_id(&id)?)
        .await?;
    Ok(DeleteResponse::NoContent)
}

/// `POST /api/technicians/create-with-user`
pub async fn create_with_user<UR, TR, CR, DR, PH, TS>(
    State(state): State<AppState<UR, TR, CR, DR, PH, TS>>,
    bearer: Bearer,
    Json(req): Json<CreateWithUserRequest>,
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
    let technician = state
        .technicians
        .create_with_user(
            &caller,
            NewTechnician {
                email: req.email,
                phone_number: req.phone_number,
                first_name: req.first_name,
                last_name: req.last_name,
                password: req.password,
                specialization: req.specialization,
            },
        )
        .await?;
    Ok(CreateResponse::Created(Json(technician)))
}
