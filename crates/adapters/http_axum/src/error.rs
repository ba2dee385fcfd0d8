//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crewdesk_domain::error::CrewdeskError;

/// JSON error body returned by API endpoints. `field` names the offending
/// input field when the failure is attached to one.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

/// Maps [`CrewdeskError`] to an HTTP response with appropriate status code.
pub struct ApiError(CrewdeskError);

impl From<CrewdeskError> for ApiError {
    fn from(err: CrewdeskError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, field) = match &self.0 {
            CrewdeskError::Validation(err) => {
                (StatusCode::BAD_REQUEST, err.to_string(), err.field())
            }
            CrewdeskError::Authentication(err) => {
                (StatusCode::UNAUTHORIZED, err.to_string(), None)
            }
            CrewdeskError::Forbidden(err) => (StatusCode::FORBIDDEN, err.to_string(), None),
            CrewdeskError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string(), None),
            CrewdeskError::Conflict(err) => {
                (StatusCode::CONFLICT, err.to_string(), Some(err.field))
            }
            CrewdeskError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                    None,
                )
            }
        };

        (
            status,
            Json(ErrorBody {
                error: message,
                field,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewdesk_domain::error::{AuthenticationError, ValidationError};

    #[test]
    fn should_map_validation_to_bad_request() {
        let response =
            ApiError::from(CrewdeskError::from(ValidationError::DuplicateEmail)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn should_map_authentication_to_unauthorized() {
        let response =
            ApiError::from(CrewdeskError::from(AuthenticationError::Expired)).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn should_map_not_found_to_404() {
        let response = ApiError::from(CrewdeskError::from(
            crewdesk_domain::error::NotFoundError {
                entity: "User",
                id: "x".into(),
            },
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn should_map_conflict_to_409() {
        let response = ApiError::from(CrewdeskError::from(
            crewdesk_domain::error::ConflictError { field: "email" },
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
