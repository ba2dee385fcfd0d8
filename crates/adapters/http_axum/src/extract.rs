//! Bearer token extraction from the `Authorization` header.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use crewdesk_domain::error::{AuthenticationError, CrewdeskError};

use crate::error::ApiError;

/// The raw bearer token of a request, when one was presented.
///
/// Absence is not an error — endpoints decide themselves whether anonymous
/// callers are acceptable. A malformed `Authorization` header (wrong scheme,
/// non-ASCII) is rejected outright.
pub struct Bearer(Option<String>);

impl Bearer {
    /// The token string, if the request carried one.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
            return Ok(Self(None));
        };
        let value = value
            .to_str()
            .map_err(|_| ApiError::from(CrewdeskError::from(AuthenticationError::Invalid)))?;
        let token = value
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::from(CrewdeskError::from(AuthenticationError::Invalid)))?;
        Ok(Self(Some(token.trim().to_string())))
    }
}
