//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`CrewdeskError`] via `#[from]`; no `String` catch-all variants.

/// Top-level error for all crewdesk operations.
#[derive(Debug, thiserror::Error)]
pub enum CrewdeskError {
    /// Malformed or duplicate input, with field-level detail.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Missing, invalid, or expired credentials.
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    /// Authenticated but not permitted.
    #[error(transparent)]
    Forbidden(#[from] ForbiddenError),

    /// Object absent, or outside the caller's visible scope.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Uniqueness violation surfaced from the store after pre-checks.
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// Unrecoverable storage failure.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Field-level input validation failures.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("email must not be empty")]
    EmptyEmail,

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("a user with this email already exists")]
    DuplicateEmail,

    #[error("invalid phone number: {0}")]
    InvalidPhoneNumber(String),

    #[error("a user with this phone number already exists")]
    DuplicatePhoneNumber,

    #[error("first name must not be empty")]
    EmptyFirstName,

    #[error("last name must not be empty")]
    EmptyLastName,

    #[error("password must not be empty")]
    EmptyPassword,

    #[error("new passwords must match")]
    PasswordMismatch,

    #[error("old password is incorrect")]
    OldPasswordIncorrect,

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("superusers must keep staff and superuser flags enabled")]
    SuperuserFlagsDisabled,

    #[error("either user_id or email must be provided")]
    MissingTechnicianLocator,

    #[error("user is not a maintenance account")]
    NotAMaintenanceAccount,

    #[error("caller has no maintenance company profile")]
    MissingCompanyProfile,
}

impl ValidationError {
    /// The input field this error is attached to, when there is one.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::EmptyEmail | Self::InvalidEmail(_) | Self::DuplicateEmail => Some("email"),
            Self::InvalidPhoneNumber(_) | Self::DuplicatePhoneNumber => Some("phone_number"),
            Self::EmptyFirstName => Some("first_name"),
            Self::EmptyLastName => Some("last_name"),
            Self::EmptyPassword => Some("password"),
            Self::PasswordMismatch => Some("confirm_new_password"),
            Self::OldPasswordIncorrect => Some("old_password"),
            Self::UnknownRole(_) => Some("account_type"),
            Self::SuperuserFlagsDisabled
            | Self::MissingTechnicianLocator
            | Self::NotAMaintenanceAccount
            | Self::MissingCompanyProfile => None,
        }
    }
}

/// Credential and token failures, surfaced as unauthenticated.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthenticationError {
    #[error("authentication credentials were not provided")]
    MissingToken,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token has expired")]
    Expired,

    #[error("token is invalid")]
    Invalid,

    #[error("token has been revoked")]
    Revoked,

    #[error("account is inactive")]
    Inactive,
}

/// Authenticated caller lacks permission for the attempted action.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("you do not have permission to {action}")]
pub struct ForbiddenError {
    /// Short description of the denied action, e.g. `"list users"`.
    pub action: &'static str,
}

/// Object absent or invisible to the caller.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    /// Entity kind, e.g. `"User"`.
    pub entity: &'static str,
    /// Identifier as given by the caller.
    pub id: String,
}

/// Store-level uniqueness violation that raced past input pre-checks.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("duplicate value for {field}")]
pub struct ConflictError {
    /// Column or logical field the unique constraint covers.
    pub field: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_attach_field_to_email_errors() {
        assert_eq!(ValidationError::DuplicateEmail.field(), Some("email"));
        assert_eq!(
            ValidationError::InvalidPhoneNumber("abc".into()).field(),
            Some("phone_number")
        );
    }

    #[test]
    fn should_have_no_field_for_flag_errors() {
        assert_eq!(ValidationError::SuperuserFlagsDisabled.field(), None);
    }

    #[test]
    fn should_convert_validation_error_into_top_level() {
        let err: CrewdeskError = ValidationError::EmptyEmail.into();
        assert!(matches!(
            err,
            CrewdeskError::Validation(ValidationError::EmptyEmail)
        ));
    }

    #[test]
    fn should_render_not_found_with_entity_and_id() {
        let err = NotFoundError {
            entity: "User",
            id: "abc".into(),
        };
        assert_eq!(err.to_string(), "User not found: abc");
    }
}
