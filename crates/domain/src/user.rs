//! User — a role-tagged account with a hashed credential.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CrewdeskError, ValidationError};
use crate::id::UserId;
use crate::role::Role;
use crate::time::{Timestamp, now};

/// Phone numbers: optional `+`, optional leading `1`, then 9-15 digits.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?1?\d{9,15}$").expect("phone pattern is valid"));

/// An account holder. The `role` selects which profile variant may be
/// attached and which permission rules apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    /// Salted credential digest in PHC string format. Never plaintext.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl User {
    /// Create a builder for constructing a [`User`].
    #[must_use]
    pub fn builder() -> UserBuilder {
        UserBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::Validation`] when the email or phone number
    /// is malformed, or a name is empty.
    pub fn validate(&self) -> Result<(), CrewdeskError> {
        validate_email(&self.email)?;
        validate_phone(&self.phone_number)?;
        if self.first_name.trim().is_empty() {
            return Err(ValidationError::EmptyFirstName.into());
        }
        if self.last_name.trim().is_empty() {
            return Err(ValidationError::EmptyLastName.into());
        }
        Ok(())
    }
}

/// Lowercase and trim an email address so lookups and uniqueness checks are
/// case-insensitive.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate an already-normalized email address.
///
/// # Errors
///
/// Returns [`CrewdeskError::Validation`] when the address is empty or has no
/// usable local part or dotted domain.
pub fn validate_email(email: &str) -> Result<(), CrewdeskError> {
    if email.is_empty() {
        return Err(ValidationError::EmptyEmail.into());
    }
    let Some((local, domain)) = email.rsplit_once('@') else {
        return Err(ValidationError::InvalidEmail(email.to_string()).into());
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ValidationError::InvalidEmail(email.to_string()).into());
    }
    Ok(())
}

/// Validate a phone number against the account phone pattern.
///
/// # Errors
///
/// Returns [`CrewdeskError::Validation`] when the number does not match.
pub fn validate_phone(phone: &str) -> Result<(), CrewdeskError> {
    if PHONE_RE.is_match(phone) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhoneNumber(phone.to_string()).into())
    }
}

/// Step-by-step builder for [`User`].
#[derive(Debug, Default)]
pub struct UserBuilder {
    id: Option<UserId>,
    email: Option<String>,
    phone_number: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    role: Option<Role>,
    password_hash: Option<String>,
    is_staff: bool,
    is_superuser: bool,
    is_active: Option<bool>,
}

impl UserBuilder {
    #[must_use]
    pub fn id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    /// Email is normalized (trimmed, lowercased) on the way in.
    #[must_use]
    pub fn email(mut self, email: impl AsRef<str>) -> Self {
        self.email = Some(normalize_email(email.as_ref()));
        self
    }

    #[must_use]
    pub fn phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    #[must_use]
    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    #[must_use]
    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn password_hash(mut self, password_hash: impl Into<String>) -> Self {
        self.password_hash = Some(password_hash.into());
        self
    }

    #[must_use]
    pub fn staff(mut self, is_staff: bool) -> Self {
        self.is_staff = is_staff;
        self
    }

    #[must_use]
    pub fn superuser(mut self, is_superuser: bool) -> Self {
        self.is_superuser = is_superuser;
        self
    }

    #[must_use]
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// Consume the builder, validate, and return a [`User`].
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::Validation`] if any field fails validation.
    pub fn build(self) -> Result<User, CrewdeskError> {
        let user = User {
            id: self.id.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone_number: self.phone_number.unwrap_or_default(),
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            role: self.role.unwrap_or(Role::Technician),
            password_hash: self.password_hash.unwrap_or_default(),
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
            is_active: self.is_active.unwrap_or(true),
            created_at: now(),
        };
        user.validate()?;
        Ok(user)
    }
}
