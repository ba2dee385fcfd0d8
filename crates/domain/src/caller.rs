//! Caller — the explicit request identity fed into authorization decisions.
//!
//! Replaces any ambient "current user" state: every service operation
//! receives the caller as a value, resolved once per request from the
//! bearer token.

use crate::id::UserId;
use crate::role::Role;
use crate::user::User;

/// The identity making a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    /// No (valid) credentials presented.
    Anonymous,
    /// An authenticated account.
    User(CallerUser),
}

impl Caller {
    /// The authenticated identity, if any.
    #[must_use]
    pub fn user(&self) -> Option<&CallerUser> {
        match self {
            Self::Anonymous => None,
            Self::User(user) => Some(user),
        }
    }

    #[must_use]
    pub fn is_superuser(&self) -> bool {
        self.user().is_some_and(CallerUser::is_superuser)
    }
}

/// Snapshot of the fields authorization decisions depend on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerUser {
    pub id: UserId,
    pub role: Role,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
}

impl CallerUser {
    /// Build a caller snapshot from a freshly loaded user row.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            is_active: user.is_active,
        }
    }

    #[must_use]
    pub fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    /// Staff or superuser: full read-write on every resource kind.
    #[must_use]
    pub fn is_elevated(&self) -> bool {
        self.is_staff || self.is_superuser
    }
}
