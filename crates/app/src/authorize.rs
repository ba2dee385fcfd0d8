//! Authorization engine — pure permission decisions.
//!
//! Two layers, both side-effect free and evaluated fresh per request:
//!
//! - **Collection level**: may this caller attempt this action on this
//!   resource kind at all?
//! - **Object level**: may this caller act on this specific object?
//!
//! The one data-dependent input (whether a maintenance caller administers a
//! company) is resolved by the calling service and passed in, keeping the
//! engine free of IO.
//!
//! Services apply visibility scoping *before* the object check, so objects
//! outside the caller's visible set surface as not-found rather than
//! forbidden; a deny here only becomes a 403 where existence is not
//! sensitive.

use crewdesk_domain::caller::{Caller, CallerUser};
use crewdesk_domain::error::{AuthenticationError, CrewdeskError};
use crewdesk_domain::id::UserId;
use crewdesk_domain::role::Role;

/// Outcome of a permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    #[must_use]
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// The operation being attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    Delete,
    ChangePassword,
}

/// The resource kind the operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    User,
    Company,
    Technician,
}

/// Identity-relevant fields of a specific target object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRef {
    /// A user account.
    User { id: UserId },
    /// A maintenance company; `admin_user_id` is `None` when the admin
    /// account has been deleted.
    Company { admin_user_id: Option<UserId> },
    /// A technician profile and, when affiliated, the admin of its company.
    Technician {
        user_id: UserId,
        company_admin_id: Option<UserId>,
    },
}

/// Unwrap an authenticated, active caller.
///
/// # Errors
///
/// Returns [`CrewdeskError::Authentication`] for anonymous or inactive
/// callers.
pub fn require_authenticated(caller: &Caller) -> Result<&CallerUser, CrewdeskError> {
    match caller {
        Caller::Anonymous => Err(AuthenticationError::MissingToken.into()),
        Caller::User(user) if !user.is_active => Err(AuthenticationError::Inactive.into()),
        Caller::User(user) => Ok(user),
    }
}

/// Run the collection-level check and unwrap the caller, mapping a denial
/// to the right error: anonymous/inactive callers surface as
/// unauthenticated, authenticated ones as forbidden.
///
/// # Errors
///
/// Returns [`CrewdeskError::Authentication`] or [`CrewdeskError::Forbidden`].
pub fn ensure_collection<'c>(
    caller: &'c Caller,
    action: Action,
    resource: ResourceKind,
    administers_company: bool,
    denied: &'static str,
) -> Result<&'c CallerUser, CrewdeskError> {
    let user = require_authenticated(caller)?;
    if authorize_collection(caller, action, resource, administers_company).is_allowed() {
        Ok(user)
    } else {
        Err(crewdesk_domain::error::ForbiddenError { action: denied }.into())
    }
}

/// Collection-level check: account creation is open to anyone; everything
/// else requires an authenticated, active caller. Listing users is
/// restricted to staff/superusers; listing companies to staff/superusers or
/// a maintenance caller who administers one; creating companies to
/// staff/superusers; creating technicians to staff/superusers or
/// maintenance callers.
#[must_use]
pub fn authorize_collection(
    caller: &Caller,
    action: Action,
    resource: ResourceKind,
    administers_company: bool,
) -> Decision {
    if resource == ResourceKind::User && action == Action::Create {
        return Decision::Allow;
    }
    let Some(user) = caller.user() else {
        return Decision::Deny;
    };
    if !user.is_active {
        return Decision::Deny;
    }
    if user.is_elevated() {
        return Decision::Allow;
    }
    match (resource, action) {
        (ResourceKind::User, Action::List) | (ResourceKind::Company, Action::Create) => {
            Decision::Deny
        }
        (ResourceKind::Company, Action::List) => {
            if user.role == Role::Maintenance && administers_company {
                Decision::Allow
            } else {
                Decision::Deny
            }
        }
        (ResourceKind::Technician, Action::Create) => {
            if user.role == Role::Maintenance {
                Decision::Allow
            } else {
                Decision::Deny
            }
        }
        _ => Decision::Allow,
    }
}

/// Object-level check. Staff and superusers get full read-write on every
/// resource kind; otherwise ownership and delegated-admin rules apply.
#[must_use]
pub fn authorize_object(caller: &CallerUser, target: &TargetRef) -> Decision {
    if !caller.is_active {
        return Decision::Deny;
    }
    if caller.is_elevated() {
        return Decision::Allow;
    }
    let allowed = match target {
        TargetRef::User { id } => *id == caller.id,
        TargetRef::Company { admin_user_id } => *admin_user_id == Some(caller.id),
        TargetRef::Technician {
            user_id,
            company_admin_id,
        } => *user_id == caller.id || *company_admin_id == Some(caller.id),
    };
    if allowed { Decision::Allow } else { Decision::Deny }
}
