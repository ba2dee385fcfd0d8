//! Account service — identity creation, credentials, and scoped account
//! access.

use crewdesk_domain::caller::Caller;
use crewdesk_domain::detail::UserDetail;
use crewdesk_domain::error::{CrewdeskError, ForbiddenError, NotFoundError, ValidationError};
use crewdesk_domain::id::UserId;
use crewdesk_domain::profile::ProfileData;
use crewdesk_domain::role::Role;
use crewdesk_domain::user::User;

use crate::authorize::{Action, ResourceKind, authorize_collection, require_authenticated};
use crate::ports::{
    CompanyRepository, DeveloperRepository, PasswordHasher, TechnicianRepository, UserRepository,
};
use crate::profile_factory::ProfileFactory;

/// Payload for public account creation.
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub email: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub password: String,
    pub profile: ProfileData,
}

/// Payload for bootstrap superuser creation. Explicitly passing `false` for
/// either flag is rejected.
#[derive(Debug, Clone)]
pub struct CreateSuperuser {
    pub email: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// Partial account update. Email and role are immutable after creation, so
/// neither appears here.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccount {
    pub phone_number: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile: ProfileData,
}

/// Password change payload; the old password must verify first.
#[derive(Debug, Clone)]
pub struct ChangePassword {
    pub old_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

/// Application service for account lifecycle and scoped visibility.
pub struct AccountService<UR, TR, CR, DR, PH> {
    users: UR,
    profiles: ProfileFactory<TR, CR, DR>,
    hasher: PH,
}

impl<UR, TR, CR, DR, PH> AccountService<UR, TR, CR, DR, PH>
where
    UR: UserRepository,
    TR: TechnicianRepository,
    CR: CompanyRepository,
    DR: DeveloperRepository,
    PH: PasswordHasher,
{
    /// Create a new service backed by the given ports.
    pub fn new(users: UR, profiles: ProfileFactory<TR, CR, DR>, hasher: PH) -> Self {
        Self {
            users,
            profiles,
            hasher,
        }
    }

    async fn ensure_unique(&self, email: &str, phone: &str) -> Result<(), CrewdeskError> {
        if self.users.get_by_email(email).await?.is_some() {
            return Err(ValidationError::DuplicateEmail.into());
        }
        if self.users.get_by_phone(phone).await?.is_some() {
            return Err(ValidationError::DuplicatePhoneNumber.into());
        }
        Ok(())
    }

    /// Create an account and its role-matched profile in one atomic unit.
    /// Open to anonymous callers.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::Validation`] for malformed or duplicate
    /// input, [`CrewdeskError::Conflict`] when a duplicate races past the
    /// pre-checks, or a storage error.
    pub async fn create_account(&self, payload: CreateAccount) -> Result<User, CrewdeskError> {
        if payload.password.is_empty() {
            return Err(ValidationError::EmptyPassword.into());
        }
        let password_hash = self.hasher.hash(&payload.password)?;
        let user = User::builder()
            .email(&payload.email)
            .phone_number(payload.phone_number)
            .first_name(payload.first_name)
            .last_name(payload.last_name)
            .role(payload.role)
            .password_hash(password_hash)
            .build()?;
        self.ensure_unique(&user.email, &user.phone_number).await?;

        let profile = ProfileFactory::<TR, CR, DR>::build(&user, &payload.profile);
        let user = self.users.insert_with_profile(user, profile).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "account created");
        Ok(user)
    }

    /// Create a superuser account. Staff, superuser, and active flags are
    /// forced on.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::Validation`] when either flag is explicitly
    /// disabled, or for malformed/duplicate input.
    pub async fn create_superuser(&self, payload: CreateSuperuser) -> Result<User, CrewdeskError> {
        if payload.is_staff == Some(false) || payload.is_superuser == Some(false) {
            return Err(ValidationError::SuperuserFlagsDisabled.into());
        }
        if payload.password.is_empty() {
            return Err(ValidationError::EmptyPassword.into());
        }
        let password_hash = self.hasher.hash(&payload.password)?;
        let user = User::builder()
            .email(&payload.email)
            .phone_number(payload.phone_number)
            .first_name(payload.first_name)
            .last_name(payload.last_name)
            .role(Role::Admin)
            .password_hash(password_hash)
            .staff(true)
            .superuser(true)
            .active(true)
            .build()?;
        self.ensure_unique(&user.email, &user.phone_number).await?;
        let user = self.users.insert(user).await?;
        tracing::info!(user_id = %user.id, "superuser created");
        Ok(user)
    }

    /// Replace the caller's password after verifying the current one.
    ///
    /// On any failure the stored digest is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::Validation`] when the confirmation does not
    /// match or the old password does not verify, or
    /// [`CrewdeskError::Authentication`] for anonymous callers.
    pub async fn change_password(
        &self,
        caller: &Caller,
        payload: ChangePassword,
    ) -> Result<(), CrewdeskError> {
        let me = require_authenticated(caller)?;
        if payload.new_password != payload.confirm_new_password {
            return Err(ValidationError::PasswordMismatch.into());
        }
        if payload.new_password.is_empty() {
            return Err(ValidationError::EmptyPassword.into());
        }
        let mut user = self.users.get_by_id(me.id).await?.ok_or(NotFoundError {
            entity: "User",
            id: me.id.to_string(),
        })?;
        if !self.hasher.verify(&payload.old_password, &user.password_hash) {
            return Err(ValidationError::OldPasswordIncorrect.into());
        }
        user.password_hash = self.hasher.hash(&payload.new_password)?;
        self.users.update(user).await?;
        tracing::info!(user_id = %me.id, "password changed");
        Ok(())
    }

    /// The set of users visible to `caller`: everyone for staff/superusers,
    /// exactly themselves otherwise. Applied before any object-level check,
    /// so out-of-scope accounts are indistinguishable from absent ones.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::Authentication`] for anonymous callers.
    pub async fn get_visible_users(&self, caller: &Caller) -> Result<Vec<User>, CrewdeskError> {
        let me = require_authenticated(caller)?;
        if me.is_elevated() {
            self.users.get_all().await
        } else {
            Ok(self.users.get_by_id(me.id).await?.into_iter().collect())
        }
    }

    /// List all users; restricted to staff/superusers.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::Forbidden`] for ordinary callers.
    pub async fn list_users(&self, caller: &Caller) -> Result<Vec<User>, CrewdeskError> {
        require_authenticated(caller)?;
        if !authorize_collection(caller, Action::List, ResourceKind::User, false).is_allowed() {
            return Err(ForbiddenError {
                action: "list users",
            }
            .into());
        }
        self.get_visible_users(caller).await
    }

    /// Fetch one account within the caller's visible scope.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::NotFound`] when the account is absent or
    /// outside the caller's scope.
    pub async fn get_account(&self, caller: &Caller, id: UserId) -> Result<User, CrewdeskError> {
        let me = require_authenticated(caller)?;
        if !me.is_elevated() && me.id != id {
            return Err(NotFoundError {
                entity: "User",
                id: id.to_string(),
            }
            .into());
        }
        self.users.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "User",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Apply a partial update to an account. Email and role never change;
    /// a nested profile payload matching the user's role is applied in the
    /// same call.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::NotFound`] outside the caller's scope or
    /// [`CrewdeskError::Validation`] for malformed/duplicate fields.
    pub async fn update_account(
        &self,
        caller: &Caller,
        id: UserId,
        payload: UpdateAccount,
    ) -> Result<User, CrewdeskError> {
        let mut user = self.get_account(caller, id).await?;
        if let Some(phone) = payload.phone_number {
            if phone != user.phone_number {
                if let Some(other) = self.users.get_by_phone(&phone).await? {
                    if other.id != user.id {
                        return Err(ValidationError::DuplicatePhoneNumber.into());
                    }
                }
                user.phone_number = phone;
            }
        }
        if let Some(first_name) = payload.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = payload.last_name {
            user.last_name = last_name;
        }
        user.validate()?;
        let user = self.users.update(user).await?;
        self.profiles.apply_update(&user, &payload.profile).await?;
        Ok(user)
    }

    /// Delete an account within the caller's scope; the attached profile is
    /// removed by the store's cascade rule.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::NotFound`] outside the caller's scope.
    pub async fn delete_account(&self, caller: &Caller, id: UserId) -> Result<(), CrewdeskError> {
        let user = self.get_account(caller, id).await?;
        self.users.delete(user.id).await?;
        tracing::info!(user_id = %id, "account deleted");
        Ok(())
    }

    /// Assemble the detail view for an account in scope.
    ///
    /// # Errors
    ///
    /// Returns [`CrewdeskError::NotFound`] outside the caller's scope.
    pub async fn detail(&self, caller: &Caller, id: UserId) -> Result<UserDetail, CrewdeskError> {
        let user = self.get_account(caller, id).await?;
        let profile = self.profiles.get(&user).await?;
        Ok(UserDetail::assemble(&user, profile))
    }
}
