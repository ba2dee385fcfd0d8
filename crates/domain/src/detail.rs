//! Read views assembled for API consumers.

use serde::Serialize;

use crate::id::UserId;
use crate::profile::Profile;
use crate::role::Role;
use crate::time::Timestamp;
use crate::user::User;

/// Detailed account view embedding the role-specific profile.
#[derive(Debug, Clone, Serialize)]
pub struct UserDetail {
    pub id: UserId,
    pub email: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub account_type: Role,
    pub created_at: Timestamp,
    pub profile: ProfileSection,
}

/// The profile portion of a [`UserDetail`]. `details` is `null` when the
/// user has no profile (admins, or a profile that was never attached).
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSection {
    pub kind: &'static str,
    pub details: Option<Profile>,
}

impl UserDetail {
    /// Assemble the view from a user and their (possibly absent) profile.
    ///
    /// A profile whose variant does not match the user's role is treated as
    /// absent rather than failing.
    #[must_use]
    pub fn assemble(user: &User, profile: Option<Profile>) -> Self {
        let details = profile.filter(|p| p.role() == user.role);
        Self {
            id: user.id,
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            account_type: user.role,
            created_at: user.created_at,
            profile: ProfileSection {
                kind: user.role.profile_label(),
                details,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::TechnicianProfile;

    fn user(role: Role) -> User {
        User::builder()
            .email("detail@example.com")
            .phone_number("+254700000002")
            .first_name("Detail")
            .last_name("View")
            .role(role)
            .password_hash("digest")
            .build()
            .unwrap()
    }

    #[test]
    fn should_embed_matching_profile() {
        let u = user(Role::Technician);
        let profile = Profile::Technician(TechnicianProfile::new(u.id));
        let detail = UserDetail::assemble(&u, Some(profile));
        assert_eq!(detail.profile.kind, "Technician Profile");
        assert!(detail.profile.details.is_some());
    }

    #[test]
    fn should_null_profile_section_when_absent() {
        let u = user(Role::Admin);
        let detail = UserDetail::assemble(&u, None);
        assert_eq!(detail.profile.kind, "Administrator Profile");
        assert!(detail.profile.details.is_none());
    }

    #[test]
    fn should_null_profile_section_when_variant_mismatched() {
        let u = user(Role::Developer);
        let stray = Profile::Technician(TechnicianProfile::new(u.id));
        let detail = UserDetail::assemble(&u, Some(stray));
        assert!(detail.profile.details.is_none());
    }

    #[test]
    fn should_serialize_without_password_material() {
        let u = user(Role::Technician);
        let detail = UserDetail::assemble(&u, None);
        let json = serde_json::to_value(&detail).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["account_type"], "technician");
    }
}
