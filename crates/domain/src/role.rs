//! Account roles — the tag that selects a user's profile variant and
//! permission rules.

use serde::{Deserialize, Serialize};

/// Role tag carried by every [`User`](crate::user::User).
///
/// Immutable once a profile is attached: changing it would orphan the
/// role-matched profile record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Developer,
    Maintenance,
    Technician,
    Admin,
}

impl Role {
    /// Whether a profile variant exists for this role.
    #[must_use]
    pub fn has_profile(self) -> bool {
        !matches!(self, Self::Admin)
    }

    /// Human-readable profile label used in detail views.
    #[must_use]
    pub fn profile_label(self) -> &'static str {
        match self {
            Self::Developer => "Developer Profile",
            Self::Maintenance => "Maintenance Company Profile",
            Self::Technician => "Technician Profile",
            Self::Admin => "Administrator Profile",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Developer => f.write_str("developer"),
            Self::Maintenance => f.write_str("maintenance"),
            Self::Technician => f.write_str("technician"),
            Self::Admin => f.write_str("admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "developer" => Ok(Self::Developer),
            "maintenance" => Ok(Self::Maintenance),
            "technician" => Ok(Self::Technician),
            "admin" => Ok(Self::Admin),
            other => Err(crate::error::ValidationError::UnknownRole(
                other.to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn should_roundtrip_through_display_and_from_str() {
        for role in [
            Role::Developer,
            Role::Maintenance,
            Role::Technician,
            Role::Admin,
        ] {
            let parsed = Role::from_str(&role.to_string()).unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn should_serialize_as_lowercase_string() {
        let json = serde_json::to_string(&Role::Maintenance).unwrap();
        assert_eq!(json, "\"maintenance\"");
    }

    #[test]
    fn should_reject_unknown_role() {
        assert!(Role::from_str("manager").is_err());
    }

    #[test]
    fn should_report_no_profile_for_admin() {
        assert!(!Role::Admin.has_profile());
        assert!(Role::Technician.has_profile());
    }
}
