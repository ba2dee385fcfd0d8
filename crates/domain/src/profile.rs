//! Role-specific profile records, attached one-to-one to users.
//!
//! A profile's variant must match the owning user's role; at most one
//! profile exists per user (enforced by a uniqueness constraint at the
//! store). Dispatch between variants is by role tag, not inheritance.

use serde::{Deserialize, Serialize};

use crate::id::{CompanyId, DeveloperId, TechnicianId, UserId};
use crate::role::Role;

/// Profile of a field technician. May be unaffiliated (`company_id: None`)
/// or belong to exactly one maintenance company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicianProfile {
    pub id: TechnicianId,
    pub user_id: UserId,
    pub specialization: String,
    pub company_id: Option<CompanyId>,
}

impl TechnicianProfile {
    /// New unaffiliated profile for `user_id`.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            id: TechnicianId::new(),
            user_id,
            specialization: String::new(),
            company_id: None,
        }
    }

    #[must_use]
    pub fn with_specialization(mut self, specialization: impl Into<String>) -> Self {
        self.specialization = specialization.into();
        self
    }

    #[must_use]
    pub fn with_company(mut self, company_id: CompanyId) -> Self {
        self.company_id = Some(company_id);
        self
    }
}

/// Profile of a maintenance company. `admin_user_id` is the user with
/// delegated authority over the company's technicians; it defaults to the
/// owning user at creation and may later differ (or be orphaned to `None`
/// if that account is deleted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceCompanyProfile {
    pub id: CompanyId,
    pub user_id: UserId,
    pub company_name: String,
    pub registration_number: String,
    pub admin_user_id: Option<UserId>,
}

impl MaintenanceCompanyProfile {
    /// New company profile owned and administered by `user_id`.
    #[must_use]
    pub fn new(user_id: UserId, company_name: impl Into<String>) -> Self {
        Self {
            id: CompanyId::new(),
            user_id,
            company_name: company_name.into(),
            registration_number: String::new(),
            admin_user_id: Some(user_id),
        }
    }

    #[must_use]
    pub fn with_registration_number(mut self, registration_number: impl Into<String>) -> Self {
        self.registration_number = registration_number.into();
        self
    }

    #[must_use]
    pub fn with_admin(mut self, admin_user_id: UserId) -> Self {
        self.admin_user_id = Some(admin_user_id);
        self
    }

    /// Whether `user_id` administers this company.
    #[must_use]
    pub fn is_administered_by(&self, user_id: UserId) -> bool {
        self.admin_user_id == Some(user_id)
    }
}

/// Profile of an equipment developer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeveloperProfile {
    pub id: DeveloperId,
    pub user_id: UserId,
    pub developer_name: Option<String>,
    pub address: Option<String>,
    pub company_name: Option<String>,
}

impl DeveloperProfile {
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            id: DeveloperId::new(),
            user_id,
            developer_name: None,
            address: None,
            company_name: None,
        }
    }
}

/// Tagged union over the three profile variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Profile {
    Technician(TechnicianProfile),
    Maintenance(MaintenanceCompanyProfile),
    Developer(DeveloperProfile),
}

impl Profile {
    /// The role this profile variant belongs to.
    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            Self::Technician(_) => Role::Technician,
            Self::Maintenance(_) => Role::Maintenance,
            Self::Developer(_) => Role::Developer,
        }
    }

    /// The owning user.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        match self {
            Self::Technician(p) => p.user_id,
            Self::Maintenance(p) => p.user_id,
            Self::Developer(p) => p.user_id,
        }
    }
}

/// Nested profile payload accepted at account creation and update.
///
/// Only the section matching the user's role is applied; the rest are
/// ignored, mirroring the role-keyed dispatch at creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technician: Option<TechnicianData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance: Option<MaintenanceData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer: Option<DeveloperData>,
}

/// Technician-specific creation/update fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnicianData {
    #[serde(default)]
    pub specialization: Option<String>,
}

/// Maintenance-company-specific creation/update fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaintenanceData {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub admin_user_id: Option<UserId>,
}

/// Developer-specific creation/update fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeveloperData {
    #[serde(default)]
    pub developer_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}
