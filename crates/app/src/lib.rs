//! # crewdesk-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `UserRepository` — accounts, including the atomic user+profile insert
//!   - `TechnicianRepository` / `CompanyRepository` / `DeveloperRepository` —
//!     role-specific profiles with idempotent get-or-create
//!   - `PasswordHasher` — credential hashing collaborator
//!   - `TokenService` — token issuance/verification/revocation collaborator
//! - Provide the **authorization engine**: pure collection- and object-level
//!   decision functions, evaluated fresh per request
//! - Provide the **profile factory**: role-keyed profile creation and lookup
//! - Define **driving/inbound ports** as use-case structs:
//!   - `AccountService` — create accounts/superusers, password changes,
//!     scoped visibility, updates, detail assembly
//!   - `AuthService` — login, refresh, logout, caller resolution
//!   - `CompanyService` — company CRUD plus the technician directory
//!   - `TechnicianService` — scoped technician access
//!
//! ## Dependency rule
//! Depends on `crewdesk-domain` only. Never imports adapter crates.
//! Adapters depend on *this* crate, not the reverse.

pub mod authorize;
pub mod ports;
pub mod profile_factory;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;
