//! # crewdesk-domain
//!
//! Pure domain model for the crewdesk account and maintenance-directory
//! service.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Users** (role-tagged accounts with credential digests)
//! - Define **Profiles** (role-specific records attached one-to-one to users:
//!   technician, maintenance company, developer)
//! - Define **Callers** (the explicit request identity fed into every
//!   authorization decision — no ambient session state)
//! - Define the read views assembled for API consumers
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod caller;
pub mod detail;
pub mod error;
pub mod id;
pub mod profile;
pub mod role;
pub mod time;
pub mod user;
