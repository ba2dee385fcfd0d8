//! # crewdesk-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter. Implements the repository ports defined in
//! `crewdesk-app` on top of `sqlx`, with the constraints the core relies on
//! pushed into the schema: unique email/phone, one profile per user,
//! cascade-delete of profiles with their user, and set-null on company
//! deletion.

pub mod error;
pub mod pool;

mod company_repo;
mod developer_repo;
mod technician_repo;
mod user_repo;

pub use company_repo::SqliteCompanyRepository;
pub use developer_repo::SqliteDeveloperRepository;
pub use error::StorageError;
pub use pool::{Config, Database};
pub use technician_repo::SqliteTechnicianRepository;
pub use user_repo::SqliteUserRepository;
