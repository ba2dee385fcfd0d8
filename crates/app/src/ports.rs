//! Ports — trait boundaries implemented by adapters.

pub mod company_repo;
pub mod developer_repo;
pub mod password_hasher;
pub mod technician_repo;
pub mod token_service;
pub mod user_repo;

pub use company_repo::CompanyRepository;
pub use developer_repo::DeveloperRepository;
pub use password_hasher::PasswordHasher;
pub use technician_repo::TechnicianRepository;
pub use token_service::{TokenClaims, TokenPair, TokenService};
pub use user_repo::UserRepository;
