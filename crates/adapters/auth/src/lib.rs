//! # crewdesk-adapter-auth
//!
//! Implements the two credential collaborators behind the app-layer ports:
//!
//! - [`Argon2PasswordHasher`] — salted argon2 digests in PHC string format
//! - [`JwtTokenService`] — HS256 access/refresh tokens with a revocation
//!   list for refresh tokens
//!
//! The core never sees keys, salts, or token internals; everything stays on
//! this side of the port boundary.

pub mod password;
pub mod token;

pub use password::Argon2PasswordHasher;
pub use token::{AuthConfig, JwtTokenService};
