//! # crewdesk-adapter-http-axum
//!
//! HTTP adapter using axum — exposes the account, auth, company, and
//! technician services as a JSON REST API. Every handler resolves the
//! caller explicitly from the bearer token before invoking a service;
//! authorization itself lives in the application layer.

pub mod api;
pub mod error;
pub mod extract;
pub mod router;
pub mod state;
