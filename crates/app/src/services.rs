//! Application services — use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic
//! parameters (constructor injection), keeping this layer decoupled from
//! concrete adapters. Every operation takes the [`Caller`] explicitly;
//! nothing reads ambient request state.
//!
//! [`Caller`]: crewdesk_domain::caller::Caller

pub mod account_service;
pub mod auth_service;
pub mod company_service;
pub mod technician_service;
