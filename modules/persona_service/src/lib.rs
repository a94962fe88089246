//! Persona Service Module
//!
//! Persistence for an authentication-backed application: users, linked
//! provider accounts, sessions, single-use verification tokens, posts and
//! business/customer personas, on SQLite or PostgreSQL.

// Public exports
pub mod contract;
pub use contract::{
    client::AuthStoreApi, error::PersonaError, Account, AccountType, BusinessPersona,
    CustomerPersona, PersonaProfile, Post, Session, SessionAndUser, User, VerificationToken,
};

pub mod module;
pub use module::PersonaServiceModule;

pub use config::Config;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
