//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models and the native client trait.
//! NO serde derives on models - these are pure domain types.

pub mod client;
pub mod error;
pub mod model;

pub use client::AuthStoreApi;
pub use error::PersonaError;
pub use model::{
    Account, AccountType, AuthorPostCount, BusinessPersona, BusinessPersonaUpdate,
    CustomerPersona, CustomerPersonaUpdate, NewAccount, NewBusinessPersona, NewCustomerPersona,
    NewPost, NewSession, NewUser, NewVerificationToken, Page, PageRequest, PersonaProfile,
    PersonaQuery, Post, PostPatch, PostQuery, Session, SessionAndUser, SortOrder, SweepReport,
    User, UserPatch, VerificationToken,
};
