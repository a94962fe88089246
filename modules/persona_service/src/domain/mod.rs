//! Domain layer - business logic and services

pub mod events;
pub mod repository;
pub mod service;
pub mod tokens;
pub mod validation;

pub use events::{
    EventPublisher, NoOpEventPublisher, PersonaEvent, PersonaKind, TracingEventPublisher,
};
pub use repository::{
    AccountRepository, ConstraintViolation, PersonaRepository, PostRepository, Repositories,
    SessionRepository, UserRepository, VerificationTokenRepository,
};
pub use service::Service;
