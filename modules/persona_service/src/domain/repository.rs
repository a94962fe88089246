//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.

use crate::contract::{
    Account, AuthorPostCount, BusinessPersona, CustomerPersona, PersonaQuery, Post, PostQuery,
    Session, User, VerificationToken,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Constraint violations reported by the storage layer.
///
/// Repositories wrap these in `anyhow::Error`; the service downcasts them
/// into conflict and reference errors.
#[derive(Debug, thiserror::Error)]
pub enum ConstraintViolation {
    #[error("unique constraint violated: {0}")]
    Unique(String),
    #[error("foreign key constraint violated: {0}")]
    ForeignKey(String),
}

/// Repository for users
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;

    /// Lookup by already-normalized email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Lookup through the provider account linkage
    async fn find_by_account(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<Option<User>>;

    /// Overwrite all mutable columns
    async fn update(&self, user: &User) -> Result<User>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: &str) -> Result<bool>;

    async fn exists(&self, id: &str) -> Result<bool>;

    /// Page of users ordered by id, plus the total count
    async fn list(&self, limit: u64, offset: u64) -> Result<(Vec<User>, u64)>;
}

/// Repository for provider accounts
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create(&self, account: &Account) -> Result<Account>;

    async fn find_by_provider(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<Option<Account>>;

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Account>>;

    async fn delete_by_provider(&self, provider: &str, provider_account_id: &str)
        -> Result<bool>;
}

/// Repository for sessions
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> Result<Session>;

    async fn find_by_token(&self, session_token: &str) -> Result<Option<Session>>;

    /// Session joined with its owner
    async fn find_with_user(&self, session_token: &str) -> Result<Option<(Session, User)>>;

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Session>>;

    async fn update_expires(
        &self,
        session_token: &str,
        expires: DateTime<Utc>,
    ) -> Result<Option<Session>>;

    async fn delete_by_token(&self, session_token: &str) -> Result<bool>;

    async fn delete_by_user(&self, user_id: &str) -> Result<u64>;

    /// Delete sessions with `expires <= now`
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64>;
}

/// Repository for verification tokens.
///
/// The `token` field of every record crossing this boundary is the stored
/// hash, never the plaintext.
#[async_trait]
pub trait VerificationTokenRepository: Send + Sync {
    async fn create(&self, token: &VerificationToken) -> Result<VerificationToken>;

    async fn find(&self, identifier: &str, token_hash: &str)
        -> Result<Option<VerificationToken>>;

    /// Find and delete in a single transaction
    async fn take(&self, identifier: &str, token_hash: &str)
        -> Result<Option<VerificationToken>>;

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64>;
}

/// Repository for posts
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert with a storage-assigned id
    async fn create(
        &self,
        name: &str,
        created_by_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Post>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Post>>;

    async fn find_latest_by_author(&self, created_by_id: &str) -> Result<Option<Post>>;

    async fn update(&self, post: &Post) -> Result<Post>;

    async fn delete(&self, id: i32) -> Result<bool>;

    /// `query.page.limit` is already resolved by the caller
    async fn list(&self, query: &PostQuery) -> Result<(Vec<Post>, u64)>;

    async fn count_by_author(&self) -> Result<Vec<AuthorPostCount>>;
}

/// Repository for business and customer personas
#[async_trait]
pub trait PersonaRepository: Send + Sync {
    async fn create_business(&self, persona: &BusinessPersona) -> Result<BusinessPersona>;

    async fn find_business(&self, id: &str) -> Result<Option<BusinessPersona>>;

    /// Overwrite descriptive attributes and `updated_at`
    async fn update_business(&self, persona: &BusinessPersona) -> Result<BusinessPersona>;

    async fn delete_business(&self, id: &str) -> Result<bool>;

    async fn list_business(&self, query: &PersonaQuery) -> Result<(Vec<BusinessPersona>, u64)>;

    async fn count_business(&self, query: &PersonaQuery) -> Result<u64>;

    async fn create_customer(&self, persona: &CustomerPersona) -> Result<CustomerPersona>;

    async fn find_customer(&self, id: &str) -> Result<Option<CustomerPersona>>;

    async fn update_customer(&self, persona: &CustomerPersona) -> Result<CustomerPersona>;

    async fn delete_customer(&self, id: &str) -> Result<bool>;

    async fn list_customer(&self, query: &PersonaQuery) -> Result<(Vec<CustomerPersona>, u64)>;

    async fn count_customer(&self, query: &PersonaQuery) -> Result<u64>;
}

/// The full set of repositories the service runs on
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub accounts: Arc<dyn AccountRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub verification_tokens: Arc<dyn VerificationTokenRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub personas: Arc<dyn PersonaRepository>,
}
