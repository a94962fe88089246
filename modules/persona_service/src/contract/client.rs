//! Native client trait for inter-module communication
//!
//! This is the surface an authentication layer needs from the store.
//! NO HTTP - direct function calls for performance.

use super::{
    error::PersonaError,
    model::{
        Account, NewAccount, NewSession, NewUser, NewVerificationToken, Session, SessionAndUser,
        User, UserPatch, VerificationToken,
    },
};
use async_trait::async_trait;

/// Authentication storage API for inter-module communication
#[async_trait]
pub trait AuthStoreApi: Send + Sync {
    // ===== Users =====

    async fn create_user(&self, user: NewUser) -> Result<User, PersonaError>;

    async fn get_user(&self, id: &str) -> Result<Option<User>, PersonaError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, PersonaError>;

    /// Resolve the local user linked to a provider account
    async fn get_user_by_account(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<Option<User>, PersonaError>;

    async fn update_user(&self, id: &str, patch: UserPatch) -> Result<User, PersonaError>;

    /// Delete a user together with accounts, sessions and posts
    async fn delete_user(&self, id: &str) -> Result<(), PersonaError>;

    // ===== Provider accounts =====

    async fn link_account(&self, account: NewAccount) -> Result<Account, PersonaError>;

    async fn unlink_account(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<(), PersonaError>;

    // ===== Sessions =====

    async fn create_session(&self, session: NewSession) -> Result<Session, PersonaError>;

    /// Returns `None` for unknown or expired sessions
    async fn get_session_and_user(
        &self,
        session_token: &str,
    ) -> Result<Option<SessionAndUser>, PersonaError>;

    /// Slide the session expiry forward if it is due
    async fn touch_session(&self, session_token: &str) -> Result<Session, PersonaError>;

    async fn delete_session(&self, session_token: &str) -> Result<(), PersonaError>;

    // ===== Verification tokens =====

    async fn create_verification_token(
        &self,
        token: NewVerificationToken,
    ) -> Result<VerificationToken, PersonaError>;

    /// Consume a token; a second call for the same token returns `None`
    async fn use_verification_token(
        &self,
        identifier: &str,
        token: &str,
    ) -> Result<Option<VerificationToken>, PersonaError>;
}
