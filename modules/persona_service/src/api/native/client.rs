//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    Account, AuthStoreApi, NewAccount, NewSession, NewUser, NewVerificationToken, PersonaError,
    Session, SessionAndUser, User, UserPatch, VerificationToken,
};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;

/// Native client implementation that directly calls the domain service.
///
/// This is what an authentication layer embedded in the same process
/// talks to; no HTTP round-trip is involved.
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl AuthStoreApi for NativeClient {
    async fn create_user(&self, user: NewUser) -> Result<User, PersonaError> {
        self.service.create_user(user).await
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, PersonaError> {
        self.service.get_user(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, PersonaError> {
        self.service.get_user_by_email(email).await
    }

    async fn get_user_by_account(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<Option<User>, PersonaError> {
        self.service
            .get_user_by_account(provider, provider_account_id)
            .await
    }

    async fn update_user(&self, id: &str, patch: UserPatch) -> Result<User, PersonaError> {
        self.service.update_user(id, patch).await
    }

    async fn delete_user(&self, id: &str) -> Result<(), PersonaError> {
        self.service.delete_user(id).await
    }

    async fn link_account(&self, account: NewAccount) -> Result<Account, PersonaError> {
        self.service.link_account(account).await
    }

    async fn unlink_account(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<(), PersonaError> {
        self.service
            .unlink_account(provider, provider_account_id)
            .await
    }

    async fn create_session(&self, session: NewSession) -> Result<Session, PersonaError> {
        self.service.create_session(session).await
    }

    async fn get_session_and_user(
        &self,
        session_token: &str,
    ) -> Result<Option<SessionAndUser>, PersonaError> {
        self.service.get_session_and_user(session_token).await
    }

    async fn touch_session(&self, session_token: &str) -> Result<Session, PersonaError> {
        self.service.touch_session(session_token).await
    }

    async fn delete_session(&self, session_token: &str) -> Result<(), PersonaError> {
        self.service.delete_session(session_token).await
    }

    async fn create_verification_token(
        &self,
        token: NewVerificationToken,
    ) -> Result<VerificationToken, PersonaError> {
        self.service.create_verification_token(token).await
    }

    async fn use_verification_token(
        &self,
        identifier: &str,
        token: &str,
    ) -> Result<Option<VerificationToken>, PersonaError> {
        self.service.use_verification_token(identifier, token).await
    }
}
