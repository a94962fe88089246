//! Session operations

use super::{storage_error, Service};
use crate::contract::{NewSession, PersonaError, Session, SessionAndUser};
use crate::domain::events::PersonaEvent;
use crate::domain::tokens::generate_token;
use crate::domain::validation::require_non_empty;
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

impl Service {
    /// Start a session for an existing user
    #[instrument(skip(self, new_session), fields(user_id = %new_session.user_id))]
    pub async fn create_session(&self, new_session: NewSession) -> Result<Session, PersonaError> {
        self.require_user(&new_session.user_id).await?;

        let session_token = match new_session.session_token {
            Some(token) => {
                require_non_empty("session_token", &token)?;
                token
            }
            None => generate_token(),
        };

        let existing = self
            .repos
            .sessions
            .find_by_token(&session_token)
            .await
            .map_err(|e| storage_error("session", None, e))?;
        if existing.is_some() {
            return Err(PersonaError::conflict("session token already in use"));
        }

        let session = Session {
            id: Uuid::new_v4().to_string(),
            session_token,
            user_id: new_session.user_id,
            expires: new_session
                .expires
                .unwrap_or_else(|| Utc::now() + self.config.session_max_age()),
        };

        let created = self
            .repos
            .sessions
            .create(&session)
            .await
            .map_err(|e| storage_error("session", Some(&session.user_id), e))?;

        self.publish(PersonaEvent::SessionCreated {
            session_id: created.id.clone(),
            user_id: created.user_id.clone(),
            expires: created.expires,
        })
        .await;

        Ok(created)
    }

    /// Resolve a bearer token to its session and user.
    ///
    /// Expired sessions are removed on sight and reported as absent.
    #[instrument(skip_all)]
    pub async fn get_session_and_user(
        &self,
        session_token: &str,
    ) -> Result<Option<SessionAndUser>, PersonaError> {
        let found = self
            .repos
            .sessions
            .find_with_user(session_token)
            .await
            .map_err(|e| storage_error("session", None, e))?;

        let Some((session, user)) = found else {
            return Ok(None);
        };

        if session.is_expired_at(Utc::now()) {
            tracing::debug!(session_id = %session.id, "dropping expired session");
            self.remove_session(&session).await?;
            return Ok(None);
        }

        Ok(Some(SessionAndUser { session, user }))
    }

    /// Sliding expiry: extend to `now + session_max_age` once the session
    /// was last extended more than `session_update_age` ago
    #[instrument(skip_all)]
    pub async fn touch_session(&self, session_token: &str) -> Result<Session, PersonaError> {
        let now = Utc::now();
        let session = self
            .repos
            .sessions
            .find_by_token(session_token)
            .await
            .map_err(|e| storage_error("session", None, e))?
            .filter(|s| !s.is_expired_at(now))
            .ok_or_else(|| PersonaError::not_found("session", "<token>"))?;

        let max_age = self.config.session_max_age();
        let update_age = self.config.session_update_age();
        let last_extended = session.expires - max_age;
        if last_extended + update_age > now {
            return Ok(session);
        }

        self.repos
            .sessions
            .update_expires(session_token, now + max_age)
            .await
            .map_err(|e| storage_error("session", None, e))?
            .ok_or_else(|| PersonaError::not_found("session", "<token>"))
    }

    /// End a session (sign out)
    #[instrument(skip_all)]
    pub async fn delete_session(&self, session_token: &str) -> Result<(), PersonaError> {
        let session = self
            .repos
            .sessions
            .find_by_token(session_token)
            .await
            .map_err(|e| storage_error("session", None, e))?
            .ok_or_else(|| PersonaError::not_found("session", "<token>"))?;

        self.remove_session(&session).await
    }

    /// End every session of a user; returns how many were removed
    #[instrument(skip(self))]
    pub async fn delete_sessions_for_user(&self, user_id: &str) -> Result<u64, PersonaError> {
        self.repos
            .sessions
            .delete_by_user(user_id)
            .await
            .map_err(|e| storage_error("session", None, e))
    }

    pub async fn list_sessions_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Session>, PersonaError> {
        self.repos
            .sessions
            .find_by_user(user_id)
            .await
            .map_err(|e| storage_error("session", None, e))
    }

    async fn remove_session(&self, session: &Session) -> Result<(), PersonaError> {
        self.repos
            .sessions
            .delete_by_token(&session.session_token)
            .await
            .map_err(|e| storage_error("session", None, e))?;

        self.publish(PersonaEvent::SessionDeleted {
            session_id: session.id.clone(),
            user_id: session.user_id.clone(),
            timestamp: Utc::now(),
        })
        .await;

        Ok(())
    }
}
