//! Verification token operations

use super::{storage_error, Service};
use crate::contract::{NewVerificationToken, PersonaError, VerificationToken};
use crate::domain::events::PersonaEvent;
use crate::domain::tokens::{generate_token, hash_token};
use crate::domain::validation::require_non_empty;
use chrono::Utc;
use tracing::instrument;

impl Service {
    /// Start a verification flow.
    ///
    /// Only the hash is stored; the returned record carries the plaintext
    /// token, which cannot be recovered later.
    #[instrument(skip(self, new_token), fields(identifier = %new_token.identifier))]
    pub async fn create_verification_token(
        &self,
        new_token: NewVerificationToken,
    ) -> Result<VerificationToken, PersonaError> {
        require_non_empty("identifier", &new_token.identifier)?;
        let plaintext = match new_token.token {
            Some(token) => {
                require_non_empty("token", &token)?;
                token
            }
            None => generate_token(),
        };

        let stored = VerificationToken {
            identifier: new_token.identifier,
            token: hash_token(&plaintext, &self.config.token_secret),
            expires: new_token
                .expires
                .unwrap_or_else(|| Utc::now() + self.config.verification_token_max_age()),
        };

        let existing = self
            .repos
            .verification_tokens
            .find(&stored.identifier, &stored.token)
            .await
            .map_err(|e| storage_error("verification_token", None, e))?;
        if existing.is_some() {
            return Err(PersonaError::conflict(format!(
                "verification token already issued for {}",
                stored.identifier
            )));
        }

        let created = self
            .repos
            .verification_tokens
            .create(&stored)
            .await
            .map_err(|e| storage_error("verification_token", None, e))?;

        Ok(VerificationToken {
            token: plaintext,
            ..created
        })
    }

    /// Non-consuming lookup of an unexpired token
    pub async fn get_verification_token(
        &self,
        identifier: &str,
        token: &str,
    ) -> Result<Option<VerificationToken>, PersonaError> {
        let found = self
            .repos
            .verification_tokens
            .find(identifier, &hash_token(token, &self.config.token_secret))
            .await
            .map_err(|e| storage_error("verification_token", None, e))?;

        Ok(found
            .filter(|t| !t.is_expired_at(Utc::now()))
            .map(|t| VerificationToken {
                token: token.to_string(),
                ..t
            }))
    }

    /// Consume a token.
    ///
    /// The record is deleted whether or not it has expired; only an
    /// unexpired token is returned. A second call yields `None`.
    #[instrument(skip(self, token))]
    pub async fn use_verification_token(
        &self,
        identifier: &str,
        token: &str,
    ) -> Result<Option<VerificationToken>, PersonaError> {
        let taken = self
            .repos
            .verification_tokens
            .take(identifier, &hash_token(token, &self.config.token_secret))
            .await
            .map_err(|e| storage_error("verification_token", None, e))?;

        let Some(taken) = taken else {
            return Ok(None);
        };

        if taken.is_expired_at(Utc::now()) {
            tracing::debug!("verification token expired");
            return Ok(None);
        }

        self.publish(PersonaEvent::VerificationTokenConsumed {
            identifier: identifier.to_string(),
            timestamp: Utc::now(),
        })
        .await;

        Ok(Some(VerificationToken {
            token: token.to_string(),
            ..taken
        }))
    }
}
