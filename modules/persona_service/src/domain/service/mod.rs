//! Domain service - business logic orchestration

use super::events::{EventPublisher, PersonaEvent};
use super::repository::{ConstraintViolation, Repositories};
use crate::config::Config;
use crate::contract::{PageRequest, PersonaError, SweepReport};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::instrument;

mod accounts;
mod personas;
mod posts;
mod sessions;
mod users;
mod verification;

/// Domain service for users, auth records, posts and personas
pub struct Service {
    repos: Repositories,
    event_publisher: Arc<dyn EventPublisher>,
    config: Config,
}

impl Service {
    /// Create a new service instance
    pub fn new(
        repos: Repositories,
        event_publisher: Arc<dyn EventPublisher>,
        config: Config,
    ) -> Self {
        Self {
            repos,
            event_publisher,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ===== Maintenance =====

    /// Delete expired sessions and verification tokens
    #[instrument(skip(self))]
    pub async fn sweep_expired(&self) -> Result<SweepReport, PersonaError> {
        let now = Utc::now();

        let sessions = self
            .repos
            .sessions
            .delete_expired(now)
            .await
            .map_err(|e| storage_error("session", None, e))?;

        let verification_tokens = self
            .repos
            .verification_tokens
            .delete_expired(now)
            .await
            .map_err(|e| storage_error("verification_token", None, e))?;

        if sessions > 0 || verification_tokens > 0 {
            tracing::info!(sessions, verification_tokens, "swept expired records");
        }

        Ok(SweepReport {
            sessions,
            verification_tokens,
        })
    }

    // ===== Helper Methods =====

    /// Publish after a successful write; failures are logged, never returned
    async fn publish(&self, event: PersonaEvent) {
        let name = event.name();
        if let Err(e) = self.event_publisher.publish(event).await {
            tracing::warn!(event = name, error = %e, "failed to publish event");
        }
    }

    /// Ensure a referenced user exists
    async fn require_user(&self, user_id: &str) -> Result<(), PersonaError> {
        let exists = self
            .repos
            .users
            .exists(user_id)
            .await
            .map_err(|e| storage_error("user", None, e))?;

        if !exists {
            return Err(PersonaError::invalid_reference("user", user_id));
        }
        Ok(())
    }

    /// Apply configured defaults and bounds to a page request.
    ///
    /// Offsets are bound as signed 64-bit integers by the database drivers.
    fn resolve_page(&self, page: PageRequest) -> Result<PageRequest, PersonaError> {
        if i64::try_from(page.offset).is_err() {
            return Err(PersonaError::validation(format!(
                "offset must not exceed {}",
                i64::MAX
            )));
        }
        Ok(PageRequest {
            limit: self.config.page_limit(page.limit),
            offset: page.offset,
        })
    }
}

/// Timestamp for a mutation: never earlier than the previous `updated_at`
/// or the creation time
fn next_updated_at(previous: DateTime<Utc>, created_at: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous).max(created_at)
}

/// Map a repository failure onto the contract error.
///
/// `reference` is the user id a foreign key violation should be reported for.
fn storage_error(
    resource: &'static str,
    reference: Option<&str>,
    err: anyhow::Error,
) -> PersonaError {
    match err.downcast_ref::<ConstraintViolation>() {
        Some(ConstraintViolation::Unique(detail)) => {
            tracing::debug!(resource, %detail, "unique constraint violation");
            PersonaError::conflict(format!("{resource} already exists"))
        }
        Some(ConstraintViolation::ForeignKey(detail)) => {
            tracing::debug!(resource, %detail, "foreign key violation");
            PersonaError::invalid_reference("user", reference.unwrap_or("unknown"))
        }
        None => {
            tracing::error!(resource, error = ?err, "storage operation failed");
            PersonaError::Internal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_next_updated_at_never_moves_backwards() {
        let future = Utc::now() + Duration::hours(1);
        assert_eq!(next_updated_at(future, future - Duration::hours(2)), future);

        let past = Utc::now() - Duration::hours(1);
        assert!(next_updated_at(past, past) > past);
    }

    #[test]
    fn test_storage_error_classification() {
        let err = storage_error(
            "post",
            Some("u1"),
            ConstraintViolation::ForeignKey("FOREIGN KEY constraint failed".into()).into(),
        );
        assert_eq!(err, PersonaError::invalid_reference("user", "u1"));

        let err = storage_error(
            "session",
            None,
            ConstraintViolation::Unique("sessionToken".into()).into(),
        );
        assert!(matches!(err, PersonaError::Conflict { .. }));

        let err = storage_error("user", None, anyhow::anyhow!("connection reset"));
        assert_eq!(err, PersonaError::Internal);
    }
}
