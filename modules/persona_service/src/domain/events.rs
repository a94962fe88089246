//! Domain events for persona service
//!
//! Events are emitted after a write has been committed. They carry record
//! identifiers only; secrets such as session or verification tokens never
//! leave the service through this channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which persona table an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaKind {
    Business,
    Customer,
}

/// Domain event types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PersonaEvent {
    UserCreated {
        user_id: String,
        timestamp: DateTime<Utc>,
    },
    UserDeleted {
        user_id: String,
        timestamp: DateTime<Utc>,
    },
    AccountLinked {
        user_id: String,
        provider: String,
        timestamp: DateTime<Utc>,
    },
    AccountUnlinked {
        user_id: String,
        provider: String,
        timestamp: DateTime<Utc>,
    },
    SessionCreated {
        session_id: String,
        user_id: String,
        expires: DateTime<Utc>,
    },
    SessionDeleted {
        session_id: String,
        user_id: String,
        timestamp: DateTime<Utc>,
    },
    VerificationTokenConsumed {
        identifier: String,
        timestamp: DateTime<Utc>,
    },
    PostCreated {
        post_id: i32,
        created_by_id: String,
        timestamp: DateTime<Utc>,
    },
    PostUpdated {
        post_id: i32,
        timestamp: DateTime<Utc>,
    },
    PostDeleted {
        post_id: i32,
        timestamp: DateTime<Utc>,
    },
    PersonaCreated {
        kind: PersonaKind,
        persona_id: String,
        created_by_id: Option<String>,
        timestamp: DateTime<Utc>,
    },
    PersonaUpdated {
        kind: PersonaKind,
        persona_id: String,
        timestamp: DateTime<Utc>,
    },
    PersonaDeleted {
        kind: PersonaKind,
        persona_id: String,
        timestamp: DateTime<Utc>,
    },
}

impl PersonaEvent {
    /// Stable name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserCreated { .. } => "user_created",
            Self::UserDeleted { .. } => "user_deleted",
            Self::AccountLinked { .. } => "account_linked",
            Self::AccountUnlinked { .. } => "account_unlinked",
            Self::SessionCreated { .. } => "session_created",
            Self::SessionDeleted { .. } => "session_deleted",
            Self::VerificationTokenConsumed { .. } => "verification_token_consumed",
            Self::PostCreated { .. } => "post_created",
            Self::PostUpdated { .. } => "post_updated",
            Self::PostDeleted { .. } => "post_deleted",
            Self::PersonaCreated { .. } => "persona_created",
            Self::PersonaUpdated { .. } => "persona_updated",
            Self::PersonaDeleted { .. } => "persona_deleted",
        }
    }
}

/// Event publisher trait for publishing domain events
#[async_trait::async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: PersonaEvent) -> anyhow::Result<()>;
}

/// Publisher that drops every event
pub struct NoOpEventPublisher;

#[async_trait::async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _event: PersonaEvent) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Publisher that writes each event as one structured log line
pub struct TracingEventPublisher;

#[async_trait::async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, event: PersonaEvent) -> anyhow::Result<()> {
        let payload = serde_json::to_string(&event)?;
        tracing::info!(event = event.name(), %payload, "persona event");
        Ok(())
    }
}
