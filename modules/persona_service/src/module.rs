//! Module wiring and lifecycle

use crate::api::native::NativeClient;
use crate::api::rest;
use crate::config::Config;
use crate::contract::AuthStoreApi;
use crate::domain::{EventPublisher, Service, TracingEventPublisher};
use crate::infra::storage::{migrations::Migrator, sea_orm_repositories};
use anyhow::{Context, Result};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Persona service module: owns the connection, service and transports
pub struct PersonaServiceModule {
    db: Arc<DatabaseConnection>,
    service: Arc<Service>,
}

impl PersonaServiceModule {
    /// Build the module with the default tracing event publisher
    pub fn init(db: DatabaseConnection, config: Config) -> Result<Self> {
        Self::with_publisher(db, config, Arc::new(TracingEventPublisher))
    }

    pub fn with_publisher(
        db: DatabaseConnection,
        config: Config,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Result<Self> {
        config.validate().context("invalid persona_service config")?;

        let db = Arc::new(db);
        let repos = sea_orm_repositories(db.clone(), config.isolation_level);
        let service = Arc::new(Service::new(repos, event_publisher, config));

        tracing::info!("Persona service initialized");
        Ok(Self { db, service })
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> Result<()> {
        Migrator::up(&*self.db, None)
            .await
            .context("persona service migrations failed")?;
        tracing::info!("Persona service migrations completed");
        Ok(())
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// In-process client for an embedding authentication layer
    pub fn client(&self) -> Arc<dyn AuthStoreApi> {
        Arc::new(NativeClient::new(self.service.clone()))
    }

    /// REST routes for this module
    pub fn router(&self) -> axum::Router {
        tracing::info!("Registering persona service REST routes");
        rest::register_routes(axum::Router::new(), self.service.clone())
    }

    /// Background entry point: sweeps expired sessions and tokens until cancelled
    pub async fn serve(self: Arc<Self>, cancel: CancellationToken) -> Result<()> {
        let period = self.service.config().sweep_interval;
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(interval = ?period, "expiry sweeper started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => match self.service.sweep_expired().await {
                    Ok(report) if report.sessions + report.verification_tokens > 0 => {
                        tracing::info!(
                            sessions = report.sessions,
                            verification_tokens = report.verification_tokens,
                            "expired records swept"
                        );
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!(error = %e, "expiry sweep failed"),
                },
            }
        }

        tracing::info!("expiry sweeper stopped");
        Ok(())
    }
}
