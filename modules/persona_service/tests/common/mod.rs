//! Common test utilities: in-memory database, recording publisher, fixtures
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use parking_lot::Mutex;
use persona_service::config::{Config, IsolationLevel};
use persona_service::contract::{NewUser, User};
use persona_service::domain::{EventPublisher, PersonaEvent, Repositories, Service};
use persona_service::infra::storage::{connect, migrations::Migrator, sea_orm_repositories};
use persona_service::PersonaServiceModule;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

pub const MEMORY_DSN: &str = "sqlite::memory:";

/// Captures every published event in order
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<PersonaEvent>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<PersonaEvent> {
        self.events.lock().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(PersonaEvent::name).collect()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: PersonaEvent) -> anyhow::Result<()> {
        self.events.lock().push(event);
        Ok(())
    }
}

/// A migrated in-memory store with its module, service and event log
pub struct TestEnv {
    pub module: PersonaServiceModule,
    pub service: Arc<Service>,
    pub events: Arc<RecordingPublisher>,
}

pub async fn setup() -> TestEnv {
    setup_with(Config::default()).await
}

pub async fn setup_with(config: Config) -> TestEnv {
    let db = connect(MEMORY_DSN, 1).await.expect("connect sqlite");
    let events = Arc::new(RecordingPublisher::default());
    let module = PersonaServiceModule::with_publisher(db, config, events.clone())
        .expect("module init");
    module.migrate().await.expect("migrations");
    let service = module.service();

    TestEnv {
        module,
        service,
        events,
    }
}

/// Raw repositories over a migrated database, bypassing service checks
pub async fn setup_storage() -> (Arc<DatabaseConnection>, Repositories) {
    let db = Arc::new(connect(MEMORY_DSN, 1).await.expect("connect sqlite"));
    Migrator::up(&*db, None).await.expect("migrations");
    let repos = sea_orm_repositories(db.clone(), IsolationLevel::default());
    (db, repos)
}

pub async fn create_user(service: &Service, email: &str) -> User {
    service
        .create_user(NewUser {
            name: Some(email.split('@').next().unwrap_or("user").to_string()),
            email: Some(email.to_string()),
            ..NewUser::default()
        })
        .await
        .expect("create user")
}

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}
