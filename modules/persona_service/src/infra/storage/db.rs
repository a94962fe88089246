//! Connection setup

use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend};
use std::time::Duration;

/// Recycling the only connection of an in-memory database would drop its data
const IN_MEMORY_LIFETIME: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Open a pool for `dsn`.
///
/// In-memory SQLite databases live only as long as their connection, so the
/// pool is pinned to exactly one.
pub async fn connect(dsn: &str, max_connections: u32) -> Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(dsn.to_owned());
    if is_in_memory(dsn) {
        opts.max_connections(1)
            .min_connections(1)
            .max_lifetime(IN_MEMORY_LIFETIME)
            .idle_timeout(IN_MEMORY_LIFETIME);
    } else {
        opts.max_connections(max_connections.max(1));
    }
    opts.sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .with_context(|| format!("failed to connect to {} database", scheme(dsn)))?;

    if db.get_database_backend() == DbBackend::Sqlite {
        // cascades and SET NULL owners depend on it
        db.execute_unprepared("PRAGMA foreign_keys = ON")
            .await
            .context("failed to enable SQLite foreign keys")?;
    }

    tracing::debug!(backend = scheme(dsn), "database connected");
    Ok(db)
}

fn is_in_memory(dsn: &str) -> bool {
    dsn.starts_with("sqlite::memory:") || dsn.contains("mode=memory")
}

/// DSN scheme without credentials, for messages
fn scheme(dsn: &str) -> &str {
    dsn.split(':').next().unwrap_or("unknown")
}
