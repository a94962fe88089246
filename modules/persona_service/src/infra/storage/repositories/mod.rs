//! SeaORM repository implementations

mod auth;
mod personas;
mod posts;
mod users;

pub use auth::{
    SeaOrmAccountRepository, SeaOrmSessionRepository, SeaOrmVerificationTokenRepository,
};
pub use personas::SeaOrmPersonaRepository;
pub use posts::SeaOrmPostRepository;
pub use users::SeaOrmUserRepository;

use crate::config::IsolationLevel;
use crate::contract::SortOrder;
use crate::domain::repository::{ConstraintViolation, Repositories};
use sea_orm::{DatabaseConnection, DbErr, Order, SqlErr};
use std::sync::Arc;

/// Build the full repository set on one connection pool
pub fn sea_orm_repositories(
    db: Arc<DatabaseConnection>,
    isolation_level: IsolationLevel,
) -> Repositories {
    Repositories {
        users: Arc::new(SeaOrmUserRepository::new(db.clone())),
        accounts: Arc::new(SeaOrmAccountRepository::new(db.clone())),
        sessions: Arc::new(SeaOrmSessionRepository::new(db.clone())),
        verification_tokens: Arc::new(SeaOrmVerificationTokenRepository::new(
            db.clone(),
            isolation_level,
        )),
        posts: Arc::new(SeaOrmPostRepository::new(db.clone())),
        personas: Arc::new(SeaOrmPersonaRepository::new(db)),
    }
}

/// Lift constraint failures out of the driver error so the service can
/// classify them; everything else passes through untouched.
pub(crate) fn db_err(err: DbErr) -> anyhow::Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            ConstraintViolation::Unique(detail).into()
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            ConstraintViolation::ForeignKey(detail).into()
        }
        _ => err.into(),
    }
}

pub(crate) fn order_of(order: SortOrder) -> Order {
    match order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    }
}
