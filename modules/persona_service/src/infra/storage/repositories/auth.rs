//! Accounts, sessions and verification tokens

use super::db_err;
use crate::config::IsolationLevel;
use crate::contract::{Account, Session, User, VerificationToken};
use crate::domain::repository::{
    AccountRepository, SessionRepository, VerificationTokenRepository,
};
use crate::infra::storage::entity::{account, session, user, verification_token};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DbBackend, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use std::sync::Arc;

// ===== Account Repository =====

pub struct SeaOrmAccountRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmAccountRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for SeaOrmAccountRepository {
    async fn create(&self, account: &Account) -> Result<Account> {
        let active: account::ActiveModel = account.into();
        let result = account::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await
            .map_err(db_err)?;

        result.try_into()
    }

    async fn find_by_provider(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<Option<Account>> {
        let result = account::Entity::find()
            .filter(account::Column::Provider.eq(provider))
            .filter(account::Column::ProviderAccountId.eq(provider_account_id))
            .one(&*self.db)
            .await?;

        result.map(TryInto::try_into).transpose()
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Account>> {
        let results = account::Entity::find()
            .filter(account::Column::UserId.eq(user_id))
            .order_by_asc(account::Column::Provider)
            .order_by_asc(account::Column::ProviderAccountId)
            .all(&*self.db)
            .await?;

        results.into_iter().map(TryInto::try_into).collect()
    }

    async fn delete_by_provider(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<bool> {
        let result = account::Entity::delete_many()
            .filter(account::Column::Provider.eq(provider))
            .filter(account::Column::ProviderAccountId.eq(provider_account_id))
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

// ===== Session Repository =====

pub struct SeaOrmSessionRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmSessionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionRepository for SeaOrmSessionRepository {
    async fn create(&self, session: &Session) -> Result<Session> {
        let active: session::ActiveModel = session.into();
        let result = session::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await
            .map_err(db_err)?;

        Ok(result.into())
    }

    async fn find_by_token(&self, session_token: &str) -> Result<Option<Session>> {
        let result = session::Entity::find()
            .filter(session::Column::SessionToken.eq(session_token))
            .one(&*self.db)
            .await?;

        Ok(result.map(Into::into))
    }

    async fn find_with_user(&self, session_token: &str) -> Result<Option<(Session, User)>> {
        let result = session::Entity::find()
            .filter(session::Column::SessionToken.eq(session_token))
            .find_also_related(user::Entity)
            .one(&*self.db)
            .await?;

        Ok(result.and_then(|(session, owner)| owner.map(|u| (session.into(), u.into()))))
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Session>> {
        let results = session::Entity::find()
            .filter(session::Column::UserId.eq(user_id))
            .order_by_asc(session::Column::Expires)
            .all(&*self.db)
            .await?;

        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn update_expires(
        &self,
        session_token: &str,
        expires: DateTime<Utc>,
    ) -> Result<Option<Session>> {
        let Some(existing) = session::Entity::find()
            .filter(session::Column::SessionToken.eq(session_token))
            .one(&*self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: session::ActiveModel = existing.into();
        active.expires = Set(expires);
        let updated = active.update(&*self.db).await?;

        Ok(Some(updated.into()))
    }

    async fn delete_by_token(&self, session_token: &str) -> Result<bool> {
        let result = session::Entity::delete_many()
            .filter(session::Column::SessionToken.eq(session_token))
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn delete_by_user(&self, user_id: &str) -> Result<u64> {
        let result = session::Entity::delete_many()
            .filter(session::Column::UserId.eq(user_id))
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = session::Entity::delete_many()
            .filter(session::Column::Expires.lte(now))
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

// ===== Verification Token Repository =====

pub struct SeaOrmVerificationTokenRepository {
    db: Arc<DatabaseConnection>,
    isolation_level: IsolationLevel,
}

impl SeaOrmVerificationTokenRepository {
    pub fn new(db: Arc<DatabaseConnection>, isolation_level: IsolationLevel) -> Self {
        Self {
            db,
            isolation_level,
        }
    }

    /// SQLite has a single serializable mode and rejects explicit levels
    fn isolation(&self) -> Option<sea_orm::IsolationLevel> {
        match self.db.get_database_backend() {
            DbBackend::Sqlite => None,
            _ => Some(self.isolation_level.into()),
        }
    }
}

#[async_trait]
impl VerificationTokenRepository for SeaOrmVerificationTokenRepository {
    async fn create(&self, token: &VerificationToken) -> Result<VerificationToken> {
        let active: verification_token::ActiveModel = token.into();
        let result = verification_token::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await
            .map_err(db_err)?;

        Ok(result.into())
    }

    async fn find(
        &self,
        identifier: &str,
        token_hash: &str,
    ) -> Result<Option<VerificationToken>> {
        let result = verification_token::Entity::find_by_id((
            identifier.to_string(),
            token_hash.to_string(),
        ))
        .one(&*self.db)
        .await?;

        Ok(result.map(Into::into))
    }

    async fn take(
        &self,
        identifier: &str,
        token_hash: &str,
    ) -> Result<Option<VerificationToken>> {
        let key = (identifier.to_string(), token_hash.to_string());
        let txn = self.db.begin_with_config(self.isolation(), None).await?;

        let Some(found) = verification_token::Entity::find_by_id(key.clone())
            .one(&txn)
            .await?
        else {
            txn.rollback().await?;
            return Ok(None);
        };

        let deleted = verification_token::Entity::delete_by_id(key)
            .exec(&txn)
            .await?;
        txn.commit().await?;

        // A concurrent consumer won the race
        if deleted.rows_affected == 0 {
            return Ok(None);
        }

        Ok(Some(found.into()))
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = verification_token::Entity::delete_many()
            .filter(verification_token::Column::Expires.lte(now))
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
