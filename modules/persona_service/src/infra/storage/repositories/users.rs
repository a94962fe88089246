use super::db_err;
use crate::contract::User;
use crate::domain::repository::UserRepository;
use crate::infra::storage::entity::{account, user};
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use std::sync::Arc;

pub struct SeaOrmUserRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmUserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, user: &User) -> Result<User> {
        let active: user::ActiveModel = user.into();
        let result = user::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await
            .map_err(db_err)?;

        Ok(result.into())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let result = user::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let result = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await?;

        Ok(result.map(Into::into))
    }

    async fn find_by_account(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<Option<User>> {
        let result = account::Entity::find()
            .filter(account::Column::Provider.eq(provider))
            .filter(account::Column::ProviderAccountId.eq(provider_account_id))
            .find_also_related(user::Entity)
            .one(&*self.db)
            .await?;

        Ok(result.and_then(|(_, owner)| owner).map(Into::into))
    }

    async fn update(&self, user: &User) -> Result<User> {
        let active: user::ActiveModel = user.into();
        let result = user::Entity::update(active)
            .exec(&*self.db)
            .await
            .map_err(db_err)?;

        Ok(result.into())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = user::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        let count = user::Entity::find()
            .filter(user::Column::Id.eq(id))
            .count(&*self.db)
            .await?;

        Ok(count > 0)
    }

    async fn list(&self, limit: u64, offset: u64) -> Result<(Vec<User>, u64)> {
        let total = user::Entity::find().count(&*self.db).await?;
        let results = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&*self.db)
            .await?;

        Ok((results.into_iter().map(Into::into).collect(), total))
    }
}
