use super::{db_err, order_of};
use crate::contract::{BusinessPersona, CustomerPersona, PersonaQuery};
use crate::domain::repository::PersonaRepository;
use crate::infra::storage::entity::{business_persona, customer_persona};
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select,
};
use std::sync::Arc;

pub struct SeaOrmPersonaRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmPersonaRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn business_select(query: &PersonaQuery) -> Select<business_persona::Entity> {
    let mut select = business_persona::Entity::find();
    if let Some(owner) = &query.created_by_id {
        select = select.filter(business_persona::Column::CreatedById.eq(owner.as_str()));
    }
    if let Some(country) = &query.country {
        select = select.filter(business_persona::Column::Country.eq(country.as_str()));
    }
    if let Some(business_type) = &query.business_type {
        select = select.filter(business_persona::Column::BusinessType.eq(business_type.as_str()));
    }
    select
}

fn customer_select(query: &PersonaQuery) -> Select<customer_persona::Entity> {
    let mut select = customer_persona::Entity::find();
    if let Some(owner) = &query.created_by_id {
        select = select.filter(customer_persona::Column::CreatedById.eq(owner.as_str()));
    }
    if let Some(country) = &query.country {
        select = select.filter(customer_persona::Column::Country.eq(country.as_str()));
    }
    select
}

#[async_trait]
impl PersonaRepository for SeaOrmPersonaRepository {
    // ===== Business Personas =====

    async fn create_business(&self, persona: &BusinessPersona) -> Result<BusinessPersona> {
        let active: business_persona::ActiveModel = persona.into();
        let result = business_persona::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await
            .map_err(db_err)?;

        Ok(result.into())
    }

    async fn find_business(&self, id: &str) -> Result<Option<BusinessPersona>> {
        let result = business_persona::Entity::find_by_id(id)
            .one(&*self.db)
            .await?;

        Ok(result.map(Into::into))
    }

    async fn update_business(&self, persona: &BusinessPersona) -> Result<BusinessPersona> {
        let mut active: business_persona::ActiveModel = persona.into();
        active.created_at = NotSet;
        active.created_by_id = NotSet;

        let result = business_persona::Entity::update(active)
            .exec(&*self.db)
            .await
            .map_err(db_err)?;

        Ok(result.into())
    }

    async fn delete_business(&self, id: &str) -> Result<bool> {
        let result = business_persona::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn list_business(&self, query: &PersonaQuery) -> Result<(Vec<BusinessPersona>, u64)> {
        let select = business_select(query);
        let total = select.clone().count(&*self.db).await?;

        let order = order_of(query.order);
        let results = select
            .order_by(business_persona::Column::CreatedAt, order.clone())
            .order_by(business_persona::Column::Id, order)
            .limit(query.page.limit)
            .offset(query.page.offset)
            .all(&*self.db)
            .await?;

        Ok((results.into_iter().map(Into::into).collect(), total))
    }

    async fn count_business(&self, query: &PersonaQuery) -> Result<u64> {
        Ok(business_select(query).count(&*self.db).await?)
    }

    // ===== Customer Personas =====

    async fn create_customer(&self, persona: &CustomerPersona) -> Result<CustomerPersona> {
        let active: customer_persona::ActiveModel = persona.into();
        let result = customer_persona::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await
            .map_err(db_err)?;

        Ok(result.into())
    }

    async fn find_customer(&self, id: &str) -> Result<Option<CustomerPersona>> {
        let result = customer_persona::Entity::find_by_id(id)
            .one(&*self.db)
            .await?;

        Ok(result.map(Into::into))
    }

    async fn update_customer(&self, persona: &CustomerPersona) -> Result<CustomerPersona> {
        let mut active: customer_persona::ActiveModel = persona.into();
        active.created_at = NotSet;
        active.created_by_id = NotSet;

        let result = customer_persona::Entity::update(active)
            .exec(&*self.db)
            .await
            .map_err(db_err)?;

        Ok(result.into())
    }

    async fn delete_customer(&self, id: &str) -> Result<bool> {
        let result = customer_persona::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn list_customer(&self, query: &PersonaQuery) -> Result<(Vec<CustomerPersona>, u64)> {
        let select = customer_select(query);
        let total = select.clone().count(&*self.db).await?;

        let order = order_of(query.order);
        let results = select
            .order_by(customer_persona::Column::CreatedAt, order.clone())
            .order_by(customer_persona::Column::Id, order)
            .limit(query.page.limit)
            .offset(query.page.offset)
            .all(&*self.db)
            .await?;

        Ok((results.into_iter().map(Into::into).collect(), total))
    }

    async fn count_customer(&self, query: &PersonaQuery) -> Result<u64> {
        Ok(customer_select(query).count(&*self.db).await?)
    }
}
