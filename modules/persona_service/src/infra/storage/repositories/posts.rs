use super::{db_err, order_of};
use crate::contract::{AuthorPostCount, Post, PostQuery, SortOrder};
use crate::domain::repository::PostRepository;
use crate::infra::storage::entity::post;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    prelude::Expr,
    sea_query::LikeExpr,
    ActiveValue::{NotSet, Set},
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use std::sync::Arc;

const LIKE_ESCAPE: char = '\\';

/// Make LIKE wildcards in user input match literally
fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

pub struct SeaOrmPostRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmPostRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostRepository for SeaOrmPostRepository {
    async fn create(&self, name: &str, created_by_id: &str, now: DateTime<Utc>) -> Result<Post> {
        let active = post::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            created_by_id: Set(created_by_id.to_string()),
        };

        let result = post::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await
            .map_err(db_err)?;

        Ok(result.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Post>> {
        let result = post::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(Into::into))
    }

    async fn find_latest_by_author(&self, created_by_id: &str) -> Result<Option<Post>> {
        let result = post::Entity::find()
            .filter(post::Column::CreatedById.eq(created_by_id))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .one(&*self.db)
            .await?;

        Ok(result.map(Into::into))
    }

    async fn update(&self, post: &Post) -> Result<Post> {
        let active: post::ActiveModel = post.into();
        let result = post::Entity::update(active)
            .exec(&*self.db)
            .await
            .map_err(db_err)?;

        Ok(result.into())
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let result = post::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn list(&self, query: &PostQuery) -> Result<(Vec<Post>, u64)> {
        let mut select = post::Entity::find();

        if let Some(owner) = &query.created_by_id {
            select = select.filter(post::Column::CreatedById.eq(owner.as_str()));
        }
        if let Some(fragment) = &query.name_contains {
            let pattern = format!("%{}%", escape_like(fragment));
            select = select.filter(
                Expr::col(post::Column::Name).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)),
            );
        }
        // Keyset cursor follows the requested direction
        if let Some(after_id) = query.after_id {
            select = match query.order {
                SortOrder::Asc => select.filter(post::Column::Id.gt(after_id)),
                SortOrder::Desc => select.filter(post::Column::Id.lt(after_id)),
            };
        }

        let total = select.clone().count(&*self.db).await?;

        let order = order_of(query.order);
        let results = select
            .order_by(post::Column::CreatedAt, order.clone())
            .order_by(post::Column::Id, order)
            .limit(query.page.limit)
            .offset(query.page.offset)
            .all(&*self.db)
            .await?;

        Ok((results.into_iter().map(Into::into).collect(), total))
    }

    async fn count_by_author(&self) -> Result<Vec<AuthorPostCount>> {
        let rows: Vec<(String, i64)> = post::Entity::find()
            .select_only()
            .column(post::Column::CreatedById)
            .column_as(Expr::col(post::Column::Id).count(), "post_count")
            .group_by(post::Column::CreatedById)
            .order_by_asc(post::Column::CreatedById)
            .into_tuple()
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(created_by_id, post_count)| AuthorPostCount {
                created_by_id,
                post_count,
            })
            .collect())
    }
}
