//! Post operations

use super::{next_updated_at, storage_error, Service};
use crate::contract::{AuthorPostCount, NewPost, Page, PersonaError, Post, PostPatch, PostQuery};
use crate::domain::events::PersonaEvent;
use crate::domain::validation::normalize_post_name;
use chrono::Utc;
use tracing::instrument;

impl Service {
    /// Create a post; the author must exist
    #[instrument(skip(self, new_post), fields(created_by_id = %new_post.created_by_id))]
    pub async fn create_post(&self, new_post: NewPost) -> Result<Post, PersonaError> {
        let name = normalize_post_name(&new_post.name)?;
        self.require_user(&new_post.created_by_id).await?;

        let created = self
            .repos
            .posts
            .create(&name, &new_post.created_by_id, Utc::now())
            .await
            .map_err(|e| storage_error("post", Some(&new_post.created_by_id), e))?;

        self.publish(PersonaEvent::PostCreated {
            post_id: created.id,
            created_by_id: created.created_by_id.clone(),
            timestamp: created.created_at,
        })
        .await;

        Ok(created)
    }

    pub async fn get_post(&self, id: i32) -> Result<Post, PersonaError> {
        self.repos
            .posts
            .find_by_id(id)
            .await
            .map_err(|e| storage_error("post", None, e))?
            .ok_or_else(|| PersonaError::not_found("post", id))
    }

    /// Most recently created post of an author
    pub async fn get_latest_post(&self, created_by_id: &str) -> Result<Option<Post>, PersonaError> {
        self.repos
            .posts
            .find_latest_by_author(created_by_id)
            .await
            .map_err(|e| storage_error("post", None, e))
    }

    /// Update a post; `updated_at` is refreshed, `created_at` kept
    #[instrument(skip(self, patch))]
    pub async fn update_post(&self, id: i32, patch: PostPatch) -> Result<Post, PersonaError> {
        let mut post = self.get_post(id).await?;

        if let Some(name) = patch.name {
            post.name = normalize_post_name(&name)?;
        }
        post.updated_at = next_updated_at(post.updated_at, post.created_at);

        let updated = self
            .repos
            .posts
            .update(&post)
            .await
            .map_err(|e| storage_error("post", None, e))?;

        self.publish(PersonaEvent::PostUpdated {
            post_id: updated.id,
            timestamp: updated.updated_at,
        })
        .await;

        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: i32) -> Result<(), PersonaError> {
        let deleted = self
            .repos
            .posts
            .delete(id)
            .await
            .map_err(|e| storage_error("post", None, e))?;

        if !deleted {
            return Err(PersonaError::not_found("post", id));
        }

        self.publish(PersonaEvent::PostDeleted {
            post_id: id,
            timestamp: Utc::now(),
        })
        .await;

        Ok(())
    }

    /// Filtered, ordered, paginated listing
    pub async fn list_posts(&self, mut query: PostQuery) -> Result<Page<Post>, PersonaError> {
        query.page = self.resolve_page(query.page)?;

        let (items, total) = self
            .repos
            .posts
            .list(&query)
            .await
            .map_err(|e| storage_error("post", None, e))?;

        Ok(Page {
            items,
            total,
            limit: query.page.limit,
            offset: query.page.offset,
        })
    }

    /// Number of posts per author
    pub async fn count_posts_by_author(&self) -> Result<Vec<AuthorPostCount>, PersonaError> {
        self.repos
            .posts
            .count_by_author()
            .await
            .map_err(|e| storage_error("post", None, e))
    }
}
