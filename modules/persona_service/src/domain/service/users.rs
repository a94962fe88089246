//! User operations

use super::{storage_error, Service};
use crate::contract::{NewUser, Page, PageRequest, PersonaError, User, UserPatch};
use crate::domain::events::PersonaEvent;
use crate::domain::validation::{normalize_email, validate_image_url};
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

impl Service {
    /// Create a user; email is normalized and must be unused
    #[instrument(skip(self, new_user))]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, PersonaError> {
        let email = new_user.email.as_deref().map(normalize_email).transpose()?;
        if let Some(image) = &new_user.image {
            validate_image_url(image)?;
        }
        if let Some(email) = &email {
            self.ensure_email_free(email, None).await?;
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: new_user.name,
            email,
            email_verified: new_user.email_verified,
            image: new_user.image,
        };

        let created = self
            .repos
            .users
            .create(&user)
            .await
            .map_err(|e| storage_error("user", None, e))?;

        tracing::info!(user_id = %created.id, "user created");
        self.publish(PersonaEvent::UserCreated {
            user_id: created.id.clone(),
            timestamp: Utc::now(),
        })
        .await;

        Ok(created)
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<User>, PersonaError> {
        self.repos
            .users
            .find_by_id(id)
            .await
            .map_err(|e| storage_error("user", None, e))
    }

    /// Lookup by email; the argument is normalized the same way as on write
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, PersonaError> {
        let email = normalize_email(email)?;
        self.repos
            .users
            .find_by_email(&email)
            .await
            .map_err(|e| storage_error("user", None, e))
    }

    pub async fn get_user_by_account(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<Option<User>, PersonaError> {
        self.repos
            .users
            .find_by_account(provider, provider_account_id)
            .await
            .map_err(|e| storage_error("user", None, e))
    }

    /// Apply a partial update
    #[instrument(skip(self, patch))]
    pub async fn update_user(&self, id: &str, patch: UserPatch) -> Result<User, PersonaError> {
        let mut user = self
            .get_user(id)
            .await?
            .ok_or_else(|| PersonaError::not_found("user", id))?;

        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(email) = patch.email {
            let email = email.as_deref().map(normalize_email).transpose()?;
            if let Some(email) = &email {
                self.ensure_email_free(email, Some(id)).await?;
            }
            user.email = email;
        }
        if let Some(email_verified) = patch.email_verified {
            user.email_verified = email_verified;
        }
        if let Some(image) = patch.image {
            if let Some(image) = &image {
                validate_image_url(image)?;
            }
            user.image = image;
        }

        self.repos
            .users
            .update(&user)
            .await
            .map_err(|e| storage_error("user", None, e))
    }

    /// Delete a user.
    ///
    /// Accounts, sessions and posts go with it; personas stay and lose
    /// their owner.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: &str) -> Result<(), PersonaError> {
        let deleted = self
            .repos
            .users
            .delete(id)
            .await
            .map_err(|e| storage_error("user", None, e))?;

        if !deleted {
            return Err(PersonaError::not_found("user", id));
        }

        tracing::info!(user_id = %id, "user deleted");
        self.publish(PersonaEvent::UserDeleted {
            user_id: id.to_string(),
            timestamp: Utc::now(),
        })
        .await;

        Ok(())
    }

    pub async fn list_users(&self, page: PageRequest) -> Result<Page<User>, PersonaError> {
        let page = self.resolve_page(page)?;
        let (items, total) = self
            .repos
            .users
            .list(page.limit, page.offset)
            .await
            .map_err(|e| storage_error("user", None, e))?;

        Ok(Page {
            items,
            total,
            limit: page.limit,
            offset: page.offset,
        })
    }

    /// Conflict if another user already owns `email`
    async fn ensure_email_free(
        &self,
        email: &str,
        current_user: Option<&str>,
    ) -> Result<(), PersonaError> {
        let owner = self
            .repos
            .users
            .find_by_email(email)
            .await
            .map_err(|e| storage_error("user", None, e))?;

        match owner {
            Some(owner) if Some(owner.id.as_str()) != current_user => Err(
                PersonaError::conflict(format!("email already in use: {email}")),
            ),
            _ => Ok(()),
        }
    }
}
