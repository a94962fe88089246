//! Provider account operations

use super::{storage_error, Service};
use crate::contract::{Account, NewAccount, PersonaError};
use crate::domain::events::PersonaEvent;
use crate::domain::validation::require_non_empty;
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

impl Service {
    /// Link an external provider account to an existing user
    #[instrument(skip(self, new_account), fields(provider = %new_account.provider, user_id = %new_account.user_id))]
    pub async fn link_account(&self, new_account: NewAccount) -> Result<Account, PersonaError> {
        require_non_empty("provider", &new_account.provider)?;
        require_non_empty("provider_account_id", &new_account.provider_account_id)?;
        self.require_user(&new_account.user_id).await?;

        let existing = self
            .repos
            .accounts
            .find_by_provider(&new_account.provider, &new_account.provider_account_id)
            .await
            .map_err(|e| storage_error("account", None, e))?;
        if existing.is_some() {
            return Err(PersonaError::conflict(format!(
                "account already linked: {}/{}",
                new_account.provider, new_account.provider_account_id
            )));
        }

        let account = Account {
            id: Uuid::new_v4().to_string(),
            user_id: new_account.user_id,
            account_type: new_account.account_type,
            provider: new_account.provider,
            provider_account_id: new_account.provider_account_id,
            refresh_token: new_account.refresh_token,
            access_token: new_account.access_token,
            expires_at: new_account.expires_at,
            token_type: new_account.token_type,
            scope: new_account.scope,
            id_token: new_account.id_token,
            session_state: new_account.session_state,
            refresh_token_expires_in: new_account.refresh_token_expires_in,
        };

        let created = self
            .repos
            .accounts
            .create(&account)
            .await
            .map_err(|e| storage_error("account", Some(&account.user_id), e))?;

        self.publish(PersonaEvent::AccountLinked {
            user_id: created.user_id.clone(),
            provider: created.provider.clone(),
            timestamp: Utc::now(),
        })
        .await;

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn unlink_account(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<(), PersonaError> {
        let account = self
            .get_account(provider, provider_account_id)
            .await?
            .ok_or_else(|| {
                PersonaError::not_found("account", format!("{provider}/{provider_account_id}"))
            })?;

        self.repos
            .accounts
            .delete_by_provider(provider, provider_account_id)
            .await
            .map_err(|e| storage_error("account", None, e))?;

        self.publish(PersonaEvent::AccountUnlinked {
            user_id: account.user_id,
            provider: account.provider,
            timestamp: Utc::now(),
        })
        .await;

        Ok(())
    }

    pub async fn get_account(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<Option<Account>, PersonaError> {
        self.repos
            .accounts
            .find_by_provider(provider, provider_account_id)
            .await
            .map_err(|e| storage_error("account", None, e))
    }

    pub async fn list_accounts_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Account>, PersonaError> {
        self.repos
            .accounts
            .find_by_user(user_id)
            .await
            .map_err(|e| storage_error("account", None, e))
    }
}
