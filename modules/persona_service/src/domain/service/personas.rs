//! Business and customer persona operations
//!
//! Unlike posts, personas may be created without an owner. When an owner is
//! given it must exist; deleting that user later leaves the persona in
//! place with no owner.

use super::{next_updated_at, storage_error, Service};
use crate::contract::{
    BusinessPersona, BusinessPersonaUpdate, CustomerPersona, CustomerPersonaUpdate,
    NewBusinessPersona, NewCustomerPersona, Page, PersonaError, PersonaQuery,
};
use crate::domain::events::{PersonaEvent, PersonaKind};
use crate::domain::validation::require_non_empty;
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

impl Service {
    // ===== Business personas =====

    #[instrument(skip(self, new_persona))]
    pub async fn create_business_persona(
        &self,
        new_persona: NewBusinessPersona,
    ) -> Result<BusinessPersona, PersonaError> {
        require_non_empty("business_type", &new_persona.business_type)?;
        if let Some(owner) = &new_persona.created_by_id {
            self.require_user(owner).await?;
        }

        let now = Utc::now();
        let persona = BusinessPersona {
            id: Uuid::new_v4().to_string(),
            business_type: new_persona.business_type,
            profile: new_persona.profile,
            created_by_id: new_persona.created_by_id,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .repos
            .personas
            .create_business(&persona)
            .await
            .map_err(|e| storage_error("business_persona", persona.created_by_id.as_deref(), e))?;

        self.publish_persona_created(
            PersonaKind::Business,
            &created.id,
            created.created_by_id.as_deref(),
        )
        .await;
        Ok(created)
    }

    pub async fn get_business_persona(&self, id: &str) -> Result<BusinessPersona, PersonaError> {
        self.repos
            .personas
            .find_business(id)
            .await
            .map_err(|e| storage_error("business_persona", None, e))?
            .ok_or_else(|| PersonaError::not_found("business_persona", id))
    }

    /// Replace the descriptive attributes; owner and creation time are kept
    #[instrument(skip(self, update))]
    pub async fn update_business_persona(
        &self,
        id: &str,
        update: BusinessPersonaUpdate,
    ) -> Result<BusinessPersona, PersonaError> {
        require_non_empty("business_type", &update.business_type)?;
        let mut persona = self.get_business_persona(id).await?;

        persona.business_type = update.business_type;
        persona.profile = update.profile;
        persona.updated_at = next_updated_at(persona.updated_at, persona.created_at);

        let updated = self
            .repos
            .personas
            .update_business(&persona)
            .await
            .map_err(|e| storage_error("business_persona", None, e))?;

        self.publish(PersonaEvent::PersonaUpdated {
            kind: PersonaKind::Business,
            persona_id: updated.id.clone(),
            timestamp: updated.updated_at,
        })
        .await;
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_business_persona(&self, id: &str) -> Result<(), PersonaError> {
        let deleted = self
            .repos
            .personas
            .delete_business(id)
            .await
            .map_err(|e| storage_error("business_persona", None, e))?;

        if !deleted {
            return Err(PersonaError::not_found("business_persona", id));
        }
        self.publish_persona_deleted(PersonaKind::Business, id).await;
        Ok(())
    }

    pub async fn list_business_personas(
        &self,
        mut query: PersonaQuery,
    ) -> Result<Page<BusinessPersona>, PersonaError> {
        query.page = self.resolve_page(query.page)?;
        let (items, total) = self
            .repos
            .personas
            .list_business(&query)
            .await
            .map_err(|e| storage_error("business_persona", None, e))?;

        Ok(Page {
            items,
            total,
            limit: query.page.limit,
            offset: query.page.offset,
        })
    }

    pub async fn count_business_personas(&self, query: PersonaQuery) -> Result<u64, PersonaError> {
        self.repos
            .personas
            .count_business(&query)
            .await
            .map_err(|e| storage_error("business_persona", None, e))
    }

    // ===== Customer personas =====

    #[instrument(skip(self, new_persona))]
    pub async fn create_customer_persona(
        &self,
        new_persona: NewCustomerPersona,
    ) -> Result<CustomerPersona, PersonaError> {
        if let Some(owner) = &new_persona.created_by_id {
            self.require_user(owner).await?;
        }

        let now = Utc::now();
        let persona = CustomerPersona {
            id: Uuid::new_v4().to_string(),
            profile: new_persona.profile,
            created_by_id: new_persona.created_by_id,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .repos
            .personas
            .create_customer(&persona)
            .await
            .map_err(|e| storage_error("customer_persona", persona.created_by_id.as_deref(), e))?;

        self.publish_persona_created(
            PersonaKind::Customer,
            &created.id,
            created.created_by_id.as_deref(),
        )
        .await;
        Ok(created)
    }

    pub async fn get_customer_persona(&self, id: &str) -> Result<CustomerPersona, PersonaError> {
        self.repos
            .personas
            .find_customer(id)
            .await
            .map_err(|e| storage_error("customer_persona", None, e))?
            .ok_or_else(|| PersonaError::not_found("customer_persona", id))
    }

    #[instrument(skip(self, update))]
    pub async fn update_customer_persona(
        &self,
        id: &str,
        update: CustomerPersonaUpdate,
    ) -> Result<CustomerPersona, PersonaError> {
        let mut persona = self.get_customer_persona(id).await?;

        persona.profile = update.profile;
        persona.updated_at = next_updated_at(persona.updated_at, persona.created_at);

        let updated = self
            .repos
            .personas
            .update_customer(&persona)
            .await
            .map_err(|e| storage_error("customer_persona", None, e))?;

        self.publish(PersonaEvent::PersonaUpdated {
            kind: PersonaKind::Customer,
            persona_id: updated.id.clone(),
            timestamp: updated.updated_at,
        })
        .await;
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_customer_persona(&self, id: &str) -> Result<(), PersonaError> {
        let deleted = self
            .repos
            .personas
            .delete_customer(id)
            .await
            .map_err(|e| storage_error("customer_persona", None, e))?;

        if !deleted {
            return Err(PersonaError::not_found("customer_persona", id));
        }
        self.publish_persona_deleted(PersonaKind::Customer, id).await;
        Ok(())
    }

    pub async fn list_customer_personas(
        &self,
        mut query: PersonaQuery,
    ) -> Result<Page<CustomerPersona>, PersonaError> {
        reject_business_type(&query)?;
        query.page = self.resolve_page(query.page)?;
        let (items, total) = self
            .repos
            .personas
            .list_customer(&query)
            .await
            .map_err(|e| storage_error("customer_persona", None, e))?;

        Ok(Page {
            items,
            total,
            limit: query.page.limit,
            offset: query.page.offset,
        })
    }

    pub async fn count_customer_personas(&self, query: PersonaQuery) -> Result<u64, PersonaError> {
        reject_business_type(&query)?;
        self.repos
            .personas
            .count_customer(&query)
            .await
            .map_err(|e| storage_error("customer_persona", None, e))
    }

    // ===== Helpers =====

    async fn publish_persona_created(
        &self,
        kind: PersonaKind,
        persona_id: &str,
        created_by_id: Option<&str>,
    ) {
        self.publish(PersonaEvent::PersonaCreated {
            kind,
            persona_id: persona_id.to_string(),
            created_by_id: created_by_id.map(str::to_string),
            timestamp: Utc::now(),
        })
        .await;
    }

    async fn publish_persona_deleted(&self, kind: PersonaKind, persona_id: &str) {
        self.publish(PersonaEvent::PersonaDeleted {
            kind,
            persona_id: persona_id.to_string(),
            timestamp: Utc::now(),
        })
        .await;
    }
}

/// Customer personas carry no business type to filter on
fn reject_business_type(query: &PersonaQuery) -> Result<(), PersonaError> {
    if query.business_type.is_some() {
        return Err(PersonaError::validation(
            "business_type does not apply to customer personas",
        ));
    }
    Ok(())
}
