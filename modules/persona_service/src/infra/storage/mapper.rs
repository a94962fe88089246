//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity::{
    account, business_persona, customer_persona, post, session, user, verification_token,
};
use crate::contract::{
    Account, AccountType, BusinessPersona, CustomerPersona, PersonaProfile, Post, Session, User,
    VerificationToken,
};
use sea_orm::ActiveValue::{NotSet, Set};

// ===== User Conversions =====

impl From<user::Model> for User {
    fn from(entity: user::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            email_verified: entity.email_verified,
            image: entity.image,
        }
    }
}

impl From<&User> for user::ActiveModel {
    fn from(model: &User) -> Self {
        Self {
            id: Set(model.id.clone()),
            name: Set(model.name.clone()),
            email: Set(model.email.clone()),
            email_verified: Set(model.email_verified),
            image: Set(model.image.clone()),
        }
    }
}

// ===== Account Conversions =====

impl TryFrom<account::Model> for Account {
    type Error = anyhow::Error;

    fn try_from(entity: account::Model) -> Result<Self, Self::Error> {
        let account_type = AccountType::parse(&entity.r#type)
            .ok_or_else(|| anyhow::anyhow!("unknown account type '{}'", entity.r#type))?;

        Ok(Self {
            id: entity.id,
            user_id: entity.user_id,
            account_type,
            provider: entity.provider,
            provider_account_id: entity.provider_account_id,
            refresh_token: entity.refresh_token,
            access_token: entity.access_token,
            expires_at: entity.expires_at,
            token_type: entity.token_type,
            scope: entity.scope,
            id_token: entity.id_token,
            session_state: entity.session_state,
            refresh_token_expires_in: entity.refresh_token_expires_in,
        })
    }
}

impl From<&Account> for account::ActiveModel {
    fn from(model: &Account) -> Self {
        Self {
            id: Set(model.id.clone()),
            user_id: Set(model.user_id.clone()),
            r#type: Set(model.account_type.as_str().to_string()),
            provider: Set(model.provider.clone()),
            provider_account_id: Set(model.provider_account_id.clone()),
            refresh_token: Set(model.refresh_token.clone()),
            access_token: Set(model.access_token.clone()),
            expires_at: Set(model.expires_at),
            token_type: Set(model.token_type.clone()),
            scope: Set(model.scope.clone()),
            id_token: Set(model.id_token.clone()),
            session_state: Set(model.session_state.clone()),
            refresh_token_expires_in: Set(model.refresh_token_expires_in),
        }
    }
}

// ===== Session Conversions =====

impl From<session::Model> for Session {
    fn from(entity: session::Model) -> Self {
        Self {
            id: entity.id,
            session_token: entity.session_token,
            user_id: entity.user_id,
            expires: entity.expires,
        }
    }
}

impl From<&Session> for session::ActiveModel {
    fn from(model: &Session) -> Self {
        Self {
            id: Set(model.id.clone()),
            session_token: Set(model.session_token.clone()),
            user_id: Set(model.user_id.clone()),
            expires: Set(model.expires),
        }
    }
}

// ===== Verification Token Conversions =====

impl From<verification_token::Model> for VerificationToken {
    fn from(entity: verification_token::Model) -> Self {
        Self {
            identifier: entity.identifier,
            token: entity.token,
            expires: entity.expires,
        }
    }
}

impl From<&VerificationToken> for verification_token::ActiveModel {
    fn from(model: &VerificationToken) -> Self {
        Self {
            identifier: Set(model.identifier.clone()),
            token: Set(model.token.clone()),
            expires: Set(model.expires),
        }
    }
}

// ===== Post Conversions =====

impl From<post::Model> for Post {
    fn from(entity: post::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            created_by_id: entity.created_by_id,
        }
    }
}

/// Mutable columns of a post; id, owner and creation time stay untouched
impl From<&Post> for post::ActiveModel {
    fn from(model: &Post) -> Self {
        Self {
            id: Set(model.id),
            name: Set(model.name.clone()),
            created_at: NotSet,
            updated_at: Set(model.updated_at),
            created_by_id: NotSet,
        }
    }
}

// ===== Persona Conversions =====

impl From<business_persona::Model> for BusinessPersona {
    fn from(model: business_persona::Model) -> Self {
        Self {
            id: model.id,
            business_type: model.business_type,
            created_by_id: model.created_by_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
            profile: PersonaProfile {
                age: model.age,
                gender: model.gender,
                ethnicity: model.ethnicity,
                income: model.income,
                education: model.education,
                religion: model.religion,
                profession: model.profession,
                personality_traits: model.personality_traits,
                hobbies: model.hobbies,
                life_goals: model.life_goals,
                values: model.values,
                beliefs: model.beliefs,
                lifestyles: model.lifestyles,
                country: model.country,
                region: model.region,
                city: model.city,
                postal_code: model.postal_code,
                spending_habits: model.spending_habits,
                purchasing_habits: model.purchasing_habits,
                browsing_habits: model.browsing_habits,
                brand_interactions: model.brand_interactions,
                brand_loyalty: model.brand_loyalty,
                previous_feedback: model.previous_feedback,
            },
        }
    }
}

impl From<&BusinessPersona> for business_persona::ActiveModel {
    fn from(persona: &BusinessPersona) -> Self {
        let profile = &persona.profile;
        Self {
            id: Set(persona.id.clone()),
            business_type: Set(persona.business_type.clone()),
            age: Set(profile.age.clone()),
            gender: Set(profile.gender.clone()),
            ethnicity: Set(profile.ethnicity.clone()),
            income: Set(profile.income.clone()),
            education: Set(profile.education.clone()),
            religion: Set(profile.religion.clone()),
            profession: Set(profile.profession.clone()),
            personality_traits: Set(profile.personality_traits.clone()),
            hobbies: Set(profile.hobbies.clone()),
            life_goals: Set(profile.life_goals.clone()),
            values: Set(profile.values.clone()),
            beliefs: Set(profile.beliefs.clone()),
            lifestyles: Set(profile.lifestyles.clone()),
            country: Set(profile.country.clone()),
            region: Set(profile.region.clone()),
            city: Set(profile.city.clone()),
            postal_code: Set(profile.postal_code.clone()),
            spending_habits: Set(profile.spending_habits.clone()),
            purchasing_habits: Set(profile.purchasing_habits.clone()),
            browsing_habits: Set(profile.browsing_habits.clone()),
            brand_interactions: Set(profile.brand_interactions.clone()),
            brand_loyalty: Set(profile.brand_loyalty.clone()),
            previous_feedback: Set(profile.previous_feedback.clone()),
            created_at: Set(persona.created_at),
            updated_at: Set(persona.updated_at),
            created_by_id: Set(persona.created_by_id.clone()),
        }
    }
}

impl From<customer_persona::Model> for CustomerPersona {
    fn from(model: customer_persona::Model) -> Self {
        Self {
            id: model.id,
            created_by_id: model.created_by_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
            profile: PersonaProfile {
                age: model.age,
                gender: model.gender,
                ethnicity: model.ethnicity,
                income: model.income,
                education: model.education,
                religion: model.religion,
                profession: model.profession,
                personality_traits: model.personality_traits,
                hobbies: model.hobbies,
                life_goals: model.life_goals,
                values: model.values,
                beliefs: model.beliefs,
                lifestyles: model.lifestyles,
                country: model.country,
                region: model.region,
                city: model.city,
                postal_code: model.postal_code,
                spending_habits: model.spending_habits,
                purchasing_habits: model.purchasing_habits,
                browsing_habits: model.browsing_habits,
                brand_interactions: model.brand_interactions,
                brand_loyalty: model.brand_loyalty,
                previous_feedback: model.previous_feedback,
            },
        }
    }
}

impl From<&CustomerPersona> for customer_persona::ActiveModel {
    fn from(persona: &CustomerPersona) -> Self {
        let profile = &persona.profile;
        Self {
            id: Set(persona.id.clone()),
            age: Set(profile.age.clone()),
            gender: Set(profile.gender.clone()),
            ethnicity: Set(profile.ethnicity.clone()),
            income: Set(profile.income.clone()),
            education: Set(profile.education.clone()),
            religion: Set(profile.religion.clone()),
            profession: Set(profile.profession.clone()),
            personality_traits: Set(profile.personality_traits.clone()),
            hobbies: Set(profile.hobbies.clone()),
            life_goals: Set(profile.life_goals.clone()),
            values: Set(profile.values.clone()),
            beliefs: Set(profile.beliefs.clone()),
            lifestyles: Set(profile.lifestyles.clone()),
            country: Set(profile.country.clone()),
            region: Set(profile.region.clone()),
            city: Set(profile.city.clone()),
            postal_code: Set(profile.postal_code.clone()),
            spending_habits: Set(profile.spending_habits.clone()),
            purchasing_habits: Set(profile.purchasing_habits.clone()),
            browsing_habits: Set(profile.browsing_habits.clone()),
            brand_interactions: Set(profile.brand_interactions.clone()),
            brand_loyalty: Set(profile.brand_loyalty.clone()),
            previous_feedback: Set(profile.previous_feedback.clone()),
            created_at: Set(persona.created_at),
            updated_at: Set(persona.updated_at),
            created_by_id: Set(persona.created_by_id.clone()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn account_entity(kind: &str) -> account::Model {
        account::Model {
            id: "a1".to_string(),
            user_id: "u1".to_string(),
            r#type: kind.to_string(),
            provider: "github".to_string(),
            provider_account_id: "42".to_string(),
            refresh_token: None,
            access_token: Some("gho_x".to_string()),
            expires_at: Some(1_700_000_000),
            token_type: Some("bearer".to_string()),
            scope: None,
            id_token: None,
            session_state: None,
            refresh_token_expires_in: None,
        }
    }

    #[test]
    fn test_account_entity_to_model() {
        let account: Account = account_entity("oauth").try_into().unwrap();
        assert_eq!(account.account_type, AccountType::OAuth);
        assert_eq!(account.expires_at, Some(1_700_000_000));
        assert_eq!(account.access_token.as_deref(), Some("gho_x"));
    }

    #[test]
    fn test_account_entity_with_unknown_type_fails() {
        let res: Result<Account, _> = account_entity("saml").try_into();
        assert!(res.is_err());
    }

    #[test]
    fn test_persona_profile_maps_every_column() {
        let now = Utc::now();
        let persona = CustomerPersona {
            id: "c1".to_string(),
            profile: PersonaProfile {
                personality_traits: Some("curious".to_string()),
                postal_code: Some("10115".to_string()),
                previous_feedback: Some("positive".to_string()),
                ..PersonaProfile::default()
            },
            created_by_id: None,
            created_at: now,
            updated_at: now,
        };

        let active: customer_persona::ActiveModel = (&persona).into();
        assert_eq!(active.postal_code, Set(Some("10115".to_string())));
        assert_eq!(active.age, Set(None));
        assert_eq!(active.created_by_id, Set(None));
    }

    #[test]
    fn test_post_active_model_keeps_owner_and_creation_time() {
        let now = Utc::now();
        let post = Post {
            id: 7,
            name: "hello".to_string(),
            created_at: now,
            updated_at: now,
            created_by_id: "u1".to_string(),
        };

        let active: post::ActiveModel = (&post).into();
        assert_eq!(active.id, Set(7));
        assert_eq!(active.created_at, NotSet);
        assert_eq!(active.created_by_id, NotSet);
    }
}
