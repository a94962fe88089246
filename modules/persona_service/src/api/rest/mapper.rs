//! Mapper implementations for converting between DTOs and contract models
//!
//! This module contains all From/Into implementations for bidirectional
//! conversion between REST DTOs and transport-agnostic contract models.

use super::dto::*;
use crate::contract;

// ===== User conversions =====

impl From<contract::User> for UserDto {
    fn from(user: contract::User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            email_verified: user.email_verified,
            image: user.image,
        }
    }
}

impl From<CreateUserRequest> for contract::NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            email_verified: req.email_verified,
            image: req.image,
        }
    }
}

impl From<UpdateUserRequest> for contract::UserPatch {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            email_verified: req.email_verified,
            image: req.image,
        }
    }
}

// ===== Account conversions =====

impl From<contract::AccountType> for AccountTypeDto {
    fn from(account_type: contract::AccountType) -> Self {
        match account_type {
            contract::AccountType::OAuth => Self::OAuth,
            contract::AccountType::Oidc => Self::Oidc,
            contract::AccountType::Email => Self::Email,
            contract::AccountType::Credentials => Self::Credentials,
            contract::AccountType::WebAuthn => Self::WebAuthn,
        }
    }
}

impl From<AccountTypeDto> for contract::AccountType {
    fn from(dto: AccountTypeDto) -> Self {
        match dto {
            AccountTypeDto::OAuth => Self::OAuth,
            AccountTypeDto::Oidc => Self::Oidc,
            AccountTypeDto::Email => Self::Email,
            AccountTypeDto::Credentials => Self::Credentials,
            AccountTypeDto::WebAuthn => Self::WebAuthn,
        }
    }
}

impl From<contract::Account> for AccountDto {
    fn from(account: contract::Account) -> Self {
        Self {
            id: account.id,
            user_id: account.user_id,
            r#type: account.account_type.into(),
            provider: account.provider,
            provider_account_id: account.provider_account_id,
            refresh_token: account.refresh_token,
            access_token: account.access_token,
            expires_at: account.expires_at,
            token_type: account.token_type,
            scope: account.scope,
            id_token: account.id_token,
            session_state: account.session_state,
            refresh_token_expires_in: account.refresh_token_expires_in,
        }
    }
}

impl From<LinkAccountRequest> for contract::NewAccount {
    fn from(req: LinkAccountRequest) -> Self {
        Self {
            user_id: req.user_id,
            account_type: req.r#type.into(),
            provider: req.provider,
            provider_account_id: req.provider_account_id,
            refresh_token: req.refresh_token,
            access_token: req.access_token,
            expires_at: req.expires_at,
            token_type: req.token_type,
            scope: req.scope,
            id_token: req.id_token,
            session_state: req.session_state,
            refresh_token_expires_in: req.refresh_token_expires_in,
        }
    }
}

// ===== Session conversions =====

impl From<contract::Session> for SessionDto {
    fn from(session: contract::Session) -> Self {
        Self {
            id: session.id,
            session_token: session.session_token,
            user_id: session.user_id,
            expires: session.expires,
        }
    }
}

impl From<CreateSessionRequest> for contract::NewSession {
    fn from(req: CreateSessionRequest) -> Self {
        Self {
            user_id: req.user_id,
            session_token: req.session_token,
            expires: req.expires,
        }
    }
}

impl From<contract::SessionAndUser> for SessionAndUserDto {
    fn from(found: contract::SessionAndUser) -> Self {
        Self {
            session: found.session.into(),
            user: found.user.into(),
        }
    }
}

// ===== Verification token conversions =====

impl From<contract::VerificationToken> for VerificationTokenDto {
    fn from(token: contract::VerificationToken) -> Self {
        Self {
            identifier: token.identifier,
            token: token.token,
            expires: token.expires,
        }
    }
}

impl From<CreateVerificationTokenRequest> for contract::NewVerificationToken {
    fn from(req: CreateVerificationTokenRequest) -> Self {
        Self {
            identifier: req.identifier,
            token: req.token,
            expires: req.expires,
        }
    }
}

// ===== Post conversions =====

impl From<contract::Post> for PostDto {
    fn from(post: contract::Post) -> Self {
        Self {
            id: post.id,
            name: post.name,
            created_at: post.created_at,
            updated_at: post.updated_at,
            created_by_id: post.created_by_id,
        }
    }
}

impl From<CreatePostRequest> for contract::NewPost {
    fn from(req: CreatePostRequest) -> Self {
        Self {
            name: req.name,
            created_by_id: req.created_by_id,
        }
    }
}

impl From<UpdatePostRequest> for contract::PostPatch {
    fn from(req: UpdatePostRequest) -> Self {
        Self { name: req.name }
    }
}

impl From<contract::Page<contract::Post>> for PostListResponse {
    fn from(page: contract::Page<contract::Post>) -> Self {
        let page = page.map(PostDto::from);
        Self {
            items: page.items,
            total: page.total,
            limit: page.limit,
            offset: page.offset,
        }
    }
}

impl From<contract::AuthorPostCount> for AuthorPostCountDto {
    fn from(count: contract::AuthorPostCount) -> Self {
        Self {
            created_by_id: count.created_by_id,
            post_count: count.post_count,
        }
    }
}

// ===== Persona conversions =====

impl From<contract::PersonaProfile> for PersonaProfileDto {
    fn from(profile: contract::PersonaProfile) -> Self {
        Self {
            age: profile.age,
            gender: profile.gender,
            ethnicity: profile.ethnicity,
            income: profile.income,
            education: profile.education,
            religion: profile.religion,
            profession: profile.profession,
            personality_traits: profile.personality_traits,
            hobbies: profile.hobbies,
            life_goals: profile.life_goals,
            values: profile.values,
            beliefs: profile.beliefs,
            lifestyles: profile.lifestyles,
            country: profile.country,
            region: profile.region,
            city: profile.city,
            postal_code: profile.postal_code,
            spending_habits: profile.spending_habits,
            purchasing_habits: profile.purchasing_habits,
            browsing_habits: profile.browsing_habits,
            brand_interactions: profile.brand_interactions,
            brand_loyalty: profile.brand_loyalty,
            previous_feedback: profile.previous_feedback,
        }
    }
}

impl From<PersonaProfileDto> for contract::PersonaProfile {
    fn from(profile: PersonaProfileDto) -> Self {
        Self {
            age: profile.age,
            gender: profile.gender,
            ethnicity: profile.ethnicity,
            income: profile.income,
            education: profile.education,
            religion: profile.religion,
            profession: profile.profession,
            personality_traits: profile.personality_traits,
            hobbies: profile.hobbies,
            life_goals: profile.life_goals,
            values: profile.values,
            beliefs: profile.beliefs,
            lifestyles: profile.lifestyles,
            country: profile.country,
            region: profile.region,
            city: profile.city,
            postal_code: profile.postal_code,
            spending_habits: profile.spending_habits,
            purchasing_habits: profile.purchasing_habits,
            browsing_habits: profile.browsing_habits,
            brand_interactions: profile.brand_interactions,
            brand_loyalty: profile.brand_loyalty,
            previous_feedback: profile.previous_feedback,
        }
    }
}

impl From<contract::BusinessPersona> for BusinessPersonaDto {
    fn from(persona: contract::BusinessPersona) -> Self {
        Self {
            id: persona.id,
            business_type: persona.business_type,
            profile: persona.profile.into(),
            created_by_id: persona.created_by_id,
            created_at: persona.created_at,
            updated_at: persona.updated_at,
        }
    }
}

impl From<CreateBusinessPersonaRequest> for contract::NewBusinessPersona {
    fn from(req: CreateBusinessPersonaRequest) -> Self {
        Self {
            business_type: req.business_type,
            profile: req.profile.into(),
            created_by_id: req.created_by_id,
        }
    }
}

impl From<UpdateBusinessPersonaRequest> for contract::BusinessPersonaUpdate {
    fn from(req: UpdateBusinessPersonaRequest) -> Self {
        Self {
            business_type: req.business_type,
            profile: req.profile.into(),
        }
    }
}

impl From<contract::Page<contract::BusinessPersona>> for BusinessPersonaListResponse {
    fn from(page: contract::Page<contract::BusinessPersona>) -> Self {
        let page = page.map(BusinessPersonaDto::from);
        Self {
            items: page.items,
            total: page.total,
            limit: page.limit,
            offset: page.offset,
        }
    }
}

impl From<contract::CustomerPersona> for CustomerPersonaDto {
    fn from(persona: contract::CustomerPersona) -> Self {
        Self {
            id: persona.id,
            profile: persona.profile.into(),
            created_by_id: persona.created_by_id,
            created_at: persona.created_at,
            updated_at: persona.updated_at,
        }
    }
}

impl From<CreateCustomerPersonaRequest> for contract::NewCustomerPersona {
    fn from(req: CreateCustomerPersonaRequest) -> Self {
        Self {
            profile: req.profile.into(),
            created_by_id: req.created_by_id,
        }
    }
}

impl From<UpdateCustomerPersonaRequest> for contract::CustomerPersonaUpdate {
    fn from(req: UpdateCustomerPersonaRequest) -> Self {
        Self {
            profile: req.profile.into(),
        }
    }
}

impl From<contract::Page<contract::CustomerPersona>> for CustomerPersonaListResponse {
    fn from(page: contract::Page<contract::CustomerPersona>) -> Self {
        let page = page.map(CustomerPersonaDto::from);
        Self {
            items: page.items,
            total: page.total,
            limit: page.limit,
            offset: page.offset,
        }
    }
}

impl From<contract::Page<contract::User>> for UserListResponse {
    fn from(page: contract::Page<contract::User>) -> Self {
        let page = page.map(UserDto::from);
        Self {
            items: page.items,
            total: page.total,
            limit: page.limit,
            offset: page.offset,
        }
    }
}

// ===== Maintenance conversions =====

impl From<contract::SweepReport> for SweepReportDto {
    fn from(report: contract::SweepReport) -> Self {
        Self {
            sessions: report.sessions,
            verification_tokens: report.verification_tokens,
        }
    }
}
