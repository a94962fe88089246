//! Contract models for persona service
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models.

use chrono::{DateTime, Utc};

// ===== Identity =====

/// Identity record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    /// Unique when present, stored lower-cased
    pub email: Option<String>,
    pub email_verified: Option<DateTime<Utc>>,
    /// Avatar URL
    pub image: Option<String>,
}

/// Input for creating a user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub email_verified: Option<DateTime<Utc>>,
    pub image: Option<String>,
}

/// Partial user update.
///
/// Outer `None` leaves the field untouched, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub email_verified: Option<Option<DateTime<Utc>>>,
    pub image: Option<Option<String>>,
}

// ===== Provider accounts =====

/// Kind of external identity linkage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountType {
    OAuth,
    Oidc,
    Email,
    Credentials,
    WebAuthn,
}

impl AccountType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OAuth => "oauth",
            Self::Oidc => "oidc",
            Self::Email => "email",
            Self::Credentials => "credentials",
            Self::WebAuthn => "webauthn",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "oauth" => Some(Self::OAuth),
            "oidc" => Some(Self::Oidc),
            "email" => Some(Self::Email),
            "credentials" => Some(Self::Credentials),
            "webauthn" => Some(Self::WebAuthn),
            _ => None,
        }
    }
}

/// External identity-provider linkage for a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub user_id: String,
    pub account_type: AccountType,
    pub provider: String,
    pub provider_account_id: String,
    pub refresh_token: Option<String>,
    pub access_token: Option<String>,
    /// Epoch seconds
    pub expires_at: Option<i32>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub id_token: Option<String>,
    pub session_state: Option<String>,
    pub refresh_token_expires_in: Option<i32>,
}

/// Input for linking a provider account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub user_id: String,
    pub account_type: AccountType,
    pub provider: String,
    pub provider_account_id: String,
    pub refresh_token: Option<String>,
    pub access_token: Option<String>,
    pub expires_at: Option<i32>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub id_token: Option<String>,
    pub session_state: Option<String>,
    pub refresh_token_expires_in: Option<i32>,
}

impl NewAccount {
    /// Bare linkage with no provider tokens
    pub fn new(
        user_id: impl Into<String>,
        account_type: AccountType,
        provider: impl Into<String>,
        provider_account_id: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            account_type,
            provider: provider.into(),
            provider_account_id: provider_account_id.into(),
            refresh_token: None,
            access_token: None,
            expires_at: None,
            token_type: None,
            scope: None,
            id_token: None,
            session_state: None,
            refresh_token_expires_in: None,
        }
    }
}

// ===== Sessions =====

/// Server-side login session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    /// Bearer credential, globally unique
    pub session_token: String,
    pub user_id: String,
    pub expires: DateTime<Utc>,
}

impl Session {
    /// A session cannot authenticate once `now >= expires`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires
    }
}

/// Input for creating a session; token and expiry are generated when absent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub user_id: String,
    pub session_token: Option<String>,
    pub expires: Option<DateTime<Utc>>,
}

/// A valid session together with its owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAndUser {
    pub session: Session,
    pub user: User,
}

// ===== Verification tokens =====

/// Single-use secret proving control of an identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationToken {
    /// Usually the target email address
    pub identifier: String,
    /// Plaintext token as handed to the caller
    pub token: String,
    pub expires: DateTime<Utc>,
}

impl VerificationToken {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires
    }
}

/// Input for starting a verification flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVerificationToken {
    pub identifier: String,
    pub token: Option<String>,
    pub expires: Option<DateTime<Utc>>,
}

// ===== Posts =====

/// User-authored post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub name: String,
    pub created_by_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub name: Option<String>,
}

/// Filtered, ordered and paginated post listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub created_by_id: Option<String>,
    /// Literal substring match on the name; `%` and `_` carry no wildcard meaning
    pub name_contains: Option<String>,
    /// Cursor: only posts after this id in the requested order
    pub after_id: Option<i32>,
    pub order: SortOrder,
    pub page: PageRequest,
}

/// Result row of the posts-per-author aggregate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorPostCount {
    pub created_by_id: String,
    pub post_count: i64,
}

// ===== Personas =====

/// Descriptive attributes shared by business and customer personas
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonaProfile {
    pub age: Option<String>,
    pub gender: Option<String>,
    pub ethnicity: Option<String>,
    pub income: Option<String>,
    pub education: Option<String>,
    pub religion: Option<String>,
    pub profession: Option<String>,
    pub personality_traits: Option<String>,
    pub hobbies: Option<String>,
    pub life_goals: Option<String>,
    pub values: Option<String>,
    pub beliefs: Option<String>,
    pub lifestyles: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub spending_habits: Option<String>,
    pub purchasing_habits: Option<String>,
    pub browsing_habits: Option<String>,
    pub brand_interactions: Option<String>,
    pub brand_loyalty: Option<String>,
    pub previous_feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessPersona {
    pub id: String,
    pub business_type: String,
    pub profile: PersonaProfile,
    /// Personas may exist without an owner
    pub created_by_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerPersona {
    pub id: String,
    pub profile: PersonaProfile,
    pub created_by_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBusinessPersona {
    pub business_type: String,
    pub profile: PersonaProfile,
    pub created_by_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCustomerPersona {
    pub profile: PersonaProfile,
    pub created_by_id: Option<String>,
}

/// Replaces the descriptive attributes of a business persona
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessPersonaUpdate {
    pub business_type: String,
    pub profile: PersonaProfile,
}

/// Replaces the descriptive attributes of a customer persona
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerPersonaUpdate {
    pub profile: PersonaProfile,
}

/// Filters shared by persona listings.
///
/// Customer listings reject `business_type` with a validation error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonaQuery {
    pub created_by_id: Option<String>,
    pub country: Option<String>,
    pub business_type: Option<String>,
    pub order: SortOrder,
    pub page: PageRequest,
}

// ===== Paging =====

/// Ordering by creation time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Offset pagination; a zero limit means "use the configured default".
/// Offsets beyond `i64::MAX` are rejected by the listing operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u64,
    pub offset: u64,
}

impl PageRequest {
    pub fn new(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }
}

/// One page of results plus the total matching the filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// Outcome of an expiry sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub sessions: u64,
    pub verification_tokens: u64,
}
