//! REST DTOs with serde derives for HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Distinguish an absent field from an explicit `null`
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

// ===== User DTOs =====

/// User response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub name: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    /// When the email address was confirmed
    pub email_verified: Option<DateTime<Utc>>,
    pub image: Option<String>,
}

/// User creation request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Partial user update; `null` clears a field, omission keeps it
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub email_verified: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
}

/// Paginated users
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub items: Vec<UserDto>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

// ===== Account DTOs =====

/// Account kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountTypeDto {
    #[serde(rename = "oauth")]
    OAuth,
    Oidc,
    Email,
    Credentials,
    #[serde(rename = "webauthn")]
    WebAuthn,
}

/// Provider account response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountDto {
    pub id: String,
    pub user_id: String,
    pub r#type: AccountTypeDto,
    #[schema(example = "github")]
    pub provider: String,
    pub provider_account_id: String,
    pub refresh_token: Option<String>,
    pub access_token: Option<String>,
    /// Provider access token expiry, seconds since the epoch
    pub expires_at: Option<i32>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub id_token: Option<String>,
    pub session_state: Option<String>,
    pub refresh_token_expires_in: Option<i32>,
}

/// Account link request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LinkAccountRequest {
    pub user_id: String,
    pub r#type: AccountTypeDto,
    pub provider: String,
    pub provider_account_id: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<i32>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub session_state: Option<String>,
    #[serde(default)]
    pub refresh_token_expires_in: Option<i32>,
}

// ===== Session DTOs =====

/// Session response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionDto {
    pub id: String,
    pub session_token: String,
    pub user_id: String,
    pub expires: DateTime<Utc>,
}

/// Session creation request; token and expiry are generated when omitted
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    pub user_id: String,
    #[serde(default)]
    pub session_token: Option<String>,
    #[serde(default)]
    pub expires: Option<DateTime<Utc>>,
}

/// Session joined with its owner
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionAndUserDto {
    pub session: SessionDto,
    pub user: UserDto,
}

/// Outcome of a bulk session removal
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletedCountDto {
    pub deleted: u64,
}

// ===== Verification Token DTOs =====

/// Verification token response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerificationTokenDto {
    #[schema(example = "ada@example.com")]
    pub identifier: String,
    /// Plaintext token; only ever returned to its issuer and consumer
    pub token: String,
    pub expires: DateTime<Utc>,
}

/// Verification token request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateVerificationTokenRequest {
    pub identifier: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub expires: Option<DateTime<Utc>>,
}

/// Verification token consume request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ConsumeVerificationTokenRequest {
    pub identifier: String,
    pub token: String,
}

// ===== Post DTOs =====

/// Post response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostDto {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by_id: String,
}

/// Post creation request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    #[schema(example = "Hello world")]
    pub name: String,
    pub created_by_id: String,
}

/// Post update request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Paginated posts
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostListResponse {
    pub items: Vec<PostDto>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

/// Number of posts per author
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorPostCountDto {
    pub created_by_id: String,
    pub post_count: i64,
}

// ===== Persona DTOs =====

/// Descriptive persona attributes
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PersonaProfileDto {
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

/// Business persona response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BusinessPersonaDto {
    pub id: String,
    #[schema(example = "retail")]
    pub business_type: String,
    #[serde(flatten)]
    pub profile: PersonaProfileDto,
    pub created_by_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Business persona create request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBusinessPersonaRequest {
    pub business_type: String,
    #[serde(flatten)]
    pub profile: PersonaProfileDto,
    #[serde(default)]
    pub created_by_id: Option<String>,
}

/// Business persona replace request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateBusinessPersonaRequest {
    pub business_type: String,
    #[serde(flatten)]
    pub profile: PersonaProfileDto,
}

/// Paginated business personas
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BusinessPersonaListResponse {
    pub items: Vec<BusinessPersonaDto>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

/// Customer persona response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerPersonaDto {
    pub id: String,
    #[serde(flatten)]
    pub profile: PersonaProfileDto,
    pub created_by_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Customer persona create request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateCustomerPersonaRequest {
    #[serde(flatten)]
    pub profile: PersonaProfileDto,
    #[serde(default)]
    pub created_by_id: Option<String>,
}

/// Customer persona replace request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateCustomerPersonaRequest {
    #[serde(flatten)]
    pub profile: PersonaProfileDto,
}

/// Paginated customer personas
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerPersonaListResponse {
    pub items: Vec<CustomerPersonaDto>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

// ===== Maintenance DTOs =====

/// Records removed by an expiry sweep
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SweepReportDto {
    pub sessions: u64,
    pub verification_tokens: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_update_user_request_tells_null_from_missing() {
        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"name": null, "image": "https://x.test/a.png"}"#).unwrap();
        assert_eq!(req.name, Some(None));
        assert_eq!(req.email, None);
        assert_eq!(req.image, Some(Some("https://x.test/a.png".to_string())));
    }

    #[test]
    fn test_account_type_wire_names() {
        let t: AccountTypeDto = serde_json::from_str(r#""oauth""#).unwrap();
        assert_eq!(t, AccountTypeDto::OAuth);
        let t: AccountTypeDto = serde_json::from_str(r#""webauthn""#).unwrap();
        assert_eq!(t, AccountTypeDto::WebAuthn);
        assert!(serde_json::from_str::<AccountTypeDto>(r#""OAuth""#).is_err());
    }

    #[test]
    fn test_persona_profile_is_flattened() {
        let req: CreateBusinessPersonaRequest = serde_json::from_str(
            r#"{"business_type": "retail", "country": "DE", "postal_code": "10115"}"#,
        )
        .unwrap();
        assert_eq!(req.business_type, "retail");
        assert_eq!(req.profile.country.as_deref(), Some("DE"));
        assert_eq!(req.profile.postal_code.as_deref(), Some("10115"));
        assert!(req.created_by_id.is_none());
    }
}
