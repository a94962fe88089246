//! HTTP request handlers - thin layer that delegates to domain service

use super::{
    dto::*,
    error::{map_domain_error, Problem},
};
use crate::contract::{PageRequest, PersonaError, PersonaQuery, PostQuery, SortOrder};
use crate::domain::Service;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

type Svc = Extension<Arc<Service>>;

// ===== Query parameters =====

/// Offset pagination parameters
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl PageQuery {
    fn page(&self) -> PageRequest {
        PageRequest::new(self.limit.unwrap_or(0), self.offset.unwrap_or(0))
    }
}

/// Ordering by creation time
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrderParam {
    Asc,
    Desc,
}

impl From<SortOrderParam> for SortOrder {
    fn from(order: SortOrderParam) -> Self {
        match order {
            SortOrderParam::Asc => Self::Asc,
            SortOrderParam::Desc => Self::Desc,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// Filters for listing posts
#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
    pub created_by_id: Option<String>,
    pub name_contains: Option<String>,
    /// Keyset cursor: continue after this post id
    pub after_id: Option<i32>,
    pub order: Option<SortOrderParam>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct LatestPostQuery {
    pub created_by_id: String,
}

/// Filters for listing personas
#[derive(Debug, Default, Deserialize)]
pub struct ListPersonasQuery {
    pub created_by_id: Option<String>,
    pub country: Option<String>,
    /// Only applies to business personas; customer listings answer 400
    pub business_type: Option<String>,
    pub order: Option<SortOrderParam>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl From<ListPersonasQuery> for PersonaQuery {
    fn from(q: ListPersonasQuery) -> Self {
        Self {
            created_by_id: q.created_by_id,
            country: q.country,
            business_type: q.business_type,
            order: q.order.map(Into::into).unwrap_or_default(),
            page: PageRequest::new(q.limit.unwrap_or(0), q.offset.unwrap_or(0)),
        }
    }
}

// ===== User Handlers =====

pub async fn list_users(
    Extension(service): Svc,
    Query(query): Query<PageQuery>,
) -> Result<Json<UserListResponse>, Problem> {
    let page = service
        .list_users(query.page())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(page.into()))
}

pub async fn create_user(
    Extension(service): Svc,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserDto>), Problem> {
    let user = service
        .create_user(req.into())
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn get_user(
    Extension(service): Svc,
    Path(id): Path<String>,
) -> Result<Json<UserDto>, Problem> {
    let user = service
        .get_user(&id)
        .await
        .map_err(map_domain_error)?
        .ok_or_else(|| map_domain_error(PersonaError::not_found("user", &id)))?;

    Ok(Json(user.into()))
}

pub async fn get_user_by_email(
    Extension(service): Svc,
    Query(query): Query<EmailQuery>,
) -> Result<Json<UserDto>, Problem> {
    let user = service
        .get_user_by_email(&query.email)
        .await
        .map_err(map_domain_error)?
        .ok_or_else(|| map_domain_error(PersonaError::not_found("user", &query.email)))?;

    Ok(Json(user.into()))
}

pub async fn update_user(
    Extension(service): Svc,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserDto>, Problem> {
    let user = service
        .update_user(&id, req.into())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(user.into()))
}

pub async fn delete_user(
    Extension(service): Svc,
    Path(id): Path<String>,
) -> Result<StatusCode, Problem> {
    service.delete_user(&id).await.map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_user_accounts(
    Extension(service): Svc,
    Path(id): Path<String>,
) -> Result<Json<Vec<AccountDto>>, Problem> {
    let accounts = service
        .list_accounts_for_user(&id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

pub async fn list_user_sessions(
    Extension(service): Svc,
    Path(id): Path<String>,
) -> Result<Json<Vec<SessionDto>>, Problem> {
    let sessions = service
        .list_sessions_for_user(&id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}

/// Sign a user out everywhere
pub async fn delete_user_sessions(
    Extension(service): Svc,
    Path(id): Path<String>,
) -> Result<Json<DeletedCountDto>, Problem> {
    let deleted = service
        .delete_sessions_for_user(&id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(DeletedCountDto { deleted }))
}

// ===== Account Handlers =====

pub async fn link_account(
    Extension(service): Svc,
    Json(req): Json<LinkAccountRequest>,
) -> Result<(StatusCode, Json<AccountDto>), Problem> {
    let account = service
        .link_account(req.into())
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

pub async fn get_account(
    Extension(service): Svc,
    Path((provider, provider_account_id)): Path<(String, String)>,
) -> Result<Json<AccountDto>, Problem> {
    let account = service
        .get_account(&provider, &provider_account_id)
        .await
        .map_err(map_domain_error)?
        .ok_or_else(|| {
            map_domain_error(PersonaError::not_found(
                "account",
                format!("{provider}/{provider_account_id}"),
            ))
        })?;

    Ok(Json(account.into()))
}

pub async fn get_account_user(
    Extension(service): Svc,
    Path((provider, provider_account_id)): Path<(String, String)>,
) -> Result<Json<UserDto>, Problem> {
    let user = service
        .get_user_by_account(&provider, &provider_account_id)
        .await
        .map_err(map_domain_error)?
        .ok_or_else(|| {
            map_domain_error(PersonaError::not_found(
                "account",
                format!("{provider}/{provider_account_id}"),
            ))
        })?;

    Ok(Json(user.into()))
}

pub async fn unlink_account(
    Extension(service): Svc,
    Path((provider, provider_account_id)): Path<(String, String)>,
) -> Result<StatusCode, Problem> {
    service
        .unlink_account(&provider, &provider_account_id)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

// ===== Session Handlers =====

pub async fn create_session(
    Extension(service): Svc,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionDto>), Problem> {
    let session = service
        .create_session(req.into())
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(session.into())))
}

pub async fn get_session(
    Extension(service): Svc,
    Path(token): Path<String>,
) -> Result<Json<SessionAndUserDto>, Problem> {
    let found = service
        .get_session_and_user(&token)
        .await
        .map_err(map_domain_error)?
        // never echo the bearer token back
        .ok_or_else(|| map_domain_error(PersonaError::not_found("session", "<token>")))?;

    Ok(Json(found.into()))
}

pub async fn touch_session(
    Extension(service): Svc,
    Path(token): Path<String>,
) -> Result<Json<SessionDto>, Problem> {
    let session = service
        .touch_session(&token)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(session.into()))
}

pub async fn delete_session(
    Extension(service): Svc,
    Path(token): Path<String>,
) -> Result<StatusCode, Problem> {
    service
        .delete_session(&token)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

// ===== Verification Token Handlers =====

pub async fn create_verification_token(
    Extension(service): Svc,
    Json(req): Json<CreateVerificationTokenRequest>,
) -> Result<(StatusCode, Json<VerificationTokenDto>), Problem> {
    let token = service
        .create_verification_token(req.into())
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(token.into())))
}

pub async fn consume_verification_token(
    Extension(service): Svc,
    Json(req): Json<ConsumeVerificationTokenRequest>,
) -> Result<Json<VerificationTokenDto>, Problem> {
    let token = service
        .use_verification_token(&req.identifier, &req.token)
        .await
        .map_err(map_domain_error)?
        .ok_or_else(|| {
            map_domain_error(PersonaError::not_found("verification_token", &req.identifier))
        })?;

    Ok(Json(token.into()))
}

// ===== Post Handlers =====

pub async fn list_posts(
    Extension(service): Svc,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<PostListResponse>, Problem> {
    let query = PostQuery {
        created_by_id: query.created_by_id,
        name_contains: query.name_contains,
        after_id: query.after_id,
        order: query.order.map(Into::into).unwrap_or_default(),
        page: PageRequest::new(query.limit.unwrap_or(0), query.offset.unwrap_or(0)),
    };
    let page = service.list_posts(query).await.map_err(map_domain_error)?;

    Ok(Json(page.into()))
}

pub async fn create_post(
    Extension(service): Svc,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostDto>), Problem> {
    let post = service
        .create_post(req.into())
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(post.into())))
}

pub async fn get_latest_post(
    Extension(service): Svc,
    Query(query): Query<LatestPostQuery>,
) -> Result<Json<PostDto>, Problem> {
    let post = service
        .get_latest_post(&query.created_by_id)
        .await
        .map_err(map_domain_error)?
        .ok_or_else(|| {
            map_domain_error(PersonaError::not_found("post", "latest"))
                .with_detail(format!("user '{}' has no posts", query.created_by_id))
        })?;

    Ok(Json(post.into()))
}

pub async fn get_post(
    Extension(service): Svc,
    Path(id): Path<i32>,
) -> Result<Json<PostDto>, Problem> {
    let post = service.get_post(id).await.map_err(map_domain_error)?;
    Ok(Json(post.into()))
}

pub async fn update_post(
    Extension(service): Svc,
    Path(id): Path<i32>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<PostDto>, Problem> {
    let post = service
        .update_post(id, req.into())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(post.into()))
}

pub async fn delete_post(
    Extension(service): Svc,
    Path(id): Path<i32>,
) -> Result<StatusCode, Problem> {
    service.delete_post(id).await.map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn count_posts_by_author(
    Extension(service): Svc,
) -> Result<Json<Vec<AuthorPostCountDto>>, Problem> {
    let counts = service
        .count_posts_by_author()
        .await
        .map_err(map_domain_error)?;

    Ok(Json(counts.into_iter().map(Into::into).collect()))
}

// ===== Business Persona Handlers =====

pub async fn list_business_personas(
    Extension(service): Svc,
    Query(query): Query<ListPersonasQuery>,
) -> Result<Json<BusinessPersonaListResponse>, Problem> {
    let page = service
        .list_business_personas(query.into())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(page.into()))
}

pub async fn create_business_persona(
    Extension(service): Svc,
    Json(req): Json<CreateBusinessPersonaRequest>,
) -> Result<(StatusCode, Json<BusinessPersonaDto>), Problem> {
    let persona = service
        .create_business_persona(req.into())
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(persona.into())))
}

pub async fn get_business_persona(
    Extension(service): Svc,
    Path(id): Path<String>,
) -> Result<Json<BusinessPersonaDto>, Problem> {
    let persona = service
        .get_business_persona(&id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(persona.into()))
}

pub async fn update_business_persona(
    Extension(service): Svc,
    Path(id): Path<String>,
    Json(req): Json<UpdateBusinessPersonaRequest>,
) -> Result<Json<BusinessPersonaDto>, Problem> {
    let persona = service
        .update_business_persona(&id, req.into())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(persona.into()))
}

pub async fn delete_business_persona(
    Extension(service): Svc,
    Path(id): Path<String>,
) -> Result<StatusCode, Problem> {
    service
        .delete_business_persona(&id)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

// ===== Customer Persona Handlers =====

pub async fn list_customer_personas(
    Extension(service): Svc,
    Query(query): Query<ListPersonasQuery>,
) -> Result<Json<CustomerPersonaListResponse>, Problem> {
    let page = service
        .list_customer_personas(query.into())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(page.into()))
}

pub async fn create_customer_persona(
    Extension(service): Svc,
    Json(req): Json<CreateCustomerPersonaRequest>,
) -> Result<(StatusCode, Json<CustomerPersonaDto>), Problem> {
    let persona = service
        .create_customer_persona(req.into())
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(persona.into())))
}

pub async fn get_customer_persona(
    Extension(service): Svc,
    Path(id): Path<String>,
) -> Result<Json<CustomerPersonaDto>, Problem> {
    let persona = service
        .get_customer_persona(&id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(persona.into()))
}

pub async fn update_customer_persona(
    Extension(service): Svc,
    Path(id): Path<String>,
    Json(req): Json<UpdateCustomerPersonaRequest>,
) -> Result<Json<CustomerPersonaDto>, Problem> {
    let persona = service
        .update_customer_persona(&id, req.into())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(persona.into()))
}

pub async fn delete_customer_persona(
    Extension(service): Svc,
    Path(id): Path<String>,
) -> Result<StatusCode, Problem> {
    service
        .delete_customer_persona(&id)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

// ===== Maintenance Handlers =====

/// Run the expiry sweep on demand
pub async fn sweep_expired(Extension(service): Svc) -> Result<Json<SweepReportDto>, Problem> {
    let report = service.sweep_expired().await.map_err(map_domain_error)?;
    Ok(Json(report.into()))
}
