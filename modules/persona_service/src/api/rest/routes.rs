//! Route registration and OpenAPI document

use super::{dto::*, error::Problem, handlers};
use crate::domain::Service;
use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

/// Schemas exposed at `/openapi.json`
#[derive(OpenApi)]
#[openapi(
    info(title = "Persona Service", description = "Users, auth records, posts and personas"),
    components(schemas(
        Problem,
        UserDto,
        CreateUserRequest,
        UpdateUserRequest,
        UserListResponse,
        AccountTypeDto,
        AccountDto,
        LinkAccountRequest,
        SessionDto,
        CreateSessionRequest,
        SessionAndUserDto,
        DeletedCountDto,
        VerificationTokenDto,
        CreateVerificationTokenRequest,
        ConsumeVerificationTokenRequest,
        PostDto,
        CreatePostRequest,
        UpdatePostRequest,
        PostListResponse,
        AuthorPostCountDto,
        PersonaProfileDto,
        BusinessPersonaDto,
        CreateBusinessPersonaRequest,
        UpdateBusinessPersonaRequest,
        BusinessPersonaListResponse,
        CustomerPersonaDto,
        CreateCustomerPersonaRequest,
        UpdateCustomerPersonaRequest,
        CustomerPersonaListResponse,
        SweepReportDto,
    ))
)]
pub struct ApiDoc;

/// Register all REST routes on `router`
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        // User endpoints
        .route("/users", get(handlers::list_users).post(handlers::create_user))
        .route("/users/by-email", get(handlers::get_user_by_email))
        .route(
            "/users/{id}",
            get(handlers::get_user)
                .patch(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route("/users/{id}/accounts", get(handlers::list_user_accounts))
        .route(
            "/users/{id}/sessions",
            get(handlers::list_user_sessions).delete(handlers::delete_user_sessions),
        )
        // Account endpoints
        .route("/accounts", post(handlers::link_account))
        .route(
            "/accounts/{provider}/{provider_account_id}",
            get(handlers::get_account).delete(handlers::unlink_account),
        )
        .route(
            "/accounts/{provider}/{provider_account_id}/user",
            get(handlers::get_account_user),
        )
        // Session endpoints
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/{token}",
            get(handlers::get_session)
                .patch(handlers::touch_session)
                .delete(handlers::delete_session),
        )
        // Verification token endpoints
        .route("/verification-tokens", post(handlers::create_verification_token))
        .route(
            "/verification-tokens/consume",
            post(handlers::consume_verification_token),
        )
        // Post endpoints
        .route("/posts", get(handlers::list_posts).post(handlers::create_post))
        .route("/posts/latest", get(handlers::get_latest_post))
        .route("/posts/stats/by-author", get(handlers::count_posts_by_author))
        .route(
            "/posts/{id}",
            get(handlers::get_post)
                .patch(handlers::update_post)
                .delete(handlers::delete_post),
        )
        // Persona endpoints
        .route(
            "/business-personas",
            get(handlers::list_business_personas).post(handlers::create_business_persona),
        )
        .route(
            "/business-personas/{id}",
            get(handlers::get_business_persona)
                .put(handlers::update_business_persona)
                .delete(handlers::delete_business_persona),
        )
        .route(
            "/customer-personas",
            get(handlers::list_customer_personas).post(handlers::create_customer_persona),
        )
        .route(
            "/customer-personas/{id}",
            get(handlers::get_customer_persona)
                .put(handlers::update_customer_persona)
                .delete(handlers::delete_customer_persona),
        )
        // Maintenance
        .route("/maintenance/sweep", post(handlers::sweep_expired))
        .route("/openapi.json", get(openapi_json))
        .layer(Extension(service))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_core_schemas() {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.map(|c| c.schemas).unwrap_or_default();
        for name in ["UserDto", "PostDto", "BusinessPersonaDto", "Problem"] {
            assert!(schemas.contains_key(name), "missing schema {name}");
        }
    }
}
