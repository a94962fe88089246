//! Provider accounts, sessions and verification tokens
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use chrono::{Duration, Utc};
use common::{create_user, print_test_header, setup, setup_storage};
use persona_service::config::Config;
use persona_service::contract::{
    AccountType, NewAccount, NewSession, NewVerificationToken, PersonaError, Session,
    VerificationToken,
};
use persona_service::domain::tokens::hash_token;
use persona_service::domain::{ConstraintViolation, NoOpEventPublisher, Service};
use std::sync::Arc;

// ===== Provider accounts =====

#[tokio::test]
async fn test_link_account_and_resolve_user() {
    print_test_header(
        "test_link_account_and_resolve_user",
        &["A linked provider account resolves back to its local user."],
    );
    let env = setup().await;
    let user = create_user(&env.service, "ada@x.com").await;

    let mut new_account = NewAccount::new(&user.id, AccountType::OAuth, "github", "4242");
    new_account.access_token = Some("gho_secret".to_string());
    new_account.expires_at = Some(1_900_000_000);
    let account = env.service.link_account(new_account).await.unwrap();

    assert_eq!(account.user_id, user.id);
    assert_eq!(account.account_type, AccountType::OAuth);

    let owner = env
        .service
        .get_user_by_account("github", "4242")
        .await
        .unwrap()
        .expect("linked user");
    assert_eq!(owner.id, user.id);

    let accounts = env.service.list_accounts_for_user(&user.id).await.unwrap();
    assert_eq!(accounts, vec![account]);

    assert!(env
        .service
        .get_user_by_account("github", "other")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_duplicate_provider_account_conflicts() {
    let env = setup().await;
    let ada = create_user(&env.service, "ada@x.com").await;
    let bob = create_user(&env.service, "bob@x.com").await;

    env.service
        .link_account(NewAccount::new(&ada.id, AccountType::Oidc, "google", "sub-1"))
        .await
        .unwrap();

    let err = env
        .service
        .link_account(NewAccount::new(&bob.id, AccountType::Oidc, "google", "sub-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, PersonaError::Conflict { .. }));

    // same provider account id under another provider is fine
    env.service
        .link_account(NewAccount::new(&bob.id, AccountType::OAuth, "github", "sub-1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_link_account_requires_existing_user() {
    let env = setup().await;

    let err = env
        .service
        .link_account(NewAccount::new("ghost", AccountType::Email, "email", "a@x.com"))
        .await
        .unwrap_err();
    assert_eq!(err, PersonaError::invalid_reference("user", "ghost"));

    let user = create_user(&env.service, "ada@x.com").await;
    let err = env
        .service
        .link_account(NewAccount::new(&user.id, AccountType::OAuth, " ", "1"))
        .await
        .unwrap_err();
    assert!(matches!(err, PersonaError::Validation { .. }));
}

#[tokio::test]
async fn test_unlink_account() {
    let env = setup().await;
    let user = create_user(&env.service, "ada@x.com").await;
    env.service
        .link_account(NewAccount::new(&user.id, AccountType::OAuth, "github", "1"))
        .await
        .unwrap();

    env.service.unlink_account("github", "1").await.unwrap();
    assert!(env.service.get_account("github", "1").await.unwrap().is_none());

    let err = env.service.unlink_account("github", "1").await.unwrap_err();
    assert!(matches!(err, PersonaError::NotFound { .. }));
    assert_eq!(
        env.events.names(),
        vec!["user_created", "account_linked", "account_unlinked"]
    );
}

// ===== Sessions =====

#[tokio::test]
async fn test_create_session_defaults() {
    let env = setup().await;
    let user = create_user(&env.service, "ada@x.com").await;

    let before = Utc::now();
    let session = env
        .service
        .create_session(NewSession {
            user_id: user.id.clone(),
            session_token: None,
            expires: None,
        })
        .await
        .unwrap();

    assert_eq!(session.session_token.len(), 64);
    assert!(session.session_token.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(session.expires >= before + Duration::days(30));
    assert!(session.expires <= Utc::now() + Duration::days(30));

    let found = env
        .service
        .get_session_and_user(&session.session_token)
        .await
        .unwrap()
        .expect("live session");
    assert_eq!(found.user.id, user.id);
    assert_eq!(found.session.id, session.id);
}

#[tokio::test]
async fn test_duplicate_session_token_conflicts() {
    let env = setup().await;
    let user = create_user(&env.service, "ada@x.com").await;
    let new_session = NewSession {
        user_id: user.id.clone(),
        session_token: Some("fixed-token".to_string()),
        expires: None,
    };

    env.service.create_session(new_session.clone()).await.unwrap();
    let err = env.service.create_session(new_session).await.unwrap_err();
    assert!(matches!(err, PersonaError::Conflict { .. }));
}

#[tokio::test]
async fn test_session_for_missing_user_is_invalid_reference() {
    let env = setup().await;
    let err = env
        .service
        .create_session(NewSession {
            user_id: "ghost".to_string(),
            session_token: None,
            expires: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err, PersonaError::invalid_reference("user", "ghost"));
}

#[tokio::test]
async fn test_expired_session_is_dropped_on_lookup() {
    print_test_header(
        "test_expired_session_is_dropped_on_lookup",
        &["An expired session reads as absent and is deleted as a side effect."],
    );
    let env = setup().await;
    let user = create_user(&env.service, "ada@x.com").await;
    env.service
        .create_session(NewSession {
            user_id: user.id.clone(),
            session_token: Some("stale".to_string()),
            expires: Some(Utc::now() - Duration::minutes(1)),
        })
        .await
        .unwrap();

    assert!(env
        .service
        .get_session_and_user("stale")
        .await
        .unwrap()
        .is_none());
    assert!(env
        .service
        .list_sessions_for_user(&user.id)
        .await
        .unwrap()
        .is_empty());

    let err = env.service.touch_session("stale").await.unwrap_err();
    assert!(matches!(err, PersonaError::NotFound { .. }));
}

#[tokio::test]
async fn test_touch_session_slides_expiry_when_due() {
    print_test_header(
        "test_touch_session_slides_expiry_when_due",
        &[
            "A recently extended session is left alone.",
            "One extended longer than update_age ago is pushed to now + max_age.",
        ],
    );
    let env = setup().await;
    let user = create_user(&env.service, "ada@x.com").await;

    println!("\n📍 Stage 1: Fresh session");
    let fresh = env
        .service
        .create_session(NewSession {
            user_id: user.id.clone(),
            session_token: Some("fresh".to_string()),
            expires: None,
        })
        .await
        .unwrap();
    let touched = env.service.touch_session("fresh").await.unwrap();
    assert_eq!(
        touched.expires.timestamp_millis(),
        fresh.expires.timestamp_millis()
    );

    println!("\n📍 Stage 2: Session last extended two days ago");
    let old_expiry = Utc::now() + Duration::days(28);
    env.service
        .create_session(NewSession {
            user_id: user.id.clone(),
            session_token: Some("aging".to_string()),
            expires: Some(old_expiry),
        })
        .await
        .unwrap();

    let before = Utc::now();
    let touched = env.service.touch_session("aging").await.unwrap();
    assert!(touched.expires > old_expiry);
    assert!(touched.expires >= before + Duration::days(30));
    println!("✅ expiry moved from {old_expiry} to {}", touched.expires);
}

#[tokio::test]
async fn test_delete_sessions() {
    let env = setup().await;
    let user = create_user(&env.service, "ada@x.com").await;
    for token in ["s1", "s2", "s3"] {
        env.service
            .create_session(NewSession {
                user_id: user.id.clone(),
                session_token: Some(token.to_string()),
                expires: None,
            })
            .await
            .unwrap();
    }

    env.service.delete_session("s1").await.unwrap();
    let err = env.service.delete_session("s1").await.unwrap_err();
    assert!(matches!(err, PersonaError::NotFound { .. }));

    let removed = env.service.delete_sessions_for_user(&user.id).await.unwrap();
    assert_eq!(removed, 2);
    assert!(env
        .service
        .list_sessions_for_user(&user.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_deleting_user_cascades_accounts_and_sessions() {
    let env = setup().await;
    let user = create_user(&env.service, "ada@x.com").await;
    env.service
        .link_account(NewAccount::new(&user.id, AccountType::OAuth, "github", "1"))
        .await
        .unwrap();
    env.service
        .create_session(NewSession {
            user_id: user.id.clone(),
            session_token: Some("tok".to_string()),
            expires: None,
        })
        .await
        .unwrap();

    env.service.delete_user(&user.id).await.unwrap();

    assert!(env.service.get_account("github", "1").await.unwrap().is_none());
    assert!(env
        .service
        .get_session_and_user("tok")
        .await
        .unwrap()
        .is_none());
}

// ===== Verification tokens =====

#[tokio::test]
async fn test_verification_token_is_single_use() {
    print_test_header(
        "test_verification_token_is_single_use",
        &["Consuming a token returns it once; afterwards lookups return none."],
    );
    let env = setup().await;

    let issued = env
        .service
        .create_verification_token(NewVerificationToken {
            identifier: "ada@x.com".to_string(),
            token: None,
            expires: None,
        })
        .await
        .unwrap();
    assert_eq!(issued.token.len(), 64);

    let peeked = env
        .service
        .get_verification_token("ada@x.com", &issued.token)
        .await
        .unwrap();
    assert_eq!(peeked.as_ref(), Some(&issued));

    let used = env
        .service
        .use_verification_token("ada@x.com", &issued.token)
        .await
        .unwrap()
        .expect("first use succeeds");
    assert_eq!(used.token, issued.token);

    assert!(env
        .service
        .use_verification_token("ada@x.com", &issued.token)
        .await
        .unwrap()
        .is_none());
    assert!(env
        .service
        .get_verification_token("ada@x.com", &issued.token)
        .await
        .unwrap()
        .is_none());
    assert_eq!(env.events.names(), vec!["verification_token_consumed"]);
}

#[tokio::test]
async fn test_duplicate_verification_token_conflicts() {
    let env = setup().await;
    let new_token = NewVerificationToken {
        identifier: "ada@x.com".to_string(),
        token: Some("123456".to_string()),
        expires: None,
    };

    env.service
        .create_verification_token(new_token.clone())
        .await
        .unwrap();
    let err = env
        .service
        .create_verification_token(new_token)
        .await
        .unwrap_err();
    assert!(matches!(err, PersonaError::Conflict { .. }));

    // the token value is unique on its own, across identifiers
    let err = env
        .service
        .create_verification_token(NewVerificationToken {
            identifier: "bob@x.com".to_string(),
            token: Some("123456".to_string()),
            expires: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, PersonaError::Conflict { .. }));
}

#[tokio::test]
async fn test_wrong_identifier_does_not_consume() {
    let env = setup().await;
    let issued = env
        .service
        .create_verification_token(NewVerificationToken {
            identifier: "ada@x.com".to_string(),
            token: None,
            expires: None,
        })
        .await
        .unwrap();

    assert!(env
        .service
        .use_verification_token("bob@x.com", &issued.token)
        .await
        .unwrap()
        .is_none());
    assert!(env
        .service
        .use_verification_token("ada@x.com", &issued.token)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_expired_verification_token_is_consumed_but_not_returned() {
    let env = setup().await;
    env.service
        .create_verification_token(NewVerificationToken {
            identifier: "ada@x.com".to_string(),
            token: Some("old".to_string()),
            expires: Some(Utc::now() - Duration::seconds(1)),
        })
        .await
        .unwrap();

    assert!(env
        .service
        .use_verification_token("ada@x.com", "old")
        .await
        .unwrap()
        .is_none());

    // the record is gone, so the same token can be issued again
    env.service
        .create_verification_token(NewVerificationToken {
            identifier: "ada@x.com".to_string(),
            token: Some("old".to_string()),
            expires: None,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_verification_tokens_are_stored_hashed() {
    print_test_header(
        "test_verification_tokens_are_stored_hashed",
        &["Storage holds sha256(token + secret); the plaintext is never persisted."],
    );
    let (_db, repos) = setup_storage().await;
    let config = Config {
        token_secret: "pepper".to_string(),
        ..Config::default()
    };
    let service = Service::new(repos.clone(), Arc::new(NoOpEventPublisher), config);

    let issued = service
        .create_verification_token(NewVerificationToken {
            identifier: "ada@x.com".to_string(),
            token: Some("plain".to_string()),
            expires: None,
        })
        .await
        .unwrap();
    assert_eq!(issued.token, "plain");

    assert!(repos
        .verification_tokens
        .find("ada@x.com", "plain")
        .await
        .unwrap()
        .is_none());
    let stored = repos
        .verification_tokens
        .find("ada@x.com", &hash_token("plain", "pepper"))
        .await
        .unwrap()
        .expect("hashed record");
    assert_eq!(
        stored.expires.timestamp_millis(),
        issued.expires.timestamp_millis()
    );

    let found = service
        .get_verification_token("ada@x.com", "plain")
        .await
        .unwrap()
        .expect("lookup by plaintext");
    assert_eq!(found.token, "plain");
}

// ===== Sweeper =====

#[tokio::test]
async fn test_sweep_removes_only_expired_records() {
    let env = setup().await;
    let user = create_user(&env.service, "ada@x.com").await;
    let past = Utc::now() - Duration::hours(1);

    for (token, expires) in [("dead", Some(past)), ("live", None)] {
        env.service
            .create_session(NewSession {
                user_id: user.id.clone(),
                session_token: Some(token.to_string()),
                expires,
            })
            .await
            .unwrap();
        env.service
            .create_verification_token(NewVerificationToken {
                identifier: "ada@x.com".to_string(),
                token: Some(token.to_string()),
                expires,
            })
            .await
            .unwrap();
    }

    let report = env.service.sweep_expired().await.unwrap();
    assert_eq!(report.sessions, 1);
    assert_eq!(report.verification_tokens, 1);

    let remaining = env.service.list_sessions_for_user(&user.id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].session_token, "live");

    let again = env.service.sweep_expired().await.unwrap();
    assert_eq!((again.sessions, again.verification_tokens), (0, 0));
}

// ===== Storage-level constraints =====

#[tokio::test]
async fn test_storage_enforces_session_token_uniqueness() {
    print_test_header(
        "test_storage_enforces_session_token_uniqueness",
        &["The unique index rejects duplicates even without the service pre-check."],
    );
    let (_db, repos) = setup_storage().await;
    let user = persona_service::contract::User {
        id: "u1".to_string(),
        name: None,
        email: None,
        email_verified: None,
        image: None,
    };
    repos.users.create(&user).await.unwrap();

    let session = Session {
        id: "s1".to_string(),
        session_token: "dup".to_string(),
        user_id: "u1".to_string(),
        expires: Utc::now() + Duration::days(1),
    };
    repos.sessions.create(&session).await.unwrap();

    let err = repos
        .sessions
        .create(&Session {
            id: "s2".to_string(),
            ..session
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConstraintViolation>(),
        Some(ConstraintViolation::Unique(_))
    ));
}

#[tokio::test]
async fn test_storage_take_is_find_and_delete() {
    let (_db, repos) = setup_storage().await;
    let token = VerificationToken {
        identifier: "ada@x.com".to_string(),
        token: "hash".to_string(),
        expires: Utc::now() + Duration::hours(1),
    };
    repos.verification_tokens.create(&token).await.unwrap();

    let taken = repos
        .verification_tokens
        .take("ada@x.com", "hash")
        .await
        .unwrap();
    assert_eq!(taken.map(|t| t.identifier), Some("ada@x.com".to_string()));
    assert!(repos
        .verification_tokens
        .take("ada@x.com", "hash")
        .await
        .unwrap()
        .is_none());
}

// ===== Native client =====

#[tokio::test]
async fn test_native_client_sign_in_flow() {
    print_test_header(
        "test_native_client_sign_in_flow",
        &["An in-process auth layer can run a full email sign-in through the client."],
    );
    let env = setup().await;
    let client = env.module.client();

    println!("\n📍 Stage 1: Email verification");
    let issued = client
        .create_verification_token(NewVerificationToken {
            identifier: "ada@x.com".to_string(),
            token: None,
            expires: None,
        })
        .await
        .unwrap();
    let used = client
        .use_verification_token("ada@x.com", &issued.token)
        .await
        .unwrap();
    assert!(used.is_some());

    println!("\n📍 Stage 2: User and account");
    assert!(client.get_user_by_email("ada@x.com").await.unwrap().is_none());
    let user = client
        .create_user(persona_service::contract::NewUser {
            email: Some("ada@x.com".to_string()),
            email_verified: Some(Utc::now()),
            ..Default::default()
        })
        .await
        .unwrap();
    client
        .link_account(NewAccount::new(&user.id, AccountType::Email, "email", "ada@x.com"))
        .await
        .unwrap();
    let owner = client
        .get_user_by_account("email", "ada@x.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(owner.id, user.id);

    println!("\n📍 Stage 3: Session");
    let session = client
        .create_session(NewSession {
            user_id: user.id.clone(),
            session_token: None,
            expires: None,
        })
        .await
        .unwrap();
    let found = client
        .get_session_and_user(&session.session_token)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.user.email.as_deref(), Some("ada@x.com"));
    client.touch_session(&session.session_token).await.unwrap();
    client.delete_session(&session.session_token).await.unwrap();

    println!("\n📍 Stage 4: Cleanup");
    client.unlink_account("email", "ada@x.com").await.unwrap();
    client.delete_user(&user.id).await.unwrap();
    assert!(client.get_user(&user.id).await.unwrap().is_none());
    println!("✅ Sign-in flow complete");
}
