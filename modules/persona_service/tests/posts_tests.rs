//! Posts: authorship, timestamps, listings and aggregates
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use chrono::Utc;
use common::{create_user, print_test_header, setup, setup_storage};
use persona_service::contract::{
    NewPost, PageRequest, PersonaError, Post, PostPatch, PostQuery, SortOrder,
};
use persona_service::domain::{ConstraintViolation, Service};
use std::time::Duration;

async fn create_post(service: &Service, author: &str, name: &str) -> Post {
    service
        .create_post(NewPost {
            name: name.to_string(),
            created_by_id: author.to_string(),
        })
        .await
        .expect("create post")
}

#[tokio::test]
async fn test_post_timestamps_follow_mutations() {
    print_test_header(
        "test_post_timestamps_follow_mutations",
        &[
            "created_at == updated_at on insert.",
            "An update moves updated_at forward and keeps created_at.",
        ],
    );
    let env = setup().await;
    let user = create_user(&env.service, "a@x.com").await;

    println!("\n📍 Stage 1: Create post");
    let post = create_post(&env.service, &user.id, "hello").await;
    assert_eq!(post.created_at, post.updated_at);
    assert_eq!(post.created_by_id, user.id);

    tokio::time::sleep(Duration::from_millis(10)).await;

    println!("\n📍 Stage 2: Rename post");
    let updated = env
        .service
        .update_post(
            post.id,
            PostPatch {
                name: Some("hello again".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "hello again");
    assert_eq!(updated.id, post.id);
    assert_eq!(
        updated.created_at.timestamp_millis(),
        post.created_at.timestamp_millis()
    );
    assert!(updated.updated_at > post.updated_at);
    assert_eq!(updated.created_by_id, user.id);

    let events = env.events.names();
    assert_eq!(events, vec!["user_created", "post_created", "post_updated"]);
    println!("✅ updated_at {} -> {}", post.updated_at, updated.updated_at);
}

#[tokio::test]
async fn test_post_requires_existing_author() {
    let env = setup().await;
    let err = env
        .service
        .create_post(NewPost {
            name: "orphan".to_string(),
            created_by_id: "ghost".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err, PersonaError::invalid_reference("user", "ghost"));
}

#[tokio::test]
async fn test_storage_rejects_post_with_unknown_author() {
    print_test_header(
        "test_storage_rejects_post_with_unknown_author",
        &["The foreign key holds even when the service check is bypassed."],
    );
    let (_db, repos) = setup_storage().await;

    let err = repos
        .posts
        .create("orphan", "ghost", Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConstraintViolation>(),
        Some(ConstraintViolation::ForeignKey(_))
    ));
}

#[tokio::test]
async fn test_post_name_validation() {
    let env = setup().await;
    let user = create_user(&env.service, "a@x.com").await;

    let err = env
        .service
        .create_post(NewPost {
            name: "   ".to_string(),
            created_by_id: user.id.clone(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, PersonaError::Validation { .. }));

    let post = create_post(&env.service, &user.id, "  padded  ").await;
    assert_eq!(post.name, "padded");

    let err = env
        .service
        .update_post(
            post.id,
            PostPatch {
                name: Some("x".repeat(1000)),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PersonaError::Validation { .. }));
}

#[tokio::test]
async fn test_missing_post_is_not_found() {
    let env = setup().await;

    let err = env.service.get_post(404).await.unwrap_err();
    assert_eq!(err, PersonaError::not_found("post", 404));

    let err = env
        .service
        .update_post(404, PostPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PersonaError::NotFound { .. }));

    let err = env.service.delete_post(404).await.unwrap_err();
    assert!(matches!(err, PersonaError::NotFound { .. }));
}

#[tokio::test]
async fn test_deleting_author_removes_posts() {
    let env = setup().await;
    let ada = create_user(&env.service, "ada@x.com").await;
    let bob = create_user(&env.service, "bob@x.com").await;
    let doomed = create_post(&env.service, &ada.id, "ada's").await;
    let kept = create_post(&env.service, &bob.id, "bob's").await;

    env.service.delete_user(&ada.id).await.unwrap();

    assert!(matches!(
        env.service.get_post(doomed.id).await.unwrap_err(),
        PersonaError::NotFound { .. }
    ));
    assert_eq!(env.service.get_post(kept.id).await.unwrap().id, kept.id);
}

#[tokio::test]
async fn test_latest_post_per_author() {
    let env = setup().await;
    let ada = create_user(&env.service, "ada@x.com").await;
    let bob = create_user(&env.service, "bob@x.com").await;

    assert!(env.service.get_latest_post(&ada.id).await.unwrap().is_none());

    create_post(&env.service, &ada.id, "first").await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = create_post(&env.service, &ada.id, "second").await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    create_post(&env.service, &bob.id, "bob's").await;

    let latest = env.service.get_latest_post(&ada.id).await.unwrap().unwrap();
    assert_eq!(latest.id, second.id);
}

#[tokio::test]
async fn test_list_posts_filters_orders_and_pages() {
    print_test_header(
        "test_list_posts_filters_orders_and_pages",
        &["Author and name filters, both orders, offset paging and the id cursor."],
    );
    let env = setup().await;
    let ada = create_user(&env.service, "ada@x.com").await;
    let bob = create_user(&env.service, "bob@x.com").await;

    let mut ada_posts = Vec::new();
    for name in ["alpha", "beta", "gamma", "delta"] {
        ada_posts.push(create_post(&env.service, &ada.id, name).await);
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    create_post(&env.service, &bob.id, "alphabet").await;

    println!("\n📍 Stage 1: Author filter, default (newest first) order");
    let page = env
        .service
        .list_posts(PostQuery {
            created_by_id: Some(ada.id.clone()),
            ..PostQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total, 4);
    assert_eq!(page.limit, 50);
    let names: Vec<_> = page.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["delta", "gamma", "beta", "alpha"]);

    println!("\n📍 Stage 2: Name filter across authors");
    let page = env
        .service
        .list_posts(PostQuery {
            name_contains: Some("alpha".to_string()),
            order: SortOrder::Asc,
            ..PostQuery::default()
        })
        .await
        .unwrap();
    let names: Vec<_> = page.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "alphabet"]);

    println!("\n📍 Stage 3: Offset paging keeps the full total");
    let page = env
        .service
        .list_posts(PostQuery {
            created_by_id: Some(ada.id.clone()),
            order: SortOrder::Asc,
            page: PageRequest::new(2, 1),
            ..PostQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total, 4);
    let names: Vec<_> = page.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["beta", "gamma"]);

    println!("\n📍 Stage 4: Cursor in both directions");
    let cursor = ada_posts[1].id;
    let page = env
        .service
        .list_posts(PostQuery {
            created_by_id: Some(ada.id.clone()),
            after_id: Some(cursor),
            order: SortOrder::Asc,
            ..PostQuery::default()
        })
        .await
        .unwrap();
    let names: Vec<_> = page.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["gamma", "delta"]);

    let page = env
        .service
        .list_posts(PostQuery {
            created_by_id: Some(ada.id.clone()),
            after_id: Some(cursor),
            order: SortOrder::Desc,
            ..PostQuery::default()
        })
        .await
        .unwrap();
    let names: Vec<_> = page.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["alpha"]);
    println!("✅ Listing behaves as expected");
}

#[tokio::test]
async fn test_page_size_is_clamped() {
    let env = setup().await;
    let user = create_user(&env.service, "a@x.com").await;
    create_post(&env.service, &user.id, "only").await;

    let page = env
        .service
        .list_posts(PostQuery {
            page: PageRequest::new(10_000, 0),
            ..PostQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(page.limit, 200);
    assert_eq!(page.items.len(), 1);
}

#[tokio::test]
async fn test_name_filter_treats_wildcards_literally() {
    print_test_header(
        "test_name_filter_treats_wildcards_literally",
        &["`%` and `_` in the name filter match themselves only."],
    );
    let env = setup().await;
    let user = create_user(&env.service, "a@x.com").await;
    for name in ["50% off", "500 items", "plain", "snake_case"] {
        create_post(&env.service, &user.id, name).await;
    }

    let names_matching = |fragment: &str| PostQuery {
        name_contains: Some(fragment.to_string()),
        order: SortOrder::Asc,
        ..PostQuery::default()
    };

    println!("\n📍 Stage 1: Percent sign");
    let page = env.service.list_posts(names_matching("50%")).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].name, "50% off");

    let page = env.service.list_posts(names_matching("%")).await.unwrap();
    assert_eq!(page.total, 1);

    println!("\n📍 Stage 2: Underscore");
    let page = env.service.list_posts(names_matching("_")).await.unwrap();
    let names: Vec<_> = page.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["snake_case"]);

    println!("\n📍 Stage 3: Backslash");
    let page = env.service.list_posts(names_matching("\\")).await.unwrap();
    assert_eq!(page.total, 0);
    println!("✅ Wildcards are matched literally");
}

#[tokio::test]
async fn test_offset_beyond_signed_range_is_rejected() {
    let env = setup().await;
    let user = create_user(&env.service, "a@x.com").await;
    create_post(&env.service, &user.id, "only").await;

    let err = env
        .service
        .list_posts(PostQuery {
            page: PageRequest::new(10, u64::MAX),
            ..PostQuery::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, PersonaError::Validation { .. }));

    let page = env
        .service
        .list_posts(PostQuery {
            page: PageRequest::new(10, i64::MAX as u64),
            ..PostQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert!(page.items.is_empty());

    let err = env
        .service
        .list_users(PageRequest::new(0, u64::MAX))
        .await
        .unwrap_err();
    assert!(matches!(err, PersonaError::Validation { .. }));
}

#[tokio::test]
async fn test_count_posts_by_author() {
    let env = setup().await;
    let ada = create_user(&env.service, "ada@x.com").await;
    let bob = create_user(&env.service, "bob@x.com").await;
    let carol = create_user(&env.service, "carol@x.com").await;

    for name in ["a", "b", "c"] {
        create_post(&env.service, &ada.id, name).await;
    }
    create_post(&env.service, &bob.id, "d").await;

    let counts = env.service.count_posts_by_author().await.unwrap();
    assert_eq!(counts.len(), 2);

    let count_of = |id: &str| {
        counts
            .iter()
            .find(|c| c.created_by_id == id)
            .map(|c| c.post_count)
    };
    assert_eq!(count_of(&ada.id), Some(3));
    assert_eq!(count_of(&bob.id), Some(1));
    assert_eq!(count_of(&carol.id), None);
}

#[tokio::test]
async fn test_delete_post() {
    let env = setup().await;
    let user = create_user(&env.service, "a@x.com").await;
    let post = create_post(&env.service, &user.id, "short-lived").await;

    env.service.delete_post(post.id).await.unwrap();
    assert!(env.service.get_latest_post(&user.id).await.unwrap().is_none());
    assert_eq!(
        env.events.names(),
        vec!["user_created", "post_created", "post_deleted"]
    );
}
