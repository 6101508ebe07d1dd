//! Typed endpoint wrappers against a mock blog API.

mod support;

use std::time::Duration;

use chrono::NaiveDate;
use inkpost_core::CredentialStore;
use inkpost_domain::{
    CommentStatus, CredentialPair, LoginRequest, PostInput, PostQuery, PostStatus, UserQuery,
    UserRole,
};
use inkpost_infra::BlogApi;
use serde_json::json;
use support::{post_json, user_json, Harness, HarnessOptions};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn api(h: &Harness) -> BlogApi {
    BlogApi::new(h.client.clone())
}

#[tokio::test]
async fn login_persists_issued_credentials() {
    let h = Harness::with_options(HarnessOptions { credentials: None, ..Default::default() }).await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": "ada@example.com", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "user": user_json("u1", "author"),
                "accessToken": "T1",
                "refreshToken": "R1"
            }
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let user = api(&h)
        .login(&LoginRequest { email: "ada@example.com".into(), password: "hunter2".into() })
        .await
        .unwrap();

    assert_eq!(user.id, "u1");
    assert_eq!(user.role, UserRole::Author);
    assert!(h.client.is_authenticated().await);
    assert_eq!(h.store.pair().await.unwrap(), Some(CredentialPair::new("T1", "R1")));
}

#[tokio::test]
async fn rejected_login_leaves_store_empty() {
    let h = Harness::with_options(HarnessOptions { credentials: None, ..Default::default() }).await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&h.server)
        .await;

    let err = api(&h)
        .login(&LoginRequest { email: "ada@example.com".into(), password: "nope".into() })
        .await
        .unwrap_err();

    assert_eq!(err.message(), "Invalid credentials");
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn list_posts_sends_filters_and_unwraps_page() {
    let h = Harness::new().await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "10"))
        .and(query_param("tag", "rust"))
        .and(query_param("status", "published"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "items": [post_json("p1", "Hello World")],
                "total": 11,
                "page": 2,
                "limit": 10
            }
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let query = PostQuery {
        page: Some(2),
        limit: Some(10),
        tag: Some("rust".into()),
        status: Some(PostStatus::Published),
        ..Default::default()
    };
    let page = api(&h).list_posts(&query).await.unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].slug, "hello-world");
    assert_eq!(page.items[0].tags[0].name, "Rust");
    assert!(!page.has_more());
}

#[tokio::test]
async fn create_post_serializes_input() {
    let h = Harness::new().await;

    Mock::given(method("POST"))
        .and(path("/posts"))
        .and(header("Authorization", "Bearer T1"))
        .and(body_json(json!({
            "title": "Hello World",
            "content": "Body",
            "status": "published",
            "tagIds": ["t1"]
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "data": post_json("p1", "Hello World") })),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let input = PostInput {
        title: "Hello World".into(),
        content: "Body".into(),
        status: PostStatus::Published,
        tag_ids: vec!["t1".into()],
        ..Default::default()
    };
    let post = api(&h).create_post(&input).await.unwrap();

    assert_eq!(post.id, "p1");
    assert_eq!(post.status, PostStatus::Published);
}

#[tokio::test]
async fn comment_moderation_and_listing() {
    let h = Harness::new().await;

    Mock::given(method("GET"))
        .and(path("/posts/p1/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": "c1",
                "postId": "p1",
                "authorName": "Grace",
                "content": "Nice post",
                "status": "pending",
                "createdAt": "2024-03-03T12:00:00Z"
            }]
        })))
        .mount(&h.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/comments/c1"))
        .and(body_json(json!({ "status": "approved" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "c1",
                "postId": "p1",
                "authorName": "Grace",
                "content": "Nice post",
                "status": "approved",
                "createdAt": "2024-03-03T12:00:00Z"
            }
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let api = api(&h);
    let comments = api.list_comments("p1").await.unwrap();
    assert_eq!(comments[0].status, CommentStatus::Pending);

    let moderated = api.moderate_comment("c1", CommentStatus::Approved).await.unwrap();
    assert_eq!(moderated.status, CommentStatus::Approved);
}

#[tokio::test]
async fn admin_user_management() {
    let h = Harness::new().await;

    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .and(query_param("role", "editor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "items": [user_json("u2", "editor")], "total": 1, "page": 1, "limit": 20 }
        })))
        .mount(&h.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/admin/users/u2/role"))
        .and(body_json(json!({ "role": "admin" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": user_json("u2", "admin") })),
        )
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/admin/users/u2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "User deleted" })))
        .expect(1)
        .mount(&h.server)
        .await;

    let api = api(&h);
    let users = api
        .list_users(&UserQuery { role: Some(UserRole::Editor), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(users.total, 1);
    assert!(users.items[0].is_active);

    let promoted = api.update_user_role("u2", UserRole::Admin).await.unwrap();
    assert_eq!(promoted.role, UserRole::Admin);

    api.delete_user("u2").await.unwrap();
}

#[tokio::test]
async fn analytics_overview_decodes_daily_views() {
    let h = Harness::new().await;

    Mock::given(method("GET"))
        .and(path("/admin/analytics/overview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "totalPosts": 42,
                "totalUsers": 7,
                "totalComments": 130,
                "pendingComments": 3,
                "totalViews": 9001,
                "dailyViews": [{ "date": "2024-03-01", "views": 321 }]
            }
        })))
        .mount(&h.server)
        .await;

    let overview = api(&h).analytics_overview().await.unwrap();

    assert_eq!(overview.total_posts, 42);
    assert_eq!(overview.daily_views[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
}

#[tokio::test]
async fn admin_call_recovers_from_expired_access() {
    let h = Harness::new().await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("Authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Token expired" })))
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "accessToken": "T2" } })),
        )
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("Authorization", "Bearer T2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": user_json("u1", "admin") })),
        )
        .mount(&h.server)
        .await;

    let user = api(&h).current_user().await.unwrap();
    assert_eq!(user.role, UserRole::Admin);
}

#[tokio::test]
async fn logout_without_refresh_credential_skips_server() {
    let h = Harness::with_options(HarnessOptions { credentials: None, ..Default::default() }).await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    api(&h).logout().await.unwrap();
    assert!(!h.client.is_authenticated().await);
}

#[tokio::test]
async fn logout_with_expired_session_never_redirects() {
    let mut h = Harness::new().await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .and(header("Authorization", "Bearer T1"))
        .and(body_json(json!({ "refreshToken": "R1" })))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Token expired" })))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(0)
        .mount(&h.server)
        .await;

    api(&h).logout().await.unwrap();

    assert!(!h.client.is_authenticated().await);
    assert_eq!(h.progress.pending(), 0);
    h.assert_no_event(Duration::from_millis(100)).await;
}
