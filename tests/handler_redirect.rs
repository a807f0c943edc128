mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{Duration, Utc};

#[tokio::test]
async fn test_redirect_success() {
    let pool = common::create_test_pool().await;
    common::insert_mapping(&pool, "abc123", "https://example.com/target", None).await;

    let server = TestServer::new(common::create_test_app(pool.clone())).unwrap();

    let response = server.get("/abc123").await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.header("location").to_str().unwrap(),
        "https://example.com/target"
    );
    assert_eq!(common::click_count(&pool, "abc123").await, 1);
}

#[tokio::test]
async fn test_redirect_counts_each_click() {
    let pool = common::create_test_pool().await;
    common::insert_mapping(&pool, "many", "https://example.com", None).await;

    let server = TestServer::new(common::create_test_app(pool.clone())).unwrap();

    for _ in 0..5 {
        server
            .get("/many")
            .await
            .assert_status(StatusCode::TEMPORARY_REDIRECT);
    }

    assert_eq!(common::click_count(&pool, "many").await, 5);
}

#[tokio::test]
async fn test_redirect_not_found() {
    let pool = common::create_test_pool().await;
    let server = TestServer::new(common::create_test_app(pool)).unwrap();

    let response = server.get("/nonexistent").await;

    response.assert_status_not_found();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_redirect_expired_is_gone() {
    let pool = common::create_test_pool().await;
    common::insert_expired_mapping(&pool, "expired", "https://example.com").await;

    let server = TestServer::new(common::create_test_app(pool.clone())).unwrap();

    let response = server.get("/expired").await;

    response.assert_status(StatusCode::GONE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "expired");
    assert_eq!(common::click_count(&pool, "expired").await, 0);
}

#[tokio::test]
async fn test_redirect_before_expiry() {
    let pool = common::create_test_pool().await;
    common::insert_mapping(
        &pool,
        "future",
        "https://example.com",
        Some(Utc::now() + Duration::hours(1)),
    )
    .await;

    let server = TestServer::new(common::create_test_app(pool)).unwrap();

    server
        .get("/future")
        .await
        .assert_status(StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_redirect_is_case_sensitive() {
    let pool = common::create_test_pool().await;
    common::insert_mapping(&pool, "CaSe", "https://example.com", None).await;

    let server = TestServer::new(common::create_test_app(pool)).unwrap();

    server
        .get("/CaSe")
        .await
        .assert_status(StatusCode::TEMPORARY_REDIRECT);
    server.get("/case").await.assert_status_not_found();
}
