mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

#[tokio::test]
async fn test_stats_success() {
    let pool = common::create_test_pool().await;
    common::insert_mapping(&pool, "stats1", "https://example.com", None).await;

    let server = TestServer::new(common::create_test_app(pool)).unwrap();

    let response = server.get("/api/stats/stats1").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["short_code"], "stats1");
    assert_eq!(json["long_url"], "https://example.com");
    assert_eq!(json["clicks"], 0);
    assert_eq!(json["status"], "active");
    assert!(json["created_at"].is_string());
    assert!(json["expires_at"].is_null());
}

#[tokio::test]
async fn test_stats_reflects_redirects_only() {
    let pool = common::create_test_pool().await;
    let server = TestServer::new(common::create_test_app(pool)).unwrap();

    let created = server
        .post("/api/shorten")
        .json(&json!({ "long_url": "https://example.com" }))
        .await
        .json::<serde_json::Value>();
    let code = created["short_code"].as_str().unwrap().to_string();

    for _ in 0..3 {
        server
            .get(&format!("/{code}"))
            .await
            .assert_status(StatusCode::TEMPORARY_REDIRECT);
    }

    // Reading stats must not change the count.
    server.get(&format!("/api/stats/{code}")).await;

    let json = server
        .get(&format!("/api/stats/{code}"))
        .await
        .json::<serde_json::Value>();
    assert_eq!(json["clicks"], 3);
}

#[tokio::test]
async fn test_stats_expired_mapping_still_reported() {
    let pool = common::create_test_pool().await;
    common::insert_expired_mapping(&pool, "old", "https://example.com").await;

    let server = TestServer::new(common::create_test_app(pool)).unwrap();

    let response = server.get("/api/stats/old").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "expired");
    assert_eq!(json["clicks"], 0);
    assert!(json["expires_at"].is_string());
}

#[tokio::test]
async fn test_stats_not_found() {
    let pool = common::create_test_pool().await;
    let server = TestServer::new(common::create_test_app(pool)).unwrap();

    let response = server.get("/api/stats/nonexistent").await;

    response.assert_status_not_found();
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "not_found"
    );
}
