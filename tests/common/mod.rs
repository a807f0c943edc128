#![allow(dead_code)]

use axum::Router;
use chrono::{DateTime, Utc};
use shortcode::application::services::{AllocatorSettings, MappingService, MappingSettings};
use shortcode::domain::repositories::MappingRepository;
use shortcode::infrastructure::database::{Database, PoolSettings, connect_sqlite_in_memory};
use shortcode::infrastructure::persistence::SqliteMappingRepository;
use shortcode::routes::router;
use shortcode::state::{AppState, DynMappingService};
use sqlx::SqlitePool;
use std::sync::Arc;

pub const BASE_URL: &str = "http://sho.rt";

pub async fn create_test_pool() -> SqlitePool {
    connect_sqlite_in_memory().await.unwrap()
}

/// File-backed SQLite with the default multi-connection pool, so concurrent
/// statements really run on separate connections.
///
/// Keep the returned directory alive for as long as the pool is used.
pub async fn create_file_pool() -> (SqlitePool, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("shortcode.db").display());

    let database = Database::connect(&url, PoolSettings::default())
        .await
        .unwrap();
    database.migrate().await.unwrap();

    match database {
        Database::Sqlite(pool) => (pool, dir),
        Database::Postgres(_) => unreachable!("sqlite URL opened a postgres pool"),
    }
}

pub fn create_test_repository(pool: SqlitePool) -> Arc<dyn MappingRepository> {
    Arc::new(SqliteMappingRepository::new(Arc::new(pool)))
}

pub fn test_settings() -> MappingSettings {
    MappingSettings {
        base_url: BASE_URL.to_string(),
        allocator: AllocatorSettings::default(),
        max_create_attempts: 5,
    }
}

pub fn create_test_service(pool: SqlitePool) -> Arc<DynMappingService> {
    Arc::new(MappingService::new(
        create_test_repository(pool),
        test_settings(),
    ))
}

pub fn create_test_state(pool: SqlitePool) -> AppState {
    AppState::new(create_test_service(pool))
}

pub fn create_test_app(pool: SqlitePool) -> Router {
    router(create_test_state(pool))
}

pub async fn insert_mapping(
    pool: &SqlitePool,
    code: &str,
    target: &str,
    expires_at: Option<DateTime<Utc>>,
) {
    sqlx::query("INSERT INTO mappings (code, target, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)")
        .bind(code)
        .bind(target)
        .bind(Utc::now().timestamp_millis())
        .bind(expires_at.map(|t| t.timestamp_millis()))
        .execute(pool)
        .await
        .unwrap();
}

pub async fn insert_expired_mapping(pool: &SqlitePool, code: &str, target: &str) {
    insert_mapping(pool, code, target, Some(Utc::now() - chrono::Duration::hours(1))).await;
}

pub async fn click_count(pool: &SqlitePool, code: &str) -> i64 {
    sqlx::query_scalar("SELECT click_count FROM mappings WHERE code = ?1")
        .bind(code)
        .fetch_one(pool)
        .await
        .unwrap()
}
