//! SQLite implementation of the mapping repository.
//!
//! Timestamps are stored as UTC epoch milliseconds so that expiry can be
//! compared numerically inside the increment statement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::domain::entities::{ClickOutcome, Mapping, NewMapping};
use crate::domain::repositories::{MappingRepository, StoreSummary};
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation;

#[derive(Debug, sqlx::FromRow)]
struct SqliteMappingRow {
    code: String,
    target: String,
    click_count: i64,
    created_at: i64,
    expires_at: Option<i64>,
}

impl TryFrom<SqliteMappingRow> for Mapping {
    type Error = AppError;

    fn try_from(row: SqliteMappingRow) -> Result<Self, Self::Error> {
        Ok(Mapping {
            code: row.code,
            target: row.target,
            click_count: row.click_count,
            created_at: from_millis(row.created_at)?,
            expires_at: row.expires_at.map(from_millis).transpose()?,
        })
    }
}

fn from_millis(millis: i64) -> Result<DateTime<Utc>, AppError> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        AppError::internal("Stored timestamp out of range", json!({ "millis": millis }))
    })
}

/// SQLite repository for mappings.
///
/// Suitable for single-node deployments and the test suite.
pub struct SqliteMappingRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteMappingRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MappingRepository for SqliteMappingRepository {
    async fn insert(&self, new_mapping: NewMapping) -> Result<Mapping, AppError> {
        let row = sqlx::query_as::<_, SqliteMappingRow>(
            r#"
            INSERT INTO mappings (code, target, created_at, expires_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING code, target, click_count, created_at, expires_at
            "#,
        )
        .bind(&new_mapping.code)
        .bind(&new_mapping.target)
        .bind(new_mapping.created_at.timestamp_millis())
        .bind(new_mapping.expires_at.map(|t| t.timestamp_millis()))
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::CodeConflict {
                    code: new_mapping.code.clone(),
                }
            } else {
                AppError::from(e)
            }
        })?;

        row.try_into()
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Mapping>, AppError> {
        let row = sqlx::query_as::<_, SqliteMappingRow>(
            r#"
            SELECT code, target, click_count, created_at, expires_at
            FROM mappings
            WHERE code = ?1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Mapping::try_from).transpose()
    }

    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        let exists: i64 =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM mappings WHERE code = ?1)")
                .bind(code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists != 0)
    }

    async fn record_click(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<ClickOutcome, AppError> {
        let target: Option<String> = sqlx::query_scalar(
            r#"
            UPDATE mappings
            SET click_count = click_count + 1
            WHERE code = ?1 AND (expires_at IS NULL OR expires_at > ?2)
            RETURNING target
            "#,
        )
        .bind(code)
        .bind(now.timestamp_millis())
        .fetch_optional(self.pool.as_ref())
        .await?;

        if let Some(target) = target {
            return Ok(ClickOutcome::Recorded(target));
        }

        let expires_at: Option<Option<i64>> =
            sqlx::query_scalar("SELECT expires_at FROM mappings WHERE code = ?1")
                .bind(code)
                .fetch_optional(self.pool.as_ref())
                .await?;

        let lookup = expires_at
            .map(|millis| millis.map(from_millis).transpose())
            .transpose()?;

        Ok(ClickOutcome::after_missed_increment(lookup, now))
    }

    async fn summary(&self) -> Result<StoreSummary, AppError> {
        let (mappings, clicks): (i64, i64) =
            sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(click_count), 0) FROM mappings")
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(StoreSummary { mappings, clicks })
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
