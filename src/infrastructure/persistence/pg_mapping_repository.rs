//! PostgreSQL implementation of the mapping repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{ClickOutcome, Mapping, NewMapping};
use crate::domain::repositories::{MappingRepository, StoreSummary};
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation;

#[derive(Debug, sqlx::FromRow)]
struct MappingRow {
    code: String,
    target: String,
    click_count: i64,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl From<MappingRow> for Mapping {
    fn from(row: MappingRow) -> Self {
        Mapping {
            code: row.code,
            target: row.target,
            click_count: row.click_count,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}

/// PostgreSQL repository for mappings.
///
/// Timestamps are `TIMESTAMPTZ`; expiry is compared in SQL against the
/// instant passed in by the service.
pub struct PgMappingRepository {
    pool: Arc<PgPool>,
}

impl PgMappingRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MappingRepository for PgMappingRepository {
    async fn insert(&self, new_mapping: NewMapping) -> Result<Mapping, AppError> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            INSERT INTO mappings (code, target, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING code, target, click_count, created_at, expires_at
            "#,
        )
        .bind(&new_mapping.code)
        .bind(&new_mapping.target)
        .bind(new_mapping.created_at)
        .bind(new_mapping.expires_at)
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

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Mapping>, AppError> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT code, target, click_count, created_at, expires_at
            FROM mappings
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Mapping::from))
    }

    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM mappings WHERE code = $1)")
                .bind(code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
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
            WHERE code = $1 AND (expires_at IS NULL OR expires_at > $2)
            RETURNING target
            "#,
        )
        .bind(code)
        .bind(now)
        .fetch_optional(self.pool.as_ref())
        .await?;

        if let Some(target) = target {
            return Ok(ClickOutcome::Recorded(target));
        }

        let expires_at: Option<Option<DateTime<Utc>>> =
            sqlx::query_scalar("SELECT expires_at FROM mappings WHERE code = $1")
                .bind(code)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(ClickOutcome::after_missed_increment(expires_at, now))
    }

    async fn summary(&self) -> Result<StoreSummary, AppError> {
        let (mappings, clicks): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(click_count), 0)::BIGINT FROM mappings",
        )
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
