//! Repository trait for mapping storage.

use crate::domain::entities::{ClickOutcome, Mapping, NewMapping};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Aggregate counters over the whole store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreSummary {
    pub mappings: i64,
    pub clicks: i64,
}

/// Persistent table of mappings keyed by code.
///
/// Implementations must enforce code uniqueness with a storage constraint and
/// must increment click counters atomically; the service relies on both.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMappingRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::SqliteMappingRepository`] - SQLite
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Inserts a new mapping with a zero click count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CodeConflict`] if the code is already stored,
    /// including when a concurrent writer inserted it first.
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn insert(&self, new_mapping: NewMapping) -> Result<Mapping, AppError>;

    /// Finds a mapping by exact, case-sensitive code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Mapping>, AppError>;

    /// Returns whether any mapping, expired or not, holds `code`.
    async fn exists(&self, code: &str) -> Result<bool, AppError>;

    /// Atomically increments the click counter if the mapping is active at `now`.
    ///
    /// The expiry check and the increment happen in one statement, so a
    /// [`ClickOutcome::Expired`] or [`ClickOutcome::NotFound`] result never
    /// touches the counter and concurrent calls never lose updates.
    async fn record_click(&self, code: &str, now: DateTime<Utc>)
    -> Result<ClickOutcome, AppError>;

    /// Counts mappings and sums their clicks.
    async fn summary(&self) -> Result<StoreSummary, AppError>;

    /// Cheap connectivity check used by `/health`.
    async fn ping(&self) -> Result<(), AppError>;
}
