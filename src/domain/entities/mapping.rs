//! Mapping entity representing a short code and its target URL.

use chrono::{DateTime, Utc};

/// A stored short code with its target and usage counter.
///
/// Mappings are never deleted. Once `expires_at` passes they stop resolving
/// but keep their code reserved and remain readable through stats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub code: String,
    pub target: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Lifecycle state of a mapping at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingState {
    Active,
    Expired,
}

impl MappingState {
    pub fn as_str(self) -> &'static str {
        match self {
            MappingState::Active => "active",
            MappingState::Expired => "expired",
        }
    }
}

impl Mapping {
    /// Returns the state of the mapping at `now`.
    ///
    /// A mapping is expired from the instant `now >= expires_at`.
    pub fn state_at(&self, now: DateTime<Utc>) -> MappingState {
        match self.expires_at {
            Some(expires_at) if now >= expires_at => MappingState::Expired,
            _ => MappingState::Active,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.state_at(now) == MappingState::Expired
    }
}

/// Input data for inserting a new mapping.
///
/// `created_at` is supplied by the service so that `expires_at` is computed
/// from the same clock reading.
#[derive(Debug, Clone)]
pub struct NewMapping {
    pub code: String,
    pub target: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Result of an atomic resolve-and-count attempt against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Click recorded; carries the target URL.
    Recorded(String),
    /// No mapping with that code.
    NotFound,
    /// Mapping exists but expired at the given instant. Counter untouched.
    Expired(DateTime<Utc>),
}

impl ClickOutcome {
    /// Classifies a code whose conditional increment matched no row.
    ///
    /// `lookup` is the follow-up read of `expires_at`: `None` when no row
    /// exists, `Some(None)` for a row without expiry. Only an expiry at or
    /// before `now` counts as [`ClickOutcome::Expired`]; a row that appeared
    /// after the increment ran was not visible to it and is reported as
    /// [`ClickOutcome::NotFound`].
    pub fn after_missed_increment(
        lookup: Option<Option<DateTime<Utc>>>,
        now: DateTime<Utc>,
    ) -> Self {
        match lookup {
            Some(Some(expires_at)) if expires_at <= now => Self::Expired(expires_at),
            _ => Self::NotFound,
        }
    }
}
