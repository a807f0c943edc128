//! DTOs for mapping statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::{Mapping, MappingState};

/// Statistics for a single mapping.
///
/// Returned for expired mappings too; `status` tells them apart.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub long_url: String,
    pub short_code: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub status: &'static str,
}

impl StatsResponse {
    pub fn from_mapping(mapping: Mapping, now: DateTime<Utc>) -> Self {
        let status: MappingState = mapping.state_at(now);

        Self {
            long_url: mapping.target,
            short_code: mapping.code,
            clicks: mapping.click_count,
            created_at: mapping.created_at,
            expires_at: mapping.expires_at,
            status: status.as_str(),
        }
    }
}
