//! DTOs for link shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::domain::entities::Mapping;
use crate::utils::code_generator::validate_alias;

/// Applies the alias rules shared with the service layer.
fn custom_alias_rules(alias: &str) -> Result<(), ValidationError> {
    validate_alias(alias).map_err(|e| {
        ValidationError::new("custom_alias").with_message(Cow::Owned(e.to_string()))
    })
}

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten (must be valid HTTP/HTTPS).
    #[validate(length(min = 1, max = 2048))]
    #[validate(url(message = "Invalid URL format"))]
    pub long_url: String,

    /// Optional lifetime in seconds. `0` or absent means the link never expires.
    #[validate(range(min = 0))]
    pub expires_in_seconds: Option<i64>,

    /// Optional caller-chosen code. Case-sensitive; an empty string means "generate one".
    #[validate(custom(function = "custom_alias_rules"))]
    pub custom_alias: Option<String>,
}

/// Created mapping, as returned to the caller.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_code: String,
    pub short_url: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ShortenResponse {
    pub fn new(mapping: Mapping, short_url: String) -> Self {
        Self {
            short_code: mapping.code,
            short_url,
            long_url: mapping.target,
            created_at: mapping.created_at,
            expires_at: mapping.expires_at,
        }
    }
}
