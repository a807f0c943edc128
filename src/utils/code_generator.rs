//! Short code generation and alias validation utilities.
//!
//! Generated codes are drawn uniformly from the 62-symbol alphanumeric
//! alphabet. They only need to be unique, not unguessable, so the thread-local
//! PRNG is sufficient.

use crate::error::AppError;
use rand::Rng;
use rand::distr::Alphanumeric;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Default length of generated codes.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Longest alias a caller may choose.
pub const MAX_ALIAS_LENGTH: usize = 64;

static ALIAS_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Reserved words that cannot be used as aliases.
///
/// These collide with fixed routes of the HTTP surface.
pub const RESERVED_ALIASES: &[&str] = &["api", "health", "static", "favicon.ico"];

/// Generates a random code of `length` characters from `[A-Za-z0-9]`.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6);
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Validates a caller-supplied alias.
///
/// Aliases are kept exactly as given; this check never rewrites them.
///
/// # Rules
///
/// - Length: 1-64 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Cannot be a reserved route word
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_alias(alias: &str) -> Result<(), AppError> {
    if alias.is_empty() || alias.len() > MAX_ALIAS_LENGTH {
        return Err(AppError::bad_request(
            format!("Custom alias must be 1-{MAX_ALIAS_LENGTH} characters"),
            json!({ "provided_length": alias.len() }),
        ));
    }

    if !ALIAS_CHARSET.is_match(alias) {
        return Err(AppError::bad_request(
            "Custom alias can only contain letters, digits, hyphens and underscores",
            json!({ "alias": alias }),
        ));
    }

    if RESERVED_ALIASES.contains(&alias) {
        return Err(AppError::bad_request(
            "This alias is reserved",
            json!({ "alias": alias }),
        ));
    }

    Ok(())
}
