//! Target URL validation.
//!
//! Targets are opaque to the store: they are checked for shape here and then
//! stored byte-for-byte as submitted.

use url::Url;

/// Longest target URL accepted.
pub const MAX_TARGET_LENGTH: usize = 2048;

#[derive(Debug, thiserror::Error)]
pub enum TargetUrlError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL exceeds 2048 characters")]
    TooLong,

    #[error("URL must not contain whitespace or control characters")]
    ForbiddenCharacter,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

/// Checks that `input` is a well-formed absolute HTTP(S) URL.
///
/// # Errors
///
/// Rejects empty input, any whitespace or control character, malformed URLs,
/// non-HTTP(S) schemes such as `javascript:` or `file:`, and URLs without a host.
pub fn validate_target_url(input: &str) -> Result<(), TargetUrlError> {
    if input.trim().is_empty() {
        return Err(TargetUrlError::Empty);
    }

    if input.len() > MAX_TARGET_LENGTH {
        return Err(TargetUrlError::TooLong);
    }

    // The URL parser strips tabs and newlines, but the raw input is what gets
    // stored and later sent back as a `Location` header.
    if input.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return Err(TargetUrlError::ForbiddenCharacter);
    }

    let url = Url::parse(input).map_err(|e| TargetUrlError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(TargetUrlError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(TargetUrlError::MissingHost);
    }

    Ok(())
}
