//! Mapping creation, resolution and introspection.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use serde_json::json;
use tracing::{debug, info, warn};

use super::code_allocator::{AllocatorSettings, CodeAllocator};
use crate::domain::entities::{ClickOutcome, Mapping, NewMapping};
use crate::domain::repositories::{MappingRepository, StoreSummary};
use crate::error::AppError;
use crate::utils::code_generator::validate_alias;
use crate::utils::target_url::validate_target_url;

/// Construction-time settings for [`MappingService`].
#[derive(Debug, Clone)]
pub struct MappingSettings {
    /// Prefix for short URLs, e.g. `https://s.example.com`.
    pub base_url: String,
    pub allocator: AllocatorSettings,
    /// Insert attempts for generated codes before giving up on conflicts.
    pub max_create_attempts: usize,
}

impl Default for MappingSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            allocator: AllocatorSettings::default(),
            max_create_attempts: 5,
        }
    }
}

/// Service owning the create / resolve / stats operations on mappings.
///
/// All writes go through [`Self::create`] and the click increment inside
/// [`Self::resolve`]; nothing else mutates a mapping.
pub struct MappingService<R: MappingRepository + ?Sized> {
    repository: Arc<R>,
    allocator: CodeAllocator<R>,
    base_url: String,
    max_create_attempts: usize,
}

impl<R: MappingRepository + ?Sized> MappingService<R> {
    pub fn new(repository: Arc<R>, settings: MappingSettings) -> Self {
        let allocator = CodeAllocator::new(Arc::clone(&repository), settings.allocator);

        Self {
            repository,
            allocator,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            max_create_attempts: settings.max_create_attempts.max(1),
        }
    }

    /// Creates a mapping for `target`.
    ///
    /// The code comes from the allocator: `alias` if given and free, otherwise a
    /// random code. `ttl` values of zero or less mean "never expires".
    ///
    /// # Concurrency
    ///
    /// The allocator's existence check can race with another writer. The store's
    /// uniqueness constraint settles it: a generated code that loses the race is
    /// replaced by a fresh draw (up to `max_create_attempts` inserts), an alias
    /// that loses it is reported as taken.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a malformed target, alias or TTL
    /// - [`AppError::AliasTaken`] if the alias is already stored
    /// - [`AppError::CodeSpaceExhausted`] if no free code could be allocated
    pub async fn create(
        &self,
        target: String,
        ttl: Option<TimeDelta>,
        alias: Option<String>,
    ) -> Result<Mapping, AppError> {
        validate_target_url(&target).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        if let Some(alias) = &alias {
            validate_alias(alias)?;
        }

        let created_at = Utc::now();
        let expires_at = match ttl.filter(|ttl| *ttl > TimeDelta::zero()) {
            Some(ttl) => Some(created_at.checked_add_signed(ttl).ok_or_else(|| {
                AppError::bad_request(
                    "Expiry is out of range",
                    json!({ "ttl_seconds": ttl.num_seconds() }),
                )
            })?),
            None => None,
        };

        for attempt in 1..=self.max_create_attempts {
            let code = self.allocator.reserve(alias.clone()).await?;

            let new_mapping = NewMapping {
                code,
                target: target.clone(),
                created_at,
                expires_at,
            };

            match self.repository.insert(new_mapping).await {
                Ok(mapping) => {
                    info!(
                        code = %mapping.code,
                        custom_alias = alias.is_some(),
                        expires_at = ?mapping.expires_at,
                        "Mapping created"
                    );
                    metrics::counter!("shortcode_mappings_created_total").increment(1);
                    return Ok(mapping);
                }
                Err(AppError::CodeConflict { code }) if alias.is_some() => {
                    debug!(alias = %code, "Alias taken by a concurrent writer");
                    return Err(AppError::AliasTaken { code });
                }
                Err(AppError::CodeConflict { code }) => {
                    warn!(code = %code, attempt, "Generated code lost insert race, reallocating");
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            attempts = self.max_create_attempts,
            "Giving up after repeated insert conflicts"
        );

        Err(AppError::CodeSpaceExhausted {
            attempts: self.max_create_attempts,
        })
    }

    /// Resolves `code` to its target and records one click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown code and
    /// [`AppError::Expired`] once `expires_at` has passed. Neither changes the
    /// click count.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        let now = Utc::now();

        match self.repository.record_click(code, now).await? {
            ClickOutcome::Recorded(target) => {
                metrics::counter!("shortcode_resolutions_total", "outcome" => "redirected")
                    .increment(1);
                Ok(target)
            }
            ClickOutcome::NotFound => {
                metrics::counter!("shortcode_resolutions_total", "outcome" => "not_found")
                    .increment(1);
                Err(AppError::not_found(code))
            }
            ClickOutcome::Expired(expired_at) => {
                debug!(code, %expired_at, "Refusing to resolve expired mapping");
                metrics::counter!("shortcode_resolutions_total", "outcome" => "expired")
                    .increment(1);
                Err(AppError::Expired {
                    code: code.to_string(),
                    expired_at,
                })
            }
        }
    }

    /// Returns the stored mapping without counting a click.
    ///
    /// Expired mappings are returned as well.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown code.
    pub async fn get_stats(&self, code: &str) -> Result<Mapping, AppError> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found(code))
    }

    /// Totals across the whole store.
    pub async fn summary(&self) -> Result<StoreSummary, AppError> {
        self.repository.summary().await
    }

    /// Probes the backing store.
    pub async fn check_storage(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    /// Builds the public short URL for `code`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockMappingRepository;
    use chrono::{DateTime, Duration};

    fn stored(new_mapping: NewMapping) -> Mapping {
        Mapping {
            code: new_mapping.code,
            target: new_mapping.target,
            click_count: 0,
            created_at: new_mapping.created_at,
            expires_at: new_mapping.expires_at,
        }
    }

    fn service(repo: MockMappingRepository) -> MappingService<MockMappingRepository> {
        MappingService::new(Arc::new(repo), MappingSettings::default())
    }

    #[tokio::test]
    async fn test_create_generates_code() {
        let mut repo = MockMappingRepository::new();
        repo.expect_exists().times(1).returning(|_| Ok(false));
        repo.expect_insert()
            .withf(|m| m.code.len() == 6 && m.target == "https://example.com/a")
            .times(1)
            .returning(|m| Ok(stored(m)));

        let mapping = service(repo)
            .create("https://example.com/a".to_string(), None, None)
            .await
            .unwrap();

        assert_eq!(mapping.target, "https://example.com/a");
        assert_eq!(mapping.click_count, 0);
        assert!(mapping.expires_at.is_none());
    }

    #[tokio::test]
    async fn test_create_with_ttl_sets_expiry_from_creation_time() {
        let mut repo = MockMappingRepository::new();
        repo.expect_exists().returning(|_| Ok(false));
        repo.expect_insert()
            .withf(|m| m.expires_at == Some(m.created_at + Duration::seconds(60)))
            .times(1)
            .returning(|m| Ok(stored(m)));

        let mapping = service(repo)
            .create(
                "https://example.com".to_string(),
                Some(TimeDelta::seconds(60)),
                None,
            )
            .await
            .unwrap();

        assert!(mapping.expires_at.is_some());
    }

    #[tokio::test]
    async fn test_create_with_zero_ttl_never_expires() {
        let mut repo = MockMappingRepository::new();
        repo.expect_exists().returning(|_| Ok(false));
        repo.expect_insert()
            .withf(|m| m.expires_at.is_none())
            .times(1)
            .returning(|m| Ok(stored(m)));

        let result = service(repo)
            .create("https://example.com".to_string(), Some(TimeDelta::zero()), None)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_with_alias() {
        let mut repo = MockMappingRepository::new();
        repo.expect_exists()
            .withf(|code| code == "Promo")
            .times(1)
            .returning(|_| Ok(false));
        repo.expect_insert()
            .withf(|m| m.code == "Promo")
            .times(1)
            .returning(|m| Ok(stored(m)));

        let mapping = service(repo)
            .create(
                "https://example.com".to_string(),
                None,
                Some("Promo".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(mapping.code, "Promo");
    }

    #[tokio::test]
    async fn test_create_with_taken_alias_does_not_insert() {
        let mut repo = MockMappingRepository::new();
        repo.expect_exists().times(1).returning(|_| Ok(true));
        repo.expect_insert().times(0);

        let result = service(repo)
            .create(
                "https://example.com".to_string(),
                None,
                Some("taken".to_string()),
            )
            .await;

        assert!(matches!(result, Err(AppError::AliasTaken { .. })));
    }

    #[tokio::test]
    async fn test_create_alias_conflict_on_insert_reports_alias_taken() {
        let mut repo = MockMappingRepository::new();
        repo.expect_exists().times(1).returning(|_| Ok(false));
        repo.expect_insert().times(1).returning(|m| {
            Err(AppError::CodeConflict {
                code: m.code.clone(),
            })
        });

        let result = service(repo)
            .create(
                "https://example.com".to_string(),
                None,
                Some("race".to_string()),
            )
            .await;

        assert!(matches!(
            result,
            Err(AppError::AliasTaken { ref code }) if code == "race"
        ));
    }

    #[tokio::test]
    async fn test_create_generated_conflict_is_retried() {
        let mut repo = MockMappingRepository::new();
        repo.expect_exists().times(2).returning(|_| Ok(false));
        let mut inserts = 0;
        repo.expect_insert().times(2).returning(move |m| {
            inserts += 1;
            if inserts == 1 {
                Err(AppError::CodeConflict { code: m.code })
            } else {
                Ok(stored(m))
            }
        });

        let result = service(repo)
            .create("https://example.com".to_string(), None, None)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_gives_up_after_repeated_conflicts() {
        let mut repo = MockMappingRepository::new();
        repo.expect_exists().returning(|_| Ok(false));
        repo.expect_insert()
            .times(5)
            .returning(|m| Err(AppError::CodeConflict { code: m.code }));

        let result = service(repo)
            .create("https://example.com".to_string(), None, None)
            .await;

        assert!(matches!(
            result,
            Err(AppError::CodeSpaceExhausted { attempts: 5 })
        ));
    }

    #[tokio::test]
    async fn test_create_invalid_url() {
        let repo = MockMappingRepository::new();

        let result = service(repo)
            .create("not-a-url".to_string(), None, None)
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_invalid_alias() {
        let repo = MockMappingRepository::new();

        let result = service(repo)
            .create(
                "https://example.com".to_string(),
                None,
                Some("has space".to_string()),
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_resolve_returns_target() {
        let mut repo = MockMappingRepository::new();
        repo.expect_record_click()
            .withf(|code, _| code == "abc123")
            .times(1)
            .returning(|_, _| Ok(ClickOutcome::Recorded("https://example.com".to_string())));

        let target = service(repo).resolve("abc123").await.unwrap();

        assert_eq!(target, "https://example.com");
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let mut repo = MockMappingRepository::new();
        repo.expect_record_click()
            .times(1)
            .returning(|_, _| Ok(ClickOutcome::NotFound));

        let result = service(repo).resolve("missing").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_resolve_expired() {
        let expired_at: DateTime<Utc> = Utc::now() - Duration::seconds(5);
        let mut repo = MockMappingRepository::new();
        repo.expect_record_click()
            .times(1)
            .returning(move |_, _| Ok(ClickOutcome::Expired(expired_at)));

        let result = service(repo).resolve("old").await;

        assert!(matches!(
            result,
            Err(AppError::Expired { expired_at: at, .. }) if at == expired_at
        ));
    }

    #[tokio::test]
    async fn test_get_stats_not_found() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));

        let result = service(repo).get_stats("missing").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_get_stats_does_not_record_click() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_code().times(1).returning(|code| {
            Ok(Some(Mapping {
                code: code.to_string(),
                target: "https://example.com".to_string(),
                click_count: 3,
                created_at: Utc::now(),
                expires_at: None,
            }))
        });
        repo.expect_record_click().times(0);

        let mapping = service(repo).get_stats("abc").await.unwrap();

        assert_eq!(mapping.click_count, 3);
    }

    #[test]
    fn test_short_url_trims_trailing_slash() {
        let service = MappingService::new(
            Arc::new(MockMappingRepository::new()),
            MappingSettings {
                base_url: "https://s.example.com/".to_string(),
                ..MappingSettings::default()
            },
        );

        assert_eq!(service.short_url("abc123"), "https://s.example.com/abc123");
    }
}
