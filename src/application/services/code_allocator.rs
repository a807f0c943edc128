//! Short code allocation.

use std::sync::Arc;

use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::utils::code_generator::{DEFAULT_CODE_LENGTH, generate_code};
use tracing::{debug, warn};

/// Tuning knobs for random code generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorSettings {
    /// Length of generated codes.
    pub code_length: usize,
    /// Draws attempted before giving up with [`AppError::CodeSpaceExhausted`].
    pub max_attempts: usize,
}

impl Default for AllocatorSettings {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            max_attempts: 10,
        }
    }
}

/// Produces codes for new mappings.
///
/// Either checks a caller-supplied alias against the store, or draws random
/// codes until one is free. The check is advisory: the store's uniqueness
/// constraint is what finally decides, see
/// [`crate::application::services::MappingService::create`].
pub struct CodeAllocator<R: MappingRepository + ?Sized> {
    repository: Arc<R>,
    settings: AllocatorSettings,
}

impl<R: MappingRepository + ?Sized> Clone for CodeAllocator<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            settings: self.settings,
        }
    }
}

impl<R: MappingRepository + ?Sized> CodeAllocator<R> {
    pub fn new(repository: Arc<R>, settings: AllocatorSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    pub fn settings(&self) -> AllocatorSettings {
        self.settings
    }

    /// Reserves a code for a new mapping.
    ///
    /// - `Some(alias)` is returned unchanged if no mapping holds it. Matching is
    ///   exact and case-sensitive.
    /// - `None` draws a random code of the configured length, redrawing on
    ///   collision up to `max_attempts` times.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AliasTaken`] if the alias is already stored.
    ///
    /// Returns [`AppError::CodeSpaceExhausted`] if every random draw collided.
    pub async fn reserve(&self, candidate: Option<String>) -> Result<String, AppError> {
        match candidate {
            Some(alias) => self.reserve_alias(alias).await,
            None => self.generate_unique_code().await,
        }
    }

    async fn reserve_alias(&self, alias: String) -> Result<String, AppError> {
        if self.repository.exists(&alias).await? {
            debug!(alias = %alias, "Alias already taken");
            return Err(AppError::AliasTaken { code: alias });
        }

        Ok(alias)
    }

    async fn generate_unique_code(&self) -> Result<String, AppError> {
        for attempt in 1..=self.settings.max_attempts {
            let code = generate_code(self.settings.code_length);

            if !self.repository.exists(&code).await? {
                return Ok(code);
            }

            debug!(code = %code, attempt, "Generated code collided, redrawing");
            metrics::counter!("shortcode_allocation_collisions_total").increment(1);
        }

        warn!(
            attempts = self.settings.max_attempts,
            code_length = self.settings.code_length,
            "Code space exhausted"
        );

        Err(AppError::CodeSpaceExhausted {
            attempts: self.settings.max_attempts,
        })
    }
}
