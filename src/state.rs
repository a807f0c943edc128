//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::MappingService;
use crate::domain::repositories::MappingRepository;

/// Mapping service over whichever storage backend was configured.
pub type DynMappingService = MappingService<dyn MappingRepository>;

#[derive(Clone)]
pub struct AppState {
    pub mapping_service: Arc<DynMappingService>,
}

impl AppState {
    pub fn new(mapping_service: Arc<DynMappingService>) -> Self {
        Self { mapping_service }
    }
}
