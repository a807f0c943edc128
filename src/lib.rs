//! Short-code URL shortener.
//!
//! Long URLs are stored under short codes, either random 6-character
//! alphanumeric codes or caller-chosen aliases, which share one namespace.
//! Following a code redirects to the target and counts the click.
//!
//! Layers, innermost first:
//!
//! - [`domain`]: the [`domain::entities::Mapping`] record and the
//!   [`domain::repositories::MappingRepository`] contract
//! - [`application`]: the code allocator and the create / resolve / stats service
//! - [`infrastructure`]: PostgreSQL and SQLite repositories, pools, migrations
//! - [`api`]: axum handlers and DTOs, wired up in [`routes`]
//!
//! The store's primary key on `code` is the only uniqueness guarantee. Lost
//! insert races are retried a bounded number of times. Expired mappings answer
//! 410 Gone but remain readable through the stats endpoint.
//!
//! ```bash
//! DATABASE_URL=sqlite:shortcode.db BASE_URL=http://localhost:3000 cargo run
//! ```
//!
//! Environment variables are listed in [`config`].

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod routes;
pub mod server;
pub mod state;
pub mod utils;

pub use error::AppError;
pub use state::AppState;

/// Re-exports for embedding the service or writing integration tests.
pub mod prelude {
    pub use crate::application::services::{
        AllocatorSettings, CodeAllocator, MappingService, MappingSettings,
    };
    pub use crate::domain::entities::{ClickOutcome, Mapping, MappingState, NewMapping};
    pub use crate::domain::repositories::{MappingRepository, StoreSummary};
    pub use crate::error::AppError;
    pub use crate::state::{AppState, DynMappingService};
}
