//! SQL repository implementations.
//!
//! Concrete implementations of [`crate::domain::repositories::MappingRepository`]
//! using SQLx runtime queries.
//!
//! # Repositories
//!
//! - [`PgMappingRepository`] - PostgreSQL, `TIMESTAMPTZ` columns
//! - [`SqliteMappingRepository`] - SQLite, epoch-millisecond columns

pub mod pg_mapping_repository;
pub mod sqlite_mapping_repository;

pub use pg_mapping_repository::PgMappingRepository;
pub use sqlite_mapping_repository::SqliteMappingRepository;
