//! Domain layer containing the mapping entity and its repository contract.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//!
//! The domain layer has no dependencies on infrastructure or presentation layers.
//! Allocation and resolution logic lives in [`crate::application::services`].

pub mod entities;
pub mod repositories;
