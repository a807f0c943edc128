//! Core domain entities.
//!
//! - [`Mapping`] - A stored code → target association
//! - [`NewMapping`] - Input for inserting a mapping
//! - [`ClickOutcome`] - Result of an atomic resolve-and-count attempt

pub mod mapping;

pub use mapping::{ClickOutcome, Mapping, MappingState, NewMapping};
