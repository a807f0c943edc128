//! Infrastructure layer for external integrations.
//!
//! # Modules
//!
//! - [`database`] - Connection pools and migrations for the supported backends
//! - [`persistence`] - Repository implementations

pub mod database;
pub mod persistence;
