//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Random code generation and alias validation
//! - [`target_url`] - Target URL validation
//! - [`db_error`] - Database error classification

pub mod code_generator;
pub mod db_error;
pub mod target_url;
