//! HTTP surface: JSON endpoints under `/api` plus the shared request tracing.
//!
//! Handlers stay thin. They validate the payload with `validator`, call
//! [`crate::application::services::MappingService`] and map the result into
//! a DTO. Errors render through [`crate::error::AppError`].

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
