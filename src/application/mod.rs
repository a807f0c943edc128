//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::code_allocator::CodeAllocator`] - Alias checks and random code allocation
//! - [`services::mapping_service::MappingService`] - Create, resolve and stats operations

pub mod services;
