//! Customer module: three-layer architecture (domain, repository, service).
//!
//! This module centralizes registration, partial update, and profile-image
//! business logic under the service crate.

pub mod domain;
pub mod errors;
pub mod merge;
pub mod repo;
pub mod repository;
pub mod service;

pub use service::CustomerService;
