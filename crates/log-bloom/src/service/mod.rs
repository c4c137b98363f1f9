//! Service Layer
//!
//! Application services that orchestrate domain logic and coordinate with
//! external dependencies via ports.

pub mod log_bloom_service;

pub use log_bloom_service::LogBloomService;
