//! # CVM Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The REST adapter for the offer and catalog services
//! - HTTP client implementation with retries
//! - Configuration loading (environment, `.env`, JSON/TOML files)
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `cvm-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use api::{ApiClient, ApiClientConfig, ApiError};
pub use errors::InfraError;
pub use http::HttpClient;
pub use observability::init_tracing;
