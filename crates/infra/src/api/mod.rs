//! REST adapter for the offer backend
//!
//! Implements the `cvm-core` offer and catalog ports over JSON/HTTP.
//!
//! # Architecture
//!
//! - [`HttpClient`](crate::http::HttpClient) owns retries (idempotent
//!   methods only)
//! - [`ApiClient`] adds bearer auth, the per-call timeout, status
//!   classification and `{ "data": ... }` unwrapping
//! - Non-2xx responses with a JSON body reach the wizard unchanged as
//!   `CvmError::Rejected`

pub mod auth;
pub mod client;
pub mod errors;
mod services;

pub use auth::{AccessTokenProvider, StaticTokenProvider};
pub use client::{ApiClient, ApiClientConfig};
pub use errors::ApiError;
