//! # CVM Domain
//!
//! Business domain types for the offer composition wizard.
//!
//! This crate contains:
//! - The offer draft and its sub-entities (creatives, tracking sources,
//!   rewards and their rules)
//! - Backend record shapes (offers, catalogs) as they appear on the wire
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other CVM crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
