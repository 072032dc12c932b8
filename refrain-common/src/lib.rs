//! # Refrain Common Library
//!
//! Shared code for the Refrain services including:
//! - Error types (service errors and the outbound fetch taxonomy)
//! - Configuration loading (ENV → TOML resolution)

pub mod config;
pub mod error;

pub use error::{Error, FetchError, Result};
