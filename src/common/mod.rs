//! Common types and utilities shared across the crate.

// Submodule declarations
pub mod encoding;
pub mod error;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, Result};
