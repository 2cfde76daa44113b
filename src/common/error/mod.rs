//! Unified error types for Longan.
//!
//! This module provides a unified error type for the surfaces built on top of
//! the package model, presenting a consistent API to users.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
