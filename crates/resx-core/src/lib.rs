//! Core types and utilities for resx-forge
//!
//! # Modules
//!
//! - `config`: Environment configuration loading
//! - `error`: Error types and Result alias

pub mod config;
pub mod error;

// Re-exports
pub use error::{Error, Result};
