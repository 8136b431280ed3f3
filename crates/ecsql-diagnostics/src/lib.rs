//! ECSQL diagnostics and error handling
//!
//! This crate provides the error handling infrastructure for the ECSQL expression
//! engine: error codes, diagnostics, and the issue sink that the finalize walk
//! reports into.

mod error;
mod error_code;
mod issues;

pub use error::*;
pub use error_code::*;
pub use issues::*;

/// Result type for ECSQL operations
pub type Result<T> = std::result::Result<T, EcsqlError>;
