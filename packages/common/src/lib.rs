//! Common infrastructure and utilities for the jwtsmith project
//!
//! This crate provides shared functionality used across all jwtsmith crates including:
//! - Lenient base64url, hex and JSON layout helpers
//! - Byte slice helpers
//! - Logging bootstrap with secure fingerprinting of sensitive material

#![forbid(unsafe_code)]

pub mod bytes;
pub mod encoding;
pub mod error;
pub mod logging;

pub use error::{EncodingError, Result};
pub use logging::LoggingTransformer;
