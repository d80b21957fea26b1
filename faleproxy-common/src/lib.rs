//! Common types and utilities shared across Faleproxy crates.
//!
//! This crate defines observability helpers and the shared error type used
//! throughout the Faleproxy workspace. It stays dependency-light so that
//! every crate can depend on it.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`FaleproxyError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use faleproxy_common::FaleproxyError;
//!
//! let err = FaleproxyError::Config("substitution.source must not be empty".into());
//! assert_eq!(
//!     err.to_string(),
//!     "Configuration error: substitution.source must not be empty"
//! );
//! ```

pub mod observability;

/// Error types used across the Faleproxy system.
#[derive(thiserror::Error, Debug)]
pub enum FaleproxyError {
    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Binding or serving a socket failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A collaborator (fetcher, logger, ...) reported an error.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Convenient alias for results that use [`FaleproxyError`].
pub type Result<T> = std::result::Result<T, FaleproxyError>;
