//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where they need to surface it.

use thiserror::Error;

/// The error type for `gn-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("tick duration must be finite and positive, got {0}")]
    InvalidTickDuration(f32),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `gn-core`.
pub type CoreResult<T> = Result<T, CoreError>;
