//! Reservation-subsystem error type.
//!
//! Conflicts are not errors: `reserve` returns `bool` and
//! `find_and_reserve_best` returns `Option`.  Errors here only cover
//! construction from a bad configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReserveError {
    #[error("search radius must be non-negative, got {0}")]
    NegativeRadius(i32),

    #[error("max_search_radius ({max}) is smaller than search_radius ({base})")]
    RadiusOrder { base: i32, max: i32 },

    #[error("path bias must be finite and non-negative, got {0}")]
    InvalidPathBias(f32),

    #[error("collision probe radius must be finite and positive, got {0}")]
    InvalidProbeRadius(f32),
}

pub type ReserveResult<T> = Result<T, ReserveError>;
