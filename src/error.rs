//! Error types for the planner and its collaborators.

use thiserror::Error;

/// Failures visible to callers of [`crate::optimizer::RouteOptimizer::optimize`].
#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("insufficient stops: at least 2 are required, got {found}")]
    InsufficientStops { found: usize },

    #[error("invalid time of day {value:?}, expected HH:mm")]
    InvalidTime { value: String },
}

/// Whole-call failure of an external distance source.
///
/// Never surfaced from optimization; the provider falls back to geometric
/// estimates instead.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("distance request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("distance service returned {code}: {message}")]
    Service { code: String, message: String },

    #[error("malformed distance response: {message}")]
    Malformed { message: String },
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("distance cache backend failed: {message}")]
    Backend { message: String },

    #[error("distance cache lock poisoned")]
    Poisoned,
}
