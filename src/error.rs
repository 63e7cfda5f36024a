use thiserror::Error;

/// Unified error type for the engine.
///
/// Lookups, inserts and range scans never fail. Errors only come from
/// configuration and from explicit invariant checks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Options rejected by `Options::validate`.
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    /// Block sequence is not sorted, disjoint and non-empty.
    #[error("invariant violated at block {block}: {reason}")]
    InvariantViolation { block: usize, reason: String },
}

/// Result type alias used throughout the engine.
pub type Result<T> = std::result::Result<T, Error>;
