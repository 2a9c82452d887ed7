//! Error types for plan generation
//!
//! Every error here is raised at plan-construction time. The generator
//! never performs I/O and never executes anything, so there is no
//! transient-failure class and nothing to retry: callers should treat all
//! of these as developer-facing defects in the request or the suite
//! catalog.

use thiserror::Error;

/// Result type alias for plan generation
pub type Result<T> = std::result::Result<T, PlanError>;

/// Errors that can occur while generating a plan
#[derive(Debug, Error)]
pub enum PlanError {
    /// Malformed shard count, shard index, or suite/backend combination
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Requested environment identifier is not in the binding table
    #[error("unknown environment `{0}`")]
    UnknownEnvironment(String),

    /// A step template references a variable the binding does not supply
    #[error("unresolved parameter `{variable}` in step `{step}`")]
    UnresolvedParameter {
        /// Name of the placeholder that could not be substituted
        variable: String,
        /// Description of the step being constructed
        step: String,
    },

    /// Two stages in the same plan share a key
    #[error("duplicate stage key `{key}` at positions {first} and {second}")]
    DuplicateKey {
        /// The offending key
        key: String,
        /// Zero-based position of the first occurrence
        first: usize,
        /// Zero-based position of the second occurrence
        second: usize,
    },
}

impl PlanError {
    /// Create an `InvalidArgument` error from a message
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Check if this error is an invalid-argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Check if this error is a duplicate-key error
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }
}
