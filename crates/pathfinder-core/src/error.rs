//! Error types for Pathfinder operations.
//!
//! "No path" and "node not found" are not errors: path queries answer them
//! with an empty result. Everything here is either a client input problem
//! ([`ErrorKind::TypeKind`]) or an internal failure.

use thiserror::Error;

/// Result type for Pathfinder operations.
pub type Result<T> = std::result::Result<T, PathError>;

/// Errors that can occur during Pathfinder operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("Error in {metric} value: expected type {expected}, found {found}")]
    MetricType {
        metric: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Malformed topology snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("Malformed path record: {0}")]
    MalformedPathRecord(String),

    #[error("Too many flexible constraints: {count} (at most {max} allowed)")]
    TooManyFlexible { count: usize, max: usize },

    #[error("Topology lock poisoned")]
    LockPoisoned,
}

/// Coarse classification used by request adapters to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller supplied a value of the wrong shape or type (4xx).
    TypeKind,
    /// Anything else (5xx).
    Internal,
}

impl PathError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PathError::MetricType { .. }
            | PathError::MalformedSnapshot(_)
            | PathError::MalformedPathRecord(_)
            | PathError::TooManyFlexible { .. } => ErrorKind::TypeKind,
            PathError::LockPoisoned => ErrorKind::Internal,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.kind() == ErrorKind::TypeKind
    }

    pub fn malformed_snapshot(msg: impl Into<String>) -> Self {
        PathError::MalformedSnapshot(msg.into())
    }
}
