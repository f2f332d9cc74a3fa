//! Error types for graph store operations

use thiserror::Error;

use crate::collection::Collection;
use crate::query::{QueryKind, StepKind};

/// Graph store error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The query call itself failed
    #[error("Query {kind} failed: {message}")]
    Query {
        /// Which query failed
        kind: QueryKind,
        /// Backend message
        message: String,
    },

    /// The query succeeded but iterating its results failed
    #[error("Cursor for {kind} failed: {message}")]
    Cursor {
        /// Which query's cursor failed
        kind: QueryKind,
        /// Backend message
        message: String,
    },

    /// A transaction step failed
    #[error("Transaction step {step} failed: {message}")]
    Step {
        /// Which step failed
        step: StepKind,
        /// Backend message
        message: String,
    },

    /// A step touched a collection the transaction did not declare
    #[error("Collection {0} was not declared for this transaction")]
    UndeclaredCollection(Collection),

    /// Committing the transaction failed
    #[error("Commit failed: {0}")]
    Commit(String),

    /// The store changed underneath the transaction
    #[error("Write conflict: {0}")]
    Conflict(String),

    /// Opening the transaction failed
    #[error("Failed to begin transaction: {0}")]
    Begin(String),

    /// A document could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for graph store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Check if retrying the whole operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
