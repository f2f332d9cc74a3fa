//! Error types for organization removal
//!
//! Two layers exist. [`Failure`] classifies what went wrong for operators
//! and renders the audit line. [`RemovalError`] is what the caller sees:
//! unknown, unauthenticated and unverified callers pass through, everything
//! else collapses into one localized "please try again" message.

use std::fmt;
use thiserror::Error;
use tracker_rbac::AuthError;
use tracker_store::{StepKind, StoreError};

/// Caller-facing removal error.
#[derive(Debug, Error)]
pub enum RemovalError {
    /// The caller could not be resolved or is not verified
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// An internal failure, with the localized generic message
    #[error("{message}")]
    Failed {
        /// Localized "unable to remove organization" message
        message: String,
    },
}

/// Result type for removal operations.
pub type ServiceResult<T> = Result<T, RemovalError>;

impl RemovalError {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            RemovalError::Auth(err) => err.status_code(),
            RemovalError::Failed { .. } => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            RemovalError::Auth(err) => err.error_code(),
            RemovalError::Failed { .. } => "REMOVAL_FAILED",
        }
    }
}

/// The pre-transaction reads that scope the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CascadeRead {
    /// Which claimed domains the organization owns
    OwnershipInfo,
    /// How many organizations claim each of the organization's domains
    DomainClaimCount,
}

impl fmt::Display for CascadeRead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OwnershipInfo => "gather ownership information for",
            Self::DomainClaimCount => "gather domain count while removing",
        })
    }
}

/// Operator-facing classification of an internal failure.
#[derive(Debug, Error)]
pub enum Failure {
    /// Resolving the caller failed in the backing store
    #[error("caller lookup failed: {0}")]
    CallerLookup(AuthError),

    /// Loading the organization failed
    #[error("organization load failed: {0}")]
    LoadOrganization(StoreError),

    /// Looking up the caller's permission failed
    #[error("permission check failed: {0}")]
    PermissionCheck(AuthError),

    /// A cascade read call failed
    #[error("database error during {read}: {source}")]
    Database {
        /// Which read failed
        read: CascadeRead,
        /// Store error
        source: StoreError,
    },

    /// Iterating a cascade read's results failed
    #[error("cursor error during {read}: {source}")]
    Cursor {
        /// Which read failed
        read: CascadeRead,
        /// Store error
        source: StoreError,
    },

    /// Opening the transaction failed
    #[error("transaction begin failed: {0}")]
    Begin(StoreError),

    /// A transaction step failed
    #[error("transaction step {step} failed: {source}")]
    Step {
        /// Which step failed
        step: StepKind,
        /// Store error
        source: StoreError,
    },

    /// Committing the transaction failed
    #[error("transaction commit failed: {0}")]
    Commit(StoreError),
}

impl Failure {
    /// Render the audit line for this failure.
    ///
    /// Lines name the caller, the organization key and the failing stage.
    pub fn audit_line(&self, user_key: &str, org_key: &str) -> String {
        match self {
            Failure::CallerLookup(err) => format!(
                "Database error occurred while attempting to load user: {user_key} for removal of org: {org_key}, {err}"
            ),
            Failure::LoadOrganization(err) => format!(
                "Database error occurred for user: {user_key} while attempting to load org: {org_key}, {err}"
            ),
            Failure::PermissionCheck(err) => format!(
                "Permission check error occurred for user: {user_key} while attempting to remove org: {org_key}, {err}"
            ),
            Failure::Database { read, source } => format!(
                "Database error occurred for user: {user_key} while attempting to {read} org: {org_key}, {source}"
            ),
            Failure::Cursor { read, source } => format!(
                "Cursor error occurred for user: {user_key} while attempting to {read} org: {org_key}, {source}"
            ),
            Failure::Begin(err) => format!(
                "Trx begin error occurred for user: {user_key} while attempting to remove org: {org_key}, {err}"
            ),
            Failure::Step { step, source } => format!(
                "Trx step error occurred for user: {user_key} while attempting to remove {step} for org: {org_key}, {source}"
            ),
            Failure::Commit(err) => format!(
                "Trx commit error occurred for user: {user_key} while attempting remove of org: {org_key}, {err}"
            ),
        }
    }

    /// Classify a cascade read error as a database or cursor failure.
    pub fn from_read(read: CascadeRead, source: StoreError) -> Self {
        match source {
            StoreError::Cursor { .. } => Failure::Cursor { read, source },
            source => Failure::Database { read, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_store::QueryKind;

    #[test]
    fn test_read_classification() {
        let cursor = Failure::from_read(
            CascadeRead::OwnershipInfo,
            StoreError::Cursor {
                kind: QueryKind::OwnershipInfo,
                message: "boom".into(),
            },
        );
        assert!(matches!(cursor, Failure::Cursor { .. }));

        let database = Failure::from_read(
            CascadeRead::DomainClaimCount,
            StoreError::Query {
                kind: QueryKind::DomainClaimCounts,
                message: "boom".into(),
            },
        );
        assert!(matches!(database, Failure::Database { .. }));
    }

    #[test]
    fn test_audit_lines_name_the_stage() {
        let line = Failure::Cursor {
            read: CascadeRead::OwnershipInfo,
            source: StoreError::Cursor {
                kind: QueryKind::OwnershipInfo,
                message: "boom".into(),
            },
        }
        .audit_line("123", "456");
        assert!(line.starts_with(
            "Cursor error occurred for user: 123 while attempting to gather ownership information for org: 456"
        ));

        let line = Failure::Step {
            step: StepKind::DkimResults,
            source: StoreError::Step {
                step: StepKind::DkimResults,
                message: "boom".into(),
            },
        }
        .audit_line("123", "456");
        assert!(line.starts_with(
            "Trx step error occurred for user: 123 while attempting to remove dkim results for org: 456"
        ));

        let line = Failure::Commit(StoreError::Commit("boom".into())).audit_line("123", "456");
        assert!(line.starts_with("Trx commit error occurred for user: 123"));

        let line = Failure::CallerLookup(AuthError::Lookup("connection reset".into()))
            .audit_line("123", "456");
        assert_eq!(
            line,
            "Database error occurred while attempting to load user: 123 for removal of org: 456, Permission lookup failed: connection reset"
        );
    }

    #[test]
    fn test_caller_error_codes() {
        let failed = RemovalError::Failed {
            message: "Unable to remove organization. Please try again.".into(),
        };
        assert_eq!(failed.status_code(), 500);
        assert_eq!(failed.to_string(), "Unable to remove organization. Please try again.");

        let auth: RemovalError = AuthError::Unauthenticated.into();
        assert_eq!(auth.status_code(), 401);
        assert_eq!(auth.error_code(), "UNAUTHENTICATED");
    }
}
