//! Removal outcome returned to the API layer
//!
//! The API exposes a union: either the organization was removed, or the
//! request was rejected with a code and a localized description.

use serde::{Deserialize, Serialize};

/// Outcome of a removal request that did not fail internally.
///
/// Serializes with a `__typename` tag naming the union member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum RemovalResult {
    /// The organization was removed
    OrganizationResult(OrganizationResult),

    /// The request was rejected
    OrganizationError(OrganizationError),
}

impl RemovalResult {
    /// Check if the organization was removed.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::OrganizationResult(_))
    }

    /// The success branch, if populated.
    pub fn as_result(&self) -> Option<&OrganizationResult> {
        match self {
            Self::OrganizationResult(result) => Some(result),
            Self::OrganizationError(_) => None,
        }
    }

    /// The error branch, if populated.
    pub fn as_error(&self) -> Option<&OrganizationError> {
        match self {
            Self::OrganizationResult(_) => None,
            Self::OrganizationError(error) => Some(error),
        }
    }
}

/// Successful removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationResult {
    /// Localized status line
    pub status: String,

    /// The removed organization
    pub organization: RemovedOrganization,
}

/// Display fields of a removed organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedOrganization {
    /// Localized name
    pub name: String,
}

/// Rejected removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationError {
    /// HTTP-style status code (400 unknown org, 403 forbidden)
    pub code: u16,

    /// Localized description
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_union_wire_format() {
        let ok = RemovalResult::OrganizationResult(OrganizationResult {
            status: "Successfully removed organization: tbs.".into(),
            organization: RemovedOrganization {
                name: "Treasury Board".into(),
            },
        });
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({
                "__typename": "OrganizationResult",
                "status": "Successfully removed organization: tbs.",
                "organization": { "name": "Treasury Board" },
            })
        );

        let err = RemovalResult::OrganizationError(OrganizationError {
            code: 400,
            description: "Unable to remove unknown organization.".into(),
        });
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({
                "__typename": "OrganizationError",
                "code": 400,
                "description": "Unable to remove unknown organization.",
            })
        );
    }

    #[test]
    fn test_exactly_one_branch() {
        let err = RemovalResult::OrganizationError(OrganizationError {
            code: 403,
            description: String::new(),
        });
        assert!(!err.is_success());
        assert!(err.as_result().is_none());
        assert_eq!(err.as_error().map(|e| e.code), Some(403));
    }
}
