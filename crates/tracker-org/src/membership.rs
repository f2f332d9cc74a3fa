//! Organization relationship edges
//!
//! Claims, ownerships and affiliations are edges in the graph store. Each
//! edge links a `_from` document id to a `_to` document id.

use serde::{Deserialize, Serialize};

use crate::roles::Permission;

/// Edge collection for organization → domain claims.
pub const CLAIMS: &str = "claims";

/// Edge collection for organization → domain DMARC-summary ownership.
pub const OWNERSHIP: &str = "ownership";

/// Edge collection for organization → user affiliations.
pub const AFFILIATIONS: &str = "affiliations";

/// Document collection holding users, the targets of affiliations.
pub const USERS: &str = "users";

/// An organization claims a domain.
///
/// Claims are many-to-many: several organizations may monitor the same
/// domain. A domain with exactly one claim is exclusive to that claimant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Organization document id
    #[serde(rename = "_from")]
    pub from: String,

    /// Domain document id
    #[serde(rename = "_to")]
    pub to: String,
}

impl Claim {
    /// Creates a claim edge.
    pub fn new(org_id: impl Into<String>, domain_id: impl Into<String>) -> Self {
        Self {
            from: org_id.into(),
            to: domain_id.into(),
        }
    }
}

/// An organization owns a domain's DMARC-summary data.
///
/// At most one organization owns a given domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownership {
    /// Organization document id
    #[serde(rename = "_from")]
    pub from: String,

    /// Domain document id
    #[serde(rename = "_to")]
    pub to: String,
}

impl Ownership {
    /// Creates an ownership edge.
    pub fn new(org_id: impl Into<String>, domain_id: impl Into<String>) -> Self {
        Self {
            from: org_id.into(),
            to: domain_id.into(),
        }
    }
}

/// A user's affiliation with an organization.
///
/// # Examples
///
/// ```
/// use tracker_org::{Affiliation, Permission};
///
/// let affiliation = Affiliation::new("organizations/1", "users/2", Permission::Admin);
/// assert!(affiliation.permission.is_admin());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affiliation {
    /// Organization document id
    #[serde(rename = "_from")]
    pub from: String,

    /// User document id
    #[serde(rename = "_to")]
    pub to: String,

    /// Permission level granted by the affiliation
    pub permission: Permission,
}

impl Affiliation {
    /// Creates an affiliation edge.
    pub fn new(
        org_id: impl Into<String>,
        user_id: impl Into<String>,
        permission: Permission,
    ) -> Self {
        Self {
            from: org_id.into(),
            to: user_id.into(),
            permission,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_wire_format() {
        let claim = Claim::new("organizations/1", "domains/2");
        let json = serde_json::to_value(&claim).unwrap();
        assert_eq!(json["_from"], "organizations/1");
        assert_eq!(json["_to"], "domains/2");
    }

    #[test]
    fn test_affiliation_permission() {
        let json = serde_json::json!({
            "_from": "organizations/1",
            "_to": "users/1",
            "permission": "super_admin",
        });
        let affiliation: Affiliation = serde_json::from_value(json).unwrap();
        assert_eq!(affiliation.permission, Permission::SuperAdmin);
    }
}
