//! Read queries and transaction write steps
//!
//! Queries and steps are typed values rather than query strings. A backend
//! translates them into its own query language; the in-memory backend
//! evaluates them directly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracker_org::ScanKind;

use crate::collection::Collection;

/// A parameterized read query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReadQuery {
    /// Domains claimed by the organization that it also owns.
    ///
    /// Yields [`OwnedDomain`] rows.
    OwnershipInfo { org_id: String },

    /// Total claim count for every domain the organization claims.
    ///
    /// Yields [`DomainClaimCount`] rows.
    DomainClaimCounts { org_id: String },

    /// Affiliation edges pointing at a user.
    ///
    /// Yields [`tracker_org::Affiliation`] rows.
    UserAffiliations { user_id: String },

    /// A single document by key. Yields zero or one row.
    Document { collection: Collection, key: String },
}

impl ReadQuery {
    /// The kind of this query, used for logging and fault injection.
    pub fn kind(&self) -> QueryKind {
        match self {
            Self::OwnershipInfo { .. } => QueryKind::OwnershipInfo,
            Self::DomainClaimCounts { .. } => QueryKind::DomainClaimCounts,
            Self::UserAffiliations { .. } => QueryKind::UserAffiliations,
            Self::Document { .. } => QueryKind::Document,
        }
    }
}

/// Discriminant of a [`ReadQuery`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    OwnershipInfo,
    DomainClaimCounts,
    UserAffiliations,
    Document,
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OwnershipInfo => "ownership info",
            Self::DomainClaimCounts => "domain claim counts",
            Self::UserAffiliations => "user affiliations",
            Self::Document => "document",
        })
    }
}

/// Row returned by [`ReadQuery::OwnershipInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedDomain {
    /// Domain document id
    pub domain_id: String,
}

/// Row returned by [`ReadQuery::DomainClaimCounts`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainClaimCount {
    /// Domain document id
    pub domain_id: String,

    /// Number of organizations claiming the domain
    pub count: u64,
}

impl DomainClaimCount {
    /// Check if the domain has exactly one claimant.
    pub fn is_exclusive(&self) -> bool {
        self.count == 1
    }
}

/// A single write executed inside a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WriteStep {
    /// Remove DMARC summaries (and their domain edges) of the listed domains.
    RemoveDmarcSummaries { domain_ids: Vec<String> },

    /// Remove every ownership edge from the organization.
    RemoveOwnerships { org_id: String },

    /// Fail unless the organization is still the only claimant of the domain.
    AssertExclusiveClaim { org_id: String, domain_id: String },

    /// Remove the DKIM results (and their edges) under the domain's DKIM scans.
    RemoveDkimResults { domain_id: String },

    /// Remove the domain's DKIM, DMARC, SPF, HTTPS and SSL scan documents.
    RemoveScanResults { domain_id: String },

    /// Remove the domain, its claim edges and its remaining scan edges.
    RemoveDomain { domain_id: String },

    /// Remove every claim edge from the organization.
    RemoveClaims { org_id: String },

    /// Remove every affiliation edge from the organization.
    RemoveAffiliations { org_id: String },

    /// Remove the organization document.
    RemoveOrganization { org_id: String },
}

impl WriteStep {
    /// The kind of this step.
    pub fn kind(&self) -> StepKind {
        match self {
            Self::RemoveDmarcSummaries { .. } => StepKind::DmarcSummaries,
            Self::RemoveOwnerships { .. } => StepKind::Ownerships,
            Self::AssertExclusiveClaim { .. } => StepKind::ClaimRecheck,
            Self::RemoveDkimResults { .. } => StepKind::DkimResults,
            Self::RemoveScanResults { .. } => StepKind::ScanResults,
            Self::RemoveDomain { .. } => StepKind::Domain,
            Self::RemoveClaims { .. } => StepKind::Claims,
            Self::RemoveAffiliations { .. } => StepKind::Affiliations,
            Self::RemoveOrganization { .. } => StepKind::Organization,
        }
    }

    /// Collections this step reads or writes.
    pub fn collections(&self) -> BTreeSet<Collection> {
        let mut set = BTreeSet::new();
        match self {
            Self::RemoveDmarcSummaries { .. } => {
                set.extend([
                    Collection::DomainsToDmarcSummaries,
                    Collection::DmarcSummaries,
                ]);
            }
            Self::RemoveOwnerships { .. } => {
                set.insert(Collection::Ownership);
            }
            Self::AssertExclusiveClaim { .. } => {
                set.insert(Collection::Claims);
            }
            Self::RemoveDkimResults { .. } => {
                set.extend([
                    Collection::DomainsDkim,
                    Collection::DkimToDkimResults,
                    Collection::DkimResults,
                ]);
            }
            Self::RemoveScanResults { .. } => {
                for kind in ScanKind::ALL {
                    set.insert(Collection::scan(kind));
                    set.insert(Collection::scan_edge(kind));
                }
            }
            Self::RemoveDomain { .. } => {
                set.extend([Collection::Domains, Collection::Claims]);
                for kind in ScanKind::ALL {
                    set.insert(Collection::scan_edge(kind));
                }
            }
            Self::RemoveClaims { .. } => {
                set.insert(Collection::Claims);
            }
            Self::RemoveAffiliations { .. } => {
                set.insert(Collection::Affiliations);
            }
            Self::RemoveOrganization { .. } => {
                set.insert(Collection::Organizations);
            }
        }
        set
    }
}

/// Discriminant of a [`WriteStep`].
///
/// The display form names the step in operator-facing log lines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    DmarcSummaries,
    Ownerships,
    ClaimRecheck,
    DkimResults,
    ScanResults,
    Domain,
    Claims,
    Affiliations,
    Organization,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DmarcSummaries => "dmarc summaries",
            Self::Ownerships => "ownerships",
            Self::ClaimRecheck => "claim re-check",
            Self::DkimResults => "dkim results",
            Self::ScanResults => "scan results",
            Self::Domain => "domains",
            Self::Claims => "claims",
            Self::Affiliations => "affiliations",
            Self::Organization => "organization",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_wire_format() {
        let query = ReadQuery::DomainClaimCounts {
            org_id: "organizations/1".into(),
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["kind"], "domain_claim_counts");
        assert_eq!(json["org_id"], "organizations/1");
        assert_eq!(query.kind(), QueryKind::DomainClaimCounts);
    }

    #[test]
    fn test_step_collections() {
        let step = WriteStep::RemoveDomain {
            domain_id: "domains/1".into(),
        };
        let collections = step.collections();
        assert!(collections.contains(&Collection::Domains));
        assert!(collections.contains(&Collection::Claims));
        assert!(collections.contains(&Collection::DomainsSsl));
        assert!(!collections.contains(&Collection::Ssl));

        let step = WriteStep::RemoveScanResults {
            domain_id: "domains/1".into(),
        };
        assert_eq!(step.collections().len(), 10);
    }

    #[test]
    fn test_exclusive_claim_count() {
        let row = DomainClaimCount {
            domain_id: "domains/1".into(),
            count: 1,
        };
        assert!(row.is_exclusive());
        let shared = DomainClaimCount { count: 2, ..row };
        assert!(!shared.is_exclusive());
    }

    #[test]
    fn test_step_names() {
        assert_eq!(StepKind::DmarcSummaries.to_string(), "dmarc summaries");
        assert_eq!(
            WriteStep::AssertExclusiveClaim {
                org_id: "organizations/1".into(),
                domain_id: "domains/1".into(),
            }
            .kind()
            .to_string(),
            "claim re-check"
        );
    }
}
