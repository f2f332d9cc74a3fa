//! Removal cascade scope
//!
//! A [`RemovalPlan`] is computed from the two pre-transaction reads and
//! turns into the ordered list of transaction steps.
//!
//! # Invariants
//! - DMARC summaries are removed only for the claimed domains the
//!   organization owns, as listed by the ownership read.
//! - Every ownership, claim and affiliation edge from the organization is
//!   removed, so none is left pointing at a missing organization.
//! - A domain and its scan results are removed only when the organization
//!   is its sole claimant.
//! - The organization node goes last.

use std::collections::BTreeSet;
use tracker_store::{Collection, DomainClaimCount, OwnedDomain, WriteStep};

/// Collections the removal transaction may write.
pub const REMOVAL_COLLECTIONS: [Collection; 19] = [
    Collection::Organizations,
    Collection::Affiliations,
    Collection::Claims,
    Collection::Ownership,
    Collection::Domains,
    Collection::DmarcSummaries,
    Collection::DomainsToDmarcSummaries,
    Collection::Dkim,
    Collection::DkimResults,
    Collection::DkimToDkimResults,
    Collection::Dmarc,
    Collection::Spf,
    Collection::Https,
    Collection::Ssl,
    Collection::DomainsDkim,
    Collection::DomainsDmarc,
    Collection::DomainsSpf,
    Collection::DomainsHttps,
    Collection::DomainsSsl,
];

/// The computed scope of one organization removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalPlan {
    /// Organization document id
    pub org_id: String,

    /// Claimed domains whose DMARC-summary data the organization owns
    pub owned_domains: BTreeSet<String>,

    /// Domains claimed only by this organization
    pub exclusive_domains: BTreeSet<String>,

    /// Domains also claimed by other organizations
    pub shared_domains: BTreeSet<String>,

    /// Re-check exclusivity inside the transaction before removing a domain
    pub recheck_claims: bool,
}

impl RemovalPlan {
    /// Build a plan from the ownership and claim-count reads.
    pub fn new(
        org_id: impl Into<String>,
        owned: Vec<OwnedDomain>,
        claim_counts: Vec<DomainClaimCount>,
        recheck_claims: bool,
    ) -> Self {
        let (exclusive, shared): (Vec<_>, Vec<_>) =
            claim_counts.into_iter().partition(|c| c.is_exclusive());
        Self {
            org_id: org_id.into(),
            owned_domains: owned.into_iter().map(|o| o.domain_id).collect(),
            exclusive_domains: exclusive.into_iter().map(|c| c.domain_id).collect(),
            shared_domains: shared.into_iter().map(|c| c.domain_id).collect(),
            recheck_claims,
        }
    }

    /// Check if the organization owns any DMARC-summary data.
    pub fn owns_dmarc_summaries(&self) -> bool {
        !self.owned_domains.is_empty()
    }

    /// The ordered transaction steps.
    pub fn steps(&self) -> Vec<WriteStep> {
        let org_id = &self.org_id;
        let mut steps = Vec::new();

        if self.owns_dmarc_summaries() {
            steps.push(WriteStep::RemoveDmarcSummaries {
                domain_ids: self.owned_domains.iter().cloned().collect(),
            });
        }
        steps.push(WriteStep::RemoveOwnerships {
            org_id: org_id.clone(),
        });

        for domain_id in &self.exclusive_domains {
            if self.recheck_claims {
                steps.push(WriteStep::AssertExclusiveClaim {
                    org_id: org_id.clone(),
                    domain_id: domain_id.clone(),
                });
            }
            steps.push(WriteStep::RemoveDkimResults {
                domain_id: domain_id.clone(),
            });
            steps.push(WriteStep::RemoveScanResults {
                domain_id: domain_id.clone(),
            });
            steps.push(WriteStep::RemoveDomain {
                domain_id: domain_id.clone(),
            });
        }

        steps.push(WriteStep::RemoveClaims {
            org_id: org_id.clone(),
        });
        steps.push(WriteStep::RemoveAffiliations {
            org_id: org_id.clone(),
        });
        steps.push(WriteStep::RemoveOrganization {
            org_id: org_id.clone(),
        });
        steps
    }
}
