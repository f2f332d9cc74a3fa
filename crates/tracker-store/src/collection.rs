//! Graph store collections
//!
//! Every document and edge lives in a named collection. Transactions must
//! declare up front which collections they write.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracker_org::domain::DOMAINS;
use tracker_org::membership::{AFFILIATIONS, CLAIMS, OWNERSHIP, USERS};
use tracker_org::organization::ORGANIZATIONS;
use tracker_org::ScanKind;

/// A named document or edge collection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Collection {
    #[serde(rename = "organizations")]
    Organizations,
    #[serde(rename = "users")]
    Users,
    #[serde(rename = "affiliations")]
    Affiliations,
    #[serde(rename = "claims")]
    Claims,
    #[serde(rename = "ownership")]
    Ownership,
    #[serde(rename = "domains")]
    Domains,
    #[serde(rename = "dmarcSummaries")]
    DmarcSummaries,
    #[serde(rename = "domainsToDmarcSummaries")]
    DomainsToDmarcSummaries,
    #[serde(rename = "dkim")]
    Dkim,
    #[serde(rename = "dkimResults")]
    DkimResults,
    #[serde(rename = "dkimToDkimResults")]
    DkimToDkimResults,
    #[serde(rename = "dmarc")]
    Dmarc,
    #[serde(rename = "spf")]
    Spf,
    #[serde(rename = "https")]
    Https,
    #[serde(rename = "ssl")]
    Ssl,
    #[serde(rename = "domainsDKIM")]
    DomainsDkim,
    #[serde(rename = "domainsDMARC")]
    DomainsDmarc,
    #[serde(rename = "domainsSPF")]
    DomainsSpf,
    #[serde(rename = "domainsHTTPS")]
    DomainsHttps,
    #[serde(rename = "domainsSSL")]
    DomainsSsl,
}

impl Collection {
    /// Every collection known to the store.
    pub const ALL: [Collection; 20] = [
        Collection::Organizations,
        Collection::Users,
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

    /// Collection name as stored.
    ///
    /// Model collections take their names from `tracker_org`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Organizations => ORGANIZATIONS,
            Self::Users => USERS,
            Self::Affiliations => AFFILIATIONS,
            Self::Claims => CLAIMS,
            Self::Ownership => OWNERSHIP,
            Self::Domains => DOMAINS,
            Self::DmarcSummaries => "dmarcSummaries",
            Self::DomainsToDmarcSummaries => "domainsToDmarcSummaries",
            Self::Dkim => ScanKind::Dkim.collection(),
            Self::DkimResults => "dkimResults",
            Self::DkimToDkimResults => "dkimToDkimResults",
            Self::Dmarc => ScanKind::Dmarc.collection(),
            Self::Spf => ScanKind::Spf.collection(),
            Self::Https => ScanKind::Https.collection(),
            Self::Ssl => ScanKind::Ssl.collection(),
            Self::DomainsDkim => ScanKind::Dkim.edge_collection(),
            Self::DomainsDmarc => ScanKind::Dmarc.edge_collection(),
            Self::DomainsSpf => ScanKind::Spf.edge_collection(),
            Self::DomainsHttps => ScanKind::Https.edge_collection(),
            Self::DomainsSsl => ScanKind::Ssl.edge_collection(),
        }
    }

    /// Look up a collection by its stored name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Check if this is an edge collection (documents carry `_from`/`_to`).
    pub fn is_edge(&self) -> bool {
        matches!(
            self,
            Self::Affiliations
                | Self::Claims
                | Self::Ownership
                | Self::DomainsToDmarcSummaries
                | Self::DkimToDkimResults
                | Self::DomainsDkim
                | Self::DomainsDmarc
                | Self::DomainsSpf
                | Self::DomainsHttps
                | Self::DomainsSsl
        )
    }

    /// Collection holding scan documents of a kind.
    pub fn scan(kind: ScanKind) -> Self {
        match kind {
            ScanKind::Dkim => Self::Dkim,
            ScanKind::Dmarc => Self::Dmarc,
            ScanKind::Spf => Self::Spf,
            ScanKind::Https => Self::Https,
            ScanKind::Ssl => Self::Ssl,
        }
    }

    /// Edge collection linking domains to scans of a kind.
    pub fn scan_edge(kind: ScanKind) -> Self {
        match kind {
            ScanKind::Dkim => Self::DomainsDkim,
            ScanKind::Dmarc => Self::DomainsDmarc,
            ScanKind::Spf => Self::DomainsSpf,
            ScanKind::Https => Self::DomainsHttps,
            ScanKind::Ssl => Self::DomainsSsl,
        }
    }

    /// Full document id for a key in this collection.
    pub fn id(&self, key: &str) -> String {
        format!("{}/{}", self.as_str(), key)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split a document id (`collection/key`) into its parts.
pub fn split_id(id: &str) -> Option<(Collection, &str)> {
    let (name, key) = id.split_once('/')?;
    Some((Collection::parse(name)?, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_ids_match_collection_ids() {
        assert_eq!(
            tracker_org::Organization::new("1").id(),
            Collection::Organizations.id("1")
        );
        assert_eq!(
            tracker_org::Domain::new("1", "one.gc.ca").id(),
            Collection::Domains.id("1")
        );
        for kind in ScanKind::ALL {
            assert_eq!(Collection::scan(kind).as_str(), kind.collection());
            assert_eq!(Collection::scan_edge(kind).as_str(), kind.edge_collection());
        }
    }

    #[test]
    fn test_serde_names_match_stored_names() {
        for collection in Collection::ALL {
            assert_eq!(
                serde_json::to_value(collection).unwrap(),
                serde_json::Value::String(collection.as_str().to_string())
            );
        }
    }

    #[test]
    fn test_parse_round_trips_every_name() {
        for collection in Collection::ALL {
            assert_eq!(Collection::parse(collection.as_str()), Some(collection));
        }
        assert_eq!(Collection::parse("nope"), None);
    }

    #[test]
    fn test_split_id() {
        assert_eq!(split_id("domains/12"), Some((Collection::Domains, "12")));
        assert_eq!(split_id("domainsDKIM/a"), Some((Collection::DomainsDkim, "a")));
        assert_eq!(split_id("unknown/1"), None);
        assert_eq!(split_id("no-separator"), None);
    }
}
