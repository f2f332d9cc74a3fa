//! Domain and scan-result models
//!
//! A domain is claimed by one or more organizations and carries the scan
//! result sets produced by the scanners (DKIM, DMARC, SPF, HTTPS, SSL) plus
//! aggregated DMARC summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Collection name holding domain documents.
pub const DOMAINS: &str = "domains";

/// A monitored domain.
///
/// # Examples
///
/// ```
/// use tracker_org::Domain;
///
/// let domain = Domain::new("7", "test.gc.ca");
/// assert_eq!(domain.id(), "domains/7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Store key
    pub key: String,

    /// Fully qualified domain name
    pub domain: String,

    /// When the domain was last scanned
    #[serde(default)]
    pub last_ran: Option<DateTime<Utc>>,

    /// DKIM selectors configured for the domain
    #[serde(default)]
    pub selectors: Vec<String>,
}

impl Domain {
    /// Creates a domain that has never been scanned.
    pub fn new(key: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            domain: domain.into(),
            last_ran: None,
            selectors: Vec::new(),
        }
    }

    /// Set the DKIM selectors.
    pub fn with_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selectors = selectors.into_iter().map(Into::into).collect();
        self
    }

    /// Full document id (`domains/<key>`).
    pub fn id(&self) -> String {
        format!("{}/{}", DOMAINS, self.key)
    }
}

/// Kinds of per-domain scan result sets.
///
/// Each kind lives in its own collection and is linked to its domain by an
/// edge collection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ScanKind {
    /// DKIM scan (parent of per-selector DKIM results)
    Dkim,
    /// DMARC scan
    Dmarc,
    /// SPF scan
    Spf,
    /// HTTPS scan
    Https,
    /// SSL/TLS scan
    Ssl,
}

impl ScanKind {
    /// Every scan kind, in removal order.
    pub const ALL: [ScanKind; 5] = [
        ScanKind::Dkim,
        ScanKind::Dmarc,
        ScanKind::Spf,
        ScanKind::Https,
        ScanKind::Ssl,
    ];

    /// Collection holding the scan documents.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Dkim => "dkim",
            Self::Dmarc => "dmarc",
            Self::Spf => "spf",
            Self::Https => "https",
            Self::Ssl => "ssl",
        }
    }

    /// Edge collection linking a domain to its scans.
    pub fn edge_collection(&self) -> &'static str {
        match self {
            Self::Dkim => "domainsDKIM",
            Self::Dmarc => "domainsDMARC",
            Self::Spf => "domainsSPF",
            Self::Https => "domainsHTTPS",
            Self::Ssl => "domainsSSL",
        }
    }
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}
