//! Organization domain models
//!
//! Organizations are the government departments and agencies that claim
//! domains in Tracker. Display details are bilingual and stored once per
//! locale.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::locale::Locale;

/// Collection name holding organization documents.
pub const ORGANIZATIONS: &str = "organizations";

/// An organization that claims and monitors domains.
///
/// # Architecture
///
/// ```text
/// Organization
///   ├─ Details (per locale: name, slug, acronym, ...)
///   ├─ Claims ─→ Domain (many-to-many)
///   ├─ Ownership ─→ Domain (DMARC summary owner, at most one per domain)
///   └─ Affiliations ─→ User (permission level)
/// ```
///
/// # Examples
///
/// ```
/// use tracker_org::{Locale, Organization, OrganizationDetails};
///
/// let org = Organization::new("1")
///     .with_details(Locale::En, OrganizationDetails::new("Treasury Board of Canada Secretariat", "treasury-board-secretariat", "TBS"))
///     .with_details(Locale::Fr, OrganizationDetails::new("Secrétariat du Conseil Trésor du Canada", "secretariat-conseil-tresor", "SCT"));
///
/// assert_eq!(org.id(), "organizations/1");
/// assert_eq!(org.details(Locale::Fr).unwrap().acronym, "SCT");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    /// Store key, unique within the organizations collection
    pub key: String,

    /// Whether the organization has been verified by a super admin
    #[serde(default)]
    pub verified: bool,

    /// Display details keyed by locale
    #[serde(default)]
    pub details: BTreeMap<Locale, OrganizationDetails>,
}

impl Organization {
    /// Creates an unverified organization with no display details.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            verified: false,
            details: BTreeMap::new(),
        }
    }

    /// Set the verified flag.
    pub fn verified(mut self, verified: bool) -> Self {
        self.verified = verified;
        self
    }

    /// Attach the display details for one locale.
    pub fn with_details(mut self, locale: Locale, details: OrganizationDetails) -> Self {
        self.details.insert(locale, details);
        self
    }

    /// Full document id (`organizations/<key>`).
    pub fn id(&self) -> String {
        format!("{}/{}", ORGANIZATIONS, self.key)
    }

    /// Display details for a locale.
    ///
    /// Falls back to the first available locale when the requested one is
    /// missing, so a partially translated record still renders.
    pub fn details(&self, locale: Locale) -> Option<&OrganizationDetails> {
        self.details
            .get(&locale)
            .or_else(|| self.details.values().next())
    }

    /// Slug for a locale, empty when the organization has no details.
    pub fn slug(&self, locale: Locale) -> &str {
        self.details(locale).map(|d| d.slug.as_str()).unwrap_or_default()
    }

    /// Name for a locale, empty when the organization has no details.
    pub fn name(&self, locale: Locale) -> &str {
        self.details(locale).map(|d| d.name.as_str()).unwrap_or_default()
    }
}

/// Locale-specific display record for an organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationDetails {
    /// Full name
    pub name: String,

    /// URL-friendly slug
    pub slug: String,

    /// Acronym
    pub acronym: String,

    /// Government zone (e.g. "FED")
    #[serde(default)]
    pub zone: Option<String>,

    /// Sector (e.g. "TBS")
    #[serde(default)]
    pub sector: Option<String>,

    #[serde(default)]
    pub country: Option<String>,

    #[serde(default)]
    pub province: Option<String>,

    #[serde(default)]
    pub city: Option<String>,
}

impl OrganizationDetails {
    /// Creates a display record with name, slug and acronym.
    pub fn new(
        name: impl Into<String>,
        slug: impl Into<String>,
        acronym: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            acronym: acronym.into(),
            ..Self::default()
        }
    }

    /// Set the zone and sector.
    pub fn with_sector(mut self, zone: impl Into<String>, sector: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self.sector = Some(sector.into());
        self
    }

    /// Set the location fields.
    pub fn with_location(
        mut self,
        country: impl Into<String>,
        province: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        self.country = Some(country.into());
        self.province = Some(province.into());
        self.city = Some(city.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn treasury_board() -> Organization {
        Organization::new("1")
            .with_details(
                Locale::En,
                OrganizationDetails::new(
                    "Treasury Board of Canada Secretariat",
                    "treasury-board-secretariat",
                    "TBS",
                )
                .with_sector("FED", "TBS")
                .with_location("Canada", "Ontario", "Ottawa"),
            )
            .with_details(
                Locale::Fr,
                OrganizationDetails::new(
                    "Secrétariat du Conseil Trésor du Canada",
                    "secretariat-conseil-tresor",
                    "SCT",
                )
                .with_sector("FED", "TBS")
                .with_location("Canada", "Ontario", "Ottawa"),
            )
    }

    #[test]
    fn test_organization_creation() {
        let org = Organization::new("42");
        assert_eq!(org.key, "42");
        assert_eq!(org.id(), "organizations/42");
        assert!(!org.verified);
        assert!(org.details.is_empty());
        assert_eq!(org.slug(Locale::En), "");
    }

    #[test]
    fn test_locale_lookup() {
        let org = treasury_board();
        assert_eq!(org.slug(Locale::En), "treasury-board-secretariat");
        assert_eq!(org.slug(Locale::Fr), "secretariat-conseil-tresor");
        assert_eq!(org.name(Locale::Fr), "Secrétariat du Conseil Trésor du Canada");
    }

    #[test]
    fn test_locale_fallback() {
        let org = Organization::new("2").with_details(
            Locale::Fr,
            OrganizationDetails::new("Nom", "nom", "N"),
        );
        assert_eq!(org.slug(Locale::En), "nom");
    }

    #[test]
    fn test_organization_serde() {
        let org = treasury_board().verified(true);
        let json = serde_json::to_value(&org).unwrap();
        assert_eq!(json["details"]["en"]["acronym"], "TBS");
        assert_eq!(json["details"]["fr"]["acronym"], "SCT");

        let back: Organization = serde_json::from_value(json).unwrap();
        assert_eq!(back, org);
    }
}
