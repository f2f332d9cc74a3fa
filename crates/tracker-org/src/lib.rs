//! # Tracker Organization Model
//!
//! This crate provides the organization and domain model for Tracker, the
//! government domain security posture service.
//!
//! ## Overview
//!
//! The tracker-org crate handles:
//! - **Organizations**: Departments and agencies with bilingual details
//! - **Domains**: Monitored domains and their scan result kinds
//! - **Edges**: Claims, DMARC-summary ownerships and user affiliations
//! - **Permissions**: Affiliation permission levels
//! - **Global ids**: Relay-style opaque ids exposed by the API
//!
//! ## Architecture
//!
//! ```text
//! User
//!   └─ Affiliation (permission) ─→ Organization
//!                                    ├─ Claim ─→ Domain
//!                                    │             ├─ dkim ─→ dkimResults
//!                                    │             ├─ dmarc, spf, https, ssl
//!                                    │             └─ dmarcSummaries
//!                                    └─ Ownership ─→ Domain
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use tracker_org::{Claim, Domain, Locale, Organization, OrganizationDetails};
//!
//! let org = Organization::new("1").with_details(
//!     Locale::En,
//!     OrganizationDetails::new("Treasury Board of Canada Secretariat", "treasury-board-secretariat", "TBS"),
//! );
//! let domain = Domain::new("1", "test.gc.ca");
//! let claim = Claim::new(org.id(), domain.id());
//! assert_eq!(claim.to, "domains/1");
//! ```

pub mod domain;
pub mod global_id;
pub mod locale;
pub mod membership;
pub mod organization;
pub mod roles;

// Re-export main types for convenience
pub use domain::{Domain, ScanKind};
pub use global_id::{clean_input, GlobalId, GlobalIdError};
pub use locale::Locale;
pub use membership::{Affiliation, Claim, Ownership};
pub use organization::{Organization, OrganizationDetails};
pub use roles::Permission;
