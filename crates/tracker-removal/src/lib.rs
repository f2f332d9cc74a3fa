//! # Tracker Removal
//!
//! This crate provides the organization removal operation for Tracker.
//!
//! ## Overview
//!
//! The tracker-removal crate handles:
//! - **Authorization**: Caller resolution, verification and the removal gate
//! - **Planning**: Scoping the cascade from ownership and domain claim counts
//! - **Execution**: Ordered, named steps in one transaction
//! - **Results**: Localized (en/fr) result union for the API layer
//! - **Audit**: One English audit line per terminal outcome
//!
//! ## What Gets Removed
//!
//! - DMARC summaries of the claimed domains the organization owns
//! - Domains claimed only by this organization, with their scan results
//! - Every ownership, claim and affiliation edge from the organization
//! - The organization itself
//!
//! Domains shared with other organizations stay, along with their scans and
//! the other organizations' claims.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tracker_org::{GlobalId, Locale};
//! use tracker_removal::{OrganizationRemovalService, RemovalConfig, StoreAuthorization};
//! use tracker_store::MemoryGraphStore;
//!
//! async fn remove() -> Result<(), tracker_removal::RemovalError> {
//!     let store = Arc::new(MemoryGraphStore::new());
//!     let auth = Arc::new(StoreAuthorization::new(store.clone()));
//!     let service = OrganizationRemovalService::new(store, auth)
//!         .with_config(RemovalConfig::from_env());
//!
//!     let org_id = GlobalId::new("Organization", "1").encode();
//!     let result = service.remove_organization("123", &org_id, Locale::Fr).await?;
//!     println!("removed: {}", result.is_success());
//!     Ok(())
//! }
//! ```
//!
//! ## Outcomes
//!
//! | outcome               | returned                    | audit level |
//! |-----------------------|-----------------------------|-------------|
//! | removed               | `OrganizationResult`        | info        |
//! | unknown organization  | `OrganizationError` 400     | warn        |
//! | permission denied     | `OrganizationError` 403     | warn        |
//! | internal failure      | `RemovalError::Failed`      | error       |
//! | caller lookup failure | `RemovalError::Failed`      | error       |
//! | caller not resolvable | `RemovalError::Auth`        | none        |

pub mod audit;
pub mod authorization;
pub mod config;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod plan;
pub mod result;
pub mod service;

// Re-export main types
pub use audit::{AuditEntry, AuditLevel, AuditLog, MemoryAuditLog, TracingAuditLog};
pub use authorization::StoreAuthorization;
pub use config::{ConfigError, RemovalConfig};
pub use error::{CascadeRead, Failure, RemovalError, ServiceResult};
pub use i18n::{Catalog, Localizer, Message};
pub use logging::init_logging;
pub use plan::{RemovalPlan, REMOVAL_COLLECTIONS};
pub use result::{OrganizationError, OrganizationResult, RemovalResult, RemovedOrganization};
pub use service::{resolve_org_key, OrganizationRemovalService};
