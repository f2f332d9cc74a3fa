//! # Tracker Store
//!
//! This crate provides the transactional graph store abstraction used by
//! Tracker's organization lifecycle operations.
//!
//! ## Overview
//!
//! The tracker-store crate handles:
//! - **Collections**: Named document and edge collections
//! - **Queries**: Typed, parameterized read queries returning cursors
//! - **Transactions**: Ordered, named write steps committed atomically
//! - **Loaders**: Request-scoped organization lookups
//!
//! ## Features
//!
//! - `memory` (default): In-memory store for single-process use and tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tracker_store::{Collection, GraphStore, MemoryGraphStore, ReadQuery, WriteStep};
//!
//! async fn remove_affiliations() -> tracker_store::StoreResult<()> {
//!     let store = MemoryGraphStore::new();
//!
//!     // Reads return cursors that must be drained
//!     let mut cursor = store
//!         .query(ReadQuery::DomainClaimCounts { org_id: "organizations/1".into() })
//!         .await?;
//!     let _rows = cursor.all().await?;
//!
//!     // Writes go through a transaction declaring its collections
//!     let mut trx = store.begin(&[Collection::Affiliations]).await?;
//!     trx.step(WriteStep::RemoveAffiliations { org_id: "organizations/1".into() }).await?;
//!     trx.commit().await
//! }
//! ```
//!
//! ## Transaction Semantics
//!
//! - Steps run in issue order against a private view of the store
//! - A step touching an undeclared collection fails
//! - Nothing is visible to readers until commit succeeds
//! - Aborting, or dropping an uncommitted transaction, discards all steps

pub mod collection;
pub mod cursor;
pub mod error;
pub mod loader;
pub mod query;
pub mod store;

#[cfg(feature = "memory")]
pub mod memory;

// Re-export main types
pub use collection::Collection;
pub use cursor::{collect_rows, Cursor, VecCursor};
pub use error::{StoreError, StoreResult};
pub use loader::{OrganizationLoader, StoreOrgLoader};
pub use query::{DomainClaimCount, OwnedDomain, QueryKind, ReadQuery, StepKind, WriteStep};
pub use store::{GraphStore, Transaction};

#[cfg(feature = "memory")]
pub use memory::{Fault, MemoryGraphStore, MemoryTransaction, StoreStats};
