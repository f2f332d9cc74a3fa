//! # Tracker RBAC
//!
//! This crate provides caller authorization for Tracker organization
//! management.
//!
//! ## Overview
//!
//! The tracker-rbac crate handles:
//! - **Users**: The resolved, authenticated caller
//! - **Providers**: The [`AuthorizationProvider`] seam the removal service
//!   consumes (`user_required`, `verified_required`, `check_permission`)
//! - **Policy**: The removal decision over (permission level, verified)
//!
//! ## Usage
//!
//! ```rust
//! use tracker_org::Permission;
//! use tracker_rbac::{Denial, RemovalDecision};
//!
//! match RemovalDecision::evaluate(Permission::User, false) {
//!     RemovalDecision::Allowed => unreachable!(),
//!     RemovalDecision::Denied(denial) => assert_eq!(denial, Denial::NoPermission),
//! }
//! ```
//!
//! ## Decision Table
//!
//! | permission    | verified org | unverified org |
//! |---------------|--------------|----------------|
//! | `super_admin` | allowed      | allowed        |
//! | `admin`       | denied (not super admin) | allowed |
//! | `user` / none | denied (no permission) | denied (no permission) |

pub mod error;
pub mod policy;
pub mod provider;

// Re-export main types for convenience
pub use error::{AuthError, AuthResult};
pub use policy::{Denial, RemovalDecision};
pub use provider::{AuthorizationProvider, StaticAuthorization, User};
