//! Organization removal policy
//!
//! Removal rights depend on the caller's permission level and on whether the
//! organization has been verified. Verified organizations can only be
//! removed by super admins; unverified ones by their admins as well.

use serde::{Deserialize, Serialize};
use tracker_org::Permission;

/// Why a removal was denied.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Denial {
    /// An admin attempted to remove a verified organization
    NotSuperAdmin,

    /// The caller has no admin-level affiliation with the organization
    NoPermission,
}

impl Denial {
    /// HTTP status code reported to the caller.
    pub fn status_code(&self) -> u16 {
        403
    }
}

/// Outcome of evaluating the removal policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalDecision {
    /// The caller may remove the organization
    Allowed,

    /// The caller may not remove the organization
    Denied(Denial),
}

impl RemovalDecision {
    /// Evaluate the removal policy for a (permission, verified) pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracker_org::Permission;
    /// use tracker_rbac::{Denial, RemovalDecision};
    ///
    /// assert_eq!(RemovalDecision::evaluate(Permission::SuperAdmin, true), RemovalDecision::Allowed);
    /// assert_eq!(RemovalDecision::evaluate(Permission::Admin, false), RemovalDecision::Allowed);
    /// assert_eq!(
    ///     RemovalDecision::evaluate(Permission::Admin, true),
    ///     RemovalDecision::Denied(Denial::NotSuperAdmin),
    /// );
    /// ```
    pub fn evaluate(permission: Permission, verified: bool) -> Self {
        match (permission, verified) {
            (Permission::SuperAdmin, _) => Self::Allowed,
            (Permission::Admin, false) => Self::Allowed,
            (Permission::Admin, true) => Self::Denied(Denial::NotSuperAdmin),
            (Permission::User | Permission::None, _) => Self::Denied(Denial::NoPermission),
        }
    }

    /// Check if the decision allows removal.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_decision_table() {
        let cases = [
            (Permission::SuperAdmin, true, RemovalDecision::Allowed),
            (Permission::SuperAdmin, false, RemovalDecision::Allowed),
            (Permission::Admin, false, RemovalDecision::Allowed),
            (
                Permission::Admin,
                true,
                RemovalDecision::Denied(Denial::NotSuperAdmin),
            ),
            (
                Permission::User,
                true,
                RemovalDecision::Denied(Denial::NoPermission),
            ),
            (
                Permission::User,
                false,
                RemovalDecision::Denied(Denial::NoPermission),
            ),
            (
                Permission::None,
                true,
                RemovalDecision::Denied(Denial::NoPermission),
            ),
            (
                Permission::None,
                false,
                RemovalDecision::Denied(Denial::NoPermission),
            ),
        ];

        for (permission, verified, expected) in cases {
            assert_eq!(
                RemovalDecision::evaluate(permission, verified),
                expected,
                "permission={permission} verified={verified}"
            );
        }
    }

    #[test]
    fn test_denial_status() {
        assert_eq!(Denial::NotSuperAdmin.status_code(), 403);
        assert_eq!(Denial::NoPermission.status_code(), 403);
    }
}
