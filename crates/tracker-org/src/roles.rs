//! Affiliation permission levels
//!
//! This module defines the closed set of permission levels a user can hold
//! through an affiliation with an organization.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Permission level a user holds for an organization.
///
/// Levels are hierarchical: None < User < Admin < SuperAdmin.
///
/// # Permission Model
///
/// - **None**: No affiliation with the organization
/// - **User**: Read access to the organization's domains and scans
/// - **Admin**: Can manage the organization's domains and affiliations
/// - **SuperAdmin**: Platform-wide administration, granted through any
///   organization
///
/// # Examples
///
/// ```
/// use tracker_org::Permission;
///
/// assert!(Permission::SuperAdmin.is_super_admin());
/// assert!(Permission::Admin.is_admin());
/// assert!(!Permission::User.is_admin());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// No affiliation
    None = 0,

    /// Affiliated user
    User = 1,

    /// Organization administrator
    Admin = 2,

    /// Platform super administrator
    SuperAdmin = 3,
}

impl Permission {
    /// Check if this level carries admin privileges.
    ///
    /// # Returns
    ///
    /// `true` for Admin and SuperAdmin
    pub fn is_admin(&self) -> bool {
        *self >= Permission::Admin
    }

    /// Check if this level is the platform super admin level.
    pub fn is_super_admin(&self) -> bool {
        *self == Permission::SuperAdmin
    }

    /// Parse a permission level from its wire representation.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracker_org::Permission;
    ///
    /// assert_eq!(Permission::parse("super_admin"), Some(Permission::SuperAdmin));
    /// assert_eq!(Permission::parse("ADMIN"), Some(Permission::Admin));
    /// assert_eq!(Permission::parse("owner"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" | "" => Some(Self::None),
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            "super_admin" => Some(Self::SuperAdmin),
            _ => None,
        }
    }

    /// Get the wire representation of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::User => "user",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }
}

impl Default for Permission {
    fn default() -> Self {
        Self::None
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_hierarchy() {
        assert!(Permission::SuperAdmin > Permission::Admin);
        assert!(Permission::Admin > Permission::User);
        assert!(Permission::User > Permission::None);
    }

    #[test]
    fn test_permission_parse() {
        assert_eq!(Permission::parse("user"), Some(Permission::User));
        assert_eq!(Permission::parse("Super_Admin"), Some(Permission::SuperAdmin));
        assert_eq!(Permission::parse(""), Some(Permission::None));
        assert_eq!(Permission::parse("editor"), None);
    }

    #[test]
    fn test_permission_wire_format() {
        assert_eq!(
            serde_json::to_string(&Permission::SuperAdmin).unwrap(),
            "\"super_admin\""
        );
        for level in [
            Permission::None,
            Permission::User,
            Permission::Admin,
            Permission::SuperAdmin,
        ] {
            assert_eq!(Permission::parse(level.as_str()), Some(level));
        }
    }
}
