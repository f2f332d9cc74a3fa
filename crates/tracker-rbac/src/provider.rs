//! Authorization provider abstraction
//!
//! The removal service never decides who the caller is. It asks an
//! [`AuthorizationProvider`] to resolve the caller into a [`User`], to
//! confirm the account is verified, and to report the caller's permission
//! level for the target organization.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracker_org::membership::USERS;
use tracker_org::Permission;

use crate::error::{AuthError, AuthResult};

/// A resolved, authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store key
    pub key: String,

    /// Login name (email)
    pub user_name: String,

    /// Whether the user has validated their email address
    #[serde(default)]
    pub email_validated: bool,
}

impl User {
    /// Creates a verified user.
    pub fn new(key: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            user_name: user_name.into(),
            email_validated: true,
        }
    }

    /// Set whether the email has been validated.
    pub fn email_validated(mut self, validated: bool) -> Self {
        self.email_validated = validated;
        self
    }

    /// Full document id (`users/<key>`).
    pub fn id(&self) -> String {
        format!("{}/{}", USERS, self.key)
    }
}

/// Trait for caller authorization.
#[async_trait]
pub trait AuthorizationProvider: Send + Sync {
    /// Resolve the authenticated caller into a user record.
    async fn user_required(&self, caller_key: &str) -> AuthResult<User>;

    /// Reject users whose account is not verified.
    fn verified_required(&self, user: &User) -> AuthResult<()> {
        if user.email_validated {
            Ok(())
        } else {
            Err(AuthError::NotVerified(user.key.clone()))
        }
    }

    /// Get the user's permission level for an organization.
    ///
    /// `org_id` is the organization's full document id.
    async fn check_permission(&self, user: &User, org_id: &str) -> AuthResult<Permission>;
}

/// Fixed, in-memory authorization provider.
///
/// Holds a set of users and explicit per-organization permission levels.
/// Suitable for embedding and testing.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthorization {
    users: HashMap<String, User>,
    permissions: HashMap<(String, String), Permission>,
}

impl StaticAuthorization {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user.
    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.key.clone(), user);
        self
    }

    /// Grant a permission level to a user for an organization id.
    pub fn grant(
        mut self,
        user_key: impl Into<String>,
        org_id: impl Into<String>,
        permission: Permission,
    ) -> Self {
        self.permissions
            .insert((user_key.into(), org_id.into()), permission);
        self
    }
}

#[async_trait]
impl AuthorizationProvider for StaticAuthorization {
    async fn user_required(&self, caller_key: &str) -> AuthResult<User> {
        if caller_key.is_empty() {
            return Err(AuthError::Unauthenticated);
        }
        self.users
            .get(caller_key)
            .cloned()
            .ok_or_else(|| AuthError::UnknownUser(caller_key.to_string()))
    }

    async fn check_permission(&self, user: &User, org_id: &str) -> AuthResult<Permission> {
        Ok(self
            .permissions
            .get(&(user.key.clone(), org_id.to_string()))
            .copied()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> StaticAuthorization {
        StaticAuthorization::new()
            .with_user(User::new("1", "admin@example.gc.ca"))
            .with_user(User::new("2", "new@example.gc.ca").email_validated(false))
            .grant("1", "organizations/10", Permission::Admin)
    }

    #[tokio::test]
    async fn test_user_required() {
        let auth = provider();
        assert_eq!(auth.user_required("1").await.unwrap().key, "1");
        assert!(matches!(
            auth.user_required("9").await,
            Err(AuthError::UnknownUser(_))
        ));
        assert!(matches!(
            auth.user_required("").await,
            Err(AuthError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_verified_required() {
        let auth = provider();
        let verified = auth.user_required("1").await.unwrap();
        let unverified = auth.user_required("2").await.unwrap();
        assert!(auth.verified_required(&verified).is_ok());
        assert!(matches!(
            auth.verified_required(&unverified),
            Err(AuthError::NotVerified(_))
        ));
    }

    #[tokio::test]
    async fn test_check_permission_defaults_to_none() {
        let auth = provider();
        let user = auth.user_required("1").await.unwrap();
        assert_eq!(
            auth.check_permission(&user, "organizations/10").await.unwrap(),
            Permission::Admin
        );
        assert_eq!(
            auth.check_permission(&user, "organizations/11").await.unwrap(),
            Permission::None
        );
    }
}
