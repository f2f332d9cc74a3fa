//! Store-backed authorization provider
//!
//! Resolves callers from the `users` collection and derives permission
//! levels from their affiliations. A `super_admin` affiliation with any
//! organization grants `super_admin` everywhere.

use async_trait::async_trait;
use std::sync::Arc;
use tracker_org::{Affiliation, Permission};
use tracker_rbac::{AuthError, AuthResult, AuthorizationProvider, User};
use tracker_store::{collect_rows, Collection, GraphStore, ReadQuery, StoreError, StoreResult};

/// Authorization provider reading users and affiliations from a graph store.
pub struct StoreAuthorization {
    store: Arc<dyn GraphStore>,
}

impl std::fmt::Debug for StoreAuthorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreAuthorization").finish_non_exhaustive()
    }
}

impl StoreAuthorization {
    /// Create a provider over a store.
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, query: ReadQuery) -> StoreResult<Vec<T>> {
        let kind = query.kind();
        let mut cursor = self.store.query(query).await?;
        collect_rows(cursor.as_mut(), kind).await
    }
}

fn lookup_error(err: StoreError) -> AuthError {
    AuthError::Lookup(err.to_string())
}

#[async_trait]
impl AuthorizationProvider for StoreAuthorization {
    async fn user_required(&self, caller_key: &str) -> AuthResult<User> {
        if caller_key.is_empty() {
            return Err(AuthError::Unauthenticated);
        }
        let users: Vec<User> = self
            .fetch(ReadQuery::Document {
                collection: Collection::Users,
                key: caller_key.to_string(),
            })
            .await
            .map_err(lookup_error)?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| AuthError::UnknownUser(caller_key.to_string()))
    }

    async fn check_permission(&self, user: &User, org_id: &str) -> AuthResult<Permission> {
        let affiliations: Vec<Affiliation> = self
            .fetch(ReadQuery::UserAffiliations { user_id: user.id() })
            .await
            .map_err(lookup_error)?;

        if affiliations
            .iter()
            .any(|a| a.permission == Permission::SuperAdmin)
        {
            return Ok(Permission::SuperAdmin);
        }

        Ok(affiliations
            .iter()
            .filter(|a| a.from == org_id)
            .map(|a| a.permission)
            .max()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_store::{Fault, MemoryGraphStore, QueryKind};

    async fn store_with_users() -> Arc<MemoryGraphStore> {
        let store = Arc::new(MemoryGraphStore::new());
        store
            .insert_document(Collection::Users, "1", &User::new("1", "super@gc.ca"))
            .await
            .unwrap();
        store
            .insert_document(Collection::Users, "2", &User::new("2", "admin@gc.ca"))
            .await
            .unwrap();
        store
            .insert_affiliation(&Affiliation::new(
                "organizations/99",
                "users/1",
                Permission::SuperAdmin,
            ))
            .await
            .unwrap();
        store
            .insert_affiliation(&Affiliation::new(
                "organizations/1",
                "users/2",
                Permission::Admin,
            ))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_user_required() {
        let store = store_with_users().await;
        let auth = StoreAuthorization::new(store);

        let user = auth.user_required("2").await.unwrap();
        assert_eq!(user.user_name, "admin@gc.ca");
        assert!(matches!(
            auth.user_required("3").await,
            Err(AuthError::UnknownUser(_))
        ));
        assert!(matches!(
            auth.user_required("").await,
            Err(AuthError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_super_admin_through_unrelated_org() {
        let store = store_with_users().await;
        let auth = StoreAuthorization::new(store);
        let user = auth.user_required("1").await.unwrap();

        assert_eq!(
            auth.check_permission(&user, "organizations/1").await.unwrap(),
            Permission::SuperAdmin
        );
    }

    #[tokio::test]
    async fn test_permission_is_scoped_to_org() {
        let store = store_with_users().await;
        let auth = StoreAuthorization::new(store);
        let user = auth.user_required("2").await.unwrap();

        assert_eq!(
            auth.check_permission(&user, "organizations/1").await.unwrap(),
            Permission::Admin
        );
        assert_eq!(
            auth.check_permission(&user, "organizations/2").await.unwrap(),
            Permission::None
        );
    }

    #[tokio::test]
    async fn test_lookup_failure() {
        let store = store_with_users().await;
        let auth = StoreAuthorization::new(store.clone());
        let user = auth.user_required("2").await.unwrap();

        store.inject(Fault::Query(QueryKind::UserAffiliations)).await;
        assert!(matches!(
            auth.check_permission(&user, "organizations/1").await,
            Err(AuthError::Lookup(_))
        ));
    }
}
