//! Request-scoped organization loader
//!
//! A loader is created per request and memoizes lookups for that request
//! only. It is never shared between requests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracker_org::Organization;

use crate::collection::Collection;
use crate::cursor::collect_rows;
use crate::error::StoreResult;
use crate::query::ReadQuery;
use crate::store::GraphStore;

/// Trait for loading organizations by key.
#[async_trait]
pub trait OrganizationLoader: Send + Sync {
    /// Load an organization, or `None` when no document has that key.
    async fn load_org_by_key(&self, key: &str) -> StoreResult<Option<Organization>>;
}

/// Organization loader backed by a [`GraphStore`], caching per instance.
pub struct StoreOrgLoader {
    store: Arc<dyn GraphStore>,
    cache: Mutex<HashMap<String, Option<Organization>>>,
}

impl std::fmt::Debug for StoreOrgLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreOrgLoader").finish_non_exhaustive()
    }
}

impl StoreOrgLoader {
    /// Create a loader for one request.
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self {
            store,
            cache: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl OrganizationLoader for StoreOrgLoader {
    async fn load_org_by_key(&self, key: &str) -> StoreResult<Option<Organization>> {
        let mut cache = self.cache.lock().await;
        if let Some(hit) = cache.get(key) {
            return Ok(hit.clone());
        }

        let query = ReadQuery::Document {
            collection: Collection::Organizations,
            key: key.to_string(),
        };
        let kind = query.kind();
        let mut cursor = self.store.query(query).await?;
        let rows: Vec<Organization> = collect_rows(cursor.as_mut(), kind).await?;
        let org = rows.into_iter().next();

        cache.insert(key.to_string(), org.clone());
        Ok(org)
    }
}
