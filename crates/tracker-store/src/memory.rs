//! In-memory graph store
//!
//! This backend keeps every collection in process. Transactions work on a
//! private snapshot and publish their removals on commit. A commit fails with
//! [`StoreError::Conflict`] when a document or edge set the transaction read
//! or removed has changed since the snapshot was taken, so transactions over
//! disjoint parts of the graph both commit. Faults can be injected to
//! exercise failure handling.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracker_org::{Affiliation, Claim, Domain, Organization, Ownership, ScanKind};
use uuid::Uuid;

use crate::collection::{split_id, Collection};
use crate::cursor::{Cursor, VecCursor};
use crate::error::{StoreError, StoreResult};
use crate::query::{QueryKind, ReadQuery, StepKind, WriteStep};
use crate::store::{GraphStore, Transaction};

type Documents = BTreeMap<String, Value>;

/// Change-tracking key: one document, or every edge of a collection that
/// meets a given endpoint.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Stamp {
    Doc(Collection, String),
    Endpoint(Collection, String),
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doc(collection, key) => write!(f, "{}", collection.id(key)),
            Self::Endpoint(collection, id) => write!(f, "{collection} edges at {id}"),
        }
    }
}

/// What a transaction looked at and what it removed.
#[derive(Debug, Default)]
struct WriteSet {
    watched: BTreeSet<Stamp>,
    removed: Vec<(Collection, String)>,
}

/// Every collection's documents, with the logical time each document and
/// edge endpoint last changed.
#[derive(Debug, Clone, Default)]
struct Graph {
    collections: BTreeMap<Collection, Documents>,
    stamps: BTreeMap<Stamp, u64>,
    clock: u64,
}

fn edge_ends(doc: &Value) -> Option<(&str, &str)> {
    Some((doc.get("_from")?.as_str()?, doc.get("_to")?.as_str()?))
}

impl Graph {
    fn docs(&self, collection: Collection) -> impl Iterator<Item = (&String, &Value)> {
        self.collections
            .get(&collection)
            .into_iter()
            .flat_map(|docs| docs.iter())
    }

    fn insert(&mut self, collection: Collection, key: &str, mut doc: Value) {
        if let Value::Object(map) = &mut doc {
            map.insert("_key".into(), Value::String(key.to_string()));
            map.insert("_id".into(), Value::String(collection.id(key)));
        }
        self.mark_changed(collection, key);
        self.collections
            .entry(collection)
            .or_default()
            .insert(key.to_string(), doc);
        self.mark_changed(collection, key);
    }

    fn get(&self, collection: Collection, key: &str) -> Option<&Value> {
        self.collections.get(&collection)?.get(key)
    }

    fn remove(&mut self, collection: Collection, key: &str) -> Option<Value> {
        self.collections.get_mut(&collection)?.remove(key)
    }

    fn stamp_of(&self, stamp: &Stamp) -> u64 {
        self.stamps.get(stamp).copied().unwrap_or_default()
    }

    /// Advance the stamps of a document and, for edges, of both endpoints.
    fn mark_changed(&mut self, collection: Collection, key: &str) {
        self.clock += 1;
        let clock = self.clock;
        let ends = self
            .get(collection, key)
            .and_then(edge_ends)
            .map(|(from, to)| (from.to_string(), to.to_string()));
        self.stamps
            .insert(Stamp::Doc(collection, key.to_string()), clock);
        if let Some((from, to)) = ends {
            self.stamps.insert(Stamp::Endpoint(collection, from), clock);
            self.stamps.insert(Stamp::Endpoint(collection, to), clock);
        }
    }

    /// Remove a document from the live graph.
    fn discard(&mut self, collection: Collection, key: &str) {
        self.mark_changed(collection, key);
        self.remove(collection, key);
    }

    /// `(edge key, _to)` of every edge leaving `from`.
    fn edges_from(&self, collection: Collection, from: &str) -> Vec<(String, String)> {
        self.docs(collection)
            .filter_map(|(key, doc)| {
                let (f, t) = edge_ends(doc)?;
                (f == from).then(|| (key.clone(), t.to_string()))
            })
            .collect()
    }

    /// `(edge key, _from)` of every edge arriving at `to`.
    fn edges_to(&self, collection: Collection, to: &str) -> Vec<(String, String)> {
        self.docs(collection)
            .filter_map(|(key, doc)| {
                let (f, t) = edge_ends(doc)?;
                (t == to).then(|| (key.clone(), f.to_string()))
            })
            .collect()
    }

    fn claimed_domains(&self, org_id: &str) -> BTreeSet<String> {
        self.edges_from(Collection::Claims, org_id)
            .into_iter()
            .map(|(_, to)| to)
            .collect()
    }

    fn read(&self, query: &ReadQuery) -> Vec<Value> {
        match query {
            ReadQuery::OwnershipInfo { org_id } => {
                let claimed = self.claimed_domains(org_id);
                self.edges_from(Collection::Ownership, org_id)
                    .into_iter()
                    .filter(|(_, domain_id)| claimed.contains(domain_id))
                    .map(|(_, domain_id)| json!({ "domain_id": domain_id }))
                    .collect()
            }
            ReadQuery::DomainClaimCounts { org_id } => self
                .claimed_domains(org_id)
                .into_iter()
                .map(|domain_id| {
                    let count = self.edges_to(Collection::Claims, &domain_id).len();
                    json!({ "domain_id": domain_id, "count": count })
                })
                .collect(),
            ReadQuery::UserAffiliations { user_id } => self
                .docs(Collection::Affiliations)
                .filter(|(_, doc)| edge_ends(doc).map(|(_, to)| to) == Some(user_id.as_str()))
                .map(|(_, doc)| doc.clone())
                .collect(),
            ReadQuery::Document { collection, key } => {
                self.get(*collection, key).cloned().into_iter().collect()
            }
        }
    }

    // ------------------------------------------------------------------
    // Staged writes. These never advance stamps, so a transaction's
    // snapshot keeps the stamps it started from.
    // ------------------------------------------------------------------

    fn watch_from(
        &self,
        collection: Collection,
        from: &str,
        writes: &mut WriteSet,
    ) -> Vec<(String, String)> {
        writes
            .watched
            .insert(Stamp::Endpoint(collection, from.to_string()));
        self.edges_from(collection, from)
    }

    fn watch_to(
        &self,
        collection: Collection,
        to: &str,
        writes: &mut WriteSet,
    ) -> Vec<(String, String)> {
        writes
            .watched
            .insert(Stamp::Endpoint(collection, to.to_string()));
        self.edges_to(collection, to)
    }

    fn stage_remove(&mut self, collection: Collection, key: &str, writes: &mut WriteSet) {
        writes
            .watched
            .insert(Stamp::Doc(collection, key.to_string()));
        if self.remove(collection, key).is_some() {
            writes.removed.push((collection, key.to_string()));
        }
    }

    fn stage_remove_id(&mut self, id: &str, writes: &mut WriteSet) {
        if let Some((collection, key)) = split_id(id) {
            self.stage_remove(collection, key, writes);
        }
    }

    fn stage_remove_edges_from(
        &mut self,
        collection: Collection,
        from: &str,
        writes: &mut WriteSet,
    ) {
        for (key, _) in self.watch_from(collection, from, writes) {
            self.stage_remove(collection, &key, writes);
        }
    }

    fn apply(&mut self, step: &WriteStep, writes: &mut WriteSet) -> Result<(), String> {
        match step {
            WriteStep::RemoveDmarcSummaries { domain_ids } => {
                for domain_id in domain_ids {
                    for (edge_key, summary_id) in
                        self.watch_from(Collection::DomainsToDmarcSummaries, domain_id, writes)
                    {
                        self.stage_remove_id(&summary_id, writes);
                        self.stage_remove(Collection::DomainsToDmarcSummaries, &edge_key, writes);
                    }
                }
            }
            WriteStep::RemoveOwnerships { org_id } => {
                self.stage_remove_edges_from(Collection::Ownership, org_id, writes);
            }
            WriteStep::AssertExclusiveClaim { org_id, domain_id } => {
                let claimants: Vec<String> = self
                    .watch_to(Collection::Claims, domain_id, writes)
                    .into_iter()
                    .map(|(_, from)| from)
                    .collect();
                if claimants.len() != 1 || claimants[0] != *org_id {
                    return Err(format!(
                        "{} is claimed by {} organizations",
                        domain_id,
                        claimants.len()
                    ));
                }
            }
            WriteStep::RemoveDkimResults { domain_id } => {
                for (_, dkim_id) in self.watch_from(Collection::DomainsDkim, domain_id, writes) {
                    for (edge_key, result_id) in
                        self.watch_from(Collection::DkimToDkimResults, &dkim_id, writes)
                    {
                        self.stage_remove_id(&result_id, writes);
                        self.stage_remove(Collection::DkimToDkimResults, &edge_key, writes);
                    }
                }
            }
            WriteStep::RemoveScanResults { domain_id } => {
                for kind in ScanKind::ALL {
                    for (_, scan_id) in
                        self.watch_from(Collection::scan_edge(kind), domain_id, writes)
                    {
                        self.stage_remove_id(&scan_id, writes);
                    }
                }
            }
            WriteStep::RemoveDomain { domain_id } => {
                for kind in ScanKind::ALL {
                    self.stage_remove_edges_from(Collection::scan_edge(kind), domain_id, writes);
                }
                for (key, _) in self.watch_to(Collection::Claims, domain_id, writes) {
                    self.stage_remove(Collection::Claims, &key, writes);
                }
                self.stage_remove_id(domain_id, writes);
            }
            WriteStep::RemoveClaims { org_id } => {
                // Watching each domain's claim set makes two removals that
                // each drop one claim on the same shared domain conflict.
                for (key, domain_id) in self.watch_from(Collection::Claims, org_id, writes) {
                    writes
                        .watched
                        .insert(Stamp::Endpoint(Collection::Claims, domain_id));
                    self.stage_remove(Collection::Claims, &key, writes);
                }
            }
            WriteStep::RemoveAffiliations { org_id } => {
                self.stage_remove_edges_from(Collection::Affiliations, org_id, writes);
            }
            WriteStep::RemoveOrganization { org_id } => {
                self.stage_remove_id(org_id, writes);
            }
        }
        Ok(())
    }
}

/// A fault to inject into the in-memory store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    /// The query call for this kind fails
    Query(QueryKind),
    /// The cursor for this kind fails on its first fetch
    Cursor(QueryKind),
    /// Steps of this kind fail
    Step(StepKind),
    /// Opening a transaction fails
    Begin,
    /// Committing a transaction fails
    Commit,
}

/// Store operation counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Read queries issued
    pub queries: u64,
    /// Transactions opened
    pub transactions_begun: u64,
    /// Transactions committed
    pub transactions_committed: u64,
    /// Transactions aborted, explicitly or by being dropped
    pub transactions_aborted: u64,
}

#[derive(Debug, Default)]
struct Counters {
    queries: AtomicU64,
    begun: AtomicU64,
    committed: AtomicU64,
    aborted: AtomicU64,
}

/// In-memory graph store implementation.
///
/// Suitable for single-process use and testing.
#[derive(Clone, Default)]
pub struct MemoryGraphStore {
    graph: Arc<RwLock<Graph>>,
    faults: Arc<RwLock<HashSet<Fault>>>,
    counters: Arc<Counters>,
}

impl std::fmt::Debug for MemoryGraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryGraphStore")
            .field("stats", &self.stats())
            .finish()
    }
}

impl MemoryGraphStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject a fault. It stays active until [`Self::clear_faults`].
    pub async fn inject(&self, fault: Fault) {
        self.faults.write().await.insert(fault);
    }

    /// Remove every injected fault.
    pub async fn clear_faults(&self) {
        self.faults.write().await.clear();
    }

    async fn has_fault(&self, fault: Fault) -> bool {
        self.faults.read().await.contains(&fault)
    }

    /// Operation counters.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            queries: self.counters.queries.load(Ordering::Relaxed),
            transactions_begun: self.counters.begun.load(Ordering::Relaxed),
            transactions_committed: self.counters.committed.load(Ordering::Relaxed),
            transactions_aborted: self.counters.aborted.load(Ordering::Relaxed),
        }
    }

    // ------------------------------------------------------------------
    // Seeding
    // ------------------------------------------------------------------

    /// Insert a document under `key`, replacing any existing one.
    ///
    /// Returns the document id.
    pub async fn insert_document<T: Serialize>(
        &self,
        collection: Collection,
        key: &str,
        doc: &T,
    ) -> StoreResult<String> {
        let value = serde_json::to_value(doc)?;
        let mut graph = self.graph.write().await;
        graph.insert(collection, key, value);
        Ok(collection.id(key))
    }

    /// Insert an edge with a generated key. Returns the edge id.
    pub async fn insert_edge(
        &self,
        collection: Collection,
        from: &str,
        to: &str,
        fields: Value,
    ) -> StoreResult<String> {
        let mut doc = match fields {
            Value::Object(map) => map,
            Value::Null => serde_json::Map::new(),
            other => {
                return Err(StoreError::Serialization(format!(
                    "edge fields must be an object, got {other}"
                )))
            }
        };
        doc.insert("_from".into(), Value::String(from.to_string()));
        doc.insert("_to".into(), Value::String(to.to_string()));
        let key = new_key();
        self.insert_document(collection, &key, &Value::Object(doc))
            .await
    }

    /// Insert an organization document.
    pub async fn insert_organization(&self, org: &Organization) -> StoreResult<String> {
        self.insert_document(Collection::Organizations, &org.key, org)
            .await
    }

    /// Insert a domain document.
    pub async fn insert_domain(&self, domain: &Domain) -> StoreResult<String> {
        self.insert_document(Collection::Domains, &domain.key, domain)
            .await
    }

    /// Insert a claim edge.
    pub async fn insert_claim(&self, claim: &Claim) -> StoreResult<String> {
        self.insert_edge(Collection::Claims, &claim.from, &claim.to, Value::Null)
            .await
    }

    /// Insert an ownership edge.
    pub async fn insert_ownership(&self, ownership: &Ownership) -> StoreResult<String> {
        self.insert_edge(
            Collection::Ownership,
            &ownership.from,
            &ownership.to,
            Value::Null,
        )
        .await
    }

    /// Insert an affiliation edge.
    pub async fn insert_affiliation(&self, affiliation: &Affiliation) -> StoreResult<String> {
        self.insert_edge(
            Collection::Affiliations,
            &affiliation.from,
            &affiliation.to,
            json!({ "permission": affiliation.permission }),
        )
        .await
    }

    /// Insert a scan document of `kind` linked to a domain. Returns the scan id.
    pub async fn insert_scan(
        &self,
        kind: ScanKind,
        domain_id: &str,
        data: Value,
    ) -> StoreResult<String> {
        let key = new_key();
        let scan_id = self
            .insert_document(Collection::scan(kind), &key, &data)
            .await?;
        self.insert_edge(Collection::scan_edge(kind), domain_id, &scan_id, Value::Null)
            .await?;
        Ok(scan_id)
    }

    /// Insert a DKIM result under a DKIM scan. Returns the result id.
    pub async fn insert_dkim_result(&self, dkim_id: &str, data: Value) -> StoreResult<String> {
        let key = new_key();
        let result_id = self
            .insert_document(Collection::DkimResults, &key, &data)
            .await?;
        self.insert_edge(Collection::DkimToDkimResults, dkim_id, &result_id, Value::Null)
            .await?;
        Ok(result_id)
    }

    /// Insert a DMARC summary linked to a domain. Returns the summary id.
    pub async fn insert_dmarc_summary(&self, domain_id: &str, data: Value) -> StoreResult<String> {
        let key = new_key();
        let summary_id = self
            .insert_document(Collection::DmarcSummaries, &key, &data)
            .await?;
        self.insert_edge(
            Collection::DomainsToDmarcSummaries,
            domain_id,
            &summary_id,
            Value::Null,
        )
        .await?;
        Ok(summary_id)
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Number of documents in a collection.
    pub async fn count(&self, collection: Collection) -> usize {
        self.graph.read().await.docs(collection).count()
    }

    /// Check if a collection holds a key.
    pub async fn contains(&self, collection: Collection, key: &str) -> bool {
        self.graph.read().await.get(collection, key).is_some()
    }

    /// Every document in a collection.
    pub async fn documents(&self, collection: Collection) -> Vec<Value> {
        self.graph
            .read()
            .await
            .docs(collection)
            .map(|(_, doc)| doc.clone())
            .collect()
    }

    /// Full contents of the store, keyed by collection name.
    pub async fn snapshot(&self) -> Value {
        let graph = self.graph.read().await;
        let map: serde_json::Map<String, Value> = Collection::ALL
            .iter()
            .map(|c| {
                let docs: serde_json::Map<String, Value> = graph
                    .docs(*c)
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                (c.as_str().to_string(), Value::Object(docs))
            })
            .collect();
        Value::Object(map)
    }
}

fn new_key() -> String {
    Uuid::now_v7().simple().to_string()
}

#[async_trait]
impl GraphStore for MemoryGraphStore {
    async fn query(&self, query: ReadQuery) -> StoreResult<Box<dyn Cursor>> {
        let kind = query.kind();
        self.counters.queries.fetch_add(1, Ordering::Relaxed);

        if self.has_fault(Fault::Query(kind)).await {
            tracing::debug!(query = %kind, "Injected query failure");
            return Err(StoreError::Query {
                kind,
                message: "query rejected".to_string(),
            });
        }
        if self.has_fault(Fault::Cursor(kind)).await {
            return Ok(Box::new(VecCursor::failing(kind)));
        }

        let rows = self.graph.read().await.read(&query);
        tracing::debug!(query = %kind, rows = rows.len(), "Query executed");
        Ok(Box::new(VecCursor::new(kind, rows)))
    }

    async fn begin(&self, collections: &[Collection]) -> StoreResult<Box<dyn Transaction>> {
        if self.has_fault(Fault::Begin).await {
            return Err(StoreError::Begin("transaction rejected".to_string()));
        }

        let staged = self.graph.read().await.clone();
        let trx = MemoryTransaction {
            id: Uuid::now_v7().to_string(),
            declared: collections.iter().copied().collect(),
            writes: WriteSet::default(),
            staged,
            store: self.clone(),
            finished: false,
        };
        self.counters.begun.fetch_add(1, Ordering::Relaxed);

        tracing::debug!(
            transaction_id = %trx.id,
            collections = trx.declared.len(),
            "Transaction opened"
        );

        Ok(Box::new(trx))
    }
}

/// Transaction over a private snapshot of a [`MemoryGraphStore`].
pub struct MemoryTransaction {
    id: String,
    declared: BTreeSet<Collection>,
    writes: WriteSet,
    staged: Graph,
    store: MemoryGraphStore,
    finished: bool,
}

impl std::fmt::Debug for MemoryTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTransaction")
            .field("id", &self.id)
            .field("declared", &self.declared)
            .field("watched", &self.writes.watched.len())
            .field("removed", &self.writes.removed.len())
            .finish()
    }
}

impl MemoryTransaction {
    fn finish(&mut self, committed: bool) {
        self.finished = true;
        let counter = if committed {
            &self.store.counters.committed
        } else {
            &self.store.counters.aborted
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl Transaction for MemoryTransaction {
    fn id(&self) -> &str {
        &self.id
    }

    async fn step(&mut self, step: WriteStep) -> StoreResult<()> {
        let kind = step.kind();

        if let Some(missing) = step
            .collections()
            .into_iter()
            .find(|c| !self.declared.contains(c))
        {
            return Err(StoreError::UndeclaredCollection(missing));
        }

        if self.store.has_fault(Fault::Step(kind)).await {
            return Err(StoreError::Step {
                step: kind,
                message: "step rejected".to_string(),
            });
        }

        self.staged
            .apply(&step, &mut self.writes)
            .map_err(|message| StoreError::Step {
                step: kind,
                message,
            })?;

        tracing::debug!(transaction_id = %self.id, step = %kind, "Transaction step staged");
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let mut this = self;
        if this.store.has_fault(Fault::Commit).await {
            this.finish(false);
            return Err(StoreError::Commit("commit rejected".to_string()));
        }

        let store = this.store.clone();
        let mut graph = store.graph.write().await;
        let stale = this
            .writes
            .watched
            .iter()
            .find(|stamp| graph.stamp_of(stamp) != this.staged.stamp_of(stamp))
            .cloned();
        if let Some(stale) = stale {
            drop(graph);
            this.finish(false);
            return Err(StoreError::Conflict(format!(
                "{} changed since transaction {} began",
                stale, this.id
            )));
        }

        for (collection, key) in &this.writes.removed {
            graph.discard(*collection, key);
        }
        drop(graph);
        this.finish(true);

        tracing::debug!(transaction_id = %this.id, "Transaction committed");
        Ok(())
    }

    async fn abort(self: Box<Self>) -> StoreResult<()> {
        let mut this = self;
        this.finish(false);
        tracing::debug!(transaction_id = %this.id, "Transaction aborted");
        Ok(())
    }
}

impl Drop for MemoryTransaction {
    fn drop(&mut self) {
        if !self.finished {
            self.store.counters.aborted.fetch_add(1, Ordering::Relaxed);
        }
    }
}
