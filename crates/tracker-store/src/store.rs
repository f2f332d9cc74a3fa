//! Graph store and transaction traits

use async_trait::async_trait;

use crate::collection::Collection;
use crate::cursor::Cursor;
use crate::error::StoreResult;
use crate::query::{ReadQuery, WriteStep};

/// A transaction opened against a fixed set of collections.
///
/// Steps run in the order they are issued. Nothing is visible outside the
/// transaction until [`Transaction::commit`] succeeds; dropping or aborting
/// the transaction discards every staged step.
#[async_trait]
pub trait Transaction: Send {
    /// Transaction ID, for log correlation.
    fn id(&self) -> &str;

    /// Execute one write step.
    async fn step(&mut self, step: WriteStep) -> StoreResult<()>;

    /// Commit every staged step atomically.
    async fn commit(self: Box<Self>) -> StoreResult<()>;

    /// Discard every staged step.
    async fn abort(self: Box<Self>) -> StoreResult<()>;
}

/// Graph store trait for reads and transactions.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Run a read query.
    async fn query(&self, query: ReadQuery) -> StoreResult<Box<dyn Cursor>>;

    /// Open a transaction that may write the given collections.
    async fn begin(&self, collections: &[Collection]) -> StoreResult<Box<dyn Transaction>>;
}
