//! Query result cursors

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::VecDeque;

use crate::error::{StoreError, StoreResult};
use crate::query::QueryKind;

/// Cursor over query result rows.
#[async_trait]
pub trait Cursor: Send {
    /// Fetch the next row, or `None` once exhausted.
    async fn next(&mut self) -> StoreResult<Option<Value>>;

    /// Drain every remaining row.
    async fn all(&mut self) -> StoreResult<Vec<Value>> {
        let mut rows = Vec::new();
        while let Some(row) = self.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }
}

/// Drain a cursor and deserialize every row.
///
/// A row that does not match `T` is reported as a cursor failure for
/// `kind`, since the query itself succeeded.
pub async fn collect_rows<T: DeserializeOwned>(
    cursor: &mut dyn Cursor,
    kind: QueryKind,
) -> StoreResult<Vec<T>> {
    cursor
        .all()
        .await?
        .into_iter()
        .map(|row| {
            serde_json::from_value(row).map_err(|e| StoreError::Cursor {
                kind,
                message: e.to_string(),
            })
        })
        .collect()
}

/// Cursor over rows already materialized in memory.
#[derive(Debug)]
pub struct VecCursor {
    kind: QueryKind,
    rows: VecDeque<Value>,
    fail: bool,
}

impl VecCursor {
    /// Create a cursor over `rows`.
    pub fn new(kind: QueryKind, rows: Vec<Value>) -> Self {
        Self {
            kind,
            rows: rows.into(),
            fail: false,
        }
    }

    /// Create a cursor whose first fetch fails.
    pub fn failing(kind: QueryKind) -> Self {
        Self {
            kind,
            rows: VecDeque::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl Cursor for VecCursor {
    async fn next(&mut self) -> StoreResult<Option<Value>> {
        if self.fail {
            return Err(StoreError::Cursor {
                kind: self.kind,
                message: "cursor iteration failed".to_string(),
            });
        }
        Ok(self.rows.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::DomainClaimCount;
    use serde_json::json;

    #[tokio::test]
    async fn test_all_drains_rows() {
        let mut cursor = VecCursor::new(QueryKind::Document, vec![json!(1), json!(2)]);
        assert_eq!(cursor.all().await.unwrap(), vec![json!(1), json!(2)]);
        assert!(cursor.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failing_cursor() {
        let mut cursor = VecCursor::failing(QueryKind::OwnershipInfo);
        assert!(matches!(
            cursor.all().await,
            Err(StoreError::Cursor {
                kind: QueryKind::OwnershipInfo,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_collect_rows_rejects_mismatched_shape() {
        let mut cursor = VecCursor::new(
            QueryKind::DomainClaimCounts,
            vec![json!({"domain_id": "domains/1", "count": 1})],
        );
        let rows: Vec<DomainClaimCount> =
            collect_rows(&mut cursor, QueryKind::DomainClaimCounts)
                .await
                .unwrap();
        assert_eq!(rows[0].count, 1);

        let mut cursor = VecCursor::new(QueryKind::DomainClaimCounts, vec![json!({"bad": true})]);
        let result: StoreResult<Vec<DomainClaimCount>> =
            collect_rows(&mut cursor, QueryKind::DomainClaimCounts).await;
        assert!(matches!(result, Err(StoreError::Cursor { .. })));
    }
}
