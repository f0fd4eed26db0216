//! Stable cursor pagination over volatile listings.
//!
//! The first paginated call freezes the complete venue listing into a
//! [`Snapshot`]; every page that follows reads from that frozen copy through
//! an opaque cursor. Pages of one session therefore never overlap or skip
//! items, whatever the venue does to its listing in between.
//!
//! | request                    | behaviour                                           |
//! |----------------------------|-----------------------------------------------------|
//! | no cursor, no limit/offset | listing passed through, no snapshot                 |
//! | no cursor, `limit`         | snapshot taken, `[offset, offset + limit)` returned |
//! | no cursor, `offset` only   | listing from `offset` to the end, no cursor         |
//! | cursor                     | page read from the snapshot, `CursorExpired` if gone|

mod cursor;
mod snapshot;

pub use cursor::{CursorCodec, CursorPosition};
pub use snapshot::{DEFAULT_SNAPSHOT_TTL, Snapshot, SnapshotStore};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::time::Clock;
use crate::types::{MarketFetchParams, PaginatedMarketsResult, UnifiedMarket};

/// Page size used when a cursor is followed without an explicit limit.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Serves stable pages from snapshots.
#[derive(Debug)]
pub struct PaginationEngine {
    store: SnapshotStore,
    ttl: Duration,
    default_page_size: usize,
}

impl PaginationEngine {
    /// Creates an engine with its own snapshot store.
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration, default_page_size: usize) -> Self {
        Self {
            store: SnapshotStore::new(clock),
            ttl,
            default_page_size,
        }
    }

    /// Snapshot store backing this engine.
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Snapshot lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Serves one page for `params`.
    ///
    /// `fetch` is the venue listing. It receives the parameters with `limit`,
    /// `offset` and `cursor` removed and must return the complete eligible set.
    /// It is called at most once, and never when a cursor is given.
    pub async fn paginate<F, Fut>(
        &self,
        params: &MarketFetchParams,
        fetch: F,
    ) -> Result<PaginatedMarketsResult>
    where
        F: FnOnce(MarketFetchParams) -> Fut,
        Fut: Future<Output = Result<Vec<UnifiedMarket>>>,
    {
        self.store.sweep_expired(self.store.now_ms(), self.ttl);

        if let Some(cursor) = params.cursor.as_deref() {
            return self.next_page(cursor, params.limit);
        }

        if params.limit == Some(0) {
            return Err(Error::invalid_argument("limit must be greater than 0"));
        }

        if !params.has_pagination() {
            let markets = fetch(params.without_pagination()).await?;
            return Ok(PaginatedMarketsResult::complete(markets));
        }

        let offset = params.offset.unwrap_or(0);
        let markets = fetch(params.without_pagination()).await?;

        let Some(limit) = params.limit else {
            let total = markets.len();
            let data = markets.into_iter().skip(offset).collect();
            return Ok(PaginatedMarketsResult {
                data,
                total,
                next_cursor: None,
            });
        };

        // Nothing is stored until the listing call has completed.
        let snapshot = self.store.insert(markets);
        tracing::debug!(
            snapshot_id = %snapshot.id,
            total = snapshot.len(),
            offset,
            limit,
            "First page served from new snapshot"
        );
        Ok(slice_page(&snapshot, offset, limit))
    }

    fn next_page(&self, cursor: &str, limit: Option<usize>) -> Result<PaginatedMarketsResult> {
        let position = CursorCodec::decode(cursor)?;
        let limit = limit.unwrap_or(self.default_page_size);
        if limit == 0 {
            return Err(Error::invalid_argument("limit must be greater than 0"));
        }
        let snapshot = self.store.get(&position.snapshot_id).ok_or_else(|| {
            tracing::debug!(snapshot_id = %position.snapshot_id, "Cursor references a missing snapshot");
            Error::cursor_expired(position.snapshot_id.clone())
        })?;
        tracing::trace!(
            snapshot_id = %position.snapshot_id,
            offset = position.offset,
            limit,
            "Page served from snapshot"
        );
        Ok(slice_page(&snapshot, position.offset, limit))
    }
}

fn slice_page(snapshot: &Snapshot, offset: usize, limit: usize) -> PaginatedMarketsResult {
    let total = snapshot.len();
    let start = offset.min(total);
    let end = offset.saturating_add(limit).min(total);
    let next_cursor = (end < total).then(|| CursorCodec::encode(&snapshot.id, end));
    PaginatedMarketsResult {
        data: snapshot.markets[start..end].to_vec(),
        total,
        next_cursor,
    }
}
