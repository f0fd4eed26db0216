//! Frozen listing snapshots with TTL expiry.

use dashmap::DashMap;
use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::time::{Clock, duration_ms};
use crate::types::UnifiedMarket;

/// Default lifetime of a snapshot.
pub const DEFAULT_SNAPSHOT_TTL: Duration = Duration::from_secs(300);

/// An immutable copy of one full listing.
#[derive(Debug)]
pub struct Snapshot {
    /// Opaque, process-unique identifier
    pub id: String,
    /// Listing as returned by the venue
    pub markets: Vec<UnifiedMarket>,
    /// Creation time in milliseconds
    pub created_at: i64,
}

impl Snapshot {
    /// Number of markets in the snapshot.
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    /// Whether the snapshot holds no markets.
    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    /// Whether the snapshot is older than `ttl` at `now`.
    pub fn is_expired(&self, now: i64, ttl: Duration) -> bool {
        now.saturating_sub(self.created_at) > duration_ms(ttl)
    }
}

/// In-memory snapshot store.
///
/// Entries are never evicted except by [`sweep_expired`](Self::sweep_expired),
/// which the pagination engine calls at the start of every cursor request.
#[derive(Debug)]
pub struct SnapshotStore {
    snapshots: DashMap<String, Arc<Snapshot>>,
    clock: Arc<dyn Clock>,
    seq: AtomicU64,
}

impl SnapshotStore {
    /// Creates an empty store reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            snapshots: DashMap::new(),
            clock,
            seq: AtomicU64::new(0),
        }
    }

    /// Freezes `markets` and returns the new snapshot id.
    pub fn put(&self, markets: Vec<UnifiedMarket>) -> String {
        self.insert(markets).id.clone()
    }

    /// Freezes `markets` and returns the stored snapshot.
    pub fn insert(&self, markets: Vec<UnifiedMarket>) -> Arc<Snapshot> {
        let created_at = self.clock.now_ms();
        let snapshot = Arc::new(Snapshot {
            id: self.next_id(created_at),
            markets,
            created_at,
        });
        tracing::debug!(snapshot_id = %snapshot.id, markets = snapshot.len(), "Snapshot created");
        self.snapshots
            .insert(snapshot.id.clone(), Arc::clone(&snapshot));
        snapshot
    }

    /// Looks up a snapshot.
    pub fn get(&self, snapshot_id: &str) -> Option<Arc<Snapshot>> {
        self.snapshots.get(snapshot_id).map(|s| Arc::clone(s.value()))
    }

    /// Removes every snapshot with `now - created_at > ttl`. Returns how many were dropped.
    pub fn sweep_expired(&self, now: i64, ttl: Duration) -> usize {
        let before = self.snapshots.len();
        self.snapshots.retain(|_, s| !s.is_expired(now, ttl));
        let removed = before.saturating_sub(self.snapshots.len());
        if removed > 0 {
            tracing::debug!(removed, "Expired snapshots swept");
        }
        removed
    }

    /// Current time according to the store's clock.
    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Number of live snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Drops every snapshot.
    pub fn clear(&self) {
        self.snapshots.clear();
    }

    // timestamp, per-store sequence and a random suffix, all hex
    fn next_id(&self, now: i64) -> String {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let suffix: u32 = rand::rng().random();
        format!("{:x}-{seq:x}-{suffix:08x}", now.max(0))
    }
}
