//! Market index with ID and slug lookup

use parking_lot::RwLock;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::Result;
use crate::types::UnifiedMarket;

/// One fully built set of indices. Never mutated after construction.
#[derive(Debug, Default)]
pub struct IndexedMarkets {
    markets: Vec<Arc<UnifiedMarket>>,
    by_id: HashMap<String, Arc<UnifiedMarket>>,
    by_slug: HashMap<String, Arc<UnifiedMarket>>,
}

impl IndexedMarkets {
    /// Builds both indices from a listing. Later duplicates overwrite earlier ones.
    pub fn build(markets: Vec<UnifiedMarket>) -> Self {
        let mut by_id = HashMap::with_capacity(markets.len());
        let mut by_slug = HashMap::new();
        let markets: Vec<Arc<UnifiedMarket>> = markets.into_iter().map(Arc::new).collect();

        for market in &markets {
            by_id.insert(market.market_id.clone(), Arc::clone(market));
            if let Some(slug) = market.slug.as_ref() {
                by_slug.insert(slug.clone(), Arc::clone(market));
            }
        }

        Self {
            markets,
            by_id,
            by_slug,
        }
    }

    /// Market by id.
    pub fn get(&self, market_id: &str) -> Option<&Arc<UnifiedMarket>> {
        self.by_id.get(market_id)
    }

    /// Market by slug.
    pub fn get_by_slug(&self, slug: &str) -> Option<&Arc<UnifiedMarket>> {
        self.by_slug.get(slug)
    }

    /// Markets in listing order.
    pub fn markets(&self) -> &[Arc<UnifiedMarket>] {
        &self.markets
    }

    /// Id index.
    pub fn by_id(&self) -> &HashMap<String, Arc<UnifiedMarket>> {
        &self.by_id
    }

    /// Slug index.
    pub fn by_slug(&self) -> &HashMap<String, Arc<UnifiedMarket>> {
        &self.by_slug
    }

    /// Number of markets in the listing.
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    /// Whether the listing was empty.
    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}

/// Cache of the full market listing of one venue.
///
/// Readers always see either the previous or the next complete index, never a
/// partially built one. Loads are serialized: callers that queue up behind an
/// in-flight load reuse its result instead of fetching again.
#[derive(Debug)]
pub struct MarketIndex {
    exchange_id: String,
    current: RwLock<Option<Arc<IndexedMarkets>>>,
    loading: Mutex<()>,
    generation: AtomicU64,
}

impl MarketIndex {
    /// Creates an empty, unloaded index.
    pub fn new(exchange_id: impl Into<String>) -> Self {
        Self {
            exchange_id: exchange_id.into(),
            current: RwLock::new(None),
            loading: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Loads the index through `loader`, or returns the cached one.
    ///
    /// With `reload == false` a loaded index is returned without calling
    /// `loader`. With `reload == true` a fresh fetch is made, unless another
    /// load completed while this call was waiting for the loading lock, in
    /// which case that result is returned.
    ///
    /// The index is replaced only after `loader` resolves successfully; a
    /// failed or dropped load leaves the previous index in place.
    pub async fn load_with<F, Fut>(&self, reload: bool, loader: F) -> Result<Arc<IndexedMarkets>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<UnifiedMarket>>>,
    {
        let observed = self.generation.load(Ordering::Acquire);
        if !reload {
            if let Some(index) = self.snapshot() {
                debug!(exchange = %self.exchange_id, markets = index.len(), "Returning cached markets");
                return Ok(index);
            }
        }

        let _loading_guard = self.loading.lock().await;

        if let Some(index) = self.snapshot() {
            let reloaded_meanwhile = self.generation.load(Ordering::Acquire) != observed;
            if !reload || reloaded_meanwhile {
                debug!(
                    exchange = %self.exchange_id,
                    markets = index.len(),
                    "Reusing markets loaded by a concurrent call"
                );
                return Ok(index);
            }
        }

        info!(exchange = %self.exchange_id, reload, "Loading markets");
        let markets = loader().await?;
        let index = Arc::new(IndexedMarkets::build(markets));

        *self.current.write() = Some(Arc::clone(&index));
        self.generation.fetch_add(1, Ordering::AcqRel);

        info!(
            exchange = %self.exchange_id,
            markets = index.len(),
            slugs = index.by_slug.len(),
            "Loaded markets"
        );
        Ok(index)
    }

    /// Current index, if loaded.
    pub fn snapshot(&self) -> Option<Arc<IndexedMarkets>> {
        self.current.read().clone()
    }

    /// Whether a load has completed.
    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }

    /// Market by id from the loaded index.
    pub fn lookup(&self, market_id: &str) -> Option<Arc<UnifiedMarket>> {
        self.current.read().as_ref()?.get(market_id).cloned()
    }

    /// Market by slug from the loaded index.
    pub fn lookup_by_slug(&self, slug: &str) -> Option<Arc<UnifiedMarket>> {
        self.current.read().as_ref()?.get_by_slug(slug).cloned()
    }

    /// Number of completed loads.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Forgets the loaded index.
    pub fn clear(&self) {
        *self.current.write() = None;
    }
}
