//! In-memory caches for quote data.
//!
//! Two caches with different shapes: a single-slot cache holding the
//! bulk ticker payload, and a bounded per-symbol cache for detail
//! lookups. Both are TTL based. The ticker cache keeps its payload
//! after expiry so callers can fall back to stale data when the
//! upstream provider is down.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use mercator_market_data::QuoteSnapshot;

/// A cached payload stamped with its fetch time.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    payload: T,
    fetched_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(payload: T) -> Self {
        Self {
            payload,
            fetched_at: Instant::now(),
        }
    }

    fn is_valid(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Result of a ticker cache read.
///
/// `stocks` is present whenever the cache has ever been written,
/// regardless of freshness. `valid` tells the caller whether the
/// payload is within its TTL.
pub struct TickerRead {
    pub stocks: Option<Arc<[QuoteSnapshot]>>,
    pub valid: bool,
}

/// Single-slot cache for the bulk ticker payload.
///
/// The payload is stored behind an `Arc` so a write replaces the whole
/// batch atomically and readers never observe a partially updated list.
pub struct TickerCache {
    ttl: Duration,
    slot: RwLock<Option<CacheEntry<Arc<[QuoteSnapshot]>>>>,
}

impl TickerCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Read the cached payload without side effects. Expired entries
    /// are returned with `valid: false` rather than dropped.
    pub async fn read(&self) -> TickerRead {
        let slot = self.slot.read().await;
        match slot.as_ref() {
            Some(entry) => TickerRead {
                stocks: Some(entry.payload.clone()),
                valid: entry.is_valid(self.ttl),
            },
            None => TickerRead {
                stocks: None,
                valid: false,
            },
        }
    }

    /// Replace the payload and reset its TTL.
    pub async fn write(&self, stocks: Vec<QuoteSnapshot>) -> Arc<[QuoteSnapshot]> {
        let payload: Arc<[QuoteSnapshot]> = stocks.into();
        let mut slot = self.slot.write().await;
        *slot = Some(CacheEntry::new(payload.clone()));
        payload
    }
}

struct DetailInner {
    entries: HashMap<String, CacheEntry<QuoteSnapshot>>,
    order: VecDeque<String>,
}

/// Bounded per-symbol cache for detail lookups, LRU evicted.
pub struct DetailCache {
    ttl: Duration,
    capacity: usize,
    inner: RwLock<DetailInner>,
}

impl DetailCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity,
            inner: RwLock::new(DetailInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    /// Return the cached snapshot if it is within its TTL, touching it
    /// in the LRU order. Expired entries are treated as misses.
    pub async fn get_if_fresh(&self, symbol: &str) -> Option<QuoteSnapshot> {
        let mut inner = self.inner.write().await;
        let snapshot = match inner.entries.get(symbol) {
            Some(entry) if entry.is_valid(self.ttl) => entry.payload.clone(),
            _ => return None,
        };
        if let Some(pos) = inner.order.iter().position(|s| s == symbol) {
            inner.order.remove(pos);
        }
        inner.order.push_back(symbol.to_string());
        Some(snapshot)
    }

    /// Insert a snapshot keyed by its symbol, evicting the least
    /// recently used entry once the cache is over capacity.
    pub async fn insert(&self, snapshot: QuoteSnapshot) {
        let symbol = snapshot.symbol.clone();
        let mut inner = self.inner.write().await;
        if let Some(pos) = inner.order.iter().position(|s| s == &symbol) {
            inner.order.remove(pos);
        }
        inner.entries.insert(symbol.clone(), CacheEntry::new(snapshot));
        inner.order.push_back(symbol);
        while inner.order.len() > self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.entries.remove(&oldest);
            }
        }
    }
}
