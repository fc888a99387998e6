//! Client cache stores
//!
//! One `CacheStore` per entity type mirrors the last fetched collection:
//! - Time-based staleness: re-fetch only once the cache duration elapsed
//! - Local edits keyed by record id (set / update / delete / add)
//! - Revision channel so subscribers re-render on every mutation
//!
//! Stores are built explicitly (see `Stores`) and handed to whoever needs
//! them; there is no process-wide instance.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::gateway::CollectionSource;
use crate::models::{Activity, CustomerSession, Record, Session, SessionWithDetails, Spot};

/// Result of a `fetch` call
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Cache still within its duration, nothing fetched
    Fresh,
    /// Items replaced by a successful fetch
    Refreshed(usize),
    /// Fetch failed, previous items kept; carries the user-facing message
    Failed(String),
}

struct CacheState<T> {
    items: Vec<T>,
    last_fetch: Option<DateTime<Utc>>,
}

/// Cached collection of one entity type
pub struct CacheStore<T: Record> {
    name: &'static str,
    cache_duration: Duration,
    state: RwLock<CacheState<T>>,
    revision: watch::Sender<u64>,
}

impl<T: Record> CacheStore<T> {
    pub fn new(name: &'static str, cache_duration: Duration) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            name,
            cache_duration,
            state: RwLock::new(CacheState {
                items: Vec::new(),
                last_fetch: None,
            }),
            revision,
        }
    }

    // Lock poisoning is ignored
    fn read(&self) -> RwLockReadGuard<'_, CacheState<T>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheState<T>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    /// Receiver that changes on every mutation
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Current revision number
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.read().items.clone()
    }

    pub fn len(&self) -> usize {
        self.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().items.is_empty()
    }

    pub fn last_fetch(&self) -> Option<DateTime<Utc>> {
        self.read().last_fetch
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.read()
            .items
            .iter()
            .find(|item| item.record_id() == id)
            .cloned()
    }

    /// Replace the whole collection
    pub fn set(&self, items: Vec<T>) {
        self.write().items = items;
        self.notify();
    }

    /// Replace the entry with the same id, or append it
    pub fn update(&self, item: T) {
        {
            let mut state = self.write();
            match state
                .items
                .iter_mut()
                .find(|existing| existing.record_id() == item.record_id())
            {
                Some(existing) => *existing = item,
                None => state.items.push(item),
            }
        }
        self.notify();
    }

    /// Remove the entry with this id; absent ids are ignored
    pub fn delete(&self, id: &str) {
        let removed = {
            let mut state = self.write();
            let before = state.items.len();
            state.items.retain(|existing| existing.record_id() != id);
            before != state.items.len()
        };
        if removed {
            self.notify();
        }
    }

    /// Append a newly created record.
    ///
    /// An id already in the store is replaced in place, keeping one
    /// entry per id.
    pub fn add(&self, item: T) {
        {
            let mut state = self.write();
            match state
                .items
                .iter_mut()
                .find(|existing| existing.record_id() == item.record_id())
            {
                Some(existing) => {
                    warn!(
                        "{} store: add() with existing id {}, replacing",
                        self.name,
                        item.record_id()
                    );
                    *existing = item;
                }
                None => state.items.push(item),
            }
        }
        self.notify();
    }

    /// Stale once the cache duration has elapsed, or while empty
    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        let state = self.read();
        if state.items.is_empty() {
            return true;
        }
        match state.last_fetch {
            None => true,
            Some(last) => match (now - last).to_std() {
                Ok(elapsed) => elapsed > self.cache_duration,
                // Clock went backwards
                Err(_) => false,
            },
        }
    }

    /// Refill from `source` if stale. Never fails; see `FetchOutcome`.
    pub async fn fetch<S>(&self, source: &S) -> FetchOutcome
    where
        S: CollectionSource<T> + ?Sized,
    {
        self.fetch_at(source, Utc::now()).await
    }

    /// `fetch` against an explicit clock.
    ///
    /// Concurrent calls are not deduplicated: the last one to complete
    /// determines the stored items.
    pub async fn fetch_at<S>(&self, source: &S, now: DateTime<Utc>) -> FetchOutcome
    where
        S: CollectionSource<T> + ?Sized,
    {
        if !self.is_stale_at(now) {
            debug!("{} store fresh, skipping fetch", self.name);
            return FetchOutcome::Fresh;
        }

        match source.fetch_all().await {
            Ok(items) => {
                let count = items.len();
                {
                    let mut state = self.write();
                    state.items = items;
                    state.last_fetch = Some(now);
                }
                self.notify();
                info!("{} store refreshed with {} items", self.name, count);
                FetchOutcome::Refreshed(count)
            }
            Err(e) => {
                warn!("{} store fetch failed, keeping cached items: {}", self.name, e);
                FetchOutcome::Failed(e.feedback())
            }
        }
    }

    /// Force the next `fetch` to hit the source
    pub fn invalidate(&self) {
        self.write().last_fetch = None;
    }

    /// Drop all items and the fetch timestamp
    pub fn reset(&self) {
        {
            let mut state = self.write();
            state.items.clear();
            state.last_fetch = None;
        }
        self.notify();
    }
}

/// One store per entity type, created once per staff session
pub struct Stores {
    pub sessions: CacheStore<Session>,
    pub activities: CacheStore<Activity>,
    pub spots: CacheStore<Spot>,
    pub customer_sessions: CacheStore<CustomerSession>,
    pub session_details: CacheStore<SessionWithDetails>,
}

impl Stores {
    pub fn new(cache_duration: Duration) -> Self {
        Self {
            sessions: CacheStore::new("sessions", cache_duration),
            activities: CacheStore::new("activities", cache_duration),
            spots: CacheStore::new("spots", cache_duration),
            customer_sessions: CacheStore::new("customer_sessions", cache_duration),
            session_details: CacheStore::new("session_details", cache_duration),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.cache_duration())
    }

    /// Clear every store (logout)
    pub fn reset(&self) {
        self.sessions.reset();
        self.activities.reset();
        self.spots.reset();
        self.customer_sessions.reset();
        self.session_details.reset();
        info!("All cache stores reset");
    }
}
