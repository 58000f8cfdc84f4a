//! Deduplicating request cache
//!
//! Wraps any [`Transport`] and keys every request by `method:url:body`.
//! An entry is either in flight (a shared future every joined caller awaits)
//! or data-bearing (the parsed body of the last successful exchange).
//! Failed exchanges remove their entry so the next call retries cleanly.

use futures::future::{BoxFuture, FutureExt, Shared};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

use crate::cache::{CachePolicy, cache_key};
use crate::client::{HttpRequest, RequestOptions, Transport};
use crate::error::ApiError;

type FetchOutcome = Result<Value, ApiError>;
type SharedFetch = Shared<BoxFuture<'static, FetchOutcome>>;
type EntryMap = HashMap<String, CacheEntry>;

struct CacheEntry {
    fetch: SharedFetch,
    timestamp: Instant,
    data: Option<Value>,
    /// Identifies the request that created this entry
    generation: u64,
}

/// Observable state of a cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    InFlight,
    Ready,
}

/// Snapshot of cache occupancy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub in_flight: usize,
    pub ready: usize,
    /// Data-bearing entries past the freshness window
    pub stale: usize,
}

enum Lookup {
    Join(SharedFetch),
    Hit(Value),
    Miss,
}

/// Request cache over a [`Transport`].
///
/// One instance per application session. All state lives in the instance,
/// so tests construct isolated caches freely.
pub struct RequestCache<T: Transport> {
    transport: Arc<T>,
    entries: Arc<Mutex<EntryMap>>,
    policy: CachePolicy,
    next_generation: AtomicU64,
}

impl<T: Transport + 'static> RequestCache<T> {
    pub fn new(transport: T, policy: CachePolicy) -> Self {
        Self {
            transport: Arc::new(transport),
            entries: Arc::new(Mutex::new(HashMap::new())),
            policy,
            next_generation: AtomicU64::new(0),
        }
    }

    /// Get the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// GET `url` through the cache
    pub async fn get(&self, url: &str) -> Result<Value, ApiError> {
        self.fetch_cached(url, &RequestOptions::default()).await
    }

    /// Fetch `url` through the cache and return the parsed body.
    ///
    /// Callers arriving within the dedup window of an existing entry await
    /// that entry's request. Otherwise a fresh data-bearing entry is served
    /// from memory, and anything else goes to the network.
    pub async fn fetch_cached(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<Value, ApiError> {
        let key = cache_key(&options.method(), url, options.body.as_deref());

        // Lookup and insert happen under one lock so the first caller wins
        let fetch = {
            let mut entries = lock(&self.entries);
            let now = Instant::now();

            let lookup = match entries.get(&key) {
                Some(entry) if now.duration_since(entry.timestamp) < self.policy.dedup_window => {
                    Lookup::Join(entry.fetch.clone())
                }
                Some(CacheEntry {
                    data: Some(data),
                    timestamp,
                    ..
                }) if now.duration_since(*timestamp) < self.policy.freshness_window => {
                    Lookup::Hit(data.clone())
                }
                _ => Lookup::Miss,
            };

            match lookup {
                Lookup::Join(fetch) => {
                    debug!("Joining request: {}", key);
                    fetch
                }
                Lookup::Hit(data) => {
                    debug!("Cache hit: {}", key);
                    return Ok(data);
                }
                Lookup::Miss => {
                    debug!("Cache miss: {}", key);
                    let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
                    let request = HttpRequest::from_options(url, options);
                    let fetch = self.spawn_fetch(key.clone(), request, generation);
                    entries.insert(
                        key,
                        CacheEntry {
                            fetch: fetch.clone(),
                            timestamp: now,
                            data: None,
                            generation,
                        },
                    );
                    fetch
                }
            }
        };

        fetch.await
    }

    /// Fetch through the cache and deserialize into `D`
    pub async fn fetch_json<D: DeserializeOwned>(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<D, ApiError> {
        let value = self.fetch_cached(url, options).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Drop the entry for one request signature
    pub fn invalidate(&self, url: &str, options: &RequestOptions) {
        let key = cache_key(&options.method(), url, options.body.as_deref());
        if lock(&self.entries).remove(&key).is_some() {
            debug!("Invalidated: {}", key);
        }
    }

    /// Drop every entry
    pub fn invalidate_all(&self) {
        let mut entries = lock(&self.entries);
        debug!("Invalidating {} cache entries", entries.len());
        entries.clear();
    }

    /// State of the entry for a request signature, if any
    pub fn entry_state(&self, url: &str, options: &RequestOptions) -> Option<EntryState> {
        let key = cache_key(&options.method(), url, options.body.as_deref());
        lock(&self.entries).get(&key).map(|entry| match entry.data {
            Some(_) => EntryState::Ready,
            None => EntryState::InFlight,
        })
    }

    pub fn stats(&self) -> CacheStats {
        let entries = lock(&self.entries);
        let now = Instant::now();

        let mut stats = CacheStats {
            total_entries: entries.len(),
            ..CacheStats::default()
        };
        for entry in entries.values() {
            if entry.data.is_some() {
                stats.ready += 1;
                if now.duration_since(entry.timestamp) >= self.policy.freshness_window {
                    stats.stale += 1;
                }
            } else {
                stats.in_flight += 1;
            }
        }
        stats
    }

    /// Remove data-bearing entries past the freshness window.
    ///
    /// Returns the number of entries removed. In-flight entries are kept.
    pub fn purge_stale(&self) -> usize {
        let mut entries = lock(&self.entries);
        let now = Instant::now();
        let freshness = self.policy.freshness_window;
        let before = entries.len();

        entries.retain(|_, entry| {
            entry.data.is_none() || now.duration_since(entry.timestamp) < freshness
        });

        let removed = before - entries.len();
        if removed > 0 {
            debug!("Purged {} stale cache entries", removed);
        }
        removed
    }

    /// Start the network exchange on its own task.
    ///
    /// The task settles the entry itself, so the entry resolves even when
    /// every caller has dropped its future.
    fn spawn_fetch(&self, key: String, request: HttpRequest, generation: u64) -> SharedFetch {
        let transport = Arc::clone(&self.transport);
        let entries = Arc::clone(&self.entries);
        let timeout = self.policy.request_timeout;

        let task = {
            let entries = Arc::clone(&entries);
            let key = key.clone();
            tokio::spawn(async move {
                let outcome = perform(transport.as_ref(), request, timeout).await;
                settle(&entries, &key, generation, &outcome);
                outcome
            })
        };

        async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!("Request task for {} did not complete: {}", key, err);
                    let outcome = Err(ApiError::Cancelled);
                    settle(&entries, &key, generation, &outcome);
                    outcome
                }
            }
        }
        .boxed()
        .shared()
    }
}

/// Perform one exchange and interpret the response
async fn perform<T: Transport + ?Sized>(
    transport: &T,
    request: HttpRequest,
    timeout: Option<Duration>,
) -> FetchOutcome {
    let url = request.url.clone();
    let response = match timeout {
        Some(limit) => tokio::time::timeout(limit, transport.send(request))
            .await
            .map_err(|_| {
                warn!("Request to {} timed out after {:?}", url, limit);
                ApiError::Timeout(limit)
            })??,
        None => transport.send(request).await?,
    };

    if !response.is_success() {
        return Err(ApiError::Http {
            status: response.status,
            status_text: response.status_text,
        });
    }

    parse_body(&response.body)
}

/// Parse a success body; an empty body is JSON `null`
fn parse_body(body: &[u8]) -> FetchOutcome {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Record the outcome on the entry, unless the entry now belongs to a newer request
fn settle(entries: &Mutex<EntryMap>, key: &str, generation: u64, outcome: &FetchOutcome) {
    let mut entries = lock(entries);

    let current = entries
        .get(key)
        .is_some_and(|entry| entry.generation == generation);
    if !current {
        debug!("Discarding superseded response: {}", key);
        return;
    }

    match outcome {
        Ok(data) => {
            if let Some(entry) = entries.get_mut(key) {
                entry.data = Some(data.clone());
                entry.timestamp = Instant::now();
            }
        }
        Err(err) => {
            debug!("Evicting {} after failure: {}", key, err);
            entries.remove(key);
        }
    }
}

fn lock(entries: &Mutex<EntryMap>) -> MutexGuard<'_, EntryMap> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}
