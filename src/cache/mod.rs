//! In-memory request cache
//!
//! Collapses concurrent identical requests into one network call and serves
//! recent responses without touching the network. Failures are never cached.

pub mod client;
pub mod key;

use std::time::Duration;

/// Default cache windows
pub struct CacheTtl;

impl CacheTtl {
    /// Identical requests issued within this window share one call
    pub const DEDUP_WINDOW: Duration = Duration::from_secs(1);

    /// Settled responses are served from memory for this long
    pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(5 * 60); // 5 min

    /// A request still pending after this long is evicted and failed
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
}

/// Timing policy for a [`RequestCache`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub dedup_window: Duration,
    pub freshness_window: Duration,
    /// `None` lets a request stay in flight indefinitely
    pub request_timeout: Option<Duration>,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            dedup_window: CacheTtl::DEDUP_WINDOW,
            freshness_window: CacheTtl::FRESHNESS_WINDOW,
            request_timeout: Some(CacheTtl::REQUEST_TIMEOUT),
        }
    }
}

// Re-export main types
pub use client::{CacheStats, EntryState, RequestCache};
pub use key::cache_key;
