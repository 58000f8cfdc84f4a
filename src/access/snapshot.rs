//! Memoized parse of the persisted legacy menu snapshot

use sha2::{Digest, Sha256};
use std::sync::OnceLock;

use crate::menu::{MenuSnapshot, parse_menu_snapshot};

/// Raw snapshot text plus its lazily parsed form.
///
/// The parse is keyed by a SHA-256 digest of the raw text. Updating with
/// identical content keeps the existing parse; any change bumps `version`
/// and discards it.
#[derive(Debug, Default)]
pub struct MenuSnapshotCache {
    raw: Option<String>,
    digest: Option<String>,
    version: u64,
    parsed: OnceLock<MenuSnapshot>,
}

impl MenuSnapshotCache {
    pub fn new(raw: Option<String>) -> Self {
        Self {
            digest: raw.as_deref().map(content_digest),
            raw,
            version: 0,
            parsed: OnceLock::new(),
        }
    }

    /// Replace the raw snapshot.
    ///
    /// Returns `true` when the content changed.
    pub fn update(&mut self, raw: Option<String>) -> bool {
        let digest = raw.as_deref().map(content_digest);
        if digest == self.digest {
            return false;
        }

        log::debug!("Menu snapshot changed (version {})", self.version + 1);
        self.raw = raw;
        self.digest = digest;
        self.version += 1;
        self.parsed = OnceLock::new();
        true
    }

    /// Parsed snapshot, parsing on first access for the current version
    pub fn snapshot(&self) -> &MenuSnapshot {
        self.parsed.get_or_init(|| parse_menu_snapshot(self.raw.as_deref()))
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Hex SHA-256 of the raw snapshot
    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_parsed(&self) -> bool {
        self.parsed.get().is_some()
    }
}

fn content_digest(raw: &str) -> String {
    format!("{:x}", Sha256::digest(raw.as_bytes()))
}
