//! Single-entry cache for the directory payload.
//!
//! The full record list is persisted as one JSON `{ts, data}` envelope under
//! one fixed key, with a wall-clock time-to-live. Failures never surface to
//! the user - the cache simply behaves as absent - but the fallible `try_load`
//! form keeps the cause visible to logs and tests.

mod store;

pub use store::{CacheStore, NoopStore, SqliteStore};

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, warn};

use crate::directory::types::Record;

/// Cached entries older than this are treated as absent.
pub const CACHE_TTL_MINUTES: i64 = 5;

/// Cache failures. Logged, never shown to the user.
#[derive(Debug, Error)]
pub enum CacheError {
  #[error("cache storage error: {0}")]
  Storage(String),

  #[error("cache entry corrupt: {0}")]
  Corrupt(#[from] serde_json::Error),
}

/// The serialized envelope: capture timestamp plus the full record list.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
  ts: DateTime<Utc>,
  data: Vec<Record>,
}

impl CacheEntry {
  fn new(data: Vec<Record>) -> Self {
    Self {
      ts: Utc::now(),
      data,
    }
  }

  fn is_expired(&self, ttl: Duration) -> bool {
    Utc::now() - self.ts > ttl
  }
}

/// Derive the storage key for an endpoint URL.
///
/// SHA-256 keeps keys stable and fixed-length, and a reconfigured endpoint
/// can never be served another endpoint's records.
pub fn cache_key(url: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(url.trim().as_bytes());
  format!("users:{}", hex::encode(hasher.finalize()))
}

/// Cache for the single directory payload.
#[derive(Clone)]
pub struct DirectoryCache {
  store: Arc<dyn CacheStore>,
  key: String,
  ttl: Duration,
}

impl DirectoryCache {
  pub fn new(store: Arc<dyn CacheStore>, key: String) -> Self {
    Self {
      store,
      key,
      ttl: Duration::minutes(CACHE_TTL_MINUTES),
    }
  }

  /// Override the time-to-live.
  pub fn with_ttl(mut self, ttl: Duration) -> Self {
    self.ttl = ttl;
    self
  }

  /// Persist the records under the fixed key.
  /// Failures are logged and swallowed - the cache stays stale or absent.
  pub fn save(&self, records: &[Record]) {
    let entry = CacheEntry::new(records.to_vec());
    let result = serde_json::to_string(&entry)
      .map_err(CacheError::from)
      .and_then(|payload| self.store.put(&self.key, &payload));

    if let Err(err) = result {
      warn!(error = %err, "Failed to write directory cache");
    }
  }

  /// Load the cached records, treating any failure as an absent cache.
  pub fn load(&self) -> Option<Vec<Record>> {
    match self.try_load() {
      Ok(found) => found,
      Err(err) => {
        warn!(error = %err, "Failed to read directory cache");
        None
      }
    }
  }

  /// Fallible form of [`DirectoryCache::load`]: distinguishes a missing entry
  /// (`Ok(None)`) from a storage or parse failure. Entries past the TTL are
  /// evicted and reported as missing.
  pub fn try_load(&self) -> Result<Option<Vec<Record>>, CacheError> {
    let payload = match self.store.get(&self.key)? {
      Some(payload) => payload,
      None => return Ok(None),
    };

    let entry: CacheEntry = serde_json::from_str(&payload)?;
    if entry.is_expired(self.ttl) {
      debug!("Directory cache entry expired, evicting");
      self.store.remove(&self.key)?;
      return Ok(None);
    }

    Ok(Some(entry.data))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::directory::types::Address;

  fn record(id: u64, name: &str) -> Record {
    Record {
      id,
      name: name.to_string(),
      email: format!("{}@example.com", name.to_lowercase()),
      address: Address::default(),
    }
  }

  fn test_cache() -> DirectoryCache {
    let store = SqliteStore::open_in_memory().expect("Failed to open in-memory store");
    DirectoryCache::new(Arc::new(store), cache_key("https://example.com/users"))
  }

  #[test]
  fn test_save_load_roundtrip() {
    let cache = test_cache();
    let records = vec![record(1, "Alice"), record(2, "Bob")];

    cache.save(&records);
    assert_eq!(cache.load(), Some(records));
  }

  #[test]
  fn test_load_empty_cache() {
    let cache = test_cache();
    assert_eq!(cache.load(), None);
  }

  #[test]
  fn test_expired_entry_is_absent_and_evicted() {
    let store = Arc::new(SqliteStore::open_in_memory().expect("Failed to open in-memory store"));
    let key = cache_key("https://example.com/users");
    let cache = DirectoryCache::new(store.clone(), key.clone());

    // Backdate the envelope past the TTL
    let entry = CacheEntry {
      ts: Utc::now() - Duration::minutes(CACHE_TTL_MINUTES + 1),
      data: vec![record(1, "Alice")],
    };
    let payload = serde_json::to_string(&entry).expect("Failed to serialize entry");
    store.put(&key, &payload).expect("Failed to seed store");

    assert_eq!(cache.load(), None);
    // The stale row was removed on the read path
    assert_eq!(store.get(&key).expect("Failed to get"), None);
  }

  #[test]
  fn test_fresh_entry_survives_reads() {
    let cache = test_cache();
    cache.save(&[record(1, "Alice")]);

    assert!(cache.load().is_some());
    assert!(cache.load().is_some());
  }

  #[test]
  fn test_corrupt_payload_reported_but_silent() {
    let store = Arc::new(SqliteStore::open_in_memory().expect("Failed to open in-memory store"));
    let key = cache_key("https://example.com/users");
    let cache = DirectoryCache::new(store.clone(), key.clone());

    store.put(&key, "not json").expect("Failed to seed store");

    assert!(matches!(cache.try_load(), Err(CacheError::Corrupt(_))));
    // The user-facing path degrades to "no cache"
    assert_eq!(cache.load(), None);
  }

  #[test]
  fn test_cache_key_is_stable_per_url() {
    let a = cache_key("https://example.com/users");
    let b = cache_key("https://example.com/users");
    let c = cache_key("https://other.example.com/users");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a.starts_with("users:"));
  }
}
