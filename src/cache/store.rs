//! Key-value store backends for the directory cache.

use std::path::PathBuf;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use super::CacheError;

/// Backing store for serialized cache envelopes.
pub trait CacheStore: Send + Sync {
  /// Write `payload` under `key`, replacing any previous value.
  fn put(&self, key: &str, payload: &str) -> Result<(), CacheError>;

  /// Read the payload stored under `key`, if any.
  fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

  /// Remove the entry stored under `key`. Missing entries are not an error.
  fn remove(&self, key: &str) -> Result<(), CacheError>;
}

/// Store that keeps nothing.
/// Used when caching is disabled - all operations are no-ops.
pub struct NoopStore;

impl CacheStore for NoopStore {
  fn put(&self, _key: &str, _payload: &str) -> Result<(), CacheError> {
    Ok(()) // Discard
  }

  fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
    Ok(None) // Always miss
  }

  fn remove(&self, _key: &str) -> Result<(), CacheError> {
    Ok(())
  }
}

/// Schema for the cache table. One row per key, payload is the serialized
/// envelope.
const STORE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS kv_cache (
    key TEXT PRIMARY KEY,
    payload TEXT NOT NULL
);
"#;

/// SQLite-backed key-value store.
pub struct SqliteStore {
  conn: Mutex<Connection>,
}

impl SqliteStore {
  /// Open or create the store at the default location.
  pub fn open() -> Result<Self, CacheError> {
    let path = Self::default_path()?;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| CacheError::Storage(format!("Failed to create cache directory: {}", e)))?;
    }

    let conn = Connection::open(&path).map_err(|e| {
      CacheError::Storage(format!(
        "Failed to open cache database at {}: {}",
        path.display(),
        e
      ))
    })?;

    Self::from_connection(conn)
  }

  /// In-memory store, used by tests.
  pub fn open_in_memory() -> Result<Self, CacheError> {
    let conn =
      Connection::open_in_memory().map_err(|e| CacheError::Storage(e.to_string()))?;
    Self::from_connection(conn)
  }

  fn from_connection(conn: Connection) -> Result<Self, CacheError> {
    conn
      .execute_batch(STORE_SCHEMA)
      .map_err(|e| CacheError::Storage(format!("Failed to run cache migrations: {}", e)))?;

    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  /// Get the default database path.
  fn default_path() -> Result<PathBuf, CacheError> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| CacheError::Storage("Could not determine data directory".to_string()))?;

    Ok(data_dir.join("rolo").join("cache.db"))
  }

  fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, CacheError> {
    self
      .conn
      .lock()
      .map_err(|e| CacheError::Storage(format!("Lock poisoned: {}", e)))
  }
}

impl CacheStore for SqliteStore {
  fn put(&self, key: &str, payload: &str) -> Result<(), CacheError> {
    let conn = self.lock()?;
    conn
      .execute(
        "INSERT OR REPLACE INTO kv_cache (key, payload) VALUES (?, ?)",
        params![key, payload],
      )
      .map_err(|e| CacheError::Storage(format!("Failed to store cache entry: {}", e)))?;
    Ok(())
  }

  fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
    let conn = self.lock()?;
    let mut stmt = conn
      .prepare("SELECT payload FROM kv_cache WHERE key = ?")
      .map_err(|e| CacheError::Storage(format!("Failed to prepare query: {}", e)))?;

    stmt
      .query_row(params![key], |row| row.get(0))
      .optional()
      .map_err(|e| CacheError::Storage(format!("Failed to read cache entry: {}", e)))
  }

  fn remove(&self, key: &str) -> Result<(), CacheError> {
    let conn = self.lock()?;
    conn
      .execute("DELETE FROM kv_cache WHERE key = ?", params![key])
      .map_err(|e| CacheError::Storage(format!("Failed to remove cache entry: {}", e)))?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_put_get_roundtrip() {
    let store = SqliteStore::open_in_memory().expect("Failed to open in-memory store");
    store.put("k", "v1").expect("Failed to put");
    assert_eq!(store.get("k").expect("Failed to get"), Some("v1".to_string()));

    // Replace
    store.put("k", "v2").expect("Failed to put");
    assert_eq!(store.get("k").expect("Failed to get"), Some("v2".to_string()));
  }

  #[test]
  fn test_get_missing_key() {
    let store = SqliteStore::open_in_memory().expect("Failed to open in-memory store");
    assert_eq!(store.get("absent").expect("Failed to get"), None);
  }

  #[test]
  fn test_remove() {
    let store = SqliteStore::open_in_memory().expect("Failed to open in-memory store");
    store.put("k", "v").expect("Failed to put");
    store.remove("k").expect("Failed to remove");
    assert_eq!(store.get("k").expect("Failed to get"), None);

    // Removing an absent key is fine
    store.remove("k").expect("Failed to remove absent key");
  }

  #[test]
  fn test_noop_store_never_stores() {
    let store = NoopStore;
    store.put("k", "v").expect("Noop put failed");
    assert_eq!(store.get("k").expect("Noop get failed"), None);
  }
}
