//! Load orchestration: network fetch with cache write-through and fallback.

use std::future::Future;

use tracing::{error, info};

use crate::cache::DirectoryCache;

use super::error::FetchError;
use super::types::Record;

/// Where the records presented to the user came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
  /// Fresh data from the network.
  Network,
  /// Cached data served because the host is offline.
  CacheOffline,
  /// Cached data served after the network fetch failed.
  CacheAfterError,
}

/// Terminal result of one load invocation.
#[derive(Debug)]
pub enum LoadOutcome {
  /// Fetch succeeded; the cache was written through.
  Fresh(Vec<Record>),
  /// Offline with a usable cache.
  CachedOffline(Vec<Record>),
  /// Fetch failed but the cache had records.
  CachedAfterError {
    records: Vec<Record>,
    error: String,
  },
  /// Offline and nothing cached.
  OfflineNoCache,
  /// Fetch failed and nothing cached.
  FailedNoCache(String),
}

/// Run one load to a terminal outcome.
///
/// When `use_cache_if_offline` is set and the host is offline, the cache is
/// consulted without touching the network. The manual-reload path disables
/// that shortcut and always attempts the fetch; on fetch failure the cache is
/// the fallback either way.
pub async fn load_directory<F, Fut>(
  fetch: F,
  cache: &DirectoryCache,
  online: bool,
  use_cache_if_offline: bool,
) -> LoadOutcome
where
  F: FnOnce() -> Fut,
  Fut: Future<Output = Result<Vec<Record>, FetchError>>,
{
  if !online && use_cache_if_offline {
    return match cache.load() {
      Some(records) => {
        info!(count = records.len(), "Offline, serving cached directory");
        LoadOutcome::CachedOffline(records)
      }
      None => LoadOutcome::OfflineNoCache,
    };
  }

  match fetch().await {
    Ok(records) => {
      cache.save(&records);
      info!(count = records.len(), "Directory loaded from network");
      LoadOutcome::Fresh(records)
    }
    Err(err) => {
      error!(error = %err, "Directory fetch failed");
      match cache.load() {
        Some(records) => LoadOutcome::CachedAfterError {
          records,
          error: err.to_string(),
        },
        None => LoadOutcome::FailedNoCache(err.to_string()),
      }
    }
  }
}
