//! Connectivity monitoring via periodic TCP probes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::debug;

use crate::event::Event;

/// Seconds between probes.
const PROBE_INTERVAL_SECS: u64 = 5;

/// Per-probe connect timeout.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Tracks whether the directory endpoint is reachable.
///
/// A background task probes the endpoint host on a fixed interval, keeps a
/// shared flag, and emits an event on each transition. Until the first probe
/// completes the host is assumed online; a wrong guess converges on its own
/// once the fetch fails and the cache fallback runs.
#[derive(Clone)]
pub struct ConnectivityMonitor {
  online: Arc<AtomicBool>,
}

impl ConnectivityMonitor {
  /// Spawn the probe task for `host:port`.
  pub fn spawn(host: String, port: u16, tx: mpsc::UnboundedSender<Event>) -> Self {
    let online = Arc::new(AtomicBool::new(true));
    let flag = online.clone();

    tokio::spawn(async move {
      let mut interval = tokio::time::interval(Duration::from_secs(PROBE_INTERVAL_SECS));
      loop {
        interval.tick().await;
        let reachable = probe(&host, port).await;
        let was = flag.swap(reachable, Ordering::SeqCst);
        if was != reachable {
          debug!(online = reachable, "Connectivity changed");
          if tx.send(Event::Connectivity { online: reachable }).is_err() {
            break;
          }
        }
      }
    });

    Self { online }
  }

  /// Snapshot of the last probe result.
  pub fn is_online(&self) -> bool {
    self.online.load(Ordering::SeqCst)
  }
}

async fn probe(host: &str, port: u16) -> bool {
  matches!(
    tokio::time::timeout(PROBE_TIMEOUT, TcpStream::connect((host, port))).await,
    Ok(Ok(_))
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use tokio::net::TcpListener;

  #[tokio::test]
  async fn test_probe_reaches_local_listener() {
    let listener = TcpListener::bind("127.0.0.1:0")
      .await
      .expect("Failed to bind listener");
    let port = listener.local_addr().expect("Failed to get addr").port();

    assert!(probe("127.0.0.1", port).await);
  }

  #[tokio::test]
  async fn test_probe_fails_on_closed_port() {
    // Bind then drop to get a port that is very likely closed
    let listener = TcpListener::bind("127.0.0.1:0")
      .await
      .expect("Failed to bind listener");
    let port = listener.local_addr().expect("Failed to get addr").port();
    drop(listener);

    assert!(!probe("127.0.0.1", port).await);
  }
}
