//! HTTP client for the directory endpoint.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use super::error::FetchError;
use super::types::Record;

/// HTTP request timeout in seconds.
/// Generous enough for a slow endpoint while still failing in finite time.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum attempts for one logical fetch.
pub const RETRY_ATTEMPTS: u32 = 3;

/// First backoff delay. Each subsequent delay doubles the previous one.
pub const INITIAL_BACKOFF: Duration = Duration::from_millis(600);

/// Client for the directory endpoint.
/// Clone is cheap - reqwest::Client shares its connection pool internally.
#[derive(Clone)]
pub struct DirectoryClient {
  client: Client,
  url: String,
}

impl DirectoryClient {
  pub fn new(url: &str) -> Result<Self, FetchError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
      .build()?;

    Ok(Self {
      client,
      url: url.to_string(),
    })
  }

  /// Fetch the full record list.
  ///
  /// Transport failures and non-success statuses are retried with doubling
  /// backoff. The body is parsed once, after a successful attempt - a
  /// malformed payload will not get better by asking again.
  pub async fn fetch_users(&self) -> Result<Vec<Record>, FetchError> {
    let body = retry_with_backoff(RETRY_ATTEMPTS, INITIAL_BACKOFF, |attempt| {
      let client = self.client.clone();
      let url = self.url.clone();
      async move {
        debug!(url = %url, attempt, "Fetching directory");
        let response = client.get(&url).send().await?;
        if !response.status().is_success() {
          return Err(FetchError::Status {
            status: response.status(),
          });
        }
        Ok(response.text().await?)
      }
    })
    .await?;

    Ok(serde_json::from_str(&body)?)
  }
}

/// Run `op` up to `attempts` times, sleeping `initial_delay` after the first
/// failure and doubling the delay after each subsequent one (no jitter, no
/// cap). The final attempt's failure is returned as-is.
pub async fn retry_with_backoff<T, F, Fut>(
  attempts: u32,
  initial_delay: Duration,
  mut op: F,
) -> Result<T, FetchError>
where
  F: FnMut(u32) -> Fut,
  Fut: Future<Output = Result<T, FetchError>>,
{
  let mut delay = initial_delay;
  let mut attempt = 1;

  loop {
    match op(attempt).await {
      Ok(value) => return Ok(value),
      Err(err) if attempt < attempts => {
        warn!(
          attempt,
          backoff_ms = delay.as_millis() as u64,
          error = %err,
          "Fetch attempt failed, backing off"
        );
        tokio::time::sleep(delay).await;
        delay *= 2;
        attempt += 1;
      }
      Err(err) => return Err(err),
    }
  }
}
