use thiserror::Error;

/// Failures while fetching the directory.
///
/// Status and transport failures are retried up to the attempt limit;
/// a malformed body is surfaced immediately.
#[derive(Debug, Error)]
pub enum FetchError {
  #[error("HTTP {status}")]
  Status { status: reqwest::StatusCode },

  #[error("network error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("malformed response: {0}")]
  Parse(#[from] serde_json::Error),
}
