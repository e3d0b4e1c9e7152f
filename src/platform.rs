//! Desktop integrations: the system clipboard and the external map search.

use std::process::{Command, Stdio};

use thiserror::Error;
use url::form_urlencoded;

/// Base of the external map search. The formatted address goes in the
/// `query` parameter.
const MAP_SEARCH_BASE: &str = "https://www.google.com/maps/search/?api=1";

/// Failures from desktop integrations. Surfaced only as transient status
/// text, never fatal.
#[derive(Debug, Error)]
pub enum PlatformError {
  #[error("clipboard unavailable: {0}")]
  Clipboard(String),

  #[error("failed to launch opener: {0}")]
  Spawn(#[from] std::io::Error),
}

/// Copy `text` to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<(), PlatformError> {
  let mut clipboard =
    arboard::Clipboard::new().map_err(|e| PlatformError::Clipboard(e.to_string()))?;
  clipboard
    .set_text(text.to_string())
    .map_err(|e| PlatformError::Clipboard(e.to_string()))
}

/// Build the map search URL for a formatted address.
pub fn map_search_url(address: &str) -> String {
  let query: String = form_urlencoded::Serializer::new(String::new())
    .append_pair("query", address)
    .finish();
  format!("{}&{}", MAP_SEARCH_BASE, query)
}

/// Open `url` with the platform opener, detached from the terminal.
pub fn open_in_browser(url: &str) -> Result<(), PlatformError> {
  let mut command = opener_command(url);
  command
    .stdin(Stdio::null())
    .stdout(Stdio::null())
    .stderr(Stdio::null());
  command.spawn()?;
  Ok(())
}

#[cfg(target_os = "macos")]
fn opener_command(url: &str) -> Command {
  let mut command = Command::new("open");
  command.arg(url);
  command
}

#[cfg(target_os = "windows")]
fn opener_command(url: &str) -> Command {
  let mut command = Command::new("cmd");
  command.args(["/C", "start", "", url]);
  command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(url: &str) -> Command {
  let mut command = Command::new("xdg-open");
  command.arg(url);
  command
}
