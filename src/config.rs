use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cache::CACHE_TTL_MINUTES;

/// Default directory endpoint.
pub const DEFAULT_DIRECTORY_URL: &str = "https://jsonplaceholder.typicode.com/users";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  pub directory: DirectoryConfig,
  pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
  /// Endpoint returning the JSON record array
  pub url: String,
}

impl Default for DirectoryConfig {
  fn default() -> Self {
    Self {
      url: DEFAULT_DIRECTORY_URL.to_string(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  pub enabled: bool,
  /// Cached entries older than this are treated as absent
  pub ttl_minutes: i64,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      ttl_minutes: CACHE_TTL_MINUTES,
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./rolo.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/rolo/config.yaml
  ///
  /// The endpoint needs no credentials, so a missing config file is not an
  /// error - defaults apply.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("rolo.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("rolo").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.directory.url, DEFAULT_DIRECTORY_URL);
    assert!(config.cache.enabled);
    assert_eq!(config.cache.ttl_minutes, CACHE_TTL_MINUTES);
  }

  #[test]
  fn test_parse_full_config() {
    let yaml = r#"
directory:
  url: https://directory.internal/users
cache:
  enabled: false
  ttl_minutes: 10
"#;
    let config: Config = serde_yaml::from_str(yaml).expect("Failed to parse config YAML");
    assert_eq!(config.directory.url, "https://directory.internal/users");
    assert!(!config.cache.enabled);
    assert_eq!(config.cache.ttl_minutes, 10);
  }

  #[test]
  fn test_partial_config_fills_defaults() {
    let yaml = "directory:\n  url: https://directory.internal/users\n";
    let config: Config = serde_yaml::from_str(yaml).expect("Failed to parse config YAML");
    assert_eq!(config.directory.url, "https://directory.internal/users");
    assert!(config.cache.enabled);
  }

  #[test]
  fn test_missing_explicit_path_is_an_error() {
    let result = Config::load(Some(Path::new("/definitely/not/here.yaml")));
    assert!(result.is_err());
  }
}
