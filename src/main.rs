mod app;
mod cache;
mod config;
mod connectivity;
mod directory;
mod event;
mod platform;
mod search;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use cache::{CacheStore, NoopStore, SqliteStore};

#[derive(Parser, Debug)]
#[command(name = "rolo")]
#[command(about = "A terminal UI for browsing a user directory, with offline cache")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/rolo/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Directory endpoint URL, overriding the configured one
  #[arg(short, long)]
  url: Option<String>,

  /// Disable the on-disk cache for this run
  #[arg(long)]
  no_cache: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // The terminal belongs to the TUI, so logs go to a file
  let _log_guard = init_tracing();

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;
  if let Some(url) = args.url {
    config.directory.url = url;
  }
  if args.no_cache {
    config.cache.enabled = false;
  }

  // An unusable store degrades to no caching; it never blocks startup
  let store: Arc<dyn CacheStore> = if config.cache.enabled {
    match SqliteStore::open() {
      Ok(store) => Arc::new(store),
      Err(err) => {
        warn!(error = %err, "Cache store unavailable, continuing without cache");
        Arc::new(NoopStore)
      }
    }
  } else {
    Arc::new(NoopStore)
  };

  // Initialize and run the app
  let mut app = app::App::new(config, store)?;
  app.run().await?;

  Ok(())
}

fn init_tracing() -> Option<WorkerGuard> {
  let log_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))?
    .join("rolo");
  std::fs::create_dir_all(&log_dir).ok()?;

  let appender = tracing_appender::rolling::never(log_dir, "rolo.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_env("ROLO_LOG").unwrap_or_else(|_| EnvFilter::new("rolo=info")),
    )
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Some(guard)
}
