use std::io::stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::cache::{cache_key, CacheStore, DirectoryCache};
use crate::config::Config;
use crate::connectivity::ConnectivityMonitor;
use crate::directory::client::DirectoryClient;
use crate::directory::loader::{load_directory, DataSource, LoadOutcome};
use crate::directory::types::Record;
use crate::event::{Event, EventHandler};
use crate::platform;
use crate::search::{filter_records, Debouncer};
use crate::ui;

/// How long a transient status flash stays up before reverting.
const FLASH_DURATION: Duration = Duration::from_millis(1200);

/// Input mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Normal,
  Search,
}

/// Lifecycle of the card view.
#[derive(Debug)]
pub enum LoadPhase {
  /// Nothing has started yet
  Idle,
  /// A load is in flight; skeleton rows render
  Loading,
  /// Records are on screen
  Ready { source: DataSource },
  /// Terminal failure with nothing to show; the error card renders
  Failed { message: String },
}

/// Color class of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
  Info,
  Busy,
  Good,
  Bad,
}

/// Which entry point triggered a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadKind {
  /// Initial page load: offline hosts may be served straight from cache
  Initial,
  /// Manual reload: always attempts the network
  Reload,
}

/// Main application state
pub struct App {
  /// Last successfully loaded list, in fetch order
  records: Vec<Record>,

  /// Records currently on screen (after the active filter)
  visible: Vec<Record>,

  /// Selected card index into `visible`
  selected: usize,

  phase: LoadPhase,

  /// Status line content
  status_text: String,
  status_tone: Tone,

  /// Transient status override with its expiry
  flash: Option<(String, Instant)>,

  /// Current input mode
  mode: Mode,

  /// Search filter input (after pressing /)
  search_query: String,

  debouncer: Debouncer,

  client: DirectoryClient,
  cache: DirectoryCache,

  /// Host and port the connectivity probe targets
  probe_target: Option<(String, u16)>,
  connectivity: Option<ConnectivityMonitor>,

  /// Event sender for async tasks
  event_tx: mpsc::UnboundedSender<Event>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: Config, store: Arc<dyn CacheStore>) -> Result<Self> {
    let client = DirectoryClient::new(&config.directory.url)?;

    let cache = DirectoryCache::new(store, cache_key(&config.directory.url))
      .with_ttl(chrono::Duration::minutes(config.cache.ttl_minutes));

    let probe_target = url::Url::parse(&config.directory.url)
      .ok()
      .and_then(|u| match (u.host_str(), u.port_or_known_default()) {
        (Some(host), Some(port)) => Some((host.to_string(), port)),
        _ => None,
      });

    let (tx, _rx) = mpsc::unbounded_channel();

    Ok(Self {
      records: Vec::new(),
      visible: Vec::new(),
      selected: 0,
      phase: LoadPhase::Idle,
      status_text: String::new(),
      status_tone: Tone::Info,
      flash: None,
      mode: Mode::Normal,
      search_query: String::new(),
      debouncer: Debouncer::new(),
      client,
      cache,
      probe_target,
      connectivity: None,
      event_tx: tx,
      should_quit: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Create event handler
    let mut events = EventHandler::new(Duration::from_millis(250));
    self.event_tx = events.sender();

    if let Some((host, port)) = self.probe_target.clone() {
      self.connectivity = Some(ConnectivityMonitor::spawn(host, port, events.sender()));
    }

    // Initial data load
    self.start_load(LoadKind::Initial);

    // Main loop
    while !self.should_quit {
      // Draw UI
      terminal.draw(|frame| ui::draw(frame, self))?;

      // Handle events
      if let Some(event) = events.next().await {
        self.handle_event(event);
      }
    }

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => self.handle_tick(),
      Event::Load(outcome) => self.handle_load(outcome),
      Event::Connectivity { online } => self.handle_connectivity(online),
    }
  }

  fn handle_tick(&mut self) {
    let now = Instant::now();

    if self.debouncer.fire(now) {
      self.apply_filter();
    }

    let flash_expired = matches!(&self.flash, Some((_, until)) if now >= *until);
    if flash_expired {
      self.flash = None;
    }
  }

  fn handle_key(&mut self, key: crossterm::event::KeyEvent) {
    match self.mode {
      Mode::Normal => self.handle_normal_mode_key(key),
      Mode::Search => self.handle_search_mode_key(key),
    }
  }

  fn handle_normal_mode_key(&mut self, key: crossterm::event::KeyEvent) {
    match key.code {
      // Quit
      KeyCode::Char('q') => {
        self.should_quit = true;
      }
      KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.should_quit = true;
      }

      // Navigation
      KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
      KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),

      // Manual reload: never shortcut to the cache, even offline
      KeyCode::Char('r') => self.start_load(LoadKind::Reload),

      // Per-record actions
      KeyCode::Char('y') => self.copy_selected_email(),
      KeyCode::Char('m') => self.open_selected_map(),

      // Mode switch; the existing query stays editable
      KeyCode::Char('/') => {
        self.mode = Mode::Search;
      }

      _ => {}
    }
  }

  fn handle_search_mode_key(&mut self, key: crossterm::event::KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        self.search_query.clear();
        self.debouncer.cancel();
        self.apply_filter();
      }
      KeyCode::Enter => {
        // Filter persists; a pending debounce still fires on the next tick
        self.mode = Mode::Normal;
      }
      KeyCode::Backspace => {
        self.search_query.pop();
        self.debouncer.note_input(Instant::now());
      }
      KeyCode::Char(c) => {
        self.search_query.push(c);
        self.debouncer.note_input(Instant::now());
      }
      _ => {}
    }
  }

  /// Spawn one load to completion. In-flight loads are not cancelled or
  /// deduplicated: the last outcome event to arrive wins.
  fn start_load(&mut self, kind: LoadKind) {
    self.phase = LoadPhase::Loading;
    self.set_status("Loading users...", Tone::Busy);

    let client = self.client.clone();
    let cache = self.cache.clone();
    let online = self.online();
    let use_cache_if_offline = kind == LoadKind::Initial;
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      let fetch = || async { client.fetch_users().await };
      let outcome = load_directory(fetch, &cache, online, use_cache_if_offline).await;
      let _ = tx.send(Event::Load(outcome));
    });
  }

  fn handle_load(&mut self, outcome: LoadOutcome) {
    match outcome {
      LoadOutcome::Fresh(records) => {
        self.set_status(&format!("Loaded {} users.", records.len()), Tone::Good);
        self.show_records(records, DataSource::Network);
      }
      LoadOutcome::CachedOffline(records) => {
        self.set_status("Offline — showing cached data", Tone::Bad);
        self.show_records(records, DataSource::CacheOffline);
      }
      LoadOutcome::CachedAfterError { records, error } => {
        debug!(error = %error, "Showing cached records after fetch failure");
        self.set_status("Network error — showing cached data", Tone::Bad);
        self.show_records(records, DataSource::CacheAfterError);
      }
      LoadOutcome::OfflineNoCache => {
        self.set_status("Offline and no cached data available.", Tone::Bad);
        self.phase = LoadPhase::Failed {
          message: "You are offline and no cached data is available.".to_string(),
        };
      }
      LoadOutcome::FailedNoCache(error) => {
        self.set_status(
          "Failed to load users. Check network and try again.",
          Tone::Bad,
        );
        self.phase = LoadPhase::Failed {
          message: format!("Error: {}", error),
        };
      }
    }
  }

  fn show_records(&mut self, records: Vec<Record>, source: DataSource) {
    self.records = records;
    // The full list renders after a load; the active query re-applies on the
    // next keystroke
    self.visible = self.records.clone();
    self.selected = 0;
    self.phase = LoadPhase::Ready { source };
  }

  fn handle_connectivity(&mut self, online: bool) {
    if online {
      self.set_status(
        "Back online — data may be stale. Press r to reload.",
        Tone::Info,
      );
    } else {
      self.set_status("You are offline — cached data may be shown.", Tone::Bad);
    }
  }

  /// Re-run the filter over the last loaded list.
  fn apply_filter(&mut self) {
    self.visible = filter_records(&self.records, &self.search_query);
    if self.selected >= self.visible.len() {
      self.selected = self.visible.len().saturating_sub(1);
    }
  }

  fn move_selection(&mut self, delta: i32) {
    let len = self.visible.len();
    if len > 0 {
      self.selected = (self.selected as i32 + delta).rem_euclid(len as i32) as usize;
    }
  }

  fn copy_selected_email(&mut self) {
    let email = match self.visible.get(self.selected) {
      Some(record) => record.email.clone(),
      None => return,
    };

    match platform::copy_to_clipboard(&email) {
      Ok(()) => self.set_flash("Copied ✓"),
      Err(err) => {
        debug!(error = %err, "Clipboard write failed");
        self.set_flash("Copy failed");
      }
    }
  }

  fn open_selected_map(&mut self) {
    let address = match self.visible.get(self.selected) {
      Some(record) => record.address.formatted(),
      None => return,
    };

    let url = platform::map_search_url(&address);
    if let Err(err) = platform::open_in_browser(&url) {
      warn!(error = %err, "Failed to open map");
      self.set_flash("Couldn't open map");
    }
  }

  fn online(&self) -> bool {
    self
      .connectivity
      .as_ref()
      .map(|monitor| monitor.is_online())
      .unwrap_or(true)
  }

  fn set_status(&mut self, text: &str, tone: Tone) {
    self.status_text = text.to_string();
    self.status_tone = tone;
  }

  fn set_flash(&mut self, text: &str) {
    self.flash = Some((text.to_string(), Instant::now() + FLASH_DURATION));
  }

  // Accessors for UI rendering

  pub fn phase(&self) -> &LoadPhase {
    &self.phase
  }

  pub fn mode(&self) -> &Mode {
    &self.mode
  }

  pub fn visible_records(&self) -> &[Record] {
    &self.visible
  }

  pub fn selected(&self) -> usize {
    self.selected
  }

  pub fn search_query(&self) -> &str {
    &self.search_query
  }

  pub fn status_text(&self) -> &str {
    &self.status_text
  }

  pub fn status_tone(&self) -> Tone {
    self.status_tone
  }

  pub fn flash_text(&self) -> Option<&str> {
    self.flash.as_ref().map(|(text, _)| text.as_str())
  }
}
