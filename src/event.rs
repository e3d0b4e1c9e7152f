use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::directory::loader::LoadOutcome;

/// Application events.
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Periodic tick: drives the debounce deadline and status flash expiry
  Tick,
  /// A load invocation reached a terminal state
  Load(LoadOutcome),
  /// Connectivity transition reported by the probe task
  Connectivity { online: bool },
}

/// Event handler that merges terminal input, a tick timer, and events sent
/// by background tasks into one channel.
pub struct EventHandler {
  rx: mpsc::UnboundedReceiver<Event>,
  tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
  /// Create a new event handler with the given tick rate
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    // Spawn terminal event reader
    let sender = tx.clone();
    tokio::spawn(async move {
      loop {
        if event::poll(tick_rate).unwrap_or(false) {
          if let Ok(evt) = event::read() {
            if let CrosstermEvent::Key(key) = evt {
              if sender.send(Event::Key(key)).is_err() {
                break;
              }
            }
          }
        } else {
          // Tick
          if sender.send(Event::Tick).is_err() {
            break;
          }
        }
      }
    });

    Self { rx, tx }
  }

  /// Sender handle for background tasks (loads, connectivity probes)
  pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
    self.tx.clone()
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}
