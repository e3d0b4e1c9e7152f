//! Client-side name filtering with debounced invocation.

use std::time::{Duration, Instant};

use crate::directory::types::Record;

/// Quiet period with no input before a pending filter runs.
pub const DEBOUNCE_QUIET: Duration = Duration::from_millis(250);

/// Case-insensitive substring filter on the display name.
/// An empty (or all-whitespace) query returns the list unchanged.
pub fn filter_records(records: &[Record], query: &str) -> Vec<Record> {
  let query = query.trim().to_lowercase();
  if query.is_empty() {
    return records.to_vec();
  }

  records
    .iter()
    .filter(|record| record.name.to_lowercase().contains(&query))
    .cloned()
    .collect()
}

/// Collapses rapid input into one deferred execution.
///
/// Each input event replaces the pending deadline; `fire` reports readiness
/// once on the first check at or past the deadline. Time is passed in so
/// callers and tests control the clock.
#[derive(Debug, Default)]
pub struct Debouncer {
  deadline: Option<Instant>,
}

impl Debouncer {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record an input event at `now`, (re)arming the deadline.
  pub fn note_input(&mut self, now: Instant) {
    self.deadline = Some(now + DEBOUNCE_QUIET);
  }

  /// Drop any pending deadline without firing.
  pub fn cancel(&mut self) {
    self.deadline = None;
  }

  /// True exactly once per armed deadline, at or past it.
  pub fn fire(&mut self, now: Instant) -> bool {
    match self.deadline {
      Some(deadline) if now >= deadline => {
        self.deadline = None;
        true
      }
      _ => false,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::directory::types::Address;

  fn record(name: &str) -> Record {
    Record {
      id: 0,
      name: name.to_string(),
      email: String::new(),
      address: Address::default(),
    }
  }

  fn names(records: &[Record]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
  }

  #[test]
  fn test_filter_is_case_insensitive() {
    let records = vec![record("Alice"), record("bob"), record("ALICEson")];

    let filtered = filter_records(&records, "alice");
    assert_eq!(names(&filtered), vec!["Alice", "ALICEson"]);

    let filtered = filter_records(&records, "ALICE");
    assert_eq!(names(&filtered), vec!["Alice", "ALICEson"]);
  }

  #[test]
  fn test_empty_query_returns_all() {
    let records = vec![record("Alice"), record("bob")];
    assert_eq!(filter_records(&records, "").len(), 2);
    assert_eq!(filter_records(&records, "   ").len(), 2);
  }

  #[test]
  fn test_query_is_trimmed() {
    let records = vec![record("Alice"), record("bob")];
    assert_eq!(names(&filter_records(&records, "  alice ")), vec!["Alice"]);
  }

  #[test]
  fn test_no_match_yields_empty() {
    let records = vec![record("Alice")];
    assert!(filter_records(&records, "zzz").is_empty());
  }

  #[test]
  fn test_debouncer_waits_for_quiet_period() {
    let mut debouncer = Debouncer::new();
    let t0 = Instant::now();

    debouncer.note_input(t0);
    assert!(!debouncer.fire(t0 + Duration::from_millis(100)));
    assert!(debouncer.fire(t0 + DEBOUNCE_QUIET));
    // Fires only once per armed deadline
    assert!(!debouncer.fire(t0 + Duration::from_secs(10)));
  }

  #[test]
  fn test_new_input_replaces_pending_deadline() {
    let mut debouncer = Debouncer::new();
    let t0 = Instant::now();

    debouncer.note_input(t0);
    debouncer.note_input(t0 + Duration::from_millis(200));

    // The first deadline (t0 + 250ms) was replaced, so nothing fires yet
    assert!(!debouncer.fire(t0 + Duration::from_millis(300)));
    assert!(debouncer.fire(t0 + Duration::from_millis(450)));
  }

  #[test]
  fn test_cancel_disarms() {
    let mut debouncer = Debouncer::new();
    let t0 = Instant::now();

    debouncer.note_input(t0);
    debouncer.cancel();
    assert!(!debouncer.fire(t0 + Duration::from_secs(1)));
  }

  #[test]
  fn test_idle_debouncer_never_fires() {
    let mut debouncer = Debouncer::new();
    assert!(!debouncer.fire(Instant::now()));
  }
}
