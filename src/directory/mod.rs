//! Directory data: domain types, the HTTP client, and load orchestration.

pub mod client;
pub mod error;
pub mod loader;
pub mod types;
