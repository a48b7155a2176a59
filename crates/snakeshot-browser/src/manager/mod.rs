//! Browser instance manager.
//!
//! Launches Chrome with its own debugging port and profile directory, or
//! attaches to one already listening there, and guarantees teardown.

mod manager_core;
mod manager_types;

pub use manager_core::BrowserManager;
pub use manager_types::{BrowserError, BrowserManagerConfig};

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
