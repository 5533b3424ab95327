//! Driver-station dashboard.
//!
//! The dashboard is a flat table of named numbers shared with the driver station. Robot code
//! publishes values for display and may read back values the drive team edited.

use alloc::{collections::BTreeMap, string::String};

/// A table of named numeric entries.
pub trait Dashboard {
    /// Publishes `value` under `key`, replacing any previous value.
    fn put_number(&mut self, key: &str, value: f64);

    /// Returns the value under `key`, or `default` if nothing has been published there.
    fn get_number(&self, key: &str, default: f64) -> f64;

    /// Returns `true` if a value has been published under `key`.
    fn contains_key(&self, key: &str) -> bool;
}

/// In-memory [`Dashboard`] with no transport.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemoryDashboard {
    entries: BTreeMap<String, f64>,
}

impl MemoryDashboard {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Number of published entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), *value))
    }
}

impl Dashboard for MemoryDashboard {
    fn put_number(&mut self, key: &str, value: f64) {
        self.entries.insert(String::from(key), value);
    }

    fn get_number(&self, key: &str, default: f64) -> f64 {
        self.entries.get(key).copied().unwrap_or(default)
    }

    fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}
