//! Shell variable store
//!
//! A name → value map with last-write-wins upserts, seeded at startup with
//! the special parameters the expansion engine reads back: `#` (positional
//! count), `?` (last exit status), `UID` and `$` (shell pid).

use indexmap::IndexMap;
use nix::unistd::{getpid, getuid};

pub struct VariableStore {
    vars: IndexMap<String, String>,
}

impl VariableStore {
    pub fn new() -> Self {
        let mut store = Self {
            vars: IndexMap::new(),
        };
        store.set("#", "0");
        store.set("?", "0");
        store.set("UID", getuid().as_raw().to_string());
        store.set("$", getpid().as_raw().to_string());
        store
    }

    /// Upsert. The previous value, if any, is replaced.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn unset(&mut self, name: &str) {
        self.vars.shift_remove(name);
    }

    /// Record a command status in `?` as decimal text.
    pub fn set_status(&mut self, status: i32) {
        self.set("?", status.to_string());
    }

    /// The last recorded status, 0 when `?` was unset or mangled.
    pub fn last_status(&self) -> i32 {
        self.get("?").and_then(|s| s.parse().ok()).unwrap_or(0)
    }
}

impl Default for VariableStore {
    fn default() -> Self {
        Self::new()
    }
}
