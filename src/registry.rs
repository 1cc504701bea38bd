//! Push-derived model of which workspaces each monitor has shown.
//!
//! The registry is filled exclusively from the event stream.  It maps a
//! monitor name to the set of workspace names seen on it, and remembers
//! the most recently added workspace.
//!
//! Workspaces are kept in **insertion order**, so the position reported
//! for a workspace is stable across calls: it is its 1-based index among
//! the workspaces the daemon has seen on that monitor, oldest first.
//! Removing a workspace shifts the ones after it down by one.

use indexmap::{IndexMap, IndexSet};
use parking_lot::RwLock;
use std::fmt;

/// A 1-based ordinal within a sequence, rendered as `"i/N"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub index: usize,
    pub total: usize,
}

impl Position {
    /// The answer for unknown state: treat it as the only workspace.
    pub const SINGLETON: Position = Position { index: 1, total: 1 };

    pub fn new(index: usize, total: usize) -> Self {
        Self { index, total }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.index, self.total)
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    monitors: IndexMap<String, IndexSet<String>>,
    current: Option<String>,
}

/// Thread-safe monitor → workspaces store.
///
/// Writers (`add_workspace`, `remove_workspace`) take the lock exclusively;
/// readers share it.  Nothing blocks on I/O while holding the lock.
#[derive(Debug, Default)]
pub struct WorkspaceRegistry {
    state: RwLock<RegistryState>,
}

impl WorkspaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `workspace` on `monitor` and make it the current workspace.
    ///
    /// Re-adding a known workspace keeps its original position.
    pub fn add_workspace(&self, monitor: &str, workspace: &str) {
        let mut state = self.state.write();
        state
            .monitors
            .entry(monitor.to_string())
            .or_default()
            .insert(workspace.to_string());
        state.current = Some(workspace.to_string());
    }

    /// Forget `workspace` on `monitor`.  Unknown names are ignored.
    pub fn remove_workspace(&self, monitor: &str, workspace: &str) {
        let mut state = self.state.write();
        if let Some(set) = state.monitors.get_mut(monitor) {
            set.shift_remove(workspace);
        }
    }

    /// Position of `workspace` among the workspaces known on `monitor`.
    ///
    /// Returns [`Position::SINGLETON`] when either is unknown.
    pub fn position(&self, monitor: &str, workspace: &str) -> Position {
        let state = self.state.read();
        state
            .monitors
            .get(monitor)
            .and_then(|set| {
                set.get_index_of(workspace)
                    .map(|i| Position::new(i + 1, set.len()))
            })
            .unwrap_or(Position::SINGLETON)
    }

    /// The most recently added workspace, if any.
    pub fn current_workspace(&self) -> Option<String> {
        self.state.read().current.clone()
    }

    /// Number of workspaces known on `monitor` (0 if unknown).
    pub fn workspace_count(&self, monitor: &str) -> usize {
        self.state
            .read()
            .monitors
            .get(monitor)
            .map_or(0, IndexSet::len)
    }
}
