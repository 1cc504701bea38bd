//! Pull-based view of monitors and workspaces, queried from the control
//! surface.
//!
//! Unlike the [`WorkspaceRegistry`](crate::registry::WorkspaceRegistry),
//! a snapshot is authoritative: it is rebuilt from scratch on every fetch
//! and never merged with push-derived state.
//!
//! `hyprctl workspaces` prints one block per workspace:
//!
//! ```text
//! workspace ID 1 (1) on monitor DP-1:
//!     monitorID: 0
//!     windows: 2
//!     hasfullscreen: 0
//!     lastwindow: 0x55d1c2a0
//!     lastwindowtitle: kitty
//! ```
//!
//! `hyprctl -j workspaces` prints the same data as a JSON array.

use crate::registry::Position;
use crate::traits::QueryRunner;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A workspace as reported by the control surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workspace {
    pub id: i64,
    pub name: String,
    pub monitor: String,
    pub monitor_id: i64,
    pub window_count: u32,
    pub has_fullscreen: bool,
    pub last_window: String,
    pub last_window_title: String,
}

/// A monitor and its workspaces, in the order the control surface listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Monitor {
    pub name: String,
    pub id: i64,
    pub workspaces: Vec<Workspace>,
}

/// Output format requested from the workspaces query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryFormat {
    #[default]
    Text,
    Json,
}

/// Where a workspace sits in the current snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceLookup {
    /// The workspace is listed on its monitor.
    Listed(Position),
    /// The monitor is listed but the workspace is not (yet).  It was just
    /// created and has no windows, so it is counted as the next one.
    Pending(Position),
}

/// Errors from querying or interpreting a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("query failed: {0}")]
    Query(String),
    #[error("cannot decode query output: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("monitor {0} not found")]
    MonitorNotFound(String),
    #[error("no active monitor in query output")]
    NoActiveMonitor,
}

//  Parsing

/// Header line that opens a workspace block.
const HEADER_PREFIX: &str = "workspace ID ";

/// Marker preceding the monitor name in `activeworkspace` output.
const MONITOR_MARKER: &str = "on monitor ";

/// Parse `workspace ID <id> (<name>) on monitor <monitor>:`.
fn parse_header(line: &str) -> Option<(i64, String, String)> {
    let rest = line.strip_prefix(HEADER_PREFIX)?;
    let (id, rest) = rest.split_once(" (")?;
    let (name, monitor) = rest.rsplit_once(") on monitor ")?;
    Some((
        id.trim().parse().unwrap_or(0),
        name.to_string(),
        monitor.trim_end_matches(':').to_string(),
    ))
}

/// Parse the text output of `hyprctl workspaces`.
///
/// A header opens a record, `key: value` lines fill it in, and
/// `lastwindowtitle` closes it.  Key/value lines outside a record and
/// unknown keys are ignored.  Numbers that fail to parse read as `0`.
pub fn parse_workspaces_text(output: &str) -> Vec<Monitor> {
    let mut monitors: IndexMap<String, Monitor> = IndexMap::new();
    let mut open: Option<Workspace> = None;

    for line in output.lines() {
        let line = line.trim();
        if line.starts_with(HEADER_PREFIX) {
            open = parse_header(line).map(|(id, name, monitor)| {
                monitors.entry(monitor.clone()).or_insert_with(|| Monitor {
                    name: monitor.clone(),
                    ..Monitor::default()
                });
                Workspace {
                    id,
                    name,
                    monitor,
                    ..Workspace::default()
                }
            });
            continue;
        }

        let Some(ws) = open.as_mut() else { continue };
        let Some((key, value)) = line.split_once(':') else { continue };
        let value = value.trim();

        match key.trim() {
            "monitorID" => {
                ws.monitor_id = value.parse().unwrap_or(0);
                if let Some(mon) = monitors.get_mut(&ws.monitor) {
                    mon.id = ws.monitor_id;
                }
            }
            "windows" => ws.window_count = value.parse().unwrap_or(0),
            "hasfullscreen" => ws.has_fullscreen = value != "0",
            "lastwindow" => ws.last_window = value.to_string(),
            "lastwindowtitle" => {
                ws.last_window_title = value.to_string();
                if let Some(done) = open.take() {
                    if let Some(mon) = monitors.get_mut(&done.monitor) {
                        mon.workspaces.push(done);
                    }
                }
            }
            _ => {}
        }
    }

    monitors.into_values().collect()
}

/// Subset of the JSON object returned by `j/workspaces`.
#[derive(Deserialize)]
struct WorkspaceJson {
    id: i64,
    name: String,
    monitor: String,
    #[serde(rename = "monitorID", default)]
    monitor_id: Option<i64>,
    windows: u32,
    hasfullscreen: bool,
    #[serde(default)]
    lastwindow: String,
    #[serde(default)]
    lastwindowtitle: String,
}

/// Parse the JSON output of `hyprctl -j workspaces`, grouping by monitor
/// in encounter order.
pub fn parse_workspaces_json(output: &str) -> Result<Vec<Monitor>, SnapshotError> {
    let raw: Vec<WorkspaceJson> = serde_json::from_str(output)?;
    let mut monitors: IndexMap<String, Monitor> = IndexMap::new();
    for w in raw {
        let monitor_id = w.monitor_id.unwrap_or(0);
        let mon = monitors.entry(w.monitor.clone()).or_insert_with(|| Monitor {
            name: w.monitor.clone(),
            id: monitor_id,
            workspaces: Vec::new(),
        });
        mon.workspaces.push(Workspace {
            id: w.id,
            name: w.name,
            monitor: w.monitor,
            monitor_id,
            window_count: w.windows,
            has_fullscreen: w.hasfullscreen,
            last_window: w.lastwindow,
            last_window_title: w.lastwindowtitle,
        });
    }
    Ok(monitors.into_values().collect())
}

/// Extract the monitor name from `hyprctl activeworkspace` output.
pub fn parse_active_monitor(output: &str) -> Result<String, SnapshotError> {
    output
        .lines()
        .find_map(|line| {
            let (_, rest) = line.rsplit_once(MONITOR_MARKER)?;
            let name = rest.trim().trim_end_matches(':');
            (!name.is_empty()).then(|| name.to_string())
        })
        .ok_or(SnapshotError::NoActiveMonitor)
}

fn find_monitor<'a>(monitors: &'a [Monitor], name: &str) -> Result<&'a Monitor, SnapshotError> {
    monitors
        .iter()
        .find(|m| m.name == name)
        .ok_or_else(|| SnapshotError::MonitorNotFound(name.to_string()))
}

/// `i/N` where `i` is the first workspace on `monitor` that has windows
/// (`0` if none does) and `N` is the monitor's workspace count.
pub fn workspace_info(monitors: &[Monitor], monitor: &str) -> Result<Position, SnapshotError> {
    let mon = find_monitor(monitors, monitor)?;
    let active = mon
        .workspaces
        .iter()
        .position(|w| w.window_count > 0)
        .map_or(0, |i| i + 1);
    Ok(Position::new(active, mon.workspaces.len()))
}

/// Locate `workspace` by name on `monitor`.
pub fn lookup_workspace(
    monitors: &[Monitor],
    monitor: &str,
    workspace: &str,
) -> Result<WorkspaceLookup, SnapshotError> {
    let mon = find_monitor(monitors, monitor)?;
    let total = mon.workspaces.len();
    Ok(match mon.workspaces.iter().position(|w| w.name == workspace) {
        Some(i) => WorkspaceLookup::Listed(Position::new(i + 1, total)),
        None => WorkspaceLookup::Pending(Position::new(total + 1, total + 1)),
    })
}

//  Fetcher

/// Queries the control surface through a [`QueryRunner`].
///
/// Every call runs a fresh query; nothing is cached.
pub struct SnapshotFetcher<Q> {
    runner: Q,
    format: QueryFormat,
}

impl<Q: QueryRunner> SnapshotFetcher<Q> {
    pub fn new(runner: Q, format: QueryFormat) -> Self {
        Self { runner, format }
    }

    fn query(&self, args: &[&str]) -> Result<String, SnapshotError> {
        self.runner
            .run_query(args)
            .map_err(|e| SnapshotError::Query(e.to_string()))
    }

    /// Fetch all monitors with their workspaces.
    pub fn fetch_monitors_and_workspaces(&self) -> Result<Vec<Monitor>, SnapshotError> {
        match self.format {
            QueryFormat::Text => Ok(parse_workspaces_text(&self.query(&["workspaces"])?)),
            QueryFormat::Json => parse_workspaces_json(&self.query(&["-j", "workspaces"])?),
        }
    }

    /// See [`workspace_info`].
    pub fn current_workspace_info(&self, monitor: &str) -> Result<Position, SnapshotError> {
        workspace_info(&self.fetch_monitors_and_workspaces()?, monitor)
    }

    /// Name of the monitor holding the active workspace.
    pub fn current_active_monitor(&self) -> Result<String, SnapshotError> {
        parse_active_monitor(&self.query(&["activeworkspace"])?)
    }

    /// See [`lookup_workspace`].
    pub fn workspace_position(
        &self,
        monitor: &str,
        workspace: &str,
    ) -> Result<WorkspaceLookup, SnapshotError> {
        lookup_workspace(&self.fetch_monitors_and_workspaces()?, monitor, workspace)
    }
}
