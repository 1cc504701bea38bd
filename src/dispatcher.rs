//! Reacts to workspace and monitor events.
//!
//! The [`Dispatcher`] is the single [`EventSink`] of the daemon.  For every
//! event it updates the [`WorkspaceRegistry`], optionally consults a
//! snapshot, and sends one notification.  Nothing that goes wrong inside a
//! handler stops the dispatcher: failures are logged and the next event is
//! processed as usual.

use crate::config::FocusTracking;
use crate::event::{Event, MonitorDescriptor, Record, WorkspaceDescriptor};
use crate::registry::{Position, WorkspaceRegistry};
use crate::snapshot::{SnapshotError, SnapshotFetcher, WorkspaceLookup};
use crate::traits::{EventSink, Notifier, QueryRunner};
use log::{debug, info, warn};
use std::sync::mpsc;
use std::sync::Arc;

/// Registry key for workspace events, which do not name a monitor.
pub const CURRENT_MONITOR: &str = "current";

/// Turns events into registry updates and notifications.
pub struct Dispatcher<Q, N> {
    registry: Arc<WorkspaceRegistry>,
    snapshots: SnapshotFetcher<Q>,
    notifier: N,
    focus_tracking: FocusTracking,
    /// Last monitor reported as focused (snapshot tracking only).
    current_monitor: Option<String>,
}

impl<Q: QueryRunner, N: Notifier> Dispatcher<Q, N> {
    pub fn new(
        registry: Arc<WorkspaceRegistry>,
        snapshots: SnapshotFetcher<Q>,
        notifier: N,
        focus_tracking: FocusTracking,
    ) -> Self {
        Self {
            registry,
            snapshots,
            notifier,
            focus_tracking,
            current_monitor: None,
        }
    }

    pub fn current_monitor(&self) -> Option<&str> {
        self.current_monitor.as_deref()
    }

    /// Seed the current monitor from the control surface.
    ///
    /// Only meaningful with [`FocusTracking::Snapshot`]; a no-op otherwise.
    pub fn prime(&mut self) {
        if self.focus_tracking != FocusTracking::Snapshot {
            return;
        }
        match self.snapshots.current_active_monitor() {
            Ok(monitor) => {
                match self.snapshots.current_workspace_info(&monitor) {
                    Ok(info) => info!("active monitor {} ({})", monitor, info),
                    Err(e) => warn!("cannot read workspaces of {}: {}", monitor, e),
                }
                self.current_monitor = Some(monitor);
            }
            Err(e) => warn!("cannot determine active monitor: {}", e),
        }
    }

    //  Handlers

    fn workspace_switched(&self, ws: &WorkspaceDescriptor) {
        self.registry.add_workspace(CURRENT_MONITOR, &ws.name);
        let position = self.registry.position(CURRENT_MONITOR, &ws.name);
        self.notify(
            "Workspace Changed",
            &format!("Switched to workspace {} ({})", ws.name, position),
        );
    }

    fn workspace_created(&self, ws: &WorkspaceDescriptor) {
        self.registry.add_workspace(CURRENT_MONITOR, &ws.name);
        let position = self.registry.position(CURRENT_MONITOR, &ws.name);
        self.notify(
            "New Workspace",
            &format!("Created workspace {} ({})", ws.name, position),
        );
    }

    fn workspace_destroyed(&self, ws: &WorkspaceDescriptor) {
        self.registry.remove_workspace(CURRENT_MONITOR, &ws.name);
        self.notify(
            "Workspace Destroyed",
            &format!("Destroyed workspace {}", ws.name),
        );
    }

    fn monitor_focused(&mut self, mon: &MonitorDescriptor) {
        if mon.is_empty() {
            debug!("ignoring focusedmon without monitor");
            return;
        }
        match self.focus_tracking {
            FocusTracking::Registry => {
                self.registry
                    .add_workspace(&mon.monitor_name, &mon.workspace_name);
                let position = self
                    .registry
                    .position(&mon.monitor_name, &mon.workspace_name);
                self.notify(
                    "Monitor Focused",
                    &format!("Focused monitor {} ({})", mon.monitor_name, position),
                );
            }
            FocusTracking::Snapshot => self.monitor_focused_from_snapshot(mon),
        }
    }

    fn monitor_focused_from_snapshot(&mut self, mon: &MonitorDescriptor) {
        self.current_monitor = Some(mon.monitor_name.clone());
        let detail = match self
            .snapshots
            .workspace_position(&mon.monitor_name, &mon.workspace_name)
        {
            Ok(WorkspaceLookup::Listed(position)) => position.to_string(),
            // The event can arrive before the snapshot lists the workspace.
            Ok(WorkspaceLookup::Pending(position)) => format!("created empty, {}", position),
            Err(SnapshotError::MonitorNotFound(_)) => {
                debug!("monitor {} not in snapshot", mon.monitor_name);
                Position::SINGLETON.to_string()
            }
            Err(e) => {
                warn!("snapshot query failed: {}", e);
                return;
            }
        };
        self.notify(
            "Monitor Focused",
            &format!(
                "Focused monitor {}, workspace {} ({})",
                mon.monitor_name, mon.workspace_name, detail
            ),
        );
    }

    fn notify(&self, title: &str, body: &str) {
        info!("{}: {}", title, body);
        if let Err(e) = self.notifier.notify(title, body) {
            warn!("failed to send notification: {}", e);
        }
    }
}

impl<Q: QueryRunner, N: Notifier> EventSink for Dispatcher<Q, N> {
    fn handle(&mut self, event: Event) {
        debug!("handling {:?}", event);
        match event {
            Event::WorkspaceSwitched(ws) => self.workspace_switched(&ws),
            Event::WorkspaceCreated(ws) => self.workspace_created(&ws),
            Event::WorkspaceDestroyed(ws) => self.workspace_destroyed(&ws),
            Event::MonitorFocused(mon) => self.monitor_focused(&mon),
        }
    }
}

/// Feed every record from `records` to `sink`, in delivery order, until the
/// channel closes.
pub fn run<S: EventSink>(sink: &mut S, records: &mpsc::Receiver<Record>) {
    for record in records {
        if let Some(event) = Event::from_record(&record) {
            sink.handle(event);
        }
    }
}

//  Tests
