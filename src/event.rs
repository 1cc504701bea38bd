//! Event records and payload descriptors.
//!
//! Hyprland's event socket (`socket2`) emits one event per line in the form
//! `EVENT>>DATA\n`.  This module turns such a line into a [`Record`], and a
//! record of a kind gypr cares about into a typed [`Event`].
//!
//! | Event                | Payload                  | Variant                       |
//! |----------------------|--------------------------|-------------------------------|
//! | `workspacev2`        | `<id>,<name>`            | [`Event::WorkspaceSwitched`]  |
//! | `createworkspacev2`  | `<id>,<name>`            | [`Event::WorkspaceCreated`]   |
//! | `destroyworkspacev2` | `<id>,<name>`            | [`Event::WorkspaceDestroyed`] |
//! | `focusedmon`         | `<monitor>,<workspace>`  | [`Event::MonitorFocused`]     |
//!
//! Hyprland sends the v1 form (`workspace>>name`) of each workspace event
//! alongside the v2 form, so only one form per kind is mapped.
//!
//! Parsing never fails loudly: a line without the delimiter is dropped and a
//! malformed payload degrades to a fallback descriptor.

/// Separator between the event kind and its payload.
const DELIMITER: &str = ">>";

/// One raw event line, split into kind and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub kind: String,
    pub payload: String,
}

impl Record {
    pub fn new(kind: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: payload.into(),
        }
    }
}

/// Parse a single event line.
///
/// Splits on the first `>>`; everything after it (including further `>>`)
/// is payload.  Returns `None` for lines without the delimiter.
pub fn parse_record(line: &str) -> Option<Record> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (kind, payload) = line.split_once(DELIMITER)?;
    Some(Record::new(kind, payload))
}

/// A workspace as named in a `*workspacev2` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceDescriptor {
    pub id: String,
    pub name: String,
}

impl WorkspaceDescriptor {
    /// Decode `"<id>,<name>"`.
    ///
    /// Without a comma the whole payload is used as both id and name.
    pub fn parse(payload: &str) -> Self {
        match payload.split_once(',') {
            Some((id, name)) => Self {
                id: id.to_string(),
                name: name.to_string(),
            },
            None => Self {
                id: payload.to_string(),
                name: payload.to_string(),
            },
        }
    }
}

/// A monitor and the workspace it shows, from a `focusedmon` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorDescriptor {
    pub monitor_name: String,
    pub workspace_name: String,
}

impl MonitorDescriptor {
    /// Decode `"<monitor>,<workspace>"`.
    ///
    /// Anything but exactly one comma yields the zero descriptor.
    pub fn parse(payload: &str) -> Self {
        match payload.split_once(',') {
            Some((monitor, workspace)) if !workspace.contains(',') => Self {
                monitor_name: monitor.to_string(),
                workspace_name: workspace.to_string(),
            },
            _ => Self::default(),
        }
    }

    /// `true` for the descriptor produced by a malformed payload.
    pub fn is_empty(&self) -> bool {
        self.monitor_name.is_empty() && self.workspace_name.is_empty()
    }
}

/// The event kinds gypr reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    WorkspaceSwitched(WorkspaceDescriptor),
    WorkspaceCreated(WorkspaceDescriptor),
    WorkspaceDestroyed(WorkspaceDescriptor),
    MonitorFocused(MonitorDescriptor),
}

impl Event {
    /// Decode a record into a typed event, or `None` for kinds gypr ignores.
    pub fn from_record(record: &Record) -> Option<Self> {
        let payload = record.payload.as_str();
        let event = match record.kind.as_str() {
            "workspacev2" => Event::WorkspaceSwitched(WorkspaceDescriptor::parse(payload)),
            "createworkspacev2" => Event::WorkspaceCreated(WorkspaceDescriptor::parse(payload)),
            "destroyworkspacev2" => Event::WorkspaceDestroyed(WorkspaceDescriptor::parse(payload)),
            "focusedmon" => Event::MonitorFocused(MonitorDescriptor::parse(payload)),
            _ => return None,
        };
        Some(event)
    }
}
