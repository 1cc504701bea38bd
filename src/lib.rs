//! **gypr** — workspace and monitor change notifications for Hyprland.
//!
//! The daemon follows Hyprland's event socket, keeps track of which
//! workspaces each monitor has shown, and pops up a desktop notification
//! whenever the active workspace or monitor changes.
//!
//! # Architecture
//!
//! Events flow one way:
//!
//! ```text
//! socket2 ─▶ EventSource ─▶ Record ─▶ Event ─▶ EventSink (Dispatcher)
//!                                                 ├─▶ WorkspaceRegistry
//!                                                 ├─▶ SnapshotFetcher ─▶ QueryRunner
//!                                                 └─▶ Notifier
//! ```
//!
//! The seams are the traits in [`traits`]; concrete Hyprland backends live
//! in [`hyprland`].  Everything else is plain data and can be tested without
//! a running compositor.

pub mod config;
pub mod dispatcher;
pub mod event;
pub mod hyprland;
pub mod registry;
pub mod snapshot;
pub mod traits;
