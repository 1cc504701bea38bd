//! Hyprland-specific implementations.
//!
//! This module provides the concrete backends for the
//! [`EventSource`](crate::traits::EventSource),
//! [`QueryRunner`](crate::traits::QueryRunner) and
//! [`Notifier`](crate::traits::Notifier) traits.
//!
//! Nothing outside this module should reference Hyprland's sockets or
//! binaries directly.

pub mod hyprctl;
pub mod notify;
pub mod socket2;
