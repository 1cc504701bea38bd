//! Entry point for the **gypr** daemon.
//!
//! Connects to Hyprland's event socket on a background thread and handles
//! events on the main thread until the socket fails or closes.
//!
//! `gypr --status` prints the active monitor and its workspace info once and
//! exits.

use gypr::config::Config;
use gypr::dispatcher::{self, Dispatcher};
use gypr::hyprland::hyprctl::Hyprctl;
use gypr::hyprland::notify::NotifySend;
use gypr::hyprland::socket2::{self, Socket2Listener};
use gypr::registry::WorkspaceRegistry;
use gypr::snapshot::SnapshotFetcher;
use log::{error, info, warn};
use std::sync::Arc;

/// Config from [`Config::default_path`], or defaults when it is absent or
/// unusable.
fn load_config() -> Config {
    let path = Config::default_path();
    match Config::load(&path) {
        Ok(Some(cfg)) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Ok(None) => {
            info!("no config at {}, using defaults", path.display());
            Config::default()
        }
        Err(e) => {
            warn!("{}; using defaults", e);
            Config::default()
        }
    }
}

//  Main

fn main() {
    env_logger::init();

    let config = load_config();
    let status_only = std::env::args().any(|a| a == "--status");

    if status_only {
        print_status(&config);
    } else {
        run_daemon(config);
    }
}

/// One-shot mode: print `<monitor> <i/N>`.
fn print_status(config: &Config) {
    let snapshots =
        SnapshotFetcher::new(Hyprctl::new(&config.hyprctl.program), config.hyprctl.format);
    let result = snapshots.current_active_monitor().and_then(|monitor| {
        let info = snapshots.current_workspace_info(&monitor)?;
        Ok((monitor, info))
    });
    match result {
        Ok((monitor, info)) => println!("{} {}", monitor, info),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Normal daemon mode.
fn run_daemon(config: Config) {
    let listener = match Socket2Listener::from_env() {
        Ok(l) => l,
        Err(e) => {
            error!("cannot locate event socket: {}", e);
            std::process::exit(1);
        }
    };

    let registry = Arc::new(WorkspaceRegistry::new());
    let mut handler = Dispatcher::new(
        Arc::clone(&registry),
        SnapshotFetcher::new(Hyprctl::new(&config.hyprctl.program), config.hyprctl.format),
        NotifySend::new(config.notifications.clone()),
        config.focus_tracking,
    );
    handler.prime();

    let (records, errors) = socket2::listen(listener);
    info!("gypr running");
    dispatcher::run(&mut handler, &records);

    match errors.recv() {
        Ok(e) => {
            error!("event listener stopped: {}", e);
            std::process::exit(1);
        }
        Err(_) => info!("event listener finished, exiting"),
    }
}
