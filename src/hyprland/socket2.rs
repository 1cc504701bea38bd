//! [`EventSource`] backed by Hyprland's event socket.
//!
//! Hyprland publishes state changes on `socket2` at
//! `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket2.sock`,
//! one `EVENT>>DATA\n` line per event.
//!
//! [`Socket2Listener`] opens exactly one connection and forwards every
//! parsable line as a [`Record`].  It never reconnects: a failed connect, a
//! read error, or the socket closing ends the listener with an error, and
//! the host process is expected to exit.

use crate::event::{parse_record, Record};
use crate::traits::EventSource;
use log::{debug, info, warn};
use std::io::{BufRead, BufReader};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

/// Errors that end a [`Socket2Listener`].
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("{0} not set")]
    Environment(&'static str),
    #[error("failed to connect to {}: {source}", .path.display())]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error reading from socket: {0}")]
    Read(#[from] std::io::Error),
    #[error("event socket closed")]
    Closed,
}

/// Resolve the Hyprland event socket path from the environment.
pub fn socket2_path() -> Result<PathBuf, ListenerError> {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR")
        .map_err(|_| ListenerError::Environment("XDG_RUNTIME_DIR"))?;
    let his = std::env::var("HYPRLAND_INSTANCE_SIGNATURE")
        .map_err(|_| ListenerError::Environment("HYPRLAND_INSTANCE_SIGNATURE"))?;
    Ok(PathBuf::from(format!(
        "{}/hypr/{}/.socket2.sock",
        runtime_dir, his
    )))
}

/// Pump lines from `reader` into `sink` until end of input.
///
/// Lines that do not parse are skipped.  Invalid UTF-8 is replaced rather
/// than rejected, so a stray byte in a window title only affects its own
/// line.  Returns `Ok(())` early when `cancel` is raised or the sink hangs
/// up; returns [`ListenerError::Closed`] at end of input.
pub fn read_records<R: BufRead>(
    mut reader: R,
    sink: &mpsc::Sender<Record>,
    cancel: &AtomicBool,
) -> Result<(), ListenerError> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        if cancel.load(Ordering::Relaxed) {
            info!("listener cancelled");
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        debug!("received event: {}", line.trim_end());
        let Some(record) = parse_record(&line) else {
            continue;
        };
        if sink.send(record).is_err() {
            info!("sink closed, shutting down");
            return Ok(());
        }
    }
    warn!("event socket stream ended");
    Err(ListenerError::Closed)
}

/// Streams records from one socket2 connection.
pub struct Socket2Listener {
    path: PathBuf,
    cancel: Arc<AtomicBool>,
}

impl Socket2Listener {
    /// Listen on an explicit socket path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Listen on the socket of the running Hyprland instance.
    pub fn from_env() -> Result<Self, ListenerError> {
        Ok(Self::new(socket2_path()?))
    }

    /// A flag that stops the listener before the next line is handled.
    ///
    /// A read that is already blocked only returns once the socket delivers
    /// a line or closes.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }
}

impl EventSource for Socket2Listener {
    type Error = ListenerError;

    /// Connect and forward records until the stream ends.
    ///
    /// This method **blocks**.  Run it on a dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<Record>) -> Result<(), Self::Error> {
        info!("connecting to event socket: {}", self.path.display());
        let stream = UnixStream::connect(&self.path).map_err(|source| ListenerError::Connect {
            path: self.path.clone(),
            source,
        })?;
        info!("connected to event socket, listening for events");
        read_records(BufReader::new(stream), &sink, &self.cancel)
    }
}

/// Run `source` on a background thread.
///
/// Records arrive on the first receiver.  If the source fails, its error is
/// delivered once on the second receiver and the record channel closes.
pub fn listen<S>(mut source: S) -> (mpsc::Receiver<Record>, mpsc::Receiver<S::Error>)
where
    S: EventSource + 'static,
{
    let (record_tx, record_rx) = mpsc::channel();
    let (error_tx, error_rx) = mpsc::channel();
    std::thread::spawn(move || {
        if let Err(e) = source.run(record_tx) {
            let _ = error_tx.send(e);
        }
    });
    (record_rx, error_rx)
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use std::os::unix::net::UnixListener;
    use std::sync::atomic::AtomicU32;
    use std::time::Duration;

    /// Monotonic counter to generate unique socket paths per test.
    static TEST_ID: AtomicU32 = AtomicU32::new(0);

    /// Helper: create a unique temporary socket path for each test.
    fn tmp_socket_path() -> PathBuf {
        let id = TEST_ID.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!("gypr-test-{}-{}.sock", std::process::id(), id))
    }

    #[test]
    fn pump_skips_malformed_lines() {
        let input = Cursor::new("workspacev2>>1,one\nnot an event\n\nfocusedmon>>DP-1,1\n");
        let (tx, rx) = mpsc::channel();
        let cancel = AtomicBool::new(false);
        let result = read_records(input, &tx, &cancel);
        assert!(matches!(result, Err(ListenerError::Closed)));

        let records: Vec<Record> = rx.try_iter().collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], Record::new("workspacev2", "1,one"));
        assert_eq!(records[1], Record::new("focusedmon", "DP-1,1"));
    }

    #[test]
    fn invalid_utf8_line_does_not_end_the_stream() {
        let input = Cursor::new(&b"activewindow>>kitty,caf\xe9\nworkspacev2>>3,term\n"[..]);
        let (tx, rx) = mpsc::channel();
        let cancel = AtomicBool::new(false);
        let result = read_records(input, &tx, &cancel);
        assert!(matches!(result, Err(ListenerError::Closed)));

        let records: Vec<Record> = rx.try_iter().collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, "activewindow");
        assert_eq!(records[0].payload, "kitty,caf\u{fffd}");
        assert_eq!(records[1], Record::new("workspacev2", "3,term"));
    }

    #[test]
    fn last_line_without_newline_is_delivered() {
        let input = Cursor::new("focusedmon>>DP-1,1");
        let (tx, rx) = mpsc::channel();
        let cancel = AtomicBool::new(false);
        let _ = read_records(input, &tx, &cancel);
        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn pump_stops_when_cancelled() {
        let input = Cursor::new("workspacev2>>1,one\nworkspacev2>>2,two\n");
        let (tx, rx) = mpsc::channel();
        let cancel = AtomicBool::new(true);
        assert!(read_records(input, &tx, &cancel).is_ok());
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn pump_stops_when_sink_hangs_up() {
        let input = Cursor::new("workspacev2>>1,one\n");
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let cancel = AtomicBool::new(false);
        assert!(read_records(input, &tx, &cancel).is_ok());
    }

    #[test]
    fn cancelled_listener_returns_ok_after_next_line() {
        let path = tmp_socket_path();
        let server = UnixListener::bind(&path).expect("bind");

        let listener = Socket2Listener::new(&path);
        listener.cancel_handle().store(true, Ordering::SeqCst);
        let (records, errors) = listen(listener);

        {
            let (mut conn, _) = server.accept().expect("accept");
            writeln!(conn, "workspacev2>>1,one").unwrap();
        }

        assert_eq!(records.iter().count(), 0);
        assert!(errors.recv_timeout(Duration::from_millis(200)).is_err());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn connect_failure_is_reported() {
        let path = tmp_socket_path();
        let mut listener = Socket2Listener::new(&path);
        let (tx, _rx) = mpsc::channel();
        let err = listener.run(tx).unwrap_err();
        assert!(matches!(err, ListenerError::Connect { .. }));
    }

    #[test]
    fn records_stream_over_socket_then_close_is_reported_once() {
        let path = tmp_socket_path();
        let server = UnixListener::bind(&path).expect("bind");

        let (records, errors) = listen(Socket2Listener::new(&path));

        {
            let (mut conn, _) = server.accept().expect("accept");
            writeln!(conn, "workspacev2>>3,term").unwrap();
            writeln!(conn, "openwindow>>abc,2,kitty,kitty").unwrap();
            writeln!(conn, "bogus line").unwrap();
        }

        let received: Vec<Record> = records.iter().collect();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0], Record::new("workspacev2", "3,term"));
        assert_eq!(received[1].kind, "openwindow");

        let err = errors.recv_timeout(Duration::from_secs(2)).expect("error");
        assert!(matches!(err, ListenerError::Closed));
        assert!(errors.recv_timeout(Duration::from_millis(50)).is_err());

        let _ = std::fs::remove_file(&path);
    }
}
