//! Core traits that decouple gypr from the processes and sockets it talks to.
//!
//! The [`Dispatcher`](crate::dispatcher::Dispatcher) only depends on these
//! abstractions, so the whole event pipeline can be driven by in-memory
//! doubles in tests.

use crate::event::{Event, Record};
use std::sync::mpsc;

/// A source of raw event [`Record`]s.
///
/// Implementations listen on some transport (Hyprland's socket2, a test
/// fixture, …) and forward every parsed record into the provided
/// [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](EventSource::run) **blocks** until the source is exhausted,
///   cancelled, or fails.
/// * Each parsed record is sent through `sink` exactly once, in the order
///   it was read.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait EventSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start reading and forward every [`Record`] into `sink`.
    fn run(&mut self, sink: mpsc::Sender<Record>) -> Result<(), Self::Error>;
}

/// Something that reacts to typed [`Event`]s.
///
/// There is one variant per event kind; a sink never fails from the
/// caller's point of view.  Whatever goes wrong inside a handler is the
/// sink's own business to log.
pub trait EventSink {
    fn handle(&mut self, event: Event);
}

/// The window manager's query interface (`hyprctl` on Hyprland).
pub trait QueryRunner {
    /// The error type produced by this runner.
    type Error: std::error::Error + Send + 'static;

    /// Run a query with `args` and return its standard output.
    fn run_query(&self, args: &[&str]) -> Result<String, Self::Error>;
}

/// A fire-and-forget user notification sink.
pub trait Notifier {
    /// The error type produced by this notifier.
    type Error: std::error::Error + Send + 'static;

    /// Show `title` and `body` to the user.
    fn notify(&self, title: &str, body: &str) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, WorkspaceDescriptor};
    use crate::hyprland::socket2::listen;

    //  Mock EventSource

    /// A test double that emits a fixed sequence of records, then optionally
    /// fails.
    struct MockSource {
        records: Vec<Record>,
        fail: bool,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    impl EventSource for MockSource {
        type Error = MockError;

        fn run(&mut self, sink: mpsc::Sender<Record>) -> Result<(), MockError> {
            for record in self.records.drain(..) {
                let _ = sink.send(record);
            }
            if self.fail {
                Err(MockError)
            } else {
                Ok(())
            }
        }
    }

    fn two_records() -> Vec<Record> {
        vec![
            Record::new("workspacev2", "1,one"),
            Record::new("focusedmon", "DP-1,2"),
        ]
    }

    #[test]
    fn listen_forwards_records_in_order_then_closes() {
        let (records, errors) = listen(MockSource {
            records: two_records(),
            fail: false,
        });
        let received: Vec<Record> = records.iter().collect();
        assert_eq!(received, two_records());
        assert!(errors.recv().is_err());
    }

    #[test]
    fn listen_reports_source_failure_after_its_records() {
        let (records, errors) = listen(MockSource {
            records: two_records(),
            fail: true,
        });
        assert_eq!(records.iter().count(), 2);
        assert!(matches!(errors.recv(), Ok(MockError)));
        assert!(errors.recv().is_err());
    }

    //  Mock EventSink

    #[derive(Default)]
    struct RecordingSink {
        seen: Vec<Event>,
    }

    impl EventSink for RecordingSink {
        fn handle(&mut self, event: Event) {
            self.seen.push(event);
        }
    }

    #[test]
    fn sink_receives_typed_events() {
        let mut sink = RecordingSink::default();
        let record = Record::new("createworkspacev2", "4,mail");
        if let Some(event) = Event::from_record(&record) {
            sink.handle(event);
        }
        assert_eq!(
            sink.seen.as_slice(),
            &[Event::WorkspaceCreated(WorkspaceDescriptor {
                id: "4".into(),
                name: "mail".into(),
            })]
        );
    }
}
