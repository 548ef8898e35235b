//! # Connection Tests
//!
//! Lifecycle scenarios driven through the in-memory transport. Every event
//! the manager reports arrives on a channel, so each test can assert the
//! exact sequence and that nothing extra was reported.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use printlink::connection::{
    self, ConnectionEvent, ConnectionManager, ConnectionState, WriteOutcome,
};
use printlink::error::ErrorKind;
use printlink::ir::{PrintIntent, PrintJob};
use printlink::printer::DialectProfile;
use printlink::transport::{MockBehavior, MockConnector};

use pretty_assertions::assert_eq;

const WAIT: Duration = Duration::from_secs(2);
const QUIET: Duration = Duration::from_millis(150);

fn manager() -> (ConnectionManager<MockConnector>, Receiver<ConnectionEvent>) {
    let (observer, events) = connection::channel();
    let manager = ConnectionManager::new(MockConnector::new(), observer).unwrap();
    (manager, events)
}

fn next_state(events: &Receiver<ConnectionEvent>) -> ConnectionState {
    loop {
        match events.recv_timeout(WAIT).expect("no event") {
            ConnectionEvent::StateChanged(state) => return state,
            ConnectionEvent::DataReceived(_) => continue,
        }
    }
}

fn assert_quiet(events: &Receiver<ConnectionEvent>) {
    assert_eq!(events.recv_timeout(QUIET), Err(RecvTimeoutError::Timeout));
}

fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + WAIT;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn test_connect_then_write() {
    let (manager, events) = manager();

    manager.connect("printer".to_string());
    assert_eq!(next_state(&events), ConnectionState::Connecting);
    assert_eq!(next_state(&events), ConnectionState::Connected);
    assert!(manager.is_connected());

    let outcome = manager.write(&[0x1B, 0x40]).unwrap();
    assert_eq!(outcome, WriteOutcome::Sent { bytes: 2 });

    let handle = manager.connector().handle("printer").unwrap();
    assert_eq!(handle.written(), vec![0x1B, 0x40]);
    assert_eq!(handle.write_count(), 1);
    assert_quiet(&events);
}

#[test]
fn test_encoded_job_written_verbatim() {
    let (manager, events) = manager();
    manager.connect("printer".to_string());
    connection::wait_for_state(&events, ConnectionState::Connected, WAIT).unwrap();

    let mut job = PrintJob::with_init();
    job.push(PrintIntent::text("Total: 12.00"));
    job.push(PrintIntent::NewLine);
    let bytes = job.encode(&DialectProfile::CSN).unwrap();

    assert!(manager.write(&bytes).unwrap().is_sent());
    assert_eq!(manager.connector().handle("printer").unwrap().written(), bytes);
}

#[test]
fn test_superseded_connect_never_reports() {
    let (manager, events) = manager();
    let (release_first, held) = mpsc::channel();
    manager
        .connector()
        .script("first", MockBehavior::Hold(held));

    manager.connect("first".to_string());
    assert_eq!(next_state(&events), ConnectionState::Connecting);
    assert!(wait_until(|| manager.connector().attempts() == 1));

    manager.connect("second".to_string());
    assert_eq!(next_state(&events), ConnectionState::Connected);
    assert_eq!(manager.connector().opened(), vec!["second".to_string()]);

    // The held attempt now succeeds, but nobody wants it any more.
    release_first.send(true).unwrap();
    assert!(wait_until(|| manager.connector().handle("first").is_some()));
    let first = manager.connector().handle("first").unwrap();
    assert!(wait_until(|| !first.is_open()));

    assert_quiet(&events);
    assert_eq!(manager.state(), ConnectionState::Connected);

    manager.write(b"ok").unwrap();
    assert_eq!(first.written(), Vec::<u8>::new());
    assert_eq!(
        manager.connector().handle("second").unwrap().written(),
        b"ok".to_vec()
    );
}

#[test]
fn test_disconnect_cancels_pending_connect() {
    let (manager, events) = manager();
    let (release, held) = mpsc::channel();
    manager.connector().script("slow", MockBehavior::Hold(held));

    manager.connect("slow".to_string());
    assert_eq!(next_state(&events), ConnectionState::Connecting);
    manager.disconnect();
    assert_eq!(next_state(&events), ConnectionState::Disconnected);

    release.send(true).unwrap();
    assert!(wait_until(|| manager.connector().handle("slow").is_some()));
    let handle = manager.connector().handle("slow").unwrap();
    assert!(wait_until(|| !handle.is_open()));
    assert_quiet(&events);
    assert_eq!(manager.state(), ConnectionState::Disconnected);
}

#[test]
fn test_disconnect_when_disconnected_is_silent() {
    let (manager, events) = manager();
    manager.disconnect();
    manager.disconnect();
    assert_quiet(&events);
    assert_eq!(manager.state(), ConnectionState::Disconnected);
}

#[test]
fn test_disconnect_closes_link() {
    let (manager, events) = manager();
    manager.connect("printer".to_string());
    connection::wait_for_state(&events, ConnectionState::Connected, WAIT).unwrap();
    let handle = manager.connector().handle("printer").unwrap();

    manager.disconnect();
    assert_eq!(next_state(&events), ConnectionState::Disconnected);
    assert!(!handle.is_open());
    assert_eq!(manager.write(&[1, 2, 3]).unwrap(), WriteOutcome::Dropped);
}

#[test]
fn test_lost_link_reports_disconnected() {
    let (manager, events) = manager();
    manager.connect("printer".to_string());
    connection::wait_for_state(&events, ConnectionState::Connected, WAIT).unwrap();

    manager.connector().handle("printer").unwrap().sever();
    assert_eq!(next_state(&events), ConnectionState::Disconnected);
    assert_eq!(manager.state(), ConnectionState::Disconnected);
    assert_quiet(&events);
}

#[test]
fn test_write_while_disconnected_is_dropped() {
    let (manager, events) = manager();
    assert_eq!(manager.write(&[0x0A]).unwrap(), WriteOutcome::Dropped);
    assert!(!manager.write(&[0x0A]).unwrap().is_sent());
    assert_eq!(manager.connector().attempts(), 0);
    assert_quiet(&events);
}

#[test]
fn test_write_while_connecting_is_dropped() {
    let (manager, events) = manager();
    let (_release, held) = mpsc::channel::<bool>();
    manager.connector().script("slow", MockBehavior::Hold(held));

    manager.connect("slow".to_string());
    assert_eq!(next_state(&events), ConnectionState::Connecting);
    assert_eq!(manager.write(&[1]).unwrap(), WriteOutcome::Dropped);
}

#[test]
fn test_write_failure_keeps_state() {
    let (manager, events) = manager();
    manager.connect("printer".to_string());
    connection::wait_for_state(&events, ConnectionState::Connected, WAIT).unwrap();
    let handle = manager.connector().handle("printer").unwrap();

    handle.fail_writes(true);
    let err = manager.write(&[0x1B, 0x40]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(manager.state(), ConnectionState::Connected);
    assert_quiet(&events);

    handle.fail_writes(false);
    assert!(manager.write(&[0x1B, 0x40]).unwrap().is_sent());
    assert_eq!(handle.written(), vec![0x1B, 0x40]);
}

#[test]
fn test_reconnect_replaces_link() {
    let (manager, events) = manager();
    manager.connect("a".to_string());
    connection::wait_for_state(&events, ConnectionState::Connected, WAIT).unwrap();
    let a = manager.connector().handle("a").unwrap();

    manager.connect("b".to_string());
    assert_eq!(next_state(&events), ConnectionState::Connecting);
    assert_eq!(next_state(&events), ConnectionState::Connected);
    assert!(!a.is_open());

    manager.write(&[7]).unwrap();
    assert_eq!(a.written(), Vec::<u8>::new());
    assert_eq!(manager.connector().handle("b").unwrap().written(), vec![7]);
}

#[test]
fn test_refused_connect() {
    let (manager, events) = manager();
    manager.connector().script("gone", MockBehavior::Refuse);

    manager.connect("gone".to_string());
    let err = connection::wait_for_state(&events, ConnectionState::Connected, WAIT).unwrap_err();
    assert!(err.to_string().contains("disconnected"), "{}", err);
    assert_eq!(manager.connector().opened(), Vec::<String>::new());
}

#[test]
fn test_closure_observer_sees_states_in_order() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let manager = ConnectionManager::new(MockConnector::new(), move |state: ConnectionState| {
        sink.lock().unwrap().push(state);
    })
    .unwrap();

    manager.connect("printer".to_string());
    assert!(wait_until(|| manager.is_connected()));
    manager.disconnect();
    assert!(wait_until(|| seen.lock().unwrap().len() == 3));

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            ConnectionState::Connecting,
            ConnectionState::Connected,
            ConnectionState::Disconnected,
        ]
    );
}

#[test]
fn test_inbound_status_bytes() {
    let (manager, events) = manager();
    manager.connect("printer".to_string());
    connection::wait_for_state(&events, ConnectionState::Connected, WAIT).unwrap();

    manager
        .connector()
        .handle("printer")
        .unwrap()
        .push_inbound(&[0x16]);
    assert_eq!(
        events.recv_timeout(WAIT).unwrap(),
        ConnectionEvent::DataReceived(vec![0x16])
    );
}
