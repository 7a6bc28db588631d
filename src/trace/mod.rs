//! Connection lifecycle tracing.
//!
//! A hop shares one [`TraceRecorder`] with the connection layer. The
//! recorder implements [`TraceObserver`], capturing a one-shot timestamp per
//! lifecycle event and emitting a debug-level diagnostic line. After the
//! response arrives the recorder is frozen into a [`TraceTimestamps`]
//! snapshot, which is all the timing diagram ever sees.

use std::net::{IpAddr, SocketAddr};
use std::sync::OnceLock;
use std::time::Instant;

use chrono::Local;
use log::debug;

pub mod diagram;

/// Observer of connection lifecycle events.
///
/// One method per milestone, invoked synchronously on the task driving the
/// exchange. Implementations must not block: a timestamp write and a log
/// line is the intended amount of work.
pub trait TraceObserver: Send + Sync {
    /// DNS resolution is starting for `host`.
    fn dns_start(&self, host: &str);
    /// DNS resolution finished with the answer set `addrs`.
    fn dns_done(&self, addrs: &[IpAddr]);
    /// A TCP connect to `addr` is starting.
    fn connect_start(&self, addr: SocketAddr);
    /// The TCP connect to `addr` succeeded.
    fn connect_done(&self, addr: SocketAddr);
    /// The connection cycle for a hop has begun.
    fn get_conn(&self);
    /// The connection is ready to carry the request.
    fn got_conn(&self);
    /// The first byte of the response arrived.
    fn got_first_response_byte(&self);
    /// The TLS handshake is starting.
    fn tls_handshake_start(&self);
    /// The TLS handshake finished, having negotiated `protocol`.
    fn tls_handshake_done(&self, protocol: &str);
    /// The server answered `100 Continue`.
    fn got_100_continue(&self);
    /// The client is holding the request body for a `100 Continue`.
    fn wait_100_continue(&self);
    /// The first chunk of the request head was written.
    fn wrote_header_field(&self);
    /// The request headers were fully written.
    fn wrote_headers(&self);
    /// The whole request was written.
    fn wrote_request(&self);
}

/// Immutable timestamps captured for one hop.
///
/// Every field is `None` until the corresponding event fired. Skipped phases
/// (TLS on plaintext connections, DNS for IP-literal hosts) simply stay
/// unset; the diagram treats unset arithmetic as zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceTimestamps {
    /// When DNS resolution started.
    pub dns_start: Option<Instant>,
    /// When DNS resolution finished.
    pub dns_done: Option<Instant>,
    /// When the TCP connect started.
    pub connect_start: Option<Instant>,
    /// When the TCP connect succeeded.
    pub connect_done: Option<Instant>,
    /// When the hop began acquiring a connection.
    pub get_conn: Option<Instant>,
    /// When the connection became ready to carry the request.
    pub got_conn: Option<Instant>,
    /// When the first response byte arrived.
    pub got_first_response_byte: Option<Instant>,
    /// When the TLS handshake started.
    pub tls_handshake_start: Option<Instant>,
    /// When the TLS handshake finished.
    pub tls_handshake_done: Option<Instant>,
    /// When a `100 Continue` was received.
    pub got_100_continue: Option<Instant>,
    /// When the client started waiting for a `100 Continue`.
    pub wait_100_continue: Option<Instant>,
    /// When the first chunk of the request head was written.
    pub wrote_header_field: Option<Instant>,
    /// When the request headers were fully written.
    pub wrote_headers: Option<Instant>,
    /// When the whole request had been written.
    pub wrote_request: Option<Instant>,
}

/// Records each lifecycle event as a one-shot timestamp.
///
/// Each cell is written at most once; repeat notifications for the same
/// event keep the first timestamp. A hop builds a fresh recorder, so the
/// captured times always describe a single hop, never the whole chain.
#[derive(Default)]
pub struct TraceRecorder {
    dns_start: OnceLock<Instant>,
    dns_done: OnceLock<Instant>,
    connect_start: OnceLock<Instant>,
    connect_done: OnceLock<Instant>,
    get_conn: OnceLock<Instant>,
    got_conn: OnceLock<Instant>,
    got_first_response_byte: OnceLock<Instant>,
    tls_handshake_start: OnceLock<Instant>,
    tls_handshake_done: OnceLock<Instant>,
    got_100_continue: OnceLock<Instant>,
    wait_100_continue: OnceLock<Instant>,
    wrote_header_field: OnceLock<Instant>,
    wrote_headers: OnceLock<Instant>,
    wrote_request: OnceLock<Instant>,
}

impl TraceRecorder {
    /// Creates a recorder with all events unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Freezes the captured timestamps into an immutable snapshot.
    pub fn snapshot(&self) -> TraceTimestamps {
        TraceTimestamps {
            dns_start: self.dns_start.get().copied(),
            dns_done: self.dns_done.get().copied(),
            connect_start: self.connect_start.get().copied(),
            connect_done: self.connect_done.get().copied(),
            get_conn: self.get_conn.get().copied(),
            got_conn: self.got_conn.get().copied(),
            got_first_response_byte: self.got_first_response_byte.get().copied(),
            tls_handshake_start: self.tls_handshake_start.get().copied(),
            tls_handshake_done: self.tls_handshake_done.get().copied(),
            got_100_continue: self.got_100_continue.get().copied(),
            wait_100_continue: self.wait_100_continue.get().copied(),
            wrote_header_field: self.wrote_header_field.get().copied(),
            wrote_headers: self.wrote_headers.get().copied(),
            wrote_request: self.wrote_request.get().copied(),
        }
    }

    // Returns true only for the first call on a cell
    fn mark(cell: &OnceLock<Instant>) -> bool {
        cell.set(Instant::now()).is_ok()
    }
}

fn wall_clock() -> String {
    Local::now().format("%H:%M:%S%.3f").to_string()
}

impl TraceObserver for TraceRecorder {
    fn dns_start(&self, host: &str) {
        if Self::mark(&self.dns_start) {
            debug!("DNS lookup for {host} started at {}", wall_clock());
        }
    }

    fn dns_done(&self, addrs: &[IpAddr]) {
        if Self::mark(&self.dns_done) {
            for addr in addrs {
                debug!("DNS answer: {addr}");
            }
            debug!("DNS lookup finished at {}", wall_clock());
        }
    }

    fn connect_start(&self, addr: SocketAddr) {
        if Self::mark(&self.connect_start) {
            debug!("Connecting to {addr} at {}", wall_clock());
        }
    }

    fn connect_done(&self, addr: SocketAddr) {
        if Self::mark(&self.connect_done) {
            debug!("Connected to {addr} at {}", wall_clock());
        }
    }

    fn get_conn(&self) {
        Self::mark(&self.get_conn);
    }

    fn got_conn(&self) {
        if Self::mark(&self.got_conn) {
            debug!("Connection ready at {}", wall_clock());
        }
    }

    fn got_first_response_byte(&self) {
        if Self::mark(&self.got_first_response_byte) {
            debug!("First response byte at {}", wall_clock());
        }
    }

    fn tls_handshake_start(&self) {
        if Self::mark(&self.tls_handshake_start) {
            debug!("TLS handshake started at {}", wall_clock());
        }
    }

    fn tls_handshake_done(&self, protocol: &str) {
        if Self::mark(&self.tls_handshake_done) {
            debug!("TLS handshake done ({protocol}) at {}", wall_clock());
        }
    }

    fn got_100_continue(&self) {
        if Self::mark(&self.got_100_continue) {
            debug!("Got 100 Continue at {}", wall_clock());
        }
    }

    fn wait_100_continue(&self) {
        if Self::mark(&self.wait_100_continue) {
            debug!("Waiting for 100 Continue at {}", wall_clock());
        }
    }

    fn wrote_header_field(&self) {
        if Self::mark(&self.wrote_header_field) {
            debug!("Started writing request headers at {}", wall_clock());
        }
    }

    fn wrote_headers(&self) {
        if Self::mark(&self.wrote_headers) {
            debug!("Wrote request headers at {}", wall_clock());
        }
    }

    fn wrote_request(&self) {
        if Self::mark(&self.wrote_request) {
            debug!("Wrote request at {}", wall_clock());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_recorder_has_no_timestamps() {
        let snapshot = TraceRecorder::new().snapshot();
        assert!(snapshot.dns_start.is_none());
        assert!(snapshot.got_conn.is_none());
        assert!(snapshot.wrote_request.is_none());
        assert!(snapshot.got_first_response_byte.is_none());
    }

    #[test]
    fn test_first_timestamp_wins() {
        let recorder = TraceRecorder::new();
        recorder.got_conn();
        let first = recorder.snapshot().got_conn;
        recorder.got_conn();
        let second = recorder.snapshot().got_conn;
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_events_captured_in_call_order() {
        let recorder = TraceRecorder::new();
        recorder.dns_start("example.com");
        recorder.dns_done(&["93.184.216.34".parse().unwrap()]);
        recorder.got_conn();

        let snapshot = recorder.snapshot();
        let dns_start = snapshot.dns_start.unwrap();
        let dns_done = snapshot.dns_done.unwrap();
        let got_conn = snapshot.got_conn.unwrap();
        assert!(dns_start <= dns_done);
        assert!(dns_done <= got_conn);
    }

    #[test]
    fn test_skipped_events_stay_unset() {
        let recorder = TraceRecorder::new();
        recorder.get_conn();
        recorder.got_conn();

        let snapshot = recorder.snapshot();
        assert!(snapshot.tls_handshake_start.is_none());
        assert!(snapshot.tls_handshake_done.is_none());
        assert!(snapshot.got_100_continue.is_none());
        assert!(snapshot.wait_100_continue.is_none());
    }

    #[test]
    fn test_observer_usable_through_trait() {
        let recorder = TraceRecorder::new();
        {
            let observer: &dyn TraceObserver = &recorder;
            observer.tls_handshake_start();
            observer.tls_handshake_done("TLSv1_3");
        }
        let snapshot = recorder.snapshot();
        assert!(snapshot.tls_handshake_start.is_some());
        assert!(snapshot.tls_handshake_done.is_some());
    }
}
