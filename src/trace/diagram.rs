//! Timing diagram derivation and rendering.
//!
//! Turns one hop's [`TraceTimestamps`] into named phase durations and the
//! fixed-width ASCII waterfall printed after each hop.

use std::time::{Duration, Instant};

use super::TraceTimestamps;

/// Durations derived from one hop's timestamps.
///
/// The four phase intervals fill the waterfall header row; the four markers
/// are cumulative "time to here" values measured from the start of DNS
/// resolution. All arithmetic saturates: an unset timestamp contributes
/// zero rather than failing, so skipped phases render as `0ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseIntervals {
    /// dns_done − dns_start.
    pub dns_lookup: Duration,
    /// got_conn − dns_start.
    pub tcp_connection: Duration,
    /// got_first_response_byte − got_conn.
    pub server_processing: Duration,
    /// now − got_conn. Measured from connection-ready, so it overlaps the
    /// server-processing interval.
    pub content_transfer: Duration,
    /// Cumulative: name resolution complete.
    pub namelookup: Duration,
    /// Cumulative: connection ready.
    pub connect: Duration,
    /// Cumulative: first response byte seen.
    pub starttransfer: Duration,
    /// Cumulative: everything up to `now`.
    pub total: Duration,
}

impl PhaseIntervals {
    /// Derives the intervals from a snapshot, treating `now` as the moment
    /// the response was consumed.
    pub fn from_trace(trace: &TraceTimestamps, now: Instant) -> Self {
        Self {
            dns_lookup: span(trace.dns_start, trace.dns_done),
            tcp_connection: span(trace.dns_start, trace.got_conn),
            server_processing: span(trace.got_conn, trace.got_first_response_byte),
            content_transfer: span(trace.got_conn, Some(now)),
            namelookup: span(trace.dns_start, trace.dns_done),
            connect: span(trace.dns_start, trace.got_conn),
            starttransfer: span(trace.dns_start, trace.got_first_response_byte),
            total: span(trace.dns_start, Some(now)),
        }
    }
}

// Saturating distance between two optional instants; zero when either is unset
fn span(from: Option<Instant>, to: Option<Instant>) -> Duration {
    match (from, to) {
        (Some(from), Some(to)) => to.saturating_duration_since(from),
        _ => Duration::ZERO,
    }
}

fn format_millis(d: Duration) -> String {
    format!("{}ms", d.as_millis())
}

/// Renders the waterfall for one hop.
///
/// Pure function of the snapshot and `now`: the same inputs always produce
/// the same text. The returned string ends with a newline; callers add the
/// separating blank line.
pub fn render(trace: &TraceTimestamps, now: Instant) -> String {
    let intervals = PhaseIntervals::from_trace(trace, now);
    let phase = |d: Duration| format!("{:>7}", format_millis(d));
    let marker = |d: Duration| format!("{:<9}", format_millis(d));

    let mut out = String::new();
    out.push_str("   DNS Lookup   TCP Connection   Server Processing   Content Transfer\n");
    out.push_str(&format!(
        "[ {}  |     {}  |        {}  |       {}  ]\n",
        phase(intervals.dns_lookup),
        phase(intervals.tcp_connection),
        phase(intervals.server_processing),
        phase(intervals.content_transfer),
    ));
    out.push_str("             |                |                   |                  |\n");
    out.push_str(&format!(
        "    namelookup:{}      |                   |                  |\n",
        marker(intervals.namelookup),
    ));
    out.push_str(&format!(
        "                        connect:{}         |                  |\n",
        marker(intervals.connect),
    ));
    out.push_str(&format!(
        "                                      starttransfer:{}        |\n",
        marker(intervals.starttransfer),
    ));
    out.push_str(&format!(
        "                                                                 total:{}\n",
        marker(intervals.total),
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace_with_offsets() -> (TraceTimestamps, Instant) {
        let base = Instant::now();
        let at = |ms: u64| Some(base + Duration::from_millis(ms));
        let trace = TraceTimestamps {
            dns_start: at(0),
            dns_done: at(5),
            connect_start: at(5),
            connect_done: at(18),
            get_conn: at(0),
            got_conn: at(20),
            got_first_response_byte: at(120),
            ..Default::default()
        };
        (trace, base + Duration::from_millis(150))
    }

    #[test]
    fn test_interval_arithmetic() {
        let (trace, now) = trace_with_offsets();
        let intervals = PhaseIntervals::from_trace(&trace, now);

        assert_eq!(intervals.dns_lookup, Duration::from_millis(5));
        assert_eq!(intervals.tcp_connection, Duration::from_millis(20));
        assert_eq!(intervals.server_processing, Duration::from_millis(100));
        assert_eq!(intervals.content_transfer, Duration::from_millis(130));
        assert_eq!(intervals.namelookup, Duration::from_millis(5));
        assert_eq!(intervals.connect, Duration::from_millis(20));
        assert_eq!(intervals.starttransfer, Duration::from_millis(120));
        assert_eq!(intervals.total, Duration::from_millis(150));
    }

    #[test]
    fn test_unset_timestamps_yield_zero() {
        let trace = TraceTimestamps::default();
        let intervals = PhaseIntervals::from_trace(&trace, Instant::now());

        assert_eq!(intervals.dns_lookup, Duration::ZERO);
        assert_eq!(intervals.tcp_connection, Duration::ZERO);
        assert_eq!(intervals.server_processing, Duration::ZERO);
        assert_eq!(intervals.content_transfer, Duration::ZERO);
        assert_eq!(intervals.total, Duration::ZERO);
    }

    #[test]
    fn test_out_of_order_timestamps_saturate() {
        let base = Instant::now();
        let trace = TraceTimestamps {
            dns_start: Some(base + Duration::from_millis(10)),
            dns_done: Some(base),
            ..Default::default()
        };
        let intervals = PhaseIntervals::from_trace(&trace, base);
        assert_eq!(intervals.dns_lookup, Duration::ZERO);
    }

    #[test]
    fn test_render_is_idempotent() {
        let (trace, now) = trace_with_offsets();
        assert_eq!(render(&trace, now), render(&trace, now));
    }

    #[test]
    fn test_render_layout_and_values() {
        let (trace, now) = trace_with_offsets();
        let out = render(&trace, now);

        assert!(out.starts_with(
            "   DNS Lookup   TCP Connection   Server Processing   Content Transfer\n"
        ));
        assert!(out.contains("namelookup:5ms"));
        assert!(out.contains("connect:20ms"));
        assert!(out.contains("starttransfer:120ms"));
        assert!(out.contains("total:150ms"));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn test_render_plaintext_hop_shows_zero_phases() {
        // No DNS, no TLS: everything anchored at dns_start collapses to zero
        let base = Instant::now();
        let trace = TraceTimestamps {
            get_conn: Some(base),
            got_conn: Some(base + Duration::from_millis(3)),
            got_first_response_byte: Some(base + Duration::from_millis(9)),
            ..Default::default()
        };
        let out = render(&trace, base + Duration::from_millis(12));
        assert!(out.contains("namelookup:0ms"));
        assert!(out.contains("connect:0ms"));
    }
}
