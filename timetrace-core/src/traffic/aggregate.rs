//! Single-pass aggregation over a capture dump.

use std::collections::{BTreeSet, HashMap};
use std::io::BufRead;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::TimetraceResult;
use crate::traffic::counter::Counter;
use crate::traffic::patterns::{
    PortBoundary, Timestamp, find_ips, find_ports, find_timestamp, is_reverse_dns_query,
};

/// Ports whose appearance gets a line into the suspicious log.
pub const DEFAULT_SUSPICIOUS_PORTS: [u32; 4] = [22, 80, 443, 50019];

/// Which detectors run during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    pub port_boundary: PortBoundary,
    pub suspicious_ports: BTreeSet<u32>,
    /// Collect `PTR? ... in-addr.arpa` lines into a separate bucket
    pub detect_reverse_dns: bool,
    /// Keep first/last-seen timestamps per IP
    pub track_intervals: bool,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        AggregatorConfig {
            port_boundary: PortBoundary::default(),
            suspicious_ports: DEFAULT_SUSPICIOUS_PORTS.into_iter().collect(),
            detect_reverse_dns: false,
            track_intervals: true,
        }
    }
}

/// What one line of the dump contained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrafficRecord {
    pub timestamp: Timestamp,
    pub ips: Vec<String>,
    pub ports: Vec<u32>,
    pub reverse_dns: bool,
}

impl TrafficRecord {
    pub fn scan(line: &str, boundary: PortBoundary) -> Self {
        TrafficRecord {
            timestamp: find_timestamp(line),
            ips: find_ips(line).into_iter().map(str::to_string).collect(),
            ports: find_ports(line, boundary),
            reverse_dns: is_reverse_dns_query(line),
        }
    }

    pub fn is_suspicious(&self, suspicious_ports: &BTreeSet<u32>) -> bool {
        self.ports.iter().any(|port| suspicious_ports.contains(port))
    }
}

/// First and last capture time an IP was seen at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeenInterval {
    pub first_seen: Timestamp,
    pub last_seen: Timestamp,
}

/// One suspicious-port hit. A line with two such ports appears twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuspiciousEntry {
    pub timestamp: Timestamp,
    /// The raw line, trimmed
    pub line: String,
    pub port: u32,
}

impl SuspiciousEntry {
    pub fn reason(&self) -> String {
        format!("Critical port used ({})", self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsQuery {
    pub timestamp: Timestamp,
    pub line: String,
}

/// Everything a pass produced. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateState {
    ip_counts: Counter<String>,
    ip_intervals: HashMap<String, SeenInterval>,
    port_counts: Counter<u32>,
    suspicious_log: Vec<SuspiciousEntry>,
    dns_queries: Vec<DnsQuery>,
    lines_scanned: usize,
}

impl AggregateState {
    pub fn ip_counts(&self) -> &Counter<String> {
        &self.ip_counts
    }

    /// None when the IP was never seen or interval tracking was off.
    pub fn interval(&self, ip: &str) -> Option<&SeenInterval> {
        self.ip_intervals.get(ip)
    }

    pub fn port_counts(&self) -> &Counter<u32> {
        &self.port_counts
    }

    pub fn suspicious_log(&self) -> &[SuspiciousEntry] {
        &self.suspicious_log
    }

    pub fn dns_queries(&self) -> &[DnsQuery] {
        &self.dns_queries
    }

    pub fn lines_scanned(&self) -> usize {
        self.lines_scanned
    }
}

/// Folds dump lines into an `AggregateState`.
pub struct Aggregator {
    config: AggregatorConfig,
    state: AggregateState,
}

impl Aggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Aggregator {
            config,
            state: AggregateState::default(),
        }
    }

    pub fn push_line(&mut self, line: &str) {
        let record = TrafficRecord::scan(line, self.config.port_boundary);
        let state = &mut self.state;
        state.lines_scanned += 1;

        for ip in &record.ips {
            state.ip_counts.add(ip.clone());

            if self.config.track_intervals {
                state
                    .ip_intervals
                    .entry(ip.clone())
                    .and_modify(|seen| seen.last_seen = record.timestamp.clone())
                    .or_insert_with(|| SeenInterval {
                        first_seen: record.timestamp.clone(),
                        last_seen: record.timestamp.clone(),
                    });
            }
        }

        for &port in &record.ports {
            state.port_counts.add(port);

            if self.config.suspicious_ports.contains(&port) {
                state.suspicious_log.push(SuspiciousEntry {
                    timestamp: record.timestamp.clone(),
                    line: line.trim().to_string(),
                    port,
                });
            }
        }

        if self.config.detect_reverse_dns && record.reverse_dns {
            state.dns_queries.push(DnsQuery {
                timestamp: record.timestamp,
                line: line.trim().to_string(),
            });
        }
    }

    pub fn finish(self) -> AggregateState {
        let state = self.state;
        info!(
            lines = state.lines_scanned,
            unique_ips = state.ip_counts.len(),
            unique_ports = state.port_counts.len(),
            suspicious = state.suspicious_log.len(),
            dns_queries = state.dns_queries.len(),
            "traffic pass complete"
        );
        state
    }
}

/// Aggregate an in-memory or lazily produced sequence of lines.
pub fn aggregate<I, S>(lines: I, config: &AggregatorConfig) -> AggregateState
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut aggregator = Aggregator::new(config.clone());
    for line in lines {
        aggregator.push_line(line.as_ref());
    }
    aggregator.finish()
}

/// Stream a reader line by line. Only a failing read aborts the pass;
/// bytes that are not UTF-8 are replaced rather than rejected.
pub fn aggregate_reader<R: BufRead>(
    mut reader: R,
    config: &AggregatorConfig,
) -> TimetraceResult<AggregateState> {
    let mut aggregator = Aggregator::new(config.clone());
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        aggregator.push_line(line.trim_end_matches('\n').trim_end_matches('\r'));
    }
    Ok(aggregator.finish())
}
