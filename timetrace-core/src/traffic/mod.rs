//! Capture-dump analysis: IP/port counting, suspicious-port flagging,
//! reverse-DNS lookups and a per-packet table.

mod aggregate;
mod counter;
mod packets;
mod patterns;

pub use aggregate::{
    AggregateState, Aggregator, AggregatorConfig, DEFAULT_SUSPICIOUS_PORTS, DnsQuery,
    SeenInterval, SuspiciousEntry, TrafficRecord, aggregate, aggregate_reader,
};
pub use counter::{Counter, rank};
pub use packets::{PACKET_CSV_HEADER, PacketRecord, extract_packets, write_packets_csv};
pub use patterns::{
    PortBoundary, Timestamp, find_ips, find_ports, find_timestamp, is_reverse_dns_query,
};
