//! Per-packet table from tcpdump TCP lines.
//!
//! Only lines carrying `Flags` are considered. Columns are taken by position
//! from tcpdump's default layout:
//! `TIME IP SRC > DST: Flags [F], ... length N`

use std::io::Write;

use serde::Serialize;

use crate::error::TimetraceResult;

const MIN_TOKENS: usize = 9;
const UNKNOWN_LENGTH: &str = "N/A";

pub const PACKET_CSV_HEADER: [&str; 5] = ["time", "source", "destination", "flags", "length"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PacketRecord {
    pub time: String,
    pub source: String,
    pub destination: String,
    pub flags: String,
    pub length: String,
}

impl PacketRecord {
    pub fn from_line(line: &str) -> Option<Self> {
        if !line.contains("Flags") {
            return None;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < MIN_TOKENS {
            return None;
        }

        let length = parts
            .iter()
            .position(|&p| p == "length")
            .and_then(|i| parts.get(i + 1))
            .map(|l| l.to_string())
            .unwrap_or_else(|| UNKNOWN_LENGTH.to_string());

        Some(PacketRecord {
            time: parts[0].to_string(),
            source: parts[2].to_string(),
            destination: parts[4].to_string(),
            flags: parts[6].to_string(),
            length,
        })
    }
}

pub fn extract_packets<I, S>(lines: I) -> Vec<PacketRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| PacketRecord::from_line(line.as_ref()))
        .collect()
}

/// Write packets as CSV, header first (also when there are no packets).
pub fn write_packets_csv<W: Write>(packets: &[PacketRecord], writer: W) -> TimetraceResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(PACKET_CSV_HEADER)?;
    for packet in packets {
        wtr.write_record([
            &packet.time,
            &packet.source,
            &packet.destination,
            &packet.flags,
            &packet.length,
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
