//! Markdown summary of a traffic pass.

use crate::report::code_span;
use crate::traffic::AggregateState;

pub const TRAFFIC_TITLE: &str = "Network Traffic Analysis";

pub fn traffic_markdown(state: &AggregateState, top_n: usize) -> String {
    let mut md = format!("# {TRAFFIC_TITLE}\n\n");

    md.push_str(&format!("## Top {top_n} IP Addresses\n\n"));
    if state.ip_counts().is_empty() {
        md.push_str("No IP data found.\n");
    }
    for (ip, count) in state.ip_counts().top_n(top_n) {
        match state.interval(ip) {
            Some(seen) => md.push_str(&format!(
                "- **{ip}**: {count} occurrences (first seen: {}, last seen: {})\n",
                seen.first_seen, seen.last_seen
            )),
            None => md.push_str(&format!("- **{ip}**: {count} occurrences\n")),
        }
    }

    md.push_str(&format!("\n## Top {top_n} Ports\n\n"));
    if state.port_counts().is_empty() {
        md.push_str("No port data found.\n");
    }
    for (port, count) in state.port_counts().top_n(top_n) {
        md.push_str(&format!("- **Port {port}**: {count} occurrences\n"));
    }

    md.push_str("\n## Suspicious Activity\n\n");
    if state.suspicious_log().is_empty() {
        md.push_str("No suspicious activity detected.\n");
    }
    for entry in state.suspicious_log() {
        md.push_str(&format!("- **{}**: Suspicious connection detected\n", entry.timestamp));
        md.push_str(&format!("  - Details: {}\n", code_span(&entry.line)));
        md.push_str(&format!("  - Reason: {}\n", entry.reason()));
    }

    if !state.dns_queries().is_empty() {
        md.push_str("\n## Reverse DNS Lookups\n\n");
        for query in state.dns_queries() {
            md.push_str(&format!("- **{}**: {}\n", query.timestamp, code_span(&query.line)));
        }
    }

    md
}
