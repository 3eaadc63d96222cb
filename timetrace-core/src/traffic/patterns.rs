//! Textual patterns applied to capture-dump lines.
//!
//! These are heuristics over tcpdump's text rendering, not protocol parsers:
//! - IPs are any four dot-separated 1-3 digit groups, with no 0-255 check.
//! - A "port" is any 1-5 digit run between a `.` and a `:` (or whitespace,
//!   depending on the boundary), which also fires on things like version
//!   numbers or decimals followed by a colon.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static TIMESTAMP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{2}:\d{2}:\d{2}\.\d{6}").unwrap());

static IPV4: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}").unwrap());

// The leading dot and the trailing boundary are consumed rather than
// asserted; neither can be the start of the next match, so the hits are
// the same as with lookaround. Lines arrive without their terminator, so
// end of line stands in for the trailing newline.
static PORT_COLON: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.(\d{1,5}):").unwrap());
static PORT_COLON_OR_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(\d{1,5})(?:[:\s]|$)").unwrap());

static REVERSE_DNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"PTR\?\s*\S*in-addr\.arpa").unwrap());

/// Which character may close a port match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PortBoundary {
    /// `10.0.0.1.443:` only
    Colon,
    /// `10.0.0.1.443:` and `10.0.0.1.443 >`
    #[default]
    ColonOrWhitespace,
}

impl PortBoundary {
    fn pattern(self) -> &'static Regex {
        match self {
            PortBoundary::Colon => &PORT_COLON,
            PortBoundary::ColonOrWhitespace => &PORT_COLON_OR_SPACE,
        }
    }
}

impl std::str::FromStr for PortBoundary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "colon" => Ok(PortBoundary::Colon),
            "colon-or-whitespace" => Ok(PortBoundary::ColonOrWhitespace),
            other => Err(format!(
                "Unknown port boundary '{other}'. Expected 'colon' or 'colon-or-whitespace'"
            )),
        }
    }
}

/// Capture time of a line (`HH:MM:SS.ffffff`), if it has one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Timestamp {
    Known(String),
    Unknown,
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Known(ts) => write!(f, "{ts}"),
            Timestamp::Unknown => write!(f, "unknown"),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub fn find_timestamp(line: &str) -> Timestamp {
    TIMESTAMP
        .find(line)
        .map(|m| Timestamp::Known(m.as_str().to_string()))
        .unwrap_or(Timestamp::Unknown)
}

pub fn find_ips(line: &str) -> Vec<&str> {
    IPV4.find_iter(line).map(|m| m.as_str()).collect()
}

pub fn find_ports(line: &str, boundary: PortBoundary) -> Vec<u32> {
    boundary
        .pattern()
        .captures_iter(line)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

pub fn is_reverse_dns_query(line: &str) -> bool {
    REVERSE_DNS.is_match(line)
}
