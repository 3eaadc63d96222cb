//! Core pipelines for timetrace.
//!
//! - `ics` extracts schedule events from calendar text
//! - `session` selects course sessions and tallies them by month
//! - `traffic` aggregates IPs, ports and suspicious lines from capture dumps
//! - `report` turns both into tables, Markdown/HTML pages and chart data

pub mod config;
pub mod error;
pub mod event;
pub mod ics;
pub mod report;
pub mod session;
pub mod traffic;

pub use error::{ParseError, TimetraceError, TimetraceResult};
pub use event::*;
