//! Calendar input handling.
//!
//! `extract` is the pattern-based VEVENT extractor behind every schedule
//! table; `count_kind_by_month` goes through a real RFC 5545 parser for the
//! monthly charts.

mod calendar;
mod extract;

pub use calendar::count_kind_by_month;
pub use extract::{TIMESTAMP_FORMAT, event_blocks, extract, parse_block, parse_timestamp};
