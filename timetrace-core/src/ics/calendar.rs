//! RFC 5545 path for per-month tallies, using the icalendar crate's parser.
//!
//! Unlike the pattern extractor this unfolds continuation lines and honours
//! property parameters, so `DTSTART;TZID=...` and all-day events count too.

use chrono::Datelike;
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{read_calendar, unfold},
};
use tracing::debug;

use crate::error::{TimetraceError, TimetraceResult};
use crate::session::{MonthCount, MonthTally};

/// Count VEVENTs whose SUMMARY contains `keyword`, grouped by DTSTART month.
pub fn count_kind_by_month(
    content: &str,
    keyword: &str,
    months: &[u32],
) -> TimetraceResult<Vec<MonthCount>> {
    let unfolded = unfold(content);
    let calendar =
        read_calendar(&unfolded).map_err(|e| TimetraceError::IcsParse(e.to_string()))?;

    let mut tally = MonthTally::new(months);
    let mut seen = 0usize;

    for vevent in calendar.components.iter().filter(|c| c.name == "VEVENT") {
        seen += 1;

        let Some(summary) = vevent.find_prop("SUMMARY") else {
            continue;
        };
        if !summary.val.as_ref().contains(keyword) {
            continue;
        }

        let start = vevent
            .find_prop("DTSTART")
            .and_then(|p| DatePerhapsTime::try_from(p).ok());
        match start {
            Some(start) => tally.record(start_month(&start)),
            None => debug!(summary = summary.val.as_ref(), "skipping event without DTSTART"),
        }
    }

    debug!(events = seen, keyword, "tallied calendar by month");
    Ok(tally.into_counts())
}

fn start_month(start: &DatePerhapsTime) -> u32 {
    match start {
        DatePerhapsTime::Date(d) => d.month(),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => dt.month(),
            CalendarDateTime::Floating(naive) => naive.month(),
            CalendarDateTime::WithTimezone { date_time, .. } => date_time.month(),
        },
    }
}
