//! Session selection and per-month tallies.
//!
//! A session is an event of one course (matched on modality) and one kind
//! of class (a keyword such as "TP" somewhere in the summary).

use chrono::{Datelike, Month};
use serde::{Deserialize, Serialize};

use crate::event::{Event, EventDuration};

pub const DEFAULT_MODALITY: &str = "R1.07";
pub const DEFAULT_KIND: &str = "TP";

/// September to December, the first teaching semester.
pub const DEFAULT_MONTHS: [u32; 4] = [9, 10, 11, 12];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFilter {
    pub modality: String,
    pub kind: String,
}

impl Default for SessionFilter {
    fn default() -> Self {
        SessionFilter {
            modality: DEFAULT_MODALITY.to_string(),
            kind: DEFAULT_KIND.to_string(),
        }
    }
}

impl SessionFilter {
    pub fn matches(&self, event: &Event) -> bool {
        event.modality.as_deref() == Some(self.modality.as_str())
            && event
                .summary
                .as_deref()
                .is_some_and(|summary| summary.contains(&self.kind))
    }
}

/// A selected event, reduced to what the session table shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub date: Option<String>,
    pub duration: Option<EventDuration>,
    pub kind: String,
    /// Start month (1-12), independent of whether the event has an end
    pub month: Option<u32>,
}

pub fn select_sessions(events: &[Event], filter: &SessionFilter) -> Vec<Session> {
    events
        .iter()
        .filter(|event| filter.matches(event))
        .map(|event| Session {
            date: event.date.clone(),
            duration: event.duration,
            kind: filter.kind.clone(),
            month: event.start.map(|start| start.month()),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCount {
    pub month: u32,
    pub label: String,
    pub count: usize,
}

/// Zero-filled counters over a fixed window of months.
#[derive(Debug, Clone)]
pub struct MonthTally {
    counts: Vec<MonthCount>,
}

impl MonthTally {
    pub fn new(months: &[u32]) -> Self {
        let counts = months
            .iter()
            .map(|&month| MonthCount {
                month,
                label: month_label(month),
                count: 0,
            })
            .collect();
        MonthTally { counts }
    }

    /// Count one occurrence. Months outside the window are dropped.
    pub fn record(&mut self, month: u32) {
        if let Some(entry) = self.counts.iter_mut().find(|c| c.month == month) {
            entry.count += 1;
        }
    }

    pub fn into_counts(self) -> Vec<MonthCount> {
        self.counts
    }
}

/// Count selected sessions per start month, in window order.
pub fn monthly_tally(events: &[Event], filter: &SessionFilter, months: &[u32]) -> Vec<MonthCount> {
    let mut tally = MonthTally::new(months);
    for session in select_sessions(events, filter) {
        if let Some(month) = session.month {
            tally.record(month);
        }
    }
    tally.into_counts()
}

fn month_label(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| month.to_string())
}
