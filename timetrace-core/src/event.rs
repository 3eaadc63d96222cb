//! Schedule event types.
//!
//! An `Event` is what the extractor pulls out of one `BEGIN:VEVENT` block.
//! Every field except `uid` may be absent: a block that carries nothing
//! recognizable still produces an `Event`, just an empty one.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One calendar entry extracted from a VEVENT block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Empty when the block has no UID line
    pub uid: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,

    // Derived from start/end, only when both parsed
    pub duration: Option<EventDuration>,
    /// Start date as DD-MM-YYYY
    pub date: Option<String>,
    /// Start time as HH:MM
    pub time: Option<String>,

    pub summary: Option<String>,
    /// Leading token of the summary (e.g. a course code like "R1.07")
    pub modality: Option<String>,
    pub location: Option<String>,
    pub description: Option<Description>,
}

impl Event {
    pub fn instructors(&self) -> Option<&str> {
        self.description.as_ref()?.instructors.as_deref()
    }

    pub fn groups(&self) -> Option<&str> {
        self.description.as_ref()?.groups.as_deref()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary.as_deref().unwrap_or("(No title)"))
    }
}

/// Wall-clock length of an event, truncated to whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDuration {
    pub hours: i64,
    pub minutes: i64,
}

impl EventDuration {
    /// Split a span into whole hours and whole minutes of the remainder.
    /// Returns None for negative spans.
    pub fn from_span(span: chrono::Duration) -> Option<Self> {
        let total_seconds = span.num_seconds();
        if total_seconds < 0 {
            return None;
        }
        Some(EventDuration {
            hours: total_seconds / 3600,
            minutes: (total_seconds % 3600) / 60,
        })
    }
}

impl fmt::Display for EventDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

/// DESCRIPTION value with the group/instructor sub-fields split out.
///
/// Sub-fields are separated by the escaped newline sequence (`\n`) used
/// inside ICS property values. Line 0 holds the groups, line 1 the
/// instructors; both are only filled in when there is more than one line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Description {
    pub raw: String,
    pub groups: Option<String>,
    pub instructors: Option<String>,
}

impl Description {
    pub fn parse(raw: &str) -> Self {
        let parts: Vec<&str> = raw.split("\\n").collect();

        let (groups, instructors) = if parts.len() > 1 {
            (Some(parts[0].to_string()), Some(parts[1].to_string()))
        } else {
            (None, None)
        };

        Description {
            raw: raw.to_string(),
            groups,
            instructors,
        }
    }
}

/// Why a single field did not make it into an `Event`.
///
/// Never escapes the extractor: each failure collapses to an absent field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    Missing,
    Malformed { key: &'static str, value: String },
}

pub type FieldResult<T> = Result<T, FieldError>;
