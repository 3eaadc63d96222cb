//! Pattern-based VEVENT extraction.
//!
//! This does not parse iCalendar structure. Blocks are located textually and
//! each field is the first `KEY:value` match anywhere inside its block, so
//! property parameters (`DTSTART;TZID=...`) and folded lines are ignored.

use chrono::{DateTime, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::ParseError;
use crate::event::{Description, Event, EventDuration, FieldError, FieldResult};

/// Fixed UTC timestamp layout used by DTSTART/DTEND.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

static EVENT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)BEGIN:VEVENT(.*?)END:VEVENT").unwrap());

static UID: Lazy<Regex> = Lazy::new(|| Regex::new(r"UID:(\S+)").unwrap());
static DTSTART: Lazy<Regex> = Lazy::new(|| Regex::new(r"DTSTART:(\d{8}T\d{6}Z)").unwrap());
static DTEND: Lazy<Regex> = Lazy::new(|| Regex::new(r"DTEND:(\d{8}T\d{6}Z)").unwrap());
static SUMMARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"SUMMARY:(.+)").unwrap());
static LOCATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"LOCATION:(.+)").unwrap());
static DESCRIPTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"DESCRIPTION:(.+)").unwrap());

/// Extract one `Event` per VEVENT block, in source order.
///
/// Fails only when the input holds no VEVENT block at all.
pub fn extract(text: &str) -> Result<Vec<Event>, ParseError> {
    let events: Vec<Event> = event_blocks(text).into_iter().map(parse_block).collect();

    if events.is_empty() {
        return Err(ParseError::NoEvents);
    }

    debug!(count = events.len(), "extracted calendar events");
    Ok(events)
}

/// Inner text of every non-overlapping `BEGIN:VEVENT ... END:VEVENT` span.
pub fn event_blocks(text: &str) -> Vec<&str> {
    EVENT_BLOCK
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Build an `Event` from a single block. Never fails.
pub fn parse_block(block: &str) -> Event {
    let uid = absorb(find_field(&UID, block)).unwrap_or_default();

    let start = absorb(find_field(&DTSTART, block).and_then(|v| parse_timestamp("DTSTART", &v)));
    let end = absorb(find_field(&DTEND, block).and_then(|v| parse_timestamp("DTEND", &v)));

    let summary = absorb(find_field(&SUMMARY, block));
    let location = absorb(find_field(&LOCATION, block));
    let description = absorb(find_field(&DESCRIPTION, block)).map(|raw| Description::parse(&raw));

    let modality = summary
        .as_deref()
        .and_then(|s| s.split_whitespace().next())
        .map(str::to_string);

    let (duration, date, time) = match (start, end) {
        (Some(start), Some(end)) => match EventDuration::from_span(end - start) {
            Some(duration) => (
                Some(duration),
                Some(start.format("%d-%m-%Y").to_string()),
                Some(start.format("%H:%M").to_string()),
            ),
            None => {
                debug!(%uid, "DTEND precedes DTSTART, leaving duration empty");
                (None, None, None)
            }
        },
        _ => (None, None, None),
    };

    Event {
        uid,
        start,
        end,
        duration,
        date,
        time,
        summary,
        modality,
        location,
        description,
    }
}

/// First match of `pattern` in `block`, trimmed.
fn find_field(pattern: &Regex, block: &str) -> FieldResult<String> {
    let value = pattern
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .ok_or(FieldError::Missing)?;

    if value.is_empty() {
        return Err(FieldError::Missing);
    }

    Ok(value.to_string())
}

/// Parse a `YYYYMMDDTHHMMSSZ` timestamp as UTC.
pub fn parse_timestamp(key: &'static str, value: &str) -> FieldResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|dt| dt.and_utc())
        .map_err(|_| FieldError::Malformed {
            key,
            value: value.to_string(),
        })
}

/// Collapse a field result into an optional value, noting malformed input.
fn absorb<T>(result: FieldResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(FieldError::Missing) => None,
        Err(FieldError::Malformed { key, value }) => {
            debug!(key, value = %value, "ignoring malformed field");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const TWO_EVENTS: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
DTSTAMP:20231020T120000Z\r\n\
DTSTART:20230901T080000Z\r\n\
DTEND:20230901T094500Z\r\n\
SUMMARY:R1.07 TP Informatique\r\n\
LOCATION:RT-TP1\r\n\
DESCRIPTION:\\nRT1-A1\\nJohn DOE\\n\r\n\
UID:ADE60123\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
DTSTART:20230904T130000Z\r\n\
DTEND:20230904T150000Z\r\n\
SUMMARY:R1.01 CM Réseaux\r\n\
UID:ADE60124\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    // --- block splitting ---

    #[test]
    fn returns_one_event_per_block_in_order() {
        let events = extract(TWO_EVENTS).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].uid, "ADE60123");
        assert_eq!(events[1].uid, "ADE60124");
    }

    #[test]
    fn no_blocks_is_fatal() {
        assert_eq!(extract("BEGIN:VCALENDAR\nEND:VCALENDAR\n"), Err(ParseError::NoEvents));
        assert_eq!(extract(""), Err(ParseError::NoEvents));
    }

    #[test]
    fn unterminated_block_is_not_a_block() {
        let text = "BEGIN:VEVENT\nUID:a\nEND:VEVENT\nBEGIN:VEVENT\nUID:b\n";
        let events = extract(text).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].uid, "a");
    }

    #[test]
    fn empty_block_yields_empty_event() {
        let events = extract("BEGIN:VEVENT\nEND:VEVENT").unwrap();
        assert_eq!(events, vec![Event::default()]);
    }

    // --- fields ---

    #[test]
    fn computes_duration_date_and_time() {
        let event = &extract(TWO_EVENTS).unwrap()[0];
        assert_eq!(event.duration.unwrap().to_string(), "01:45");
        assert_eq!(event.date.as_deref(), Some("01-09-2023"));
        assert_eq!(event.time.as_deref(), Some("08:00"));

        let start = event.start.unwrap();
        assert_eq!((start.year(), start.month(), start.day()), (2023, 9, 1));
        assert_eq!(start.hour(), 8);
    }

    #[test]
    fn modality_is_first_summary_token() {
        let event = &extract(TWO_EVENTS).unwrap()[0];
        assert_eq!(event.summary.as_deref(), Some("R1.07 TP Informatique"));
        assert_eq!(event.modality.as_deref(), Some("R1.07"));
    }

    #[test]
    fn values_are_trimmed_of_carriage_returns() {
        let event = &extract(TWO_EVENTS).unwrap()[0];
        assert_eq!(event.location.as_deref(), Some("RT-TP1"));
    }

    #[test]
    fn description_subfields_follow_escaped_newlines() {
        let event = &extract(TWO_EVENTS).unwrap()[0];
        assert_eq!(event.groups(), Some(""));
        assert_eq!(event.instructors(), Some("RT1-A1"));
    }

    #[test]
    fn first_match_wins_for_repeated_keys() {
        let text = "BEGIN:VEVENT\nSUMMARY:first\nSUMMARY:second\nEND:VEVENT";
        let event = &extract(text).unwrap()[0];
        assert_eq!(event.summary.as_deref(), Some("first"));
    }

    #[test]
    fn missing_dtend_leaves_derived_fields_empty() {
        let text = "BEGIN:VEVENT\nUID:x\nDTSTART:20230901T080000Z\nSUMMARY:R1.07 TP\nEND:VEVENT";
        let event = &extract(text).unwrap()[0];
        assert!(event.start.is_some());
        assert!(event.end.is_none());
        assert!(event.duration.is_none());
        assert!(event.date.is_none());
        assert!(event.time.is_none());
    }

    #[test]
    fn impossible_timestamp_is_swallowed() {
        let text = "BEGIN:VEVENT\nDTSTART:20231301T080000Z\nDTEND:20230901T094500Z\nEND:VEVENT";
        let event = &extract(text).unwrap()[0];
        assert!(event.start.is_none());
        assert!(event.end.is_some());
        assert!(event.duration.is_none());
    }

    #[test]
    fn zoned_timestamps_do_not_match_fixed_format() {
        let text = "BEGIN:VEVENT\nDTSTART;TZID=Europe/Paris:20230901T100000\nEND:VEVENT";
        let event = &extract(text).unwrap()[0];
        assert!(event.start.is_none());
    }

    #[test]
    fn end_before_start_has_no_duration() {
        let text = "BEGIN:VEVENT\nDTSTART:20230901T100000Z\nDTEND:20230901T080000Z\nEND:VEVENT";
        let event = &extract(text).unwrap()[0];
        assert!(event.start.is_some() && event.end.is_some());
        assert!(event.duration.is_none());
    }

    #[test]
    fn blank_summary_counts_as_missing() {
        let text = "BEGIN:VEVENT\nSUMMARY:   \nEND:VEVENT";
        let event = &extract(text).unwrap()[0];
        assert!(event.summary.is_none());
        assert!(event.modality.is_none());
    }

    #[test]
    fn parse_timestamp_reports_malformed_value() {
        assert!(matches!(
            parse_timestamp("DTSTART", "2023-09-01"),
            Err(FieldError::Malformed { key: "DTSTART", .. })
        ));
    }
}
