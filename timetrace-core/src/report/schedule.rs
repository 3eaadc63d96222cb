//! Schedule tables: event rows in several formats, and the session page.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::{TimetraceError, TimetraceResult};
use crate::event::Event;
use crate::report::markdown_cell;
use crate::session::{MonthCount, Session};

/// Column order shared by every event table.
pub const EVENT_COLUMNS: [&str; 9] = [
    "UID",
    "DATE",
    "TIME",
    "DURATION",
    "MODALITY",
    "SUMMARY",
    "LOCATION",
    "INSTRUCTORS",
    "GROUPS",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventFormat {
    /// `;`-separated, no header, placeholder for absent cells
    #[default]
    PseudoCsv,
    Csv,
    Json,
    Markdown,
}

/// One cell per column, None for absent values.
fn event_cells(event: &Event) -> [Option<String>; 9] {
    [
        Some(event.uid.clone()).filter(|uid| !uid.is_empty()),
        event.date.clone(),
        event.time.clone(),
        event.duration.map(|d| d.to_string()),
        event.modality.clone(),
        event.summary.clone(),
        event.location.clone(),
        event.instructors().map(str::to_string),
        event.groups().map(str::to_string),
    ]
}

pub fn render_events(events: &[Event], format: EventFormat, placeholder: &str) -> TimetraceResult<String> {
    match format {
        EventFormat::PseudoCsv => {
            let mut lines = pseudo_csv_lines(events, placeholder);
            lines.push(String::new());
            Ok(lines.join("\n"))
        }
        EventFormat::Csv => {
            let mut out = Vec::new();
            write_events_csv(events, &mut out)?;
            String::from_utf8(out).map_err(|e| TimetraceError::Serialization(e.to_string()))
        }
        EventFormat::Json => serde_json::to_string_pretty(events)
            .map_err(|e| TimetraceError::Serialization(e.to_string())),
        EventFormat::Markdown => Ok(events_markdown(events)),
    }
}

/// One `;`-joined line per event.
pub fn pseudo_csv_lines(events: &[Event], placeholder: &str) -> Vec<String> {
    events
        .iter()
        .map(|event| {
            event_cells(event)
                .iter()
                .map(|cell| cell.as_deref().unwrap_or(placeholder))
                .collect::<Vec<_>>()
                .join(";")
        })
        .collect()
}

pub fn write_events_csv<W: Write>(events: &[Event], writer: W) -> TimetraceResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(EVENT_COLUMNS)?;
    for event in events {
        wtr.write_record(event_cells(event).iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn events_markdown(events: &[Event]) -> String {
    let mut out = String::new();
    out.push_str(&format!("| {} |\n", EVENT_COLUMNS.join(" | ")));
    out.push_str(&format!("|{}\n", "---|".repeat(EVENT_COLUMNS.len())));
    for event in events {
        let cells: Vec<String> = event_cells(event)
            .iter()
            .map(|cell| markdown_cell(cell.as_deref().unwrap_or("")))
            .collect();
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    out
}

/// Session table, per-month tally and an optional chart image link.
pub fn sessions_markdown(
    title: &str,
    sessions: &[Session],
    months: &[MonthCount],
    chart_image: Option<&str>,
) -> String {
    let mut md = format!("# {title}\n\n");

    md.push_str("## Sessions\n\n");
    if sessions.is_empty() {
        md.push_str("No matching sessions found.\n");
    } else {
        md.push_str("| Date | Duration | Modality |\n");
        md.push_str("|------|----------|----------|\n");
        for session in sessions {
            let duration = session.duration.map(|d| d.to_string());
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                markdown_cell(session.date.as_deref().unwrap_or("-")),
                markdown_cell(duration.as_deref().unwrap_or("-")),
                markdown_cell(&session.kind),
            ));
        }
    }

    md.push_str("\n## Sessions per month\n\n");
    md.push_str("| Month | Sessions |\n");
    md.push_str("|-------|----------|\n");
    for month in months {
        md.push_str(&format!("| {} | {} |\n", month.label, month.count));
    }

    if let Some(image) = chart_image {
        md.push_str(&format!("\n![Sessions per month]({image})\n"));
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ics::extract;
    use crate::session::{DEFAULT_MONTHS, SessionFilter, monthly_tally, select_sessions};

    const CALENDAR: &str = "BEGIN:VEVENT
UID:ADE1
DTSTART:20230901T080000Z
DTEND:20230901T094500Z
SUMMARY:R1.07 TP Informatique
LOCATION:RT-TP1
DESCRIPTION:RT1-A1\\nJohn DOE\\n
END:VEVENT
BEGIN:VEVENT
SUMMARY:Réunion | rentrée
END:VEVENT
";

    fn events() -> Vec<Event> {
        extract(CALENDAR).unwrap()
    }

    #[test]
    fn pseudo_csv_uses_fixed_columns_and_placeholder() {
        let lines = pseudo_csv_lines(&events(), "vide");
        assert_eq!(
            lines[0],
            "ADE1;01-09-2023;08:00;01:45;R1.07;R1.07 TP Informatique;RT-TP1;John DOE;RT1-A1"
        );
        assert_eq!(
            lines[1],
            "vide;vide;vide;vide;Réunion;Réunion | rentrée;vide;vide;vide"
        );
    }

    #[test]
    fn csv_has_header_and_empty_cells() {
        let text = render_events(&events(), EventFormat::Csv, "vide").unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("UID,DATE,TIME,DURATION,MODALITY,SUMMARY,LOCATION,INSTRUCTORS,GROUPS")
        );
        assert_eq!(lines.nth(1), Some(",,,,Réunion,Réunion | rentrée,,,"));
    }

    #[test]
    fn json_is_an_array_of_events() {
        let text = render_events(&events(), EventFormat::Json, "vide").unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value.as_array().map(|a| a.len()), Some(2));
        assert_eq!(value[0]["uid"], "ADE1");
    }

    #[test]
    fn markdown_escapes_pipes() {
        let md = events_markdown(&events());
        assert!(md.starts_with("| UID | DATE |"));
        assert!(md.contains("Réunion \\| rentrée"));
        assert_eq!(md.lines().count(), 4);
    }

    #[test]
    fn sessions_page_lists_sessions_and_months() {
        let events = events();
        let filter = SessionFilter::default();
        let sessions = select_sessions(&events, &filter);
        let months = monthly_tally(&events, &filter, &DEFAULT_MONTHS);

        let md = sessions_markdown("Previous work", &sessions, &months, Some("sessions.png"));
        assert!(md.starts_with("# Previous work\n"));
        assert!(md.contains("| 01-09-2023 | 01:45 | TP |"));
        assert!(md.contains("| September | 1 |"));
        assert!(md.contains("| December | 0 |"));
        assert!(md.contains("![Sessions per month](sessions.png)"));
    }

    #[test]
    fn empty_session_page_says_so() {
        let md = sessions_markdown("x", &[], &[], None);
        assert!(md.contains("No matching sessions found."));
        assert!(!md.contains("!["));
    }
}
