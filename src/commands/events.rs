use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use timetrace_core::config::TimetraceConfig;
use timetrace_core::ics::extract;
use timetrace_core::report::{EventFormat, render_events};

use super::{read_input, write_output};
use crate::render::Render;

pub fn run(
    file: &Path,
    format: EventFormat,
    output: Option<&Path>,
    config: &TimetraceConfig,
) -> Result<()> {
    let rendered = events_table(file, format, config)?;

    match output {
        Some(out) => {
            let path = write_output(config, out, &rendered)?;
            println!("{}", path.render());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

fn events_table(file: &Path, format: EventFormat, config: &TimetraceConfig) -> Result<String> {
    let content = read_input(file)?;
    let events = extract(&content).with_context(|| format!("Nothing to list in {}", file.display()))?;

    let untitled = events.iter().filter(|e| e.summary.is_none()).count();
    if untitled > 0 {
        eprintln!(
            "{}",
            format!("{untitled} of {} events have no summary", events.len()).yellow()
        );
    }

    Ok(render_events(&events, format, &config.placeholder)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CALENDAR: &str = "BEGIN:VCALENDAR
BEGIN:VEVENT
UID:ADE1
DTSTART:20231002T130000Z
DTEND:20231002T150000Z
SUMMARY:R1.07 TP Programmation
LOCATION:RT-TP2
END:VEVENT
END:VCALENDAR
";

    fn setup(calendar: &str) -> (tempfile::TempDir, TimetraceConfig) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cal.ics"), calendar).unwrap();
        let config = TimetraceConfig {
            output_dir: dir.path().to_path_buf(),
            ..TimetraceConfig::default()
        };
        (dir, config)
    }

    #[test]
    fn writes_pseudo_csv_to_output_dir() {
        let (dir, config) = setup(CALENDAR);
        let input = dir.path().join("cal.ics");

        run(&input, EventFormat::PseudoCsv, Some(Path::new("out.csv")), &config).unwrap();

        let written = std::fs::read_to_string(dir.path().join("out.csv")).unwrap();
        assert_eq!(
            written,
            "ADE1;02-10-2023;13:00;02:00;R1.07;R1.07 TP Programmation;RT-TP2;vide;vide\n"
        );
    }

    #[test]
    fn placeholder_comes_from_config() {
        let (dir, mut config) = setup(CALENDAR);
        config.placeholder = "-".to_string();

        let table = events_table(&dir.path().join("cal.ics"), EventFormat::PseudoCsv, &config).unwrap();
        assert!(table.ends_with(";RT-TP2;-;-\n"));
    }

    #[test]
    fn calendar_without_events_is_an_error() {
        let (dir, config) = setup("BEGIN:VCALENDAR\nEND:VCALENDAR\n");
        let err = events_table(&dir.path().join("cal.ics"), EventFormat::Json, &config).unwrap_err();
        assert!(err.to_string().contains("Nothing to list"));
    }
}
