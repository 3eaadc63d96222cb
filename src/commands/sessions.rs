use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use timetrace_core::config::TimetraceConfig;
use timetrace_core::ics::{count_kind_by_month, extract};
use timetrace_core::report::{charts_json, html_page, sessions_chart, sessions_markdown};
use timetrace_core::session::{MonthCount, Session, SessionFilter, monthly_tally, select_sessions};

use super::{read_input, write_output};
use crate::render::Render;

pub struct SessionsArgs {
    pub modality: Option<String>,
    pub kind: Option<String>,
    pub markdown: Option<PathBuf>,
    pub html: Option<PathBuf>,
    pub chart_data: Option<PathBuf>,
    pub chart_image: Option<String>,
    pub ical: bool,
}

struct SessionReport {
    title: String,
    sessions: Vec<Session>,
    months: Vec<MonthCount>,
}

pub fn run(file: &Path, args: SessionsArgs, config: &TimetraceConfig) -> Result<()> {
    let filter = resolve_filter(&args, config);
    let report = build_report(file, &filter, args.ical, config)?;

    let markdown = sessions_markdown(
        &report.title,
        &report.sessions,
        &report.months,
        args.chart_image.as_deref(),
    );

    let mut written = Vec::new();

    if let Some(out) = &args.markdown {
        written.push(write_output(config, out, &markdown)?);
    }
    if let Some(out) = &args.html {
        written.push(write_output(config, out, &html_page(&report.title, &markdown))?);
    }
    if let Some(out) = &args.chart_data {
        let json = charts_json(&[sessions_chart(&report.title, &report.months)])?;
        written.push(write_output(config, out, &json)?);
    }

    if args.markdown.is_none() && args.html.is_none() {
        print!("{markdown}");
        return Ok(());
    }

    println!("📅 {}", report.title.bold());
    if report.sessions.is_empty() {
        println!("   {}", "No matching sessions".dimmed());
    }
    for session in &report.sessions {
        println!("{}", session.render());
    }
    println!();
    for month in &report.months {
        println!("{}", month.render());
    }
    println!();
    for path in &written {
        println!("{}", path.render());
    }

    Ok(())
}

fn resolve_filter(args: &SessionsArgs, config: &TimetraceConfig) -> SessionFilter {
    let mut filter = config.session_filter();
    if let Some(modality) = &args.modality {
        filter.modality = modality.clone();
    }
    if let Some(kind) = &args.kind {
        filter.kind = kind.clone();
    }
    filter
}

fn build_report(
    file: &Path,
    filter: &SessionFilter,
    ical: bool,
    config: &TimetraceConfig,
) -> Result<SessionReport> {
    let content = read_input(file)?;
    let events = extract(&content).with_context(|| format!("No sessions to select in {}", file.display()))?;
    let sessions = select_sessions(&events, filter);

    // The iCalendar tally counts every event whose summary contains the kind,
    // regardless of modality.
    let months = if ical {
        count_kind_by_month(&content, &filter.kind, &config.report_months)
            .with_context(|| format!("Could not parse {} as iCalendar", file.display()))?
    } else {
        monthly_tally(&events, filter, &config.report_months)
    };

    Ok(SessionReport {
        title: format!("{} {} sessions", filter.modality, filter.kind),
        sessions,
        months,
    })
}
