//! Report output: tables, Markdown pages, HTML wrapping and chart data.

mod chart;
mod filter;
mod html;
mod schedule;
mod traffic;

pub use chart::{
    ChartKind, ChartSeries, charts_json, port_distribution_chart, sessions_chart, top_ips_chart,
    top_ports_chart,
};
pub use filter::filter_lines;
pub use html::{html_page, markdown_to_html};
pub use schedule::{
    EVENT_COLUMNS, EventFormat, events_markdown, pseudo_csv_lines, render_events,
    sessions_markdown, write_events_csv,
};
pub use traffic::{TRAFFIC_TITLE, traffic_markdown};

/// Escape a value for use inside a Markdown table cell.
fn markdown_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

/// Wrap a value in an inline code span, one backtick longer than the
/// longest run inside it.
fn code_span(value: &str) -> String {
    let longest_run = value
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);

    if longest_run == 0 {
        return format!("`{value}`");
    }
    let fence = "`".repeat(longest_run + 1);
    format!("{fence} {value} {fence}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_span_widens_for_backticks() {
        assert_eq!(code_span("ls"), "`ls`");
        assert_eq!(code_span("a`b"), "`` a`b ``");
    }

    #[test]
    fn code_span_outgrows_double_backticks() {
        assert_eq!(code_span("x ``y`` z"), "``` x ``y`` z ```");
        assert_eq!(code_span("````"), "````` ```` `````");
    }
}
