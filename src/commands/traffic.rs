use std::io::BufRead;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use timetrace_core::config::TimetraceConfig;
use timetrace_core::report::{
    TRAFFIC_TITLE, charts_json, filter_lines, html_page, port_distribution_chart, top_ips_chart,
    top_ports_chart, traffic_markdown,
};
use timetrace_core::traffic::{
    AggregateState, AggregatorConfig, PortBoundary, aggregate_reader, extract_packets,
    write_packets_csv,
};

use super::{open_input, write_output};
use crate::render::Render;

pub struct TrafficArgs {
    pub top: Option<usize>,
    pub boundary: Option<PortBoundary>,
    pub dns: bool,
    pub no_intervals: bool,
    pub filter_ip: Option<String>,
    pub filter_port: Option<String>,
    pub markdown: Option<PathBuf>,
    pub html: Option<PathBuf>,
    pub packets_csv: Option<PathBuf>,
    pub chart_data: Option<PathBuf>,
}

pub fn run(file: &Path, args: TrafficArgs, config: &TimetraceConfig) -> Result<()> {
    let aggregator_config = resolve_aggregator(&args, config);
    let top_n = args.top.unwrap_or(config.top_n);
    if top_n == 0 {
        anyhow::bail!("Rankings need at least one entry (got --top 0 / top_n = 0)");
    }

    let state = aggregate_reader(open_input(file)?, &aggregator_config)
        .with_context(|| format!("Could not read {}", file.display()))?;

    let report = filter_lines(
        &traffic_markdown(&state, top_n),
        args.filter_ip.as_deref(),
        args.filter_port.as_deref(),
    );

    let mut written = Vec::new();

    if let Some(out) = &args.markdown {
        written.push(write_output(config, out, &report)?);
    }
    if let Some(out) = &args.html {
        written.push(write_output(config, out, &html_page(TRAFFIC_TITLE, &report))?);
    }
    if let Some(out) = &args.packets_csv {
        written.push(write_output(config, out, &packets_csv(file)?)?);
    }
    if let Some(out) = &args.chart_data {
        written.push(write_output(config, out, &chart_data(&state, top_n)?)?);
    }

    if args.markdown.is_none() && args.html.is_none() {
        print!("{report}");
        return Ok(());
    }

    println!("{}", state.render());
    println!();
    for path in &written {
        println!("{}", path.render());
    }

    Ok(())
}

fn resolve_aggregator(args: &TrafficArgs, config: &TimetraceConfig) -> AggregatorConfig {
    let mut aggregator = config.aggregator_config();
    if let Some(boundary) = args.boundary {
        aggregator.port_boundary = boundary;
    }
    if args.dns {
        aggregator.detect_reverse_dns = true;
    }
    if args.no_intervals {
        aggregator.track_intervals = false;
    }
    aggregator
}

/// Second pass over the dump for the per-packet table.
fn packets_csv(file: &Path) -> Result<String> {
    let lines = open_input(file)?
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Could not read {}", file.display()))?;
    let packets = extract_packets(&lines);
    tracing::debug!(packets = packets.len(), "extracted packet rows");

    let mut out = Vec::new();
    write_packets_csv(&packets, &mut out)?;
    Ok(String::from_utf8(out)?)
}

fn chart_data(state: &AggregateState, top_n: usize) -> Result<String> {
    Ok(charts_json(&[
        top_ips_chart(state, top_n),
        top_ports_chart(state, top_n),
        port_distribution_chart(state, top_n),
    ])?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = "\
11:42:01.000001 IP 192.168.1.10.50019 > 10.0.0.5.22: Flags [S], seq 1, win 64240, length 0
11:42:01.000002 IP 10.0.0.5.22 > 192.168.1.10.50019: Flags [S.], seq 2, ack 2, win 65160, length 0
11:42:02.500000 IP 192.168.1.10.40000 > 10.0.0.7.8080: Flags [P.], seq 1:90, ack 1, win 502, length 89
11:42:03.000000 IP 192.168.1.10.5353 > 10.0.0.53.53: 7+ PTR? 5.0.0.10.in-addr.arpa. (38)
";

    fn args() -> TrafficArgs {
        TrafficArgs {
            top: None,
            boundary: None,
            dns: false,
            no_intervals: false,
            filter_ip: None,
            filter_port: None,
            markdown: None,
            html: None,
            packets_csv: None,
            chart_data: None,
        }
    }

    fn setup() -> (tempfile::TempDir, TimetraceConfig) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dump.txt"), DUMP).unwrap();
        let config = TimetraceConfig {
            output_dir: dir.path().to_path_buf(),
            ..TimetraceConfig::default()
        };
        (dir, config)
    }

    fn read(dir: &tempfile::TempDir, name: &str) -> String {
        std::fs::read_to_string(dir.path().join(name)).unwrap()
    }

    // --- overrides ---

    #[test]
    fn flags_override_config() {
        let config = TimetraceConfig::default();
        let aggregator = resolve_aggregator(
            &TrafficArgs {
                boundary: Some(PortBoundary::Colon),
                dns: true,
                no_intervals: true,
                ..args()
            },
            &config,
        );
        assert_eq!(aggregator.port_boundary, PortBoundary::Colon);
        assert!(aggregator.detect_reverse_dns);
        assert!(!aggregator.track_intervals);
    }

    #[test]
    fn absent_flags_keep_config() {
        let config = TimetraceConfig {
            detect_reverse_dns: true,
            ..TimetraceConfig::default()
        };
        assert_eq!(resolve_aggregator(&args(), &config), config.aggregator_config());
    }

    // --- outputs ---

    #[test]
    fn writes_every_requested_output() {
        let (dir, config) = setup();
        run(
            &dir.path().join("dump.txt"),
            TrafficArgs {
                dns: true,
                markdown: Some(PathBuf::from("report.md")),
                html: Some(PathBuf::from("report.html")),
                packets_csv: Some(PathBuf::from("packets.csv")),
                chart_data: Some(PathBuf::from("charts.json")),
                ..args()
            },
            &config,
        )
        .unwrap();

        let md = read(&dir, "report.md");
        assert!(md.starts_with("# Network Traffic Analysis\n"));
        assert!(md.contains("- **192.168.1.10**: 4 occurrences"));
        assert!(md.contains("Reason: Critical port used (50019)"));
        assert!(md.contains("## Reverse DNS Lookups"));

        assert!(read(&dir, "report.html").contains("<h1>Network Traffic Analysis</h1>"));

        let csv = read(&dir, "packets.csv");
        assert_eq!(csv.lines().count(), 4);
        assert!(csv.contains("11:42:02.500000,192.168.1.10.40000,10.0.0.7.8080:,\"[P.],\",89"));

        let charts: serde_json::Value = serde_json::from_str(&read(&dir, "charts.json")).unwrap();
        assert_eq!(charts.as_array().map(|c| c.len()), Some(3));
        assert_eq!(charts[0]["labels"][0], "192.168.1.10");
        assert_eq!(charts[2]["kind"], "pie");
    }

    #[test]
    fn report_lines_filtered_by_ip() {
        let (dir, config) = setup();
        run(
            &dir.path().join("dump.txt"),
            TrafficArgs {
                filter_ip: Some("10.0.0.7".to_string()),
                markdown: Some(PathBuf::from("only.md")),
                ..args()
            },
            &config,
        )
        .unwrap();

        let md = read(&dir, "only.md");
        assert!(!md.is_empty());
        assert!(md.lines().all(|line| line.contains("10.0.0.7")));
    }

    #[test]
    fn zero_entry_ranking_is_refused() {
        let (dir, config) = setup();
        let err = run(
            &dir.path().join("dump.txt"),
            TrafficArgs {
                top: Some(0),
                ..args()
            },
            &config,
        )
        .unwrap_err();
        assert!(err.to_string().contains("at least one entry"));
    }

    #[test]
    fn missing_dump_is_an_error() {
        let (dir, config) = setup();
        assert!(run(&dir.path().join("nope.txt"), args(), &config).is_err());
    }
}
