mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use timetrace_core::config::TimetraceConfig;
use timetrace_core::report::EventFormat;
use timetrace_core::traffic::PortBoundary;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "timetrace")]
#[command(about = "Turn timetable exports and packet capture dumps into tables and reports")]
struct Cli {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every event of a calendar export
    Events {
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = Format::PseudoCsv)]
        format: Format,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Select sessions of one course and count them per month
    Sessions {
        file: PathBuf,

        /// Course code to match (defaults to session_modality from config)
        #[arg(long)]
        modality: Option<String>,

        /// Keyword the summary must contain (defaults to session_kind from config)
        #[arg(long)]
        kind: Option<String>,

        #[arg(long)]
        markdown: Option<PathBuf>,

        #[arg(long)]
        html: Option<PathBuf>,

        /// Write chart series as JSON
        #[arg(long)]
        chart_data: Option<PathBuf>,

        /// Image to link under the monthly table
        #[arg(long)]
        chart_image: Option<String>,

        /// Count months with a full iCalendar parse of every event containing the kind
        #[arg(long)]
        ical: bool,
    },
    /// Summarize a tcpdump text capture
    Traffic {
        file: PathBuf,

        /// Entries per ranking (defaults to top_n from config)
        #[arg(long)]
        top: Option<usize>,

        #[arg(long)]
        boundary: Option<PortBoundary>,

        /// Collect reverse-DNS lookups
        #[arg(long)]
        dns: bool,

        /// Skip first/last seen tracking per IP
        #[arg(long)]
        no_intervals: bool,

        /// Keep only report lines containing this IP
        #[arg(long)]
        filter_ip: Option<String>,

        /// Keep only report lines containing this port
        #[arg(long)]
        filter_port: Option<String>,

        #[arg(long)]
        markdown: Option<PathBuf>,

        #[arg(long)]
        html: Option<PathBuf>,

        /// Write one CSV row per TCP packet line
        #[arg(long)]
        packets_csv: Option<PathBuf>,

        /// Write chart series as JSON
        #[arg(long)]
        chart_data: Option<PathBuf>,
    },
    /// Show the config file location and effective settings
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    PseudoCsv,
    Csv,
    Json,
    Markdown,
}

impl From<Format> for EventFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::PseudoCsv => EventFormat::PseudoCsv,
            Format::Csv => EventFormat::Csv,
            Format::Json => EventFormat::Json,
            Format::Markdown => EventFormat::Markdown,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = TimetraceConfig::load()?;

    match cli.command {
        Commands::Events { file, format, output } => {
            commands::events::run(&file, format.into(), output.as_deref(), &config)
        }
        Commands::Sessions {
            file,
            modality,
            kind,
            markdown,
            html,
            chart_data,
            chart_image,
            ical,
        } => commands::sessions::run(
            &file,
            commands::sessions::SessionsArgs {
                modality,
                kind,
                markdown,
                html,
                chart_data,
                chart_image,
                ical,
            },
            &config,
        ),
        Commands::Traffic {
            file,
            top,
            boundary,
            dns,
            no_intervals,
            filter_ip,
            filter_port,
            markdown,
            html,
            packets_csv,
            chart_data,
        } => commands::traffic::run(
            &file,
            commands::traffic::TrafficArgs {
                top,
                boundary,
                dns,
                no_intervals,
                filter_ip,
                filter_port,
                markdown,
                html,
                packets_csv,
                chart_data,
            },
            &config,
        ),
        Commands::Config => commands::config::run(&config),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}
