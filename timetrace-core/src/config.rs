//! timetrace configuration.

use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::error::{TimetraceError, TimetraceResult};
use crate::session::{DEFAULT_KIND, DEFAULT_MODALITY, DEFAULT_MONTHS, SessionFilter};
use crate::traffic::{AggregatorConfig, DEFAULT_SUSPICIOUS_PORTS, PortBoundary};

static DEFAULT_OUTPUT_DIR: &str = ".";
static DEFAULT_PLACEHOLDER: &str = "vide";
const DEFAULT_TOP_N: usize = 10;

/// Configuration at ~/.config/timetrace/config.toml
///
/// Every key is optional; command-line flags override individual values.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TimetraceConfig {
    /// Entries shown in each top-N list
    pub top_n: usize,
    pub suspicious_ports: Vec<u32>,
    pub port_boundary: PortBoundary,
    pub detect_reverse_dns: bool,
    pub track_intervals: bool,

    /// Stand-in for absent fields in pseudo-CSV rows
    pub placeholder: String,
    pub session_modality: String,
    pub session_kind: String,
    pub report_months: Vec<u32>,

    /// Where relative output paths land
    pub output_dir: PathBuf,
}

impl Default for TimetraceConfig {
    fn default() -> Self {
        TimetraceConfig {
            top_n: DEFAULT_TOP_N,
            suspicious_ports: DEFAULT_SUSPICIOUS_PORTS.to_vec(),
            port_boundary: PortBoundary::default(),
            detect_reverse_dns: false,
            track_intervals: true,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            session_modality: DEFAULT_MODALITY.to_string(),
            session_kind: DEFAULT_KIND.to_string(),
            report_months: DEFAULT_MONTHS.to_vec(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl TimetraceConfig {
    pub fn config_path() -> TimetraceResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TimetraceError::Config("Could not determine config directory".into()))?
            .join("timetrace");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user config, writing a commented default file on first use.
    pub fn load() -> TimetraceResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from an explicit path. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> TimetraceResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .build()
            .map_err(|e| TimetraceError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| TimetraceError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> TimetraceResult<String> {
        toml::to_string_pretty(self).map_err(|e| TimetraceError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> TimetraceResult<()> {
        let contents = format!(
            "\
# timetrace configuration

# Entries per top-N list in traffic reports:
# top_n = {DEFAULT_TOP_N}

# Ports that flag a capture line as suspicious:
# suspicious_ports = [22, 80, 443, 50019]

# What may follow a port number: \"colon\" or \"colon-or-whitespace\"
# port_boundary = \"colon-or-whitespace\"

# Collect reverse-DNS (PTR? ... in-addr.arpa) lookups:
# detect_reverse_dns = false

# Track first/last capture time per IP:
# track_intervals = true

# Placeholder for empty pseudo-CSV cells:
# placeholder = \"{DEFAULT_PLACEHOLDER}\"

# Which sessions `timetrace sessions` selects:
# session_modality = \"{DEFAULT_MODALITY}\"
# session_kind = \"{DEFAULT_KIND}\"
# report_months = [9, 10, 11, 12]

# Where relative output files are written:
# output_dir = \"{DEFAULT_OUTPUT_DIR}\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                TimetraceError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| TimetraceError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    pub fn aggregator_config(&self) -> AggregatorConfig {
        AggregatorConfig {
            port_boundary: self.port_boundary,
            suspicious_ports: self.suspicious_ports.iter().copied().collect(),
            detect_reverse_dns: self.detect_reverse_dns,
            track_intervals: self.track_intervals,
        }
    }

    pub fn session_filter(&self) -> SessionFilter {
        SessionFilter {
            modality: self.session_modality.clone(),
            kind: self.session_kind.clone(),
        }
    }

    /// `output_dir` with `~` expanded.
    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.output_dir.to_string_lossy()).into_owned())
    }

    /// Place a relative output path under `output_dir`; absolute paths pass through.
    pub fn output_path(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.output_dir().join(file)
        }
    }
}
