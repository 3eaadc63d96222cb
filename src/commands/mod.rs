pub mod config;
pub mod events;
pub mod sessions;
pub mod traffic;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use timetrace_core::config::TimetraceConfig;

pub fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))
}

pub fn open_input(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("Could not open {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Write `contents` under the configured output directory, creating parents.
pub fn write_output(config: &TimetraceConfig, file: &Path, contents: &str) -> Result<PathBuf> {
    let path = config.output_path(file);

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Could not create {}", parent.display()))?;
    }

    std::fs::write(&path, contents).with_context(|| format!("Could not write {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote output");

    Ok(path)
}
