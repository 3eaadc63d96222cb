use anyhow::Result;
use owo_colors::OwoColorize;
use timetrace_core::config::TimetraceConfig;

pub fn run(config: &TimetraceConfig) -> Result<()> {
    let config_path = TimetraceConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!("  Output:  {}", config.output_dir().display());
    println!();
    println!("{}", "Effective settings".bold());
    for line in config.to_toml()?.lines() {
        println!("  {}", line);
    }

    Ok(())
}
