pub mod cli;
pub mod settings;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "flight-etl")]
#[command(about = "Expand route jobs, fetch flight options and write an aggregated report")]
pub struct CliConfig {
    /// Path to the JSON list of route jobs
    #[arg(long, default_value = "data/sample_input.json")]
    pub input: String,

    /// Path to the settings file (JSON, or TOML by extension)
    #[arg(long, default_value = "config/settings.example.json")]
    pub settings: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}
